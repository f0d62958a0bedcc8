fn main() -> std::process::ExitCode {
    mod_transfer_lib::run()
}
