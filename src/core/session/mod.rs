pub mod file_list;

pub use file_list::TransferSession;
