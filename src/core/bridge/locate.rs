use std::path::{Path, PathBuf};

use tracing::debug;

/// Resolve the bridge executable for a target program directory.
///
/// The emulator ships its own adb next to its shell binaries, so a copy in
/// `target_dir` wins over whatever `PATH` would find. A `bridge_program` that
/// already points at a file is used as-is.
pub fn resolve_bridge_program(bridge_program: &Path, target_dir: Option<&Path>) -> PathBuf {
    if bridge_program.components().count() > 1 && bridge_program.is_file() {
        return bridge_program.to_path_buf();
    }

    if let Some(dir) = target_dir {
        for candidate in candidate_names(bridge_program) {
            let path = dir.join(&candidate);
            if path.is_file() {
                debug!("Using bridge executable from target directory: {:?}", path);
                return path;
            }
        }
    }

    bridge_program.to_path_buf()
}

fn candidate_names(bridge_program: &Path) -> Vec<PathBuf> {
    let mut names = vec![bridge_program.to_path_buf()];
    if cfg!(target_os = "windows") && bridge_program.extension().is_none() {
        names.insert(0, bridge_program.with_extension("exe"));
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_executable_inside_target_dir() {
        let dir = tempfile::tempdir().unwrap();
        let name = if cfg!(target_os = "windows") {
            "adb.exe"
        } else {
            "adb"
        };
        std::fs::write(dir.path().join(name), b"").unwrap();

        let resolved = resolve_bridge_program(Path::new("adb"), Some(dir.path()));
        assert_eq!(resolved, dir.path().join(name));
    }

    #[test]
    fn falls_back_to_path_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_bridge_program(Path::new("adb"), Some(dir.path()));
        assert_eq!(resolved, PathBuf::from("adb"));

        assert_eq!(
            resolve_bridge_program(Path::new("adb"), None),
            PathBuf::from("adb")
        );
    }

    #[test]
    fn explicit_program_path_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let custom = dir.path().join("tools").join("my-adb");
        std::fs::create_dir_all(custom.parent().unwrap()).unwrap();
        std::fs::write(&custom, b"").unwrap();

        let other = tempfile::tempdir().unwrap();
        assert_eq!(resolve_bridge_program(&custom, Some(other.path())), custom);
    }
}
