use std::path::{Path, PathBuf};

use crate::core::transfer::TransferRequest;

/// Files queued by the user for the next transfer.
///
/// Replaces the window-global list the drop area used to append to: paths are
/// kept in drop order and an exact path is only ever queued once.
#[derive(Debug, Clone, Default)]
pub struct TransferSession {
    files: Vec<PathBuf>,
}

impl TransferSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue paths that are not queued yet. Returns how many were added.
    pub fn add<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let before = self.files.len();
        for path in paths {
            let path = path.as_ref();
            if !self.files.iter().any(|queued| queued == path) {
                self.files.push(path.to_path_buf());
            }
        }
        self.files.len() - before
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Base names of the queued files, in order, as shown to the user.
    pub fn display_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|path| {
                path.file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string())
            })
            .collect()
    }

    /// Hand the queue over to a transfer, leaving the session empty.
    pub fn take_request(&mut self, target_program_path: PathBuf, port: u16) -> TransferRequest {
        let request = TransferRequest {
            target_program_path,
            port,
            file_paths: self.files.clone(),
        };
        self.clear();
        request
    }
}
