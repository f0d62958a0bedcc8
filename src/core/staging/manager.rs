use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::error::{TransferError, TransferResult};

/// Owns the scratch directory that files are copied into before a push.
///
/// Files land under their base name only, so two inputs called `skin_a.mod`
/// collapse into one staged file holding the content of the later input.
pub struct StagingManager {
    /// Root of the staging area. Removed entirely by `cleanup`.
    staging_dir: PathBuf,
}

impl StagingManager {
    pub fn new(staging_dir: PathBuf) -> Self {
        Self { staging_dir }
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Copy every input into the staging directory.
    ///
    /// Returns the staged destinations in input order, each destination
    /// reported once at the position where it first appeared.
    pub async fn stage(&self, file_paths: &[PathBuf]) -> TransferResult<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .map_err(|source| TransferError::Staging {
                path: self.staging_dir.clone(),
                source,
            })?;

        let mut staged: Vec<PathBuf> = Vec::with_capacity(file_paths.len());
        for source in file_paths {
            let destination = self.destination_for(source)?;
            copy_preserving_metadata(source, &destination).await?;
            debug!("Staged {:?} -> {:?}", source, destination);

            if !staged.contains(&destination) {
                staged.push(destination);
            }
        }

        info!(
            "Staged {} file(s) from {} input(s) in {:?}",
            staged.len(),
            file_paths.len(),
            self.staging_dir
        );
        Ok(staged)
    }

    /// Remove the staging directory and its contents.
    ///
    /// Never fails. A missing directory is not an error; anything else is
    /// logged and handed back for the report.
    pub async fn cleanup(&self) -> Option<TransferError> {
        match tokio::fs::remove_dir_all(&self.staging_dir).await {
            Ok(()) => {
                debug!("Removed staging directory {:?}", self.staging_dir);
                None
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => {
                warn!(
                    "Could not remove staging directory {:?}: {}",
                    self.staging_dir, source
                );
                Some(TransferError::Io {
                    path: self.staging_dir.clone(),
                    source,
                })
            }
        }
    }

    fn destination_for(&self, source: &Path) -> TransferResult<PathBuf> {
        let file_name = source
            .file_name()
            .ok_or_else(|| TransferError::NoFileName(source.to_path_buf()))?;
        Ok(self.staging_dir.join(file_name))
    }
}

/// `fs::copy` keeps content and permissions; timestamps are copied after.
async fn copy_preserving_metadata(source: &Path, destination: &Path) -> TransferResult<()> {
    let staging_err = |source_err: std::io::Error| TransferError::Staging {
        path: source.to_path_buf(),
        source: source_err,
    };

    let metadata = tokio::fs::metadata(source).await.map_err(staging_err)?;
    if !metadata.is_file() {
        return Err(TransferError::Staging {
            path: source.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }

    // A read-only file staged earlier under the same name would refuse the overwrite.
    if tokio::fs::try_exists(destination).await.unwrap_or(false) {
        tokio::fs::remove_file(destination)
            .await
            .map_err(|source| TransferError::Staging {
                path: destination.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::copy(source, destination)
        .await
        .map_err(staging_err)?;

    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    let atime = filetime::FileTime::from_last_access_time(&metadata);
    filetime::set_file_times(destination, atime, mtime).map_err(|source| {
        TransferError::Staging {
            path: destination.to_path_buf(),
            source,
        }
    })?;

    Ok(())
}
