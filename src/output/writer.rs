//! Staged output writer
//!
//! Conversions write into a temporary sibling of the destination that keeps
//! the target extension (the transcoder picks its muxer from it). The staged
//! file is renamed over the destination on success and removed on drop
//! otherwise.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::CollisionPolicy;
use crate::output::resolver::uniquify;

const STAGING_PREFIX: &str = ".mediaconv-";
const MAX_COMMIT_ATTEMPTS: usize = 16;

/// Output writer creating staged files next to their destination
pub struct OutputWriter;

impl OutputWriter {
    /// Create the output directory (and parents) if needed
    pub fn ensure_output_directory(dir: &Path) -> Result<(), DomainError> {
        if dir.as_os_str().is_empty() || dir.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(dir).map_err(|e| {
            DomainError::BadArgs(format!(
                "Failed to create output directory {}: {}",
                dir.display(),
                e
            ))
        })
    }

    /// Reserve a staged file for `destination`
    pub fn stage(destination: &Path) -> Result<StagedOutput, DomainError> {
        let directory = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let suffix = destination
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let temp = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&directory)
            .map_err(|e| {
                DomainError::FsFail(format!(
                    "Failed to create staging file in {}: {}",
                    directory.display(),
                    e
                ))
            })?
            .into_temp_path();

        debug!("Staging {} at {}", destination.display(), temp.display());
        Ok(StagedOutput {
            temp,
            destination: destination.to_path_buf(),
        })
    }
}

/// A temporary file waiting to be renamed onto its destination
#[derive(Debug)]
pub struct StagedOutput {
    temp: TempPath,
    destination: PathBuf,
}

impl StagedOutput {
    /// Path the converter should write to
    pub fn path(&self) -> &Path {
        &self.temp
    }

    /// Intended destination
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Move the staged file onto its destination.
    ///
    /// `overwrite` replaces atomically. `keep-both` never clobbers: if the
    /// destination appeared meanwhile, the next free `" (n)"` name is used.
    /// Returns the final path.
    pub fn commit(self, policy: CollisionPolicy) -> Result<PathBuf, DomainError> {
        set_default_permissions(&self.temp);

        let mut temp = self.temp;
        let mut destination = self.destination;

        for _ in 0..MAX_COMMIT_ATTEMPTS {
            let result = match policy {
                CollisionPolicy::Overwrite => temp.persist(&destination),
                CollisionPolicy::KeepBoth => temp.persist_noclobber(&destination),
            };

            match result {
                Ok(()) => return Ok(destination),
                Err(e) if policy == CollisionPolicy::KeepBoth
                    && e.error.kind() == io::ErrorKind::AlreadyExists =>
                {
                    warn!(
                        "{} appeared during conversion, picking another name",
                        destination.display()
                    );
                    temp = e.path;
                    destination = uniquify(&destination);
                }
                Err(e) => {
                    return Err(DomainError::FsFail(format!(
                        "Failed to move output into place at {}: {}",
                        destination.display(),
                        e.error
                    )));
                }
            }
        }

        Err(DomainError::FsFail(format!(
            "Could not find a free output name near {}",
            destination.display()
        )))
    }
}

/// Staging files are created owner-only; give outputs ordinary permissions
fn set_default_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)) {
            debug!("Failed to set permissions on {}: {}", path.display(), e);
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}
