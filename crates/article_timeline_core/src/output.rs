//! Atomic output file writes.
//!
//! # Responsibility
//! - Replace a target file with fully rendered contents in one step.
//!
//! # Invariants
//! - The target is never observed partially written: contents go to a
//!   temporary file in the same directory, which is then renamed over it.
//! - On any failure the target is left untouched and the temporary file is
//!   removed.

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Destination could not be written.
#[derive(Debug)]
pub struct OutputWriteError {
    pub path: PathBuf,
    pub source: io::Error,
}

impl Display for OutputWriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "cannot write output file {}: {}", self.path.display(), self.source)
    }
}

impl Error for OutputWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Writes `contents` to `path`, creating parent directories as needed.
///
/// # Side effects
/// - Emits `output_write` logging events with byte count and duration.
pub fn write_atomically(path: impl AsRef<Path>, contents: &[u8]) -> Result<(), OutputWriteError> {
    let path = path.as_ref();
    let started_at = Instant::now();

    match persist_contents(path, contents) {
        Ok(()) => {
            info!(
                "event=output_write module=output status=ok bytes={} duration_ms={}",
                contents.len(),
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=output_write module=output status=error duration_ms={} error_code=output_write_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(OutputWriteError {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }
}

fn persist_contents(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_atomically;
    use tempfile::tempdir;

    #[test]
    fn write_creates_parent_directories_and_replaces_contents() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested/out.json");

        write_atomically(&target, b"[1]").unwrap();
        write_atomically(&target, b"[]").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"[]");
        let leftovers = std::fs::read_dir(target.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn write_to_directory_path_fails_without_leaving_temp_files() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();

        let err = write_atomically(&target, b"x").unwrap_err();
        assert_eq!(err.path, target);
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
