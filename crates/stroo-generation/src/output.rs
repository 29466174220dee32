//! Writing generated files
//!
//! Output is written to a temporary file next to the target and moved into
//! place, so a reader never observes a half written file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{GenerationError, GenerationResult};

/// Persists formatted output
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    overwrite: bool,
}

impl OutputWriter {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }

    /// Write `text` to `path`, creating parent directories as needed
    ///
    /// # Errors
    /// Returns `GenerationError::WriteFailed` when the file exists and
    /// overwriting is disabled, or when the temporary file cannot be moved.
    pub fn write(&self, path: &Path, text: &str) -> GenerationResult<PathBuf> {
        if path.exists() && !self.overwrite {
            return Err(GenerationError::WriteFailed(format!(
                "{} already exists",
                path.display()
            )));
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut temp = NamedTempFile::new_in(&dir)?;
        temp.write_all(text.as_bytes())?;
        temp.flush()?;
        debug!("Staged {} bytes in {}", text.len(), temp.path().display());

        temp.persist(path)
            .map_err(|e| GenerationError::WriteFailed(format!("{}: {}", path.display(), e)))?;
        info!("Wrote {}", path.display());
        Ok(path.to_path_buf())
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested/out/generated.rs");
        let written = OutputWriter::default().write(&target, "fn a() {}\n").unwrap();
        assert_eq!(written, target);
        assert_eq!(fs::read_to_string(&target).unwrap(), "fn a() {}\n");
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("generated.rs");
        fs::write(&target, "old").unwrap();
        OutputWriter::new(true).write(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn test_existing_file_kept_without_overwrite() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("generated.rs");
        fs::write(&target, "old").unwrap();
        let err = OutputWriter::new(false).write(&target, "new").unwrap_err();
        assert!(matches!(err, GenerationError::WriteFailed(_)));
        assert_eq!(fs::read_to_string(&target).unwrap(), "old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
