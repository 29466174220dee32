//! Temporary on-disk projects for snippets
//!
//! A snippet is written under a fresh temporary directory, which is removed
//! when the [`TemporaryProject`] is dropped. Marker lines split it into files:
//!
//! ```text
//! //--- shop/lib.rs
//! pub struct Order { pub id: u64 }
//! //--- shop/customer.rs
//! pub struct Customer;
//! ```
//!
//! Text before the first marker (or the whole snippet, without markers) goes
//! to `playground/lib.rs`.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

/// File used for unmarked snippet text
pub const DEFAULT_FILE: &str = "playground/lib.rs";

/// Prefix of a file marker line
pub const FILE_MARKER: &str = "//---";

/// Snippet files written to a temporary directory
#[derive(Debug)]
pub struct TemporaryProject {
    dir: TempDir,
    files: Vec<PathBuf>,
}

impl TemporaryProject {
    /// Write `source` into a new temporary directory
    pub fn create(source: &str) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("stroo-").tempdir()?;
        let mut files = Vec::new();
        for (relative, text) in split_snippet(source)? {
            let path = dir.path().join(&relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, text)?;
            files.push(path);
        }
        debug!(
            "Created temporary project {} with {} files",
            dir.path().display(),
            files.len()
        );
        Ok(Self { dir, files })
    }

    /// Directory the files live in
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Written files, in snippet order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Split a snippet on marker lines into `(relative path, text)` pairs
pub fn split_snippet(source: &str) -> io::Result<Vec<(PathBuf, String)>> {
    let mut files: Vec<(PathBuf, String)> = Vec::new();
    let mut current = PathBuf::from(DEFAULT_FILE);
    let mut text = String::new();

    for line in source.lines() {
        match line.trim_start().strip_prefix(FILE_MARKER) {
            Some(marker) => {
                push_file(&mut files, current, std::mem::take(&mut text))?;
                current = marker_path(marker.trim())?;
            }
            None => {
                text.push_str(line);
                text.push('\n');
            }
        }
    }
    push_file(&mut files, current, text)?;

    if files.is_empty() {
        files.push((PathBuf::from(DEFAULT_FILE), String::new()));
    }
    Ok(files)
}

/// Blank text before the first marker is dropped
fn push_file(files: &mut Vec<(PathBuf, String)>, path: PathBuf, text: String) -> io::Result<()> {
    if text.trim().is_empty() && path == Path::new(DEFAULT_FILE) {
        return Ok(());
    }
    if files.iter().any(|(existing, _)| *existing == path) {
        return Err(invalid(format!("file {} is listed twice", path.display())));
    }
    files.push((path, text));
    Ok(())
}

fn marker_path(raw: &str) -> io::Result<PathBuf> {
    let path = PathBuf::from(raw);
    if raw.is_empty() || path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
        return Err(invalid(format!("marker `{}` must name a .rs file", raw)));
    }
    let relative = path
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    if !relative {
        return Err(invalid(format!("marker `{}` must be a relative path", raw)));
    }
    Ok(path)
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmarked_snippet_goes_to_default_file() {
        let files = split_snippet("pub struct A;").unwrap();
        assert_eq!(files, vec![(PathBuf::from(DEFAULT_FILE), "pub struct A;\n".to_string())]);
    }

    #[test]
    fn test_markers_split_files() {
        let files = split_snippet(
            "\n//--- shop/lib.rs\npub struct A;\n//--- shop/b.rs\npub struct B;\n",
        )
        .unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].0, PathBuf::from("shop/lib.rs"));
        assert_eq!(files[1].1, "pub struct B;\n");
    }

    #[test]
    fn test_bad_markers_are_rejected() {
        assert!(split_snippet("//--- ../escape.rs\n").is_err());
        assert!(split_snippet("//--- /abs/lib.rs\n").is_err());
        assert!(split_snippet("//--- notes.txt\n").is_err());
        assert!(split_snippet("//--- a/lib.rs\n//--- a/lib.rs\n").is_err());
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let project = TemporaryProject::create("pub struct A;").unwrap();
        let root = project.root().to_path_buf();
        assert!(project.files()[0].is_file());
        drop(project);
        assert!(!root.exists());
    }
}
