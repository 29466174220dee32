//! Source loading
//!
//! Reads `.rs` files, parses them with `syn` and groups them into packages,
//! one package per directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{ModelError, ModelResult};
use crate::model::PackageModel;
use crate::reader::{PackageBuilder, ReaderOptions};

/// One parsed source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub syntax: syn::File,
}

impl SourceFile {
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> ModelResult<Self> {
        let path = path.into();
        let syntax = syn::parse_file(text).map_err(|e| ModelError::parse(&path, &e))?;
        Ok(Self { path, syntax })
    }
}

/// Parsed files that make up one package
#[derive(Debug, Clone)]
pub struct SourcePackage {
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<SourceFile>,
}

impl SourcePackage {
    /// Package from in-memory source text
    pub fn from_source(name: impl Into<String>, text: &str) -> ModelResult<Self> {
        let name = name.into();
        let file = SourceFile::parse(format!("{}.rs", name), text)?;
        Ok(Self {
            name,
            dir: PathBuf::new(),
            files: vec![file],
        })
    }

    /// Items of every file, in file order
    pub fn items(&self) -> impl Iterator<Item = &syn::Item> {
        self.files.iter().flat_map(|file| file.syntax.items.iter())
    }

    /// Read every item and run the finalize pass
    pub fn build_model(&self, options: &ReaderOptions) -> ModelResult<PackageModel> {
        let mut builder = PackageBuilder::with_options(&self.name, *options);
        for item in self.items() {
            builder.read_item(item)?;
        }
        builder.resolve()
    }
}

/// Loads packages from the filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceLoader;

impl SourceLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a single file, or the `.rs` files directly inside a directory
    pub fn load(&self, path: &Path) -> ModelResult<SourcePackage> {
        if path.is_file() {
            let name = package_name_for_file(path);
            let file = self.parse_path(path)?;
            info!("Loaded package {} from {}", name, path.display());
            return Ok(SourcePackage {
                name,
                dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                files: vec![file],
            });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| walk_error(path, e))?;
            if is_rust_file(entry.path()) {
                files.push(self.parse_path(entry.path())?);
            }
        }
        if files.is_empty() {
            return Err(ModelError::NoSources {
                path: path.to_path_buf(),
            });
        }

        let name = package_name_for_dir(path);
        info!(
            "Loaded package {} ({} files) from {}",
            name,
            files.len(),
            path.display()
        );
        Ok(SourcePackage {
            name,
            dir: path.to_path_buf(),
            files,
        })
    }

    /// Load every directory under `root` that holds `.rs` files, one package each
    pub fn load_tree(&self, root: &Path) -> ModelResult<Vec<SourcePackage>> {
        let mut grouped: BTreeMap<PathBuf, Vec<SourceFile>> = BTreeMap::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            if !entry.file_type().is_file() || !is_rust_file(entry.path()) {
                continue;
            }
            let dir = entry
                .path()
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            let file = self.parse_path(entry.path())?;
            grouped.entry(dir).or_default().push(file);
        }
        if grouped.is_empty() {
            return Err(ModelError::NoSources {
                path: root.to_path_buf(),
            });
        }

        Ok(grouped
            .into_iter()
            .map(|(dir, files)| SourcePackage {
                name: package_name_for_dir(&dir),
                dir,
                files,
            })
            .collect())
    }

    fn parse_path(&self, path: &Path) -> ModelResult<SourceFile> {
        debug!("Parsing {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| ModelError::io(path, e))?;
        SourceFile::parse(path, &text)
    }
}

fn is_rust_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("rs")
}

fn package_name_for_dir(dir: &Path) -> String {
    dir.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("package")
        .to_string()
}

/// `lib.rs`, `mod.rs` and `main.rs` take the name of their directory
fn package_name_for_file(path: &Path) -> String {
    let stem = path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("package");
    match stem {
        "lib" | "mod" | "main" => path
            .parent()
            .map(package_name_for_dir)
            .unwrap_or_else(|| stem.to_string()),
        _ => stem.to_string(),
    }
}

fn walk_error(root: &Path, error: walkdir::Error) -> ModelError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = error
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop"));
    ModelError::io(path, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_directory_sorted_by_name() {
        let dir = TempDir::new().unwrap();
        let pkg = dir.path().join("shop");
        fs::create_dir(&pkg).unwrap();
        fs::write(pkg.join("b.rs"), "struct B;").unwrap();
        fs::write(pkg.join("a.rs"), "struct A;").unwrap();
        fs::write(pkg.join("notes.txt"), "not rust").unwrap();

        let package = SourceLoader::new().load(&pkg).unwrap();
        assert_eq!(package.name, "shop");
        assert_eq!(package.files.len(), 2);
        let model = package.build_model(&ReaderOptions::default()).unwrap();
        let names: Vec<_> = model.types().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_single_file_package_name() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("billing");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("lib.rs"), "pub struct Invoice;").unwrap();
        fs::write(nested.join("types.rs"), "pub struct Amount;").unwrap();

        let loader = SourceLoader::new();
        assert_eq!(loader.load(&nested.join("lib.rs")).unwrap().name, "billing");
        assert_eq!(loader.load(&nested.join("types.rs")).unwrap().name, "types");
    }

    #[test]
    fn test_load_tree_groups_by_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("one")).unwrap();
        fs::create_dir_all(dir.path().join("two")).unwrap();
        fs::write(dir.path().join("one/lib.rs"), "struct A;").unwrap();
        fs::write(dir.path().join("two/lib.rs"), "struct B;").unwrap();

        let packages = SourceLoader::new().load_tree(dir.path()).unwrap();
        let names: Vec<_> = packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn test_empty_directory_has_no_sources() {
        let dir = TempDir::new().unwrap();
        let err = SourceLoader::new().load(dir.path()).unwrap_err();
        assert!(matches!(err, ModelError::NoSources { .. }));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_parse_error_carries_position() {
        let err = SourcePackage::from_source("broken", "struct A {\n    x: u8,\n    y: \n}").unwrap_err();
        match err {
            ModelError::Parse { line, .. } => assert!(line >= 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}
