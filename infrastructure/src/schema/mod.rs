//! Turtle schema files as a [`SchemaSource`]

use gnsearch_application::{SchemaSource, SchemaSourceError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads one `.ttl` file, or every `.ttl` file under a directory.
#[derive(Debug, Clone)]
pub struct TtlSchemaSource {
    path: PathBuf,
}

impl TtlSchemaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema files in a stable (sorted) order
    fn files(&self) -> Result<Vec<PathBuf>, SchemaSourceError> {
        if self.path.is_file() {
            return Ok(vec![self.path.clone()]);
        }
        if !self.path.is_dir() {
            return Err(SchemaSourceError::NotFound(self.describe()));
        }

        let pattern = self.path.join("**").join("*.ttl");
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern).map_err(|e| SchemaSourceError::Read {
            path: pattern.to_string(),
            message: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
        files.sort();
        if files.is_empty() {
            return Err(SchemaSourceError::NotFound(format!(
                "no .ttl files under {}",
                self.path.display()
            )));
        }
        Ok(files)
    }
}

impl SchemaSource for TtlSchemaSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Vec<String>, SchemaSourceError> {
        self.files()?
            .into_iter()
            .map(|file| {
                debug!(file = %file.display(), "Reading schema file");
                fs::read_to_string(&file).map_err(|e| SchemaSourceError::Read {
                    path: file.display().to_string(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gn.ttl");
        fs::write(&file, "@prefix gn: <http://genenetwork.org/id/> .").unwrap();

        let files = TtlSchemaSource::new(&file).load().unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].contains("@prefix gn:"));
    }

    #[test]
    fn test_loads_ttl_files_recursively_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("b.ttl"), "second").unwrap();
        fs::write(dir.path().join("a.ttl"), "first").unwrap();
        fs::write(dir.path().join("nested").join("c.ttl"), "third").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = TtlSchemaSource::new(dir.path()).load().unwrap();
        assert_eq!(files, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = TtlSchemaSource::new(dir.path().join("absent"));
        assert!(matches!(source.load(), Err(SchemaSourceError::NotFound(_))));
    }

    #[test]
    fn test_directory_without_ttl_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.md"), "x").unwrap();
        let source = TtlSchemaSource::new(dir.path());
        assert!(matches!(source.load(), Err(SchemaSourceError::NotFound(_))));
    }
}
