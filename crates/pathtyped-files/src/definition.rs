//! Declaration artifact storage.
//!
//! A [`DefinitionFile`] is the on-disk declaration emitted for a resource
//! folder. Its first line is a comment holding the tree fingerprint; nothing
//! else in the file is ever read back.
//!
//! # Examples
//!
//! ```
//! use pathtyped_files::DefinitionFile;
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let definition = DefinitionFile::new("from defaults import *", temp.path().join("definition.py"));
//! assert!(!definition.exists());
//! assert_eq!(definition.read_integrity().unwrap(), "");
//!
//! definition.write("# 0123abcd\nroot = ...\n").unwrap();
//! assert_eq!(definition.read_integrity().unwrap(), "0123abcd");
//! ```

use pathtyped_core::{Error, Result};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location and import statement of a generated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
    import_statement: String,
    path: PathBuf,
}

impl DefinitionFile {
    /// Creates a definition file descriptor.
    ///
    /// `import_statement` is copied verbatim into every generated artifact,
    /// ahead of the declaration body.
    #[must_use]
    pub fn new(import_statement: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            import_statement: import_statement.into(),
            path: path.into(),
        }
    }

    /// The caller-supplied import statement.
    #[must_use]
    pub fn import_statement(&self) -> &str {
        &self.import_statement
    }

    /// Path of the artifact on disk.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the artifact exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Reads the fingerprint stored on the first line.
    ///
    /// The leading comment marker (`#` or `//`) and surrounding whitespace are
    /// removed. A missing artifact reads as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the artifact exists but cannot be read.
    pub fn read_integrity(&self) -> Result<String> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => return Err(Error::io(&self.path, e)),
        };

        let mut first_line = String::new();
        BufReader::new(file)
            .read_line(&mut first_line)
            .map_err(|e| Error::io(&self.path, e))?;

        Ok(first_line
            .trim()
            .trim_start_matches(['#', '/'])
            .trim()
            .to_string())
    }

    /// Writes the complete artifact atomically.
    ///
    /// The content goes to a sibling temp file first, is synced, and is then
    /// renamed over the artifact. Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if any filesystem step fails.
    pub fn write(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let temp_path = self.path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;
        file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

        fs::rename(&temp_path, &self.path).map_err(|e| Error::io(&self.path, e))?;

        debug!(
            "Wrote {} bytes to {}",
            content.len(),
            self.path.display()
        );
        Ok(())
    }
}
