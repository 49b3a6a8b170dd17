//! Schema sources and the file-system capability used to resolve imports.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// A named unit of `.proto` text.
///
/// The name is the file identity handed to the parser; imports inside the
/// content are resolved relative to the import roots, not to this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSource {
    name: String,
    content: String,
}

impl SchemaSource {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a source from disk, naming it after the file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Capability for locating imported schema files by logical path
/// (e.g. `common/money.proto`).
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &str) -> bool;

    fn open_text(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;

    /// Reads the whole file into a string.
    fn read_text(&self, path: &str) -> io::Result<String> {
        let mut text = String::new();
        self.open_text(path)?.read_to_string(&mut text)?;
        Ok(text)
    }
}

/// Imports served from memory, keyed by logical path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, String>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn open_text(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.files.get(path) {
            Some(content) => Ok(Box::new(content.as_bytes())),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No in-memory file '{path}'"),
            )),
        }
    }
}

/// Imports served from a list of directories, searched in order.
#[derive(Debug, Clone, Default)]
pub struct DirectoryFileSystem {
    roots: Vec<PathBuf>,
}

impl DirectoryFileSystem {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn locate(&self, path: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(path))
            .find(|candidate| candidate.is_file())
    }
}

impl FileSystem for DirectoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        self.locate(path).is_some()
    }

    fn open_text(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let located = self.locate(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{path}' not found under any import root"),
            )
        })?;
        Ok(Box::new(BufReader::new(File::open(located)?)))
    }
}
