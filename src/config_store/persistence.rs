//! Storage backends and on-disk formats for the persisted tree.

use std::{
    collections::HashMap,
    ffi::OsString,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use serde_json::Value;

use super::ConfigError;

/// Storage backend the store persists through.
///
/// The four primitives are exactly what an atomic temp-then-rename save and
/// a plain load need. Implementations must be usable from the scheduler's
/// thread.
pub trait PersistenceProvider: Send + Sync {
    /// Reads the whole file as UTF-8.
    ///
    /// # Errors
    /// Returns the underlying I/O error; `NotFound` marks a missing file.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Writes (creating or truncating) the file with `contents`.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Renames `from` over `to`, replacing it.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Deletes the file.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Local filesystem backend, used unless another provider is injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemProvider;

impl PersistenceProvider for FileSystemProvider {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// In-memory backend for embedding and tests.
///
/// Counts successful writes so callers can observe how many saves reached
/// storage.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    files: Mutex<HashMap<PathBuf, String>>,
    writes: AtomicUsize,
}

impl MemoryProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file before the store reads it.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), contents.into());
        self
    }

    /// Current contents of a file, if it exists.
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// Returns `true` if the file exists.
    pub fn exists(&self, path: &Path) -> bool {
        self.contents(path).is_some()
    }

    /// Number of successful `write` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PersistenceProvider for MemoryProvider {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), contents.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        let contents = files.remove(from).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", from.display()),
            )
        })?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

/// Serialization format of the persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceFormat {
    /// Pretty-printed JSON with two-space indentation.
    #[default]
    Json,
    /// TOML. Trees holding `null` cannot be written in this format.
    Toml,
}

impl PersistenceFormat {
    /// Renders a tree in this format.
    ///
    /// # Errors
    /// Returns `ConfigError::SerializationError` if the tree has no
    /// representation in the format.
    pub fn serialize(self, tree: &Value) -> Result<String, ConfigError> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(tree).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(tree).map_err(|e| e.to_string()),
        };

        rendered.map_err(|details| ConfigError::SerializationError {
            content_type: format!("config as {}", self.name()),
            details,
        })
    }

    /// Parses file contents in this format.
    pub(super) fn parse(self, contents: &str) -> Result<Value, String> {
        match self {
            Self::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
        }
    }

    /// Lowercase format name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

/// The sibling temporary file a save writes before renaming: `<path>.tmp`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut temp: OsString = path.as_os_str().to_owned();
    temp.push(".tmp");
    PathBuf::from(temp)
}
