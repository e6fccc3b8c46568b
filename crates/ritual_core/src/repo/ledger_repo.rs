//! Ledger repository contracts and file-backed implementation.
//!
//! # Responsibility
//! - Read the full ledger text from its backing store.
//! - Write a replacement document without ever exposing a partial file.
//!
//! # Invariants
//! - File commits go through a sibling temp file and a single rename.
//! - The rename is the only moment the ledger file changes.
//! - No file locking: one writer process per ledger is assumed.

use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage errors for ledger reads and writes.
#[derive(Debug)]
pub enum RepoError {
    /// The ledger document does not exist.
    DocumentNotFound(PathBuf),
    /// The ledger exists but could not be read as UTF-8 text.
    Read { path: PathBuf, source: io::Error },
    /// The replacement document could not be written or renamed into place.
    WriteFailure { path: PathBuf, source: io::Error },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNotFound(path) => write!(f, "ledger not found: {}", path.display()),
            Self::Read { path, source } => {
                write!(f, "failed to read ledger `{}`: {source}", path.display())
            }
            Self::WriteFailure { path, source } => {
                write!(f, "failed to write ledger `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DocumentNotFound(_) => None,
            Self::Read { source, .. } => Some(source),
            Self::WriteFailure { source, .. } => Some(source),
        }
    }
}

/// Repository interface for the ledger document.
pub trait LedgerRepository {
    /// Human-readable location used in logs and messages.
    fn location(&self) -> String;
    /// Reads the full current document.
    fn load(&self) -> RepoResult<String>;
    /// Replaces the full document.
    fn commit(&self, document: &str) -> RepoResult<()>;
}

/// Ledger stored as one text file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileLedgerRepository {
    path: PathBuf,
}

impl FileLedgerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn write_failure(&self, source: io::Error) -> RepoError {
        RepoError::WriteFailure {
            path: self.path.clone(),
            source,
        }
    }
}

impl LedgerRepository for FileLedgerRepository {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> RepoResult<String> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                debug!(
                    "event=ledger_load module=repo status=ok bytes={}",
                    text.len()
                );
                Ok(text)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(RepoError::DocumentNotFound(self.path.clone()))
            }
            Err(err) => Err(RepoError::Read {
                path: self.path.clone(),
                source: err,
            }),
        }
    }

    fn commit(&self, document: &str) -> RepoResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "ledger".to_string());

        // Same directory as the target so the final rename cannot cross filesystems.
        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|err| self.write_failure(err))?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            if let Err(err) = temp.as_file().set_permissions(metadata.permissions()) {
                warn!(
                    "event=ledger_commit module=repo status=degraded reason=permissions_not_copied error={}",
                    err
                );
            }
        }

        temp.write_all(document.as_bytes())
            .map_err(|err| self.write_failure(err))?;
        temp.as_file()
            .sync_all()
            .map_err(|err| self.write_failure(err))?;

        temp.persist(&self.path)
            .map_err(|err| self.write_failure(err.error))?;
        Ok(())
    }
}

/// Ledger held in memory; counts commits.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    document: RefCell<Option<String>>,
    commits: Cell<usize>,
}

impl InMemoryLedgerRepository {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: RefCell::new(Some(document.into())),
            commits: Cell::new(0),
        }
    }

    /// Repository whose document does not exist yet.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }

    pub fn commit_count(&self) -> usize {
        self.commits.get()
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn location(&self) -> String {
        "memory".to_string()
    }

    fn load(&self) -> RepoResult<String> {
        self.document
            .borrow()
            .clone()
            .ok_or_else(|| RepoError::DocumentNotFound(PathBuf::from("memory")))
    }

    fn commit(&self, document: &str) -> RepoResult<()> {
        *self.document.borrow_mut() = Some(document.to_string());
        self.commits.set(self.commits.get() + 1);
        Ok(())
    }
}

impl<R: LedgerRepository + ?Sized> LedgerRepository for &R {
    fn location(&self) -> String {
        (**self).location()
    }

    fn load(&self) -> RepoResult<String> {
        (**self).load()
    }

    fn commit(&self, document: &str) -> RepoResult<()> {
        (**self).commit(document)
    }
}
