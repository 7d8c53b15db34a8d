//! Page store contract and file-per-page implementation.
//!
//! # Responsibility
//! - Load and save page bodies keyed by title.
//! - Map each title to `<title>.txt` inside one data directory.
//!
//! # Invariants
//! - Saved files are owner read/write only (0600) on unix.
//! - A save replaces the whole file via write-then-rename; readers never see
//!   a half-written body.
//! - Titles outside `[A-Za-z0-9]+` are never turned into file names.

use crate::model::page::{is_valid_title, Page};
use log::{debug, error, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const PAGE_FILE_EXTENSION: &str = "txt";
#[cfg(unix)]
const PAGE_FILE_MODE: u32 = 0o600;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store failure for page load/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// No readable content for the title (missing file or any read error).
    NotFoundOnLoad { title: String, source: io::Error },
    /// Backing write failed during save.
    PersistFailure { title: String, source: io::Error },
}

impl StoreError {
    /// Title the failed operation targeted.
    pub fn title(&self) -> &str {
        match self {
            Self::NotFoundOnLoad { title, .. } | Self::PersistFailure { title, .. } => title,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFoundOnLoad { title, source } => {
                write!(f, "page `{title}` could not be loaded: {source}")
            }
            Self::PersistFailure { title, source } => {
                write!(f, "page `{title}` could not be saved: {source}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFoundOnLoad { source, .. } | Self::PersistFailure { source, .. } => {
                Some(source)
            }
        }
    }
}

/// Storage contract used by the page workflow.
pub trait PageStore {
    /// Loads the page stored under `title`.
    fn load(&self, title: &str) -> StoreResult<Page>;
    /// Persists `page`, replacing any existing content for its title.
    fn save(&self, page: &Page) -> StoreResult<()>;
}

/// File-per-page store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FilePageStore {
    root: PathBuf,
}

impl FilePageStore {
    /// Opens a store over an existing directory.
    ///
    /// # Errors
    /// - Returns an error when `root` does not exist or is not a directory.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root)?;
        if !metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("page store root `{}` is not a directory", root.display()),
            ));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory holding the page files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the backing file path for `title`.
    pub fn page_path(&self, title: &str) -> PathBuf {
        self.root.join(format!("{title}.{PAGE_FILE_EXTENSION}"))
    }

    fn write_replacing(&self, target: &Path, body: &[u8]) -> io::Result<()> {
        let temp_path = self
            .root
            .join(format!(".{}.tmp", Uuid::new_v4().simple()));

        let result = (|| {
            let mut file = create_owner_only(&temp_path)?;
            file.write_all(body)?;
            file.sync_all()?;
            fs::rename(&temp_path, target)
        })();

        if result.is_err() {
            // Best effort: the temp name is unique, so a leftover is harmless.
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

impl PageStore for FilePageStore {
    fn load(&self, title: &str) -> StoreResult<Page> {
        if !is_valid_title(title) {
            return Err(StoreError::NotFoundOnLoad {
                title: title.to_string(),
                source: invalid_title_error(title),
            });
        }

        match fs::read(self.page_path(title)) {
            Ok(body) => {
                debug!(
                    "event=page_load module=store status=ok title={} bytes={}",
                    title,
                    body.len()
                );
                Ok(Page::new(title, body))
            }
            Err(err) => {
                debug!(
                    "event=page_load module=store status=miss title={} error={}",
                    title, err
                );
                Err(StoreError::NotFoundOnLoad {
                    title: title.to_string(),
                    source: err,
                })
            }
        }
    }

    fn save(&self, page: &Page) -> StoreResult<()> {
        if !is_valid_title(&page.title) {
            warn!("event=page_save module=store status=rejected reason=invalid_title");
            return Err(StoreError::PersistFailure {
                title: page.title.clone(),
                source: invalid_title_error(&page.title),
            });
        }

        let target = self.page_path(&page.title);
        match self.write_replacing(&target, &page.body) {
            Ok(()) => {
                debug!(
                    "event=page_save module=store status=ok title={} bytes={}",
                    page.title,
                    page.body.len()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=page_save module=store status=error title={} error={}",
                    page.title, err
                );
                Err(StoreError::PersistFailure {
                    title: page.title.clone(),
                    source: err,
                })
            }
        }
    }
}

fn invalid_title_error(title: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("invalid page title `{title}`"),
    )
}

#[cfg(unix)]
fn create_owner_only(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(PAGE_FILE_MODE)
        .open(path)
}

#[cfg(not(unix))]
fn create_owner_only(path: &Path) -> io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}
