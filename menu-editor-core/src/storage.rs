use anyhow::{Context, Result};
use fs2::FileExt;
use log::info;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::MenuDocument;

/// How long to wait for another editor to release the file
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Error type for storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// File is locked by another process
    #[error("File is locked by another user/process: {0:?}")]
    FileLocked(PathBuf),
    /// Other IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// On-disk encoding of a menu configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Infer from the file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            _ => FileFormat::Json,
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Json => write!(f, "JSON"),
            FileFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Loads and saves menu configuration files with file locking, so two
/// editors never interleave writes to the same file
pub struct MenuStorage {
    file_path: PathBuf,
    lock_file_path: PathBuf,
    format: FileFormat,
}

impl MenuStorage {
    /// Creates a storage handle, inferring the format from the extension
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        let format = FileFormat::from_path(file_path.as_ref());
        Self::with_format(file_path, format)
    }

    /// Creates a storage handle with an explicit format
    pub fn with_format<P: AsRef<Path>>(file_path: P, format: FileFormat) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let mut lock_name = file_path.as_os_str().to_os_string();
        lock_name.push(".lock");
        Self {
            file_path,
            lock_file_path: PathBuf::from(lock_name),
            format,
        }
    }

    /// Returns the path to the storage file
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Acquire an exclusive lock on the file for writing
    /// Returns the lock file handle which must be held during the operation
    fn acquire_write_lock(&self) -> Result<File> {
        if let Some(parent) = self.lock_file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to create lock file: {:?}", self.lock_file_path))?;

        self.wait_for_lock(&lock_file, |f| FileExt::try_lock_exclusive(f))?;
        Ok(lock_file)
    }

    /// Acquire a shared lock on the file for reading
    fn acquire_read_lock(&self) -> Result<Option<File>> {
        if !self.lock_file_path.exists() {
            return Ok(None);
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .open(&self.lock_file_path)
            .with_context(|| format!("Failed to open lock file: {:?}", self.lock_file_path))?;

        // fs2's shared lock, not the inherent File::try_lock_shared
        self.wait_for_lock(&lock_file, |f| FileExt::try_lock_shared(f))?;
        Ok(Some(lock_file))
    }

    fn wait_for_lock<F>(&self, lock_file: &File, try_lock: F) -> Result<()>
    where
        F: Fn(&File) -> std::io::Result<()>,
    {
        let start = std::time::Instant::now();

        loop {
            match try_lock(lock_file) {
                Ok(()) => return Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    if start.elapsed() > LOCK_TIMEOUT {
                        return Err(StorageError::FileLocked(self.file_path.clone()))
                            .context("Timeout waiting for file lock - another editor may be saving");
                    }
                    std::thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to acquire lock on {:?}", self.lock_file_path)
                    })
                }
            }
        }
    }

    /// Loads the menu configuration. A missing file is an empty menu.
    pub fn load(&self) -> Result<MenuDocument> {
        if !self.file_path.exists() {
            info!("{:?} does not exist yet, starting with an empty menu", self.file_path);
            return Ok(MenuDocument::default());
        }

        // Acquire shared lock for reading
        let _lock = self.acquire_read_lock()?;

        let file = File::open(&self.file_path)
            .with_context(|| format!("Failed to open file: {:?}", self.file_path))?;
        let reader = BufReader::new(file);

        let document: MenuDocument = match self.format {
            FileFormat::Json => serde_json::from_reader(reader)
                .map_err(|e| StorageError::ParseError(e.to_string()))
                .with_context(|| format!("Failed to parse JSON from {:?}", self.file_path))?,
            FileFormat::Yaml => serde_yaml::from_reader(reader)
                .map_err(|e| StorageError::ParseError(e.to_string()))
                .with_context(|| format!("Failed to parse YAML from {:?}", self.file_path))?,
        };

        info!(
            "Loaded {} top-level menu item(s) from {:?}",
            document.items.len(),
            self.file_path
        );
        Ok(document)
    }

    /// Serializes the document in this storage's format
    pub fn render(&self, document: &MenuDocument) -> Result<String> {
        let text = match self.format {
            FileFormat::Json => {
                let mut json = serde_json::to_string_pretty(document)?;
                json.push('\n');
                json
            }
            FileFormat::Yaml => serde_yaml::to_string(document)?,
        };
        Ok(text)
    }

    /// Saves the menu configuration with file locking
    pub fn save(&self, document: &MenuDocument) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Acquire exclusive lock for writing
        let mut lock_file = self.acquire_write_lock()?;

        // Write lock holder info (optional, for debugging)
        let _ = writeln!(
            lock_file,
            "Locked by PID {} at {}",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );

        let text = self.render(document)?;
        fs::write(&self.file_path, text)
            .with_context(|| format!("Failed to write {:?}", self.file_path))?;

        info!("Saved menu to {:?}", self.file_path);

        // Lock is automatically released when lock_file is dropped
        Ok(())
    }
}
