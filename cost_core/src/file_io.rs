//! # File I/O Module
//!
//! Handles workbook file operations with safety features:
//! - **Atomic saves**: Write to .tmp, verify, rename to prevent corruption
//! - **File locking**: Prevent two people recalculating one shared workbook at once
//! - **Version validation**: Ensure schema compatibility
//!
//! ## File Format
//!
//! Workbooks are saved as `.pcw` files containing JSON.
//! Lock files use `.pcw.lock` extension with metadata about who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cost_core::file_io::{save_workbook, load_workbook, FileLock};
//! use cost_core::workbook::Workbook;
//! use std::path::Path;
//!
//! let workbook = Workbook::new("Maker Shop");
//! let path = Path::new("shop.pcw");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "maker@shop.com").unwrap();
//!
//! // Save with atomic write
//! save_workbook(&workbook, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CalcError, CalcResult};
use crate::workbook::{Workbook, SCHEMA_VERSION};

/// Locks older than this are considered abandoned
const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in .pcw.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// The holder as shown in error messages: `user (machine)`
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

fn serialization_error(e: serde_json::Error) -> CalcError {
    CalcError::SerializationError { reason: e.to_string() }
}

/// File lock guard that releases the lock when dropped.
///
/// Combines an OS-level lock (fs2) with a `.lock` file whose JSON says who
/// holds it.
#[derive(Debug)]
pub struct FileLock {
    workbook_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a workbook file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired successfully
    /// * `Err(CalcError::FileLocked)` - Another process holds the lock
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use cost_core::file_io::FileLock;
    /// use std::path::Path;
    ///
    /// let lock = FileLock::acquire(Path::new("shop.pcw"), "user@email.com")?;
    /// // ... recalculate and save ...
    /// drop(lock);
    /// # Ok::<(), cost_core::errors::CalcError>(())
    /// ```
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Some(existing) = FileLock::check(path) {
            return Err(CalcError::file_locked(
                path.display().to_string(),
                existing.holder(),
                existing.locked_at.to_rfc3339(),
            ));
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        // The holder's metadata stays intact until the OS lock is ours.
        if lock_file.try_lock_exclusive().is_err() {
            return Err(match read_lock_info(&lock_path) {
                Ok(holder) => CalcError::file_locked(
                    path.display().to_string(),
                    holder.holder(),
                    holder.locked_at.to_rfc3339(),
                ),
                Err(_) => CalcError::file_locked(path.display().to_string(), "another process", "unknown"),
            });
        }

        let lock_json = serde_json::to_string_pretty(&info).map_err(serialization_error)?;
        lock_file
            .set_len(0)
            .and_then(|_| lock_file.write_all(lock_json.as_bytes()))
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), user = %info.user_id, "workbook lock acquired");

        Ok(FileLock {
            workbook_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Stale locks (dead process on this machine, or older than a day) are
    /// reported as unlocked.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if !lock_path.exists() {
            return None;
        }
        match read_lock_info(&lock_path) {
            Ok(info) if !is_lock_stale(&info) => Some(info),
            Ok(info) => {
                warn!(path = %path.display(), holder = %info.holder(), "ignoring stale workbook lock");
                None
            }
            Err(_) => None,
        }
    }

    pub fn workbook_path(&self) -> &Path {
        &self.workbook_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock is released with _lock_file
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(workbook_path: &Path) -> PathBuf {
    let mut lock_path = workbook_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn tmp_path_for(workbook_path: &Path) -> PathBuf {
    let mut tmp_path = workbook_path.to_path_buf();
    let extension = tmp_path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp_path.set_extension(extension);
    tmp_path
}

fn read_to_string(path: &Path, operation: &str) -> CalcResult<String> {
    let mut file = File::open(path)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| CalcError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(serialization_error)
}

/// A lock is stale when its process is gone (same machine) or it is too old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }
    (Utc::now() - info.locked_at).num_hours() > STALE_LOCK_HOURS
}

/// Save a workbook to a file with atomic write semantics.
///
/// 1. Serialize workbook to JSON
/// 2. Write to a temporary file (`.pcw.tmp`)
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
///
/// # Example
///
/// ```rust,no_run
/// use cost_core::file_io::save_workbook;
/// use cost_core::workbook::Workbook;
/// use std::path::Path;
///
/// let workbook = Workbook::new("Maker Shop");
/// save_workbook(&workbook, Path::new("shop.pcw"))?;
/// # Ok::<(), cost_core::errors::CalcError>(())
/// ```
pub fn save_workbook(workbook: &Workbook, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(workbook).map_err(serialization_error)?;

    let tmp_path = tmp_path_for(path);
    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file
        .write_all(json.as_bytes())
        .and_then(|_| tmp_file.sync_all())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(
        path = %path.display(),
        projects = workbook.project_count(),
        "workbook saved"
    );
    Ok(())
}

/// Load a workbook from a file.
///
/// # Returns
///
/// * `Ok(Workbook)` - Successfully loaded workbook
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::InvalidInput)` - A catalog record holds an out-of-range value
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_workbook(path: &Path) -> CalcResult<Workbook> {
    let contents = read_to_string(path, "read")?;

    let workbook: Workbook = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })?;

    validate_version(&workbook.meta.version)?;
    workbook.catalog.validate()?;

    info!(
        path = %path.display(),
        projects = workbook.project_count(),
        "workbook loaded"
    );
    Ok(workbook)
}

/// Load a workbook, also reporting whether someone else holds its lock.
pub fn load_workbook_with_lock_check(path: &Path) -> CalcResult<(Workbook, Option<LockInfo>)> {
    let workbook = load_workbook(path)?;
    let lock_info = FileLock::check(path);
    Ok((workbook, lock_info))
}

/// Major versions must match; in 0.x a newer minor version is also rejected.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }
    Ok(())
}
