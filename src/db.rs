//! Per-thread database handle management.
//!
//! Connections are opened lazily through [`DbManager`] and stored in a
//! thread-local slot keyed by [`Location`], so each thread holds at most
//! one open connection per database.

use crate::config::Config;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

mod manager;
pub use manager::DbManager;

/// Identity of a database, used as the key for the per-thread slot map
/// and the process-wide open-handle accounting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    InMemory,
    OnDisk { path: PathBuf },
}

/// Open a new connection for `config` and apply its PRAGMA setup.
pub(crate) fn open_connection(config: &Config) -> AppResult<Connection> {
    let conn = match config.location() {
        Location::InMemory => Connection::open_in_memory()?,
        Location::OnDisk { path } => {
            if let Some(dir) = path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)?;
                }
            }
            Connection::open(&path)?
        }
    };

    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    conn.pragma_update(None, "journal_mode", &config.journal_mode)?;
    conn.pragma_update(None, "foreign_keys", config.foreign_keys)?;

    Ok(conn)
}
