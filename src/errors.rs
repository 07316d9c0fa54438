//! Unified application error type.
//! All modules (db, config) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Cannot close a database handle that is not open on this thread")]
    HandleNotOpen,

    #[error("Database handle is already in use on this thread")]
    HandleInUse,

    #[error("Failed to close database handle: {0}")]
    CloseFailed(rusqlite::Error),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration file: {0}")]
    ConfigLoad(#[source] serde_yaml::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigSave(#[source] serde_yaml::Error),
}

pub type AppResult<T> = Result<T, AppError>;
