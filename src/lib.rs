//! dblocal library root.
//! Per-thread SQLite connection handles: at most one open connection per
//! thread per database location, opened lazily on first use and closed on
//! explicit request. Query, schema, and transaction semantics stay with
//! rusqlite; this crate only manages handle lifecycle.

pub mod config;
pub mod db;
pub mod errors;

pub use config::Config;
pub use db::{DbManager, Location};
pub use errors::{AppError, AppResult};
