//! Thread-local connection manager.
//!
//! Each thread owns its slots exclusively, so slot access needs no locking.
//! The only shared state is the open-handle counter, which mirrors how many
//! connections are currently open per [`Location`] across all threads.

use crate::config::Config;
use crate::db::{Location, open_connection};
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::rc::Rc;
use std::sync::{LazyLock, Mutex};
use tracing::{debug, warn};

thread_local! {
    /// Map of a database location to this thread's open connection for it.
    /// Each connection sits behind its own `Rc<RefCell<..>>` so the map
    /// borrow is never held while a caller's closure runs.
    static SLOTS: RefCell<HashMap<Location, Rc<RefCell<Connection>>>> =
        RefCell::new(HashMap::new());
}

/// Process-wide count of open handles, keyed by database location.
static OPEN_COUNTS: LazyLock<Mutex<HashMap<Location, usize>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Hands out per-thread SQLite connections for one database.
///
/// The configuration is injected at construction; the manager itself is
/// cheap to clone and safe to share across threads. Every thread that calls
/// [`DbManager::with_conn`] gets its own lazily opened connection.
#[derive(Debug, Clone)]
pub struct DbManager {
    config: Config,
}

impl DbManager {
    pub fn new(config: Config) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run `f` against the calling thread's connection, opening one lazily
    /// if this thread has none. Two sequential calls with no intervening
    /// close run against the same connection.
    ///
    /// Nested calls against *other* databases are fine; a nested call
    /// against the same database returns [`AppError::HandleInUse`], since
    /// the connection is already borrowed by the outer closure.
    pub fn with_conn<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        self.with_conn_mut(|conn| f(conn))
    }

    /// Like [`DbManager::with_conn`] but with a mutable connection, for
    /// callers that need `Connection::transaction`.
    pub fn with_conn_mut<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let slot = self.slot()?;
        // The slot map is no longer borrowed here, so `f` may freely use
        // this or other managers on the same thread.
        let mut conn = slot.try_borrow_mut().map_err(|_| AppError::HandleInUse)?;
        f(&mut conn)
    }

    /// Fetch the calling thread's slot for this database, opening and
    /// storing a connection in one step if the slot is empty, so the
    /// connection handed to the caller is always the one tracked.
    fn slot(&self) -> AppResult<Rc<RefCell<Connection>>> {
        let location = self.config.location();
        SLOTS.with(|cell| {
            let mut slots = cell.borrow_mut();
            match slots.entry(location) {
                Entry::Occupied(entry) => Ok(Rc::clone(entry.get())),
                Entry::Vacant(entry) => {
                    let conn = open_connection(&self.config)?;
                    let open = bump_open_count(entry.key());
                    debug!(location = ?entry.key(), open, "opened thread-local connection");
                    Ok(Rc::clone(entry.insert(Rc::new(RefCell::new(conn)))))
                }
            }
        })
    }

    /// Whether the calling thread currently holds an open connection for
    /// this manager's database.
    pub fn is_open(&self) -> bool {
        let location = self.config.location();
        SLOTS.with(|cell| cell.borrow().contains_key(&location))
    }

    /// Number of connections currently open for this manager's database
    /// across all threads.
    pub fn open_handles(&self) -> usize {
        open_count(&self.config.location())
    }

    /// Close the calling thread's connection for this manager's database.
    ///
    /// Returns [`AppError::HandleNotOpen`] if this thread has none, and
    /// [`AppError::HandleInUse`] when called from inside a `with_conn`
    /// closure that still uses the handle. If the engine refuses the close
    /// (e.g. a statement is still busy), the connection is kept in the slot
    /// and [`AppError::CloseFailed`] is returned; the caller may retry.
    pub fn close_conn(&self) -> AppResult<()> {
        let location = self.config.location();
        let Some(slot) = SLOTS.with(|cell| cell.borrow_mut().remove(&location)) else {
            return Err(AppError::HandleNotOpen);
        };
        let conn = match Rc::try_unwrap(slot) {
            Ok(cell) => cell.into_inner(),
            Err(slot) => {
                // A with_conn closure on this thread still holds the handle.
                SLOTS.with(|cell| cell.borrow_mut().insert(location, slot));
                return Err(AppError::HandleInUse);
            }
        };
        match conn.close() {
            Ok(()) => {
                let open = drop_open_count(&location);
                debug!(?location, open, "closed thread-local connection");
                Ok(())
            }
            Err((conn, err)) => {
                warn!(?location, error = %err, "close refused, handle stays open");
                SLOTS.with(|cell| {
                    cell.borrow_mut()
                        .insert(location, Rc::new(RefCell::new(conn)))
                });
                Err(AppError::CloseFailed(err))
            }
        }
    }
}

fn bump_open_count(location: &Location) -> usize {
    let mut counts = OPEN_COUNTS.lock().unwrap_or_else(|e| e.into_inner());
    let n = counts.entry(location.clone()).or_insert(0);
    *n += 1;
    *n
}

fn drop_open_count(location: &Location) -> usize {
    let mut counts = OPEN_COUNTS.lock().unwrap_or_else(|e| e.into_inner());
    let remaining = match counts.get_mut(location) {
        Some(n) => {
            *n = n.saturating_sub(1);
            *n
        }
        None => 0,
    };
    if remaining == 0 {
        counts.remove(location);
    }
    remaining
}

fn open_count(location: &Location) -> usize {
    let counts = OPEN_COUNTS.lock().unwrap_or_else(|e| e.into_inner());
    counts.get(location).copied().unwrap_or(0)
}
