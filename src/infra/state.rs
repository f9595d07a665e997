//! Global application state.
//!
//! Used for access to common resources such as the database pool.

use super::database::DbPool;
use axum::extract::FromRef;

/// Global application state.
#[derive(Clone, Debug, FromRef)]
pub struct AppState {
    db: DbPool,
}

impl AppState {
    /// Constructs a new [`AppState`].
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Returns the database pool.
    pub fn db(&self) -> &DbPool {
        &self.db
    }
}
