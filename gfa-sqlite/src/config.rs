//! Configuration of the SQLite database backing the reader and the sink.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the database lives and how it is opened.
///
/// # Examples
///
/// ```
/// use gfa_sqlite::config::SqliteConfig;
/// use std::path::PathBuf;
///
/// // In-memory database (default)
/// let config = SqliteConfig::default();
///
/// // File-based database
/// let config = SqliteConfig {
///     database_path: Some(PathBuf::from("aggregates.db")),
///     create_if_missing: true,
///     max_readers: Some(4),
/// };
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SqliteConfig {
    /// Database file path. If None, uses in-memory database
    pub database_path: Option<PathBuf>,

    /// Whether to create the database if it doesn't exist
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Upper bound on concurrent read connections. If None, uses the pool default
    #[serde(default)]
    pub max_readers: Option<u32>,
}

fn default_true() -> bool {
    true
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            create_if_missing: true,
            max_readers: None,
        }
    }
}
