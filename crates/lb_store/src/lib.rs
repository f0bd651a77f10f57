//! lb_store — Account record store for Lifeboat
//!
//! The transfer core consumes the store through the narrow [`RecordStore`]
//! trait: point reads and writes, a lazy full scan, and `reindex`. The
//! SQLite implementation keeps whole records as JSON documents keyed by
//! account id, plus a `login_index` table (normalised username and emails →
//! account id) that answers login lookups. `create`/`save` maintain the
//! index incrementally; `reindex` rebuilds it from scratch — that is the
//! structure a restore session refreshes in its finalize step.

pub mod error;
pub mod models;
pub mod records;
pub mod sqlite;

pub use error::StoreError;
pub use records::{normalize_login, RecordScan, RecordStore};
pub use sqlite::SqliteStore;
