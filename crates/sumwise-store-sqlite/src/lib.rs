//! SQLite backend for the Sumwise fact store.
//!
//! One file holds the facts, their performance records (removed with their
//! fact through `ON DELETE CASCADE`), and the host's settings flags. Access
//! goes through [`tokio_rusqlite`], which runs the connection on its own
//! thread so callers never block the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
