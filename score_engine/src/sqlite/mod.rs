//! SQLite backend for the match store.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
