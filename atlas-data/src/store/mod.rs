//! Persistent entity storage.

mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

#[cfg(test)]
mod tests;
