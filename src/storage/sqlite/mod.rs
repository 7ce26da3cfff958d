mod connection;
mod seen_store;

pub use connection::SqliteStorage;
pub use seen_store::SqliteSeenStore;
