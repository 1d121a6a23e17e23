mod repository;
pub mod sqlite;
pub mod traits;

pub use repository::Repository;
pub use sqlite::SqliteStorage;
pub use traits::{DocumentStore, StorageError};
