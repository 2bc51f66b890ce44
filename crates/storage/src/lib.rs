#![forbid(unsafe_code)]

pub mod player_state;
pub mod repository;
pub mod sqlite;

pub use player_state::PlayerStateStore;
pub use repository::{InMemoryRepository, KeyValueRepository, Storage, StorageError};
pub use sqlite::{SqliteInitError, SqliteRepository};
