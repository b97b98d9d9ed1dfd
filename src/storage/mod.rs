//! Key-value persistence for favorites, notes and preferences.
//!
//! Every record is a JSON document stored under a fixed key:
//!
//! ```text
//! {root}/
//! ├── bookFavorites.json    # ["/works/OL1W", ...]
//! ├── bookNotes.json        # { "/works/OL1W": { note, rating, dateAdded, bookTitleSnapshot } }
//! └── darkMode.json         # true | false
//! ```

pub mod local;
pub mod memory;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Key of the favorite id array.
pub const FAVORITES_KEY: &str = "bookFavorites";
/// Key of the id -> annotation mapping.
pub const NOTES_KEY: &str = "bookNotes";
/// Key of the theme preference flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Synchronous string key-value substrate.
///
/// Writes must be durable before `set`/`remove` return.
pub trait KeyValueStore {
    /// Read a value, returning `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
