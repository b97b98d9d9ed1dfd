// src/pipeline/favorites.rs

use crate::error::Result;
use crate::services::BookStateManager;
use crate::storage::KeyValueStore;

/// Toggle a favorite by book id.
pub fn run_toggle_favorite<S: KeyValueStore>(
    manager: &mut BookStateManager<S>,
    id: &str,
) -> Result<()> {
    if manager.toggle_favorite(id)? {
        log::info!("Added {} to favorites", id);
    } else {
        log::info!("Removed {} from favorites", id);
    }
    log::info!("{} favorite(s) saved", manager.store().favorites().len());
    Ok(())
}

/// Remove every favorite.
pub fn run_clear_favorites<S: KeyValueStore>(manager: &mut BookStateManager<S>) -> Result<()> {
    let count = manager.store().favorites().len();
    manager.clear_all_favorites()?;
    log::info!("Cleared {} favorite(s)", count);
    Ok(())
}
