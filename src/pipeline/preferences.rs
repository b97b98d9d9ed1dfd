// src/pipeline/preferences.rs

use crate::error::Result;
use crate::services::AnnotationStore;
use crate::storage::KeyValueStore;

/// Show or set the dark mode preference.
pub fn run_theme<S: KeyValueStore>(store: &AnnotationStore<S>, dark: Option<bool>) -> Result<()> {
    if let Some(enabled) = dark {
        store.set_dark_mode(enabled)?;
    }
    log::info!(
        "Theme: {}",
        if store.dark_mode() { "dark" } else { "light" }
    );
    Ok(())
}
