//! Command entry points used by the CLI.
//!
//! - `run_search`: search and print the collection with statistics
//! - `run_details`: search and print the full record of one book
//! - `run_toggle_favorite`, `run_clear_favorites`: favorite management
//! - `run_upsert_note`, `run_delete_note`, `run_list_notes`: note management
//! - `run_theme`: theme preference

pub mod details;
pub mod favorites;
pub mod notes;
pub mod preferences;
pub mod search;

pub use details::{format_details, run_details};
pub use favorites::{run_clear_favorites, run_toggle_favorite};
pub use notes::{run_delete_note, run_list_notes, run_upsert_note};
pub use preferences::run_theme;
pub use search::{format_row, run_search};
