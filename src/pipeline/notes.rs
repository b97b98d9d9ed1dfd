// src/pipeline/notes.rs

use crate::error::{AppError, Result};
use crate::services::BookStateManager;
use crate::storage::KeyValueStore;

/// Add or update the note for a book.
///
/// Every rejected field is logged before the error is returned.
pub fn run_upsert_note<S: KeyValueStore>(
    manager: &mut BookStateManager<S>,
    id: &str,
    text: &str,
    rating: i64,
    title: Option<&str>,
) -> Result<()> {
    let existed = manager.annotations().contains_key(id);
    let title = title.unwrap_or("Unknown Title");

    match manager.upsert_annotation(id, text, rating, title) {
        Ok(annotation) => {
            let verb = if existed { "Updated" } else { "Saved" };
            log::info!("{} note for {} {}", verb, id, annotation.stars());
            Ok(())
        }
        Err(AppError::Validation(errors)) => {
            for error in errors.iter() {
                log::error!("{}: {}", error.field, error.message);
            }
            Err(AppError::Validation(errors))
        }
        Err(e) => Err(e),
    }
}

/// Delete the note for a book, if any.
pub fn run_delete_note<S: KeyValueStore>(
    manager: &mut BookStateManager<S>,
    id: &str,
) -> Result<()> {
    if manager.annotations().contains_key(id) {
        manager.delete_annotation(id)?;
        log::info!("Deleted note for {}", id);
    } else {
        log::info!("No note found for {}", id);
    }
    Ok(())
}

/// Print every stored note.
pub fn run_list_notes<S: KeyValueStore>(manager: &BookStateManager<S>) -> Result<()> {
    let annotations = manager.annotations();
    if annotations.is_empty() {
        log::info!("No notes yet.");
        return Ok(());
    }

    for (id, annotation) in annotations {
        println!(
            "{} {} ({}) [{}]",
            annotation.stars(),
            annotation.book_title_snapshot,
            id,
            annotation.date_added.format("%Y-%m-%d %H:%M")
        );
        println!("    {}", annotation.note);
    }

    let stats = manager.statistics();
    log::info!(
        "{} note(s), average rating {:.1}",
        stats.annotated_count,
        stats.average_rating
    );
    Ok(())
}
