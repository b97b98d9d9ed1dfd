// src/services/annotations.rs

//! Local annotation store.
//!
//! Owns the favorite set and the note/rating mapping. Both are cached in
//! memory and written through to the key-value substrate on every change.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;
use crate::models::{Annotation, validate_annotation};
use crate::storage::{DARK_MODE_KEY, FAVORITES_KEY, KeyValueStore, NOTES_KEY};

/// Durable favorites and annotations over a key-value substrate.
#[derive(Debug)]
pub struct AnnotationStore<S> {
    storage: S,
    favorites: BTreeSet<String>,
    annotations: BTreeMap<String, Annotation>,
}

impl<S: KeyValueStore> AnnotationStore<S> {
    /// Open the store and load both persisted collections.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            favorites: BTreeSet::new(),
            annotations: BTreeMap::new(),
        };
        store.load_favorites();
        store.load_annotations();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // --- Favorites ---

    /// Re-read the favorite ids from storage.
    ///
    /// A corrupted record is discarded and yields the empty set.
    pub fn load_favorites(&mut self) -> BTreeSet<String> {
        self.favorites = self.read_record(FAVORITES_KEY).unwrap_or_default();
        self.favorites.clone()
    }

    pub fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Flip membership of `id` and persist the resulting set.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<&BTreeSet<String>> {
        let mut next = self.favorites.clone();
        if !next.remove(id) {
            next.insert(id.to_string());
        }

        self.write_record(FAVORITES_KEY, &next)?;
        self.favorites = next;
        Ok(&self.favorites)
    }

    /// Empty the favorite set and drop its persisted record.
    pub fn clear_favorites(&mut self) -> Result<()> {
        self.storage.remove(FAVORITES_KEY)?;
        self.favorites.clear();
        Ok(())
    }

    // --- Annotations ---

    /// Re-read the annotation mapping from storage.
    ///
    /// Entries are decoded one at a time; a malformed entry is skipped and
    /// the rest of the mapping is kept.
    pub fn load_annotations(&mut self) -> BTreeMap<String, Annotation> {
        let entries: BTreeMap<String, serde_json::Value> =
            self.read_record(NOTES_KEY).unwrap_or_default();

        self.annotations = entries
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value::<Annotation>(value) {
                Ok(annotation) => Some((id, annotation)),
                Err(e) => {
                    log::warn!("Skipping malformed note for {}: {}", id, e);
                    None
                }
            })
            .collect();
        self.annotations.clone()
    }

    pub fn annotations(&self) -> &BTreeMap<String, Annotation> {
        &self.annotations
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    /// Validate and store a note for `id`, replacing any previous one.
    ///
    /// Fails with `AppError::Validation` listing every rejected field.
    pub fn upsert_annotation(
        &mut self,
        id: &str,
        note: &str,
        rating: i64,
        title_snapshot: &str,
    ) -> Result<Annotation> {
        validate_annotation(note, rating)?;

        let annotation = Annotation {
            note: note.trim().to_string(),
            rating: rating as u8,
            date_added: Utc::now(),
            book_title_snapshot: title_snapshot.to_string(),
        };

        let mut next = self.annotations.clone();
        next.insert(id.to_string(), annotation.clone());
        self.write_record(NOTES_KEY, &next)?;
        self.annotations = next;

        log::debug!("Saved note for {} ({}/5)", id, annotation.rating);
        Ok(annotation)
    }

    /// Remove the note for `id`. Absent ids are ignored.
    pub fn delete_annotation(&mut self, id: &str) -> Result<()> {
        if !self.annotations.contains_key(id) {
            return Ok(());
        }

        let mut next = self.annotations.clone();
        next.remove(id);
        self.write_record(NOTES_KEY, &next)?;
        self.annotations = next;
        Ok(())
    }

    // --- Preferences ---

    pub fn dark_mode(&self) -> bool {
        self.read_record(DARK_MODE_KEY).unwrap_or(false)
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.write_record(DARK_MODE_KEY, &enabled)
    }

    // --- Record I/O ---

    /// Read and decode a record. Unreadable or malformed records count as absent.
    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("Failed to read {} record: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Discarding corrupted {} record: {}", key, e);
                if let Err(e) = self.storage.remove(key) {
                    log::error!("Failed to clear corrupted {} record: {}", key, e);
                }
                None
            }
        }
    }

    fn write_record<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.storage.set(key, &json)
    }
}
