//! Session-owned record lists.
//!
//! Every list the patient works with (medications, checklist, symptoms,
//! appointments, documents, videos) is a [`RecordList`]: an ordered list
//! with session-assigned ids starting at 1. Type-specific operations such as
//! marking a dose taken live next to each record type.

mod appointment;
mod checklist;
mod document;
mod medication;
mod symptom;
mod video;

pub use appointment::{parse_time, Appointment};
pub use checklist::ChecklistItem;
pub use document::{Document, DocumentStore};
pub use medication::Medication;
pub use symptom::{Severity, SymptomEntry, SymptomKind};
pub use video::VideoResource;

use serde::Serialize;

use crate::error::{Error, Result};

/// A record stored in a [`RecordList`].
pub trait Record {
    /// Human-readable name of the record kind, used in errors and logs.
    const KIND: &'static str;

    /// The session-assigned id.
    fn id(&self) -> u64;
}

/// An append-ordered list of records with monotonically increasing ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordList<T> {
    items: Vec<T>,
    #[serde(skip)]
    next_id: u64,
}

impl<T> Default for RecordList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Record> RecordList<T> {
    /// An empty list; the first record gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record built from the next free id and return it.
    pub fn push_with(&mut self, build: impl FnOnce(u64) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        let index = self.items.len();
        self.items.push(build(id));
        &self.items[index]
    }

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has that id.
    pub fn get(&self, id: u64) -> Result<&T> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Look up a record by id for modification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no record has that id.
    pub fn get_mut(&mut self, id: u64) -> Result<&mut T> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| Error::not_found(T::KIND, id))
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// The records as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: Record> IntoIterator for &'a RecordList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Reject blank required form fields.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(field, "is required"));
    }
    Ok(trimmed.to_string())
}
