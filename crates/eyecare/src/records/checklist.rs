//! The do's and don'ts checklist.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Record, RecordList};
use crate::error::Result;

/// One do or don't.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Session-assigned identifier.
    pub id: u64,
    /// What to do or avoid.
    pub text: String,
    /// Whether the patient has ticked it off.
    pub is_done: bool,
    /// `true` for a "do", `false` for a "don't".
    pub is_positive: bool,
}

impl Record for ChecklistItem {
    const KIND: &'static str = "checklist item";

    fn id(&self) -> u64 {
        self.id
    }
}

impl RecordList<ChecklistItem> {
    /// Flip the done state of item `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] if there is no such item.
    pub fn toggle(&mut self, id: u64) -> Result<&ChecklistItem> {
        let item = self.get_mut(id)?;
        item.is_done = !item.is_done;
        debug!(id, done = item.is_done, "checklist item toggled");
        Ok(item)
    }

    /// The stock post-surgery checklist.
    #[must_use]
    pub fn defaults() -> Self {
        let mut list = Self::new();
        for (text, is_positive) in [
            ("Wear sunglasses outdoors", true),
            ("Use eye drops as prescribed", true),
            ("Don't rub your eyes", false),
            ("Avoid swimming for 2 weeks", false),
        ] {
            list.push_with(|id| ChecklistItem {
                id,
                text: text.to_string(),
                is_done: false,
                is_positive,
            });
        }
        list
    }
}
