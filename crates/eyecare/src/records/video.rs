//! Display-only instructional videos.

use serde::{Deserialize, Serialize};

use super::{Record, RecordList};

/// An instructional video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResource {
    /// Session-assigned identifier.
    pub id: u64,
    /// Title shown above the player.
    pub title: String,
    /// Embeddable URL.
    pub playable_url: String,
}

impl Record for VideoResource {
    const KIND: &'static str = "video";

    fn id(&self) -> u64 {
        self.id
    }
}

impl RecordList<VideoResource> {
    /// The stock video library.
    #[must_use]
    pub fn defaults() -> Self {
        let mut list = Self::new();
        for title in [
            "How to apply eye drops",
            "Protecting your eyes after surgery",
        ] {
            list.push_with(|id| VideoResource {
                id,
                title: title.to_string(),
                playable_url: "https://www.youtube.com/embed/dQw4w9WgXcQ".to_string(),
            });
        }
        list
    }
}
