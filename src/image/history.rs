//! Bounded, newest-first record of completed generations.

use crate::image::types::GeneratedImage;

/// Number of generations kept.
pub const HISTORY_LIMIT: usize = 4;

/// The last few generated images, most recent first.
#[derive(Debug, Clone, Default)]
pub struct GenerationHistory {
    entries: Vec<GeneratedImage>,
}

impl GenerationHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed generation at the front, evicting the oldest
    /// beyond [`HISTORY_LIMIT`]. The list is rebuilt and swapped in whole.
    pub fn record(&mut self, image: GeneratedImage) -> &GeneratedImage {
        let previous = std::mem::take(&mut self.entries);
        self.entries = std::iter::once(image)
            .chain(previous)
            .take(HISTORY_LIMIT)
            .collect();
        &self.entries[0]
    }

    /// The most recent generation.
    pub fn latest(&self) -> Option<&GeneratedImage> {
        self.entries.first()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[GeneratedImage] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
