/// Index range of the entries currently on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibleRange {
    pub start_index: usize,
    pub end_index: usize, // exclusive
}

impl VisibleRange {
    pub fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }
}

/// Laid-out bounds of one visible entry along the scroll axis.
///
/// `top` is relative to the top edge of the viewport and is negative for an entry that is
/// partially scrolled off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntryBounds {
    pub top: i64,
    pub height: u32,
}

impl EntryBounds {
    pub fn new(top: i64, height: u32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> i64 {
        self.top.saturating_add(self.height as i64)
    }
}

/// The header to draw pinned at the top of the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PinnedHeader {
    /// Index of the pinned `Header` entry in the sequence.
    pub index: usize,
    /// Paint-time translation along the scroll axis. Zero, or negative while the next header
    /// pushes this one off.
    pub translate_offset: i64,
    /// `true` when the overlay must be re-bound (the pinned index changed since the last
    /// resolve, or the cache was cleared).
    pub rebind: bool,
}

/// A page fetch the owner should issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRequest {
    /// Count of `Item` entries materialized when the fetch was triggered.
    pub offset: usize,
    /// Identifies the fetch. A completion must hand the same request back; one whose id
    /// is not the fetch in flight (e.g. issued before a reset) is discarded.
    pub id: u64,
}

/// Flag view of the pagination state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaginationState {
    pub is_loading: bool,
    pub has_more: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            is_loading: false,
            has_more: true,
        }
    }
}
