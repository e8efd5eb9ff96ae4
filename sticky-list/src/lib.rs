//! A headless data engine for grouped lists with sticky headers and lazy pagination.
//!
//! For a single-owner controller that wires the pieces together, see the
//! `sticky-list-adapter` crate.
//!
//! The crate covers the parts of a "grouped, sticky, load-more" list that are pure data:
//! grouping records under ordered headers, merging fetched pages without duplicating
//! headers, diffing sequences into insert/remove patches, resolving the pinned header for a
//! scroll position, and gating page fetches.
//!
//! It is UI-agnostic. A TUI/GUI layer is expected to provide:
//! - the visible entry range and per-entry bounds on each draw pass
//! - the measured height of the pinned header overlay
//! - a page fetch for each [`PageRequest`]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

#[cfg(feature = "chrono")]
mod dates;
mod diff;
mod entry;
mod group;
mod key;
mod merge;
mod paging;
mod policy;
mod sticky;
mod types;


#[cfg(feature = "chrono")]
pub use dates::{
    DayLabels, FALLBACK_DAY_PATTERN, day_label_formatter, day_policy, format_day_label,
    is_same_day, start_of_day,
};
pub use diff::{MAX_LCS_CELLS, Patch, PatchError, PatchOp, PatchRange, diff};
pub use entry::{
    Entry, EntryKind, SequenceError, has_loading, item_count, validate_sequence, with_loading,
    without_loading,
};
pub use group::{filter_groups, group, group_labeled};
pub use key::GroupKey;
pub use merge::{MergeOutcome, merge};
pub use paging::{FetchOutcome, LoadFinish, LoadStart, LoadState, PageLoadCoordinator};
pub use policy::{
    Comparator, GroupKeyPolicy, ItemOrder, KeyExtractor, KeyNormalizer, LabelFormatter,
    ascending, ascending_by, descending, descending_by, reversed,
};
pub use sticky::{StickyResolver, hand_off_offset, header_index_for};
pub use types::{EntryBounds, PageRequest, PaginationState, PinnedHeader, VisibleRange};
