use alloc::vec::Vec;

use crate::key::{GroupKey, KeySlotMap};

/// One slot of a renderable sequence.
///
/// A well-formed sequence starts with a `Header`, every `Item` belongs to the nearest
/// `Header` above it, headers never sit back-to-back, and `Loading` appears at most once
/// as the final entry. See [`validate_sequence`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Entry<K, T> {
    Header(K),
    Item(T),
    /// Trailing placeholder shown while a page is in flight.
    Loading,
}

/// The variant of an [`Entry`] without its payload (e.g. a view type for recycling).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    Header,
    Item,
    Loading,
}

impl<K, T> Entry<K, T> {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Header(_) => EntryKind::Header,
            Self::Item(_) => EntryKind::Item,
            Self::Loading => EntryKind::Loading,
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, Self::Header(_))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn header_key(&self) -> Option<&K> {
        match self {
            Self::Header(key) => Some(key),
            Self::Item(_) | Self::Loading => None,
        }
    }

    pub fn item(&self) -> Option<&T> {
        match self {
            Self::Item(payload) => Some(payload),
            Self::Header(_) | Self::Loading => None,
        }
    }

    /// Maps the header key, leaving items and the sentinel untouched.
    pub fn map_header<K2>(self, f: impl FnOnce(K) -> K2) -> Entry<K2, T> {
        match self {
            Self::Header(key) => Entry::Header(f(key)),
            Self::Item(payload) => Entry::Item(payload),
            Self::Loading => Entry::Loading,
        }
    }
}

/// Number of `Item` entries in `entries`.
///
/// This is the offset handed to the fetch source for the next page.
pub fn item_count<K, T>(entries: &[Entry<K, T>]) -> usize {
    entries.iter().filter(|e| e.is_item()).count()
}

/// Returns `true` when the sequence ends with the loading sentinel.
pub fn has_loading<K, T>(entries: &[Entry<K, T>]) -> bool {
    entries.last().is_some_and(Entry::is_loading)
}

/// Appends the loading sentinel unless it is already the final entry.
pub fn with_loading<K, T>(mut entries: Vec<Entry<K, T>>) -> Vec<Entry<K, T>> {
    if !has_loading(&entries) {
        entries.push(Entry::Loading);
    }
    entries
}

/// Removes a trailing loading sentinel, if present.
pub fn without_loading<K, T>(mut entries: Vec<Entry<K, T>>) -> Vec<Entry<K, T>> {
    if has_loading(&entries) {
        entries.pop();
    }
    entries
}

/// A well-formedness violation found by [`validate_sequence`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("item at index {index} has no header above it")]
    OrphanItem { index: usize },
    #[error("header at index {index} directly follows another header")]
    AdjacentHeaders { index: usize },
    #[error("header at index {index} repeats the key of the header at index {first}")]
    DuplicateHeader { index: usize, first: usize },
    #[error("loading sentinel at index {index} is not the final entry")]
    MisplacedLoading { index: usize },
}

/// Checks the header/item contiguity invariants of a sequence.
///
/// Returns the first violation found, scanning front to back.
pub fn validate_sequence<K: GroupKey, T>(entries: &[Entry<K, T>]) -> Result<(), SequenceError> {
    let mut seen = KeySlotMap::<K>::new();
    let mut prev_was_header = false;
    let mut has_header = false;

    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Entry::Header(key) => {
                if prev_was_header {
                    return Err(SequenceError::AdjacentHeaders { index });
                }
                if let Some(&first) = seen.get(key) {
                    return Err(SequenceError::DuplicateHeader { index, first });
                }
                seen.insert(key.clone(), index);
                has_header = true;
                prev_was_header = true;
            }
            Entry::Item(_) => {
                if !has_header {
                    return Err(SequenceError::OrphanItem { index });
                }
                prev_was_header = false;
            }
            Entry::Loading => {
                if index + 1 != entries.len() {
                    return Err(SequenceError::MisplacedLoading { index });
                }
                prev_was_header = false;
            }
        }
    }
    Ok(())
}
