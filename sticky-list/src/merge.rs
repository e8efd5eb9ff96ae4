use alloc::vec::Vec;

use crate::{Entry, has_loading};

/// Result of [`merge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome<K, T> {
    pub merged: Vec<Entry<K, T>>,
    /// Number of entries the merge added (`merged.len() - current.len()`).
    pub inserted_count: usize,
}

/// Merges a freshly grouped `page` into the `current` sequence without duplicating headers.
///
/// - An empty page leaves `current` unchanged.
/// - A page that does not start with a header is appended verbatim.
/// - Otherwise the page is taken group by group. When `current` already has a header with the
///   group's key (anywhere, not only at the tail) the group's items are spliced in right after
///   the run of items that follows that header. Groups with unseen keys are appended at the end.
///
/// A trailing loading sentinel in `current` stays the final entry.
///
/// Precondition: `page` was grouped with the same policy as `current` (one header per key, no
/// loading sentinel). Violations are not checked and produce an unspecified but memory-safe
/// sequence.
pub fn merge<K: PartialEq, T>(
    current: Vec<Entry<K, T>>,
    page: Vec<Entry<K, T>>,
) -> MergeOutcome<K, T> {
    let before = current.len();
    let mut merged = current;

    match page.first() {
        None => {
            return MergeOutcome {
                merged,
                inserted_count: 0,
            };
        }
        Some(Entry::Header(_)) => {
            for (key, items) in group_runs(page) {
                merge_group(&mut merged, key, items);
            }
        }
        Some(Entry::Item(_) | Entry::Loading) => {
            ldebug!(len = page.len(), "merge: page has no leading header, appending");
            let at = tail_index(&merged);
            merged.splice(at..at, page);
        }
    }

    let inserted_count = merged.len() - before;
    ltrace!(before, after = merged.len(), inserted_count, "merge");
    MergeOutcome {
        merged,
        inserted_count,
    }
}

fn merge_group<K: PartialEq, T>(merged: &mut Vec<Entry<K, T>>, key: K, items: Vec<Entry<K, T>>) {
    let existing = merged
        .iter()
        .position(|entry| entry.header_key() == Some(&key));

    match existing {
        Some(header) => {
            let at = merged[header + 1..]
                .iter()
                .position(|entry| !entry.is_item())
                .map_or(merged.len(), |offset| header + 1 + offset);
            ldebug!(
                header,
                at,
                items = items.len(),
                "merge: continuing existing group"
            );
            merged.splice(at..at, items);
        }
        None if items.is_empty() => {
            lwarn!("merge: skipping page header without items");
        }
        None => {
            let at = tail_index(merged);
            ldebug!(at, items = items.len(), "merge: appending new group");
            let group = core::iter::once(Entry::Header(key)).chain(items);
            merged.splice(at..at, group);
        }
    }
}

/// Splits a page into `(key, items)` runs. Entries before the first header and loading
/// sentinels are contract violations and are dropped.
fn group_runs<K, T>(page: Vec<Entry<K, T>>) -> Vec<(K, Vec<Entry<K, T>>)> {
    let mut runs: Vec<(K, Vec<Entry<K, T>>)> = Vec::new();
    for entry in page {
        match entry {
            Entry::Header(key) => runs.push((key, Vec::new())),
            Entry::Item(payload) => match runs.last_mut() {
                Some((_, items)) => items.push(Entry::Item(payload)),
                None => {
                    lwarn!("merge: dropping item before the first page header");
                }
            },
            Entry::Loading => {
                lwarn!("merge: dropping loading sentinel found inside a page");
            }
        }
    }
    runs
}

/// Insertion point for appended entries: before a trailing sentinel, else the end.
fn tail_index<K, T>(entries: &[Entry<K, T>]) -> usize {
    if has_loading(entries) {
        entries.len() - 1
    } else {
        entries.len()
    }
}
