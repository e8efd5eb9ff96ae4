use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::key::{GroupKey, KeySlotMap};
use crate::{Entry, GroupKeyPolicy, ItemOrder};

/// Groups `records` into a header/item sequence.
///
/// Records are partitioned by `policy.key_of`, distinct keys are ordered with
/// `policy.compare_keys` and records inside a group with `policy.compare_items`. Both sorts are
/// stable, so ties keep first-seen order. Each group is emitted as one `Header` followed by its
/// `Item`s.
///
/// Empty input yields an empty sequence without invoking any comparator.
pub fn group<T, K: GroupKey>(
    records: impl IntoIterator<Item = T>,
    policy: &GroupKeyPolicy<T, K>,
) -> Vec<Entry<K, T>> {
    let buckets = ordered_buckets(records, policy);
    let items: usize = buckets.iter().map(|(_, group)| group.len()).sum();

    let mut out = Vec::with_capacity(items + buckets.len());
    for (key, group) in buckets {
        out.push(Entry::Header(key));
        out.extend(group.into_iter().map(Entry::Item));
    }
    ltrace!(headers = out.len() - items, items, "group");
    out
}

/// Like [`group`], but headers carry display labels instead of raw keys.
///
/// Labels come from `policy.label_formatter` evaluated against `now_ms` (Unix milliseconds),
/// falling back to the key's `Display` form.
///
/// Two keys that render to the same label produce two equal headers, and relative labels such
/// as "Today" shift meaning when `now_ms` moves across a day boundary. When pages are merged
/// over a long-lived list, prefer [`group`] and format labels at bind time.
pub fn group_labeled<T, K>(
    records: impl IntoIterator<Item = T>,
    policy: &GroupKeyPolicy<T, K>,
    now_ms: i64,
) -> Vec<Entry<String, T>>
where
    K: GroupKey + core::fmt::Display,
{
    group(records, policy)
        .into_iter()
        .map(|entry| {
            entry.map_header(|key| {
                policy
                    .label(&key, now_ms)
                    .unwrap_or_else(|| key.to_string())
            })
        })
        .collect()
}

/// Keeps the items matching `keep`, dropping headers whose group ends up empty.
///
/// The loading sentinel is dropped as well; a filtered view is never mid-fetch.
pub fn filter_groups<K, T>(
    entries: Vec<Entry<K, T>>,
    mut keep: impl FnMut(&T) -> bool,
) -> Vec<Entry<K, T>> {
    let mut out = Vec::with_capacity(entries.len());
    // Header of the current group until its first surviving item is emitted.
    let mut pending: Option<K> = None;

    for entry in entries {
        match entry {
            Entry::Header(key) => pending = Some(key),
            Entry::Item(payload) => {
                if !keep(&payload) {
                    continue;
                }
                if let Some(key) = pending.take() {
                    out.push(Entry::Header(key));
                }
                out.push(Entry::Item(payload));
            }
            Entry::Loading => {}
        }
    }
    out
}

fn ordered_buckets<T, K: GroupKey>(
    records: impl IntoIterator<Item = T>,
    policy: &GroupKeyPolicy<T, K>,
) -> Vec<(K, Vec<T>)> {
    let mut slots = KeySlotMap::<K>::new();
    let mut buckets: Vec<(K, Vec<T>)> = Vec::new();

    for record in records {
        let key = policy.key_of(&record);
        if let Some(&slot) = slots.get(&key) {
            buckets[slot].1.push(record);
        } else {
            slots.insert(key.clone(), buckets.len());
            buckets.push((key, alloc::vec![record]));
        }
    }

    if buckets.is_empty() {
        return buckets;
    }

    let compare_keys = &policy.compare_keys;
    buckets.sort_by(|a, b| compare_keys(&a.0, &b.0));

    match &policy.compare_items {
        ItemOrder::Original => {}
        ItemOrder::Sorted(compare_items) => {
            for (_, group) in &mut buckets {
                group.sort_by(|a, b| compare_items(a, b));
            }
        }
    }
    buckets
}
