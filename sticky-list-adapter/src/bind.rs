use sticky_list::{Entry, PinnedHeader, VisibleRange};

/// Binds entry content into reusable views.
///
/// One method per entry kind, so a renderer can keep a separate view pool for headers, items
/// and the loading row.
pub trait EntryBinder<K, T> {
    fn bind_header(&mut self, index: usize, key: &K);

    fn bind_item(&mut self, index: usize, item: &T);

    fn bind_loading(&mut self, _index: usize) {}
}

/// Dispatches every entry of `range` to `binder`.
///
/// The range is clamped to the sequence. Returns the number of entries bound.
pub fn bind_range<K, T>(
    entries: &[Entry<K, T>],
    range: VisibleRange,
    binder: &mut impl EntryBinder<K, T>,
) -> usize {
    let end = range.end_index.min(entries.len());
    let start = range.start_index.min(end);
    for (index, entry) in entries[start..end].iter().enumerate() {
        let index = start + index;
        match entry {
            Entry::Header(key) => binder.bind_header(index, key),
            Entry::Item(item) => binder.bind_item(index, item),
            Entry::Loading => binder.bind_loading(index),
        }
    }
    end - start
}

/// Binds the pinned header into the overlay view when it changed since the last pass.
///
/// Returns `true` when `bind_header` was called.
pub fn bind_pinned<K, T>(
    entries: &[Entry<K, T>],
    pinned: &PinnedHeader,
    binder: &mut impl EntryBinder<K, T>,
) -> bool {
    if !pinned.rebind {
        return false;
    }
    match entries.get(pinned.index) {
        Some(Entry::Header(key)) => {
            binder.bind_header(pinned.index, key);
            true
        }
        _ => false,
    }
}
