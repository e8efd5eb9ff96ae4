use crate::{Entry, EntryBounds, PinnedHeader, VisibleRange};

/// Index of the header owning `index`: the nearest `Header` at or above it.
///
/// Returns `None` when no header precedes `index` or `index` is out of bounds.
pub fn header_index_for<K, T>(entries: &[Entry<K, T>], index: usize) -> Option<usize> {
    if index >= entries.len() {
        return None;
    }
    entries[..=index].iter().rposition(Entry::is_header)
}

/// Translation that slides the pinned header up while the next header scrolls into it.
///
/// The pinned header is drawn at the viewport top, so its bottom edge (the contact point) sits
/// at `pinned_height`. If the visible entry spanning the contact point is another header, the
/// result is `next.top - pinned_height` (non-positive); otherwise zero.
///
/// `bounds[k]` describes entry `visible.start_index + k`.
pub fn hand_off_offset<K, T>(
    entries: &[Entry<K, T>],
    visible: VisibleRange,
    bounds: &[EntryBounds],
    pinned_index: usize,
    pinned_height: u32,
) -> i64 {
    let contact = pinned_height as i64;
    let in_contact = bounds
        .iter()
        .enumerate()
        .take(visible.len())
        .find(|(_, b)| b.bottom() > contact && b.top <= contact);

    let Some((k, next)) = in_contact else {
        return 0;
    };
    let index = visible.start_index + k;
    if index == pinned_index {
        return 0;
    }
    match entries.get(index) {
        Some(Entry::Header(_)) => next.top - contact,
        Some(Entry::Item(_) | Entry::Loading) | None => 0,
    }
}

/// Resolves the pinned ("sticky") header for each draw pass.
///
/// Holds the on/off toggle and remembers the last pinned index so the renderer only re-binds
/// its overlay when the pinned header actually changes.
#[derive(Clone, Debug)]
pub struct StickyResolver {
    enabled: bool,
    last_pinned: Option<usize>,
}

impl Default for StickyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl StickyResolver {
    pub fn new() -> Self {
        Self {
            enabled: true,
            last_pinned: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Turns pinning on or off. Takes effect on the next [`Self::resolve`].
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        ldebug!(enabled, "StickyResolver::set_enabled");
        self.enabled = enabled;
        self.last_pinned = None;
    }

    /// Index pinned by the last resolve, if any.
    pub fn last_pinned(&self) -> Option<usize> {
        self.last_pinned
    }

    /// Forgets the cached overlay; the next pinned header reports `rebind: true`.
    ///
    /// Call this when the sequence is swapped or the list is torn down.
    pub fn clear_cache(&mut self) {
        self.last_pinned = None;
    }

    /// Determines the pinned header and its hand-off translation.
    ///
    /// - `visible` is the on-screen index range; its first entry is the topmost one.
    /// - `bounds[k]` is the layout of entry `visible.start_index + k`.
    /// - `header_height(index)` returns the rendered height of the pinned overlay for the
    ///   header at `index` (the renderer measures it).
    ///
    /// Returns `None` when pinning is disabled (no work is done), nothing is visible, or no
    /// header has been reached above the topmost visible entry.
    pub fn resolve<K, T>(
        &mut self,
        entries: &[Entry<K, T>],
        visible: VisibleRange,
        bounds: &[EntryBounds],
        mut header_height: impl FnMut(usize) -> u32,
    ) -> Option<PinnedHeader> {
        if !self.enabled {
            return None;
        }
        if visible.is_empty() {
            return None;
        }

        let Some(index) = header_index_for(entries, visible.start_index) else {
            self.last_pinned = None;
            return None;
        };

        let height = header_height(index);
        let translate_offset = hand_off_offset(entries, visible, bounds, index, height);
        let rebind = self.last_pinned != Some(index);
        if rebind {
            ltrace!(index, height, "StickyResolver: pinned header changed");
        }
        self.last_pinned = Some(index);

        Some(PinnedHeader {
            index,
            translate_offset,
            rebind,
        })
    }
}
