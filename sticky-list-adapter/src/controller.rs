use alloc::sync::Arc;
use alloc::vec::Vec;

use sticky_list::{
    Entry, EntryBounds, FetchOutcome, GroupKey, GroupKeyPolicy, LoadFinish, LoadState,
    PageLoadCoordinator, PageRequest, PaginationState, Patch, PinnedHeader, StickyResolver,
    VisibleRange, diff, group, validate_sequence,
};

#[cfg(feature = "std")]
use crate::FetchSource;
use crate::{EntryBinder, ListRenderer, bind_range};

/// Outcome of a completed page fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageProgress {
    /// Entries the page added (headers included).
    pub inserted_count: usize,
    pub has_more: bool,
}

/// A framework-neutral controller owning one grouped list.
///
/// It holds the current sequence as an immutable snapshot and is its only writer: every
/// change produces a new snapshot plus the patch from the previous one, delivered to a
/// [`ListRenderer`]. Adapters drive it by calling:
/// - `on_viewport` whenever the visible range changes
/// - `on_frame` once per rendering frame (starts an armed page fetch)
/// - `on_page` when a fetch completes, or `load_more` to do both with a [`FetchSource`]
/// - `pinned_header` during each draw pass
///
/// No UI objects are held, so the controller can be driven from tests or a headless loop.
#[derive(Clone, Debug)]
pub struct ListController<T, K> {
    policy: GroupKeyPolicy<T, K>,
    entries: Arc<[Entry<K, T>]>,
    paging: PageLoadCoordinator,
    sticky: StickyResolver,
    visible: VisibleRange,
}

impl<T, K> ListController<T, K>
where
    K: GroupKey,
    T: PartialEq + Clone,
{
    /// Creates an empty list grouped by `policy`.
    pub fn new(policy: GroupKeyPolicy<T, K>) -> Self {
        Self {
            policy,
            entries: Arc::from(Vec::new()),
            paging: PageLoadCoordinator::new(),
            sticky: StickyResolver::new(),
            visible: VisibleRange::default(),
        }
    }

    pub fn policy(&self) -> &GroupKeyPolicy<T, K> {
        &self.policy
    }

    pub fn entries(&self) -> &[Entry<K, T>] {
        &self.entries
    }

    /// A cheap handle to the current sequence. It never changes under the caller.
    pub fn snapshot(&self) -> Arc<[Entry<K, T>]> {
        Arc::clone(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn visible_range(&self) -> VisibleRange {
        self.visible
    }

    pub fn load_state(&self) -> LoadState {
        self.paging.state()
    }

    pub fn pagination_state(&self) -> PaginationState {
        self.paging.pagination_state()
    }

    pub fn sticky_enabled(&self) -> bool {
        self.sticky.enabled()
    }

    pub fn set_sticky_enabled(&mut self, enabled: bool) {
        self.sticky.set_enabled(enabled);
    }

    /// Replaces the list with `records` (refresh, new query).
    ///
    /// Pagination starts over. A fetch still in flight is abandoned: its completion is
    /// discarded, even once a newer fetch has started.
    pub fn replace_records(
        &mut self,
        records: impl IntoIterator<Item = T>,
        renderer: &mut impl ListRenderer<K, T>,
    ) {
        let next = group(records, &self.policy);
        self.replace_entries(next, renderer);
    }

    /// Like [`Self::replace_records`] for a sequence the caller already grouped.
    pub fn replace_entries(
        &mut self,
        next: Vec<Entry<K, T>>,
        renderer: &mut impl ListRenderer<K, T>,
    ) {
        debug_assert!(validate_sequence(&next).is_ok(), "malformed sequence");
        let before = self.paging.pagination_state();
        let patch = diff(&self.entries, &next);
        ldebug!(
            old = self.entries.len(),
            new = next.len(),
            ops = patch.len(),
            "ListController::replace_entries"
        );
        self.paging.reset();
        self.sticky.clear_cache();
        self.swap(next, &patch, renderer);
        self.notify_pagination(before, renderer);
    }

    /// Records the visible range. Returns `true` when a page fetch is armed for the next
    /// frame.
    pub fn on_viewport(&mut self, visible: VisibleRange) -> bool {
        self.visible = visible;
        self.paging.observe_viewport(visible, self.entries.len())
    }

    /// Arms a page fetch regardless of the viewport, e.g. for the first page.
    pub fn request_load(&mut self) -> bool {
        self.paging.request_load()
    }

    /// Runs once per rendering frame.
    ///
    /// When a fetch is armed, appends the loading row, notifies `renderer` and returns the
    /// request to issue. The caller hands the request back with the result through
    /// [`Self::on_page`].
    pub fn on_frame(&mut self, renderer: &mut impl ListRenderer<K, T>) -> Option<PageRequest> {
        let before = self.paging.pagination_state();
        let start = self.paging.poll_frame(&self.entries)?;
        self.swap(start.sequence, &start.patch, renderer);
        self.notify_pagination(before, renderer);
        Some(start.request)
    }

    /// Completes the fetch started for `request` with raw records.
    ///
    /// Returns the fetch error unchanged on failure; the loading row is removed either way
    /// and the next trigger retries. A completion for an abandoned request changes nothing.
    pub fn on_page<E>(
        &mut self,
        request: PageRequest,
        outcome: FetchOutcome<T, E>,
        renderer: &mut impl ListRenderer<K, T>,
    ) -> Result<PageProgress, E> {
        let before = self.paging.pagination_state();
        let finish = self
            .paging
            .complete(&self.entries, request, outcome, &self.policy);
        self.finish(before, finish, renderer)
    }

    /// Completes the fetch started for `request` with a page the caller already grouped.
    pub fn on_grouped_page<E>(
        &mut self,
        request: PageRequest,
        page: Result<Vec<Entry<K, T>>, E>,
        renderer: &mut impl ListRenderer<K, T>,
    ) -> Result<PageProgress, E> {
        let before = self.paging.pagination_state();
        let finish = self.paging.complete_grouped(&self.entries, request, page);
        self.finish(before, finish, renderer)
    }

    /// Runs one frame and, if that started a fetch, awaits `source` and completes it.
    ///
    /// Returns `Ok(None)` when no fetch was armed.
    #[cfg(feature = "std")]
    pub async fn load_more<S>(
        &mut self,
        source: &mut S,
        renderer: &mut impl ListRenderer<K, T>,
    ) -> Result<Option<PageProgress>, S::Error>
    where
        S: FetchSource<T> + ?Sized,
        T: Send,
    {
        let Some(request) = self.on_frame(&mut *renderer) else {
            return Ok(None);
        };
        let result = source.fetch_page(request).await;
        self.on_page(request, FetchOutcome::from(result), &mut *renderer)
            .map(Some)
    }

    /// Resolves the pinned header for the current visible range.
    ///
    /// `bounds[k]` is the layout of entry `visible_range().start_index + k`; `header_height`
    /// measures the overlay for a header index.
    pub fn pinned_header(
        &mut self,
        bounds: &[EntryBounds],
        header_height: impl FnMut(usize) -> u32,
    ) -> Option<PinnedHeader> {
        self.sticky.resolve(&self.entries, self.visible, bounds, header_height)
    }

    /// Binds every visible entry. Returns the number of entries bound.
    pub fn bind_visible(&self, binder: &mut impl EntryBinder<K, T>) -> usize {
        bind_range(&self.entries, self.visible, binder)
    }

    fn finish<E>(
        &mut self,
        before: PaginationState,
        finish: LoadFinish<K, T, E>,
        renderer: &mut impl ListRenderer<K, T>,
    ) -> Result<PageProgress, E> {
        let LoadFinish {
            sequence,
            patch,
            inserted_count,
            error,
            ..
        } = finish;
        self.swap(sequence, &patch, renderer);
        self.notify_pagination(before, renderer);

        match error {
            Some(err) => Err(err),
            None => Ok(PageProgress {
                inserted_count,
                has_more: self.paging.has_more(),
            }),
        }
    }

    fn swap(
        &mut self,
        next: Vec<Entry<K, T>>,
        patch: &Patch<K, T>,
        renderer: &mut impl ListRenderer<K, T>,
    ) {
        if patch.is_empty() {
            return;
        }
        self.entries = Arc::from(next);
        // Indices may now point at different headers.
        self.sticky.clear_cache();
        renderer.apply(&self.entries, patch);
    }

    fn notify_pagination(&self, before: PaginationState, renderer: &mut impl ListRenderer<K, T>) {
        let now = self.paging.pagination_state();
        if now != before {
            ltrace!(
                is_loading = now.is_loading,
                has_more = now.has_more,
                "ListController: pagination changed"
            );
            renderer.pagination_changed(now);
        }
    }
}
