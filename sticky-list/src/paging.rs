use alloc::vec::Vec;

use crate::key::GroupKey;
use crate::{
    Entry, GroupKeyPolicy, PageRequest, PaginationState, Patch, VisibleRange, diff, group,
    item_count, merge, with_loading, without_loading,
};

/// States of the page-load state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadState {
    /// No fetch in flight; more pages may exist.
    #[default]
    Idle,
    /// One fetch in flight. Triggers are ignored.
    Loading,
    /// A fetch returned nothing. Terminal until [`PageLoadCoordinator::reset`].
    Exhausted,
}

/// What the fetch source produced for a [`PageRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome<T, E> {
    Records(Vec<T>),
    /// The fetch failed. Distinct from an empty page: pagination stays open for a retry.
    Failed(E),
}

impl<T, E> From<Result<Vec<T>, E>> for FetchOutcome<T, E> {
    fn from(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(records) => Self::Records(records),
            Err(err) => Self::Failed(err),
        }
    }
}

/// A fetch was triggered: swap in `sequence` (now ending with the loading sentinel), hand
/// `patch` to the renderer, then issue `request`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadStart<K, T> {
    pub request: PageRequest,
    pub sequence: Vec<Entry<K, T>>,
    pub patch: Patch<K, T>,
}

/// A fetch completed: swap in `sequence` and hand `patch` to the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFinish<K, T, E> {
    pub sequence: Vec<Entry<K, T>>,
    pub patch: Patch<K, T>,
    /// Entries added by the merge (zero for an empty page or a failure).
    pub inserted_count: usize,
    /// State after the transition.
    pub state: LoadState,
    /// The fetch error, when the outcome was [`FetchOutcome::Failed`].
    pub error: Option<E>,
}

/// Gates page fetches for one list instance.
///
/// ```text
/// Idle --(end reached, next frame)--> Loading --(>=1 record)--> Idle
///                                            \--(0 records)--> Exhausted
///                                            \--(failure)----> Idle
/// ```
///
/// Viewport events only arm a trigger; the fetch starts on the next [`Self::poll_frame`] so the
/// sequence is never mutated while the renderer is mid-pass. At most one fetch is in flight.
/// The coordinator never mutates a sequence in place: it takes the current snapshot and
/// returns the next one together with the patch between them.
#[derive(Clone, Debug, Default)]
pub struct PageLoadCoordinator {
    state: LoadState,
    armed: bool,
    next_id: u64,
    in_flight: Option<u64>,
}

impl PageLoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn pagination_state(&self) -> PaginationState {
        PaginationState {
            is_loading: self.state == LoadState::Loading,
            has_more: self.state != LoadState::Exhausted,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn has_more(&self) -> bool {
        self.state != LoadState::Exhausted
    }

    /// Returns `true` when a trigger is armed for the next frame.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Id of the fetch in flight, if any.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// Back to `Idle` with nothing armed, e.g. after the list was replaced wholesale.
    ///
    /// A fetch in flight is abandoned: its completion no longer matches and is discarded,
    /// even after a newer fetch has started.
    pub fn reset(&mut self) {
        ldebug!(from = ?self.state, abandoned = ?self.in_flight, "PageLoadCoordinator::reset");
        self.state = LoadState::Idle;
        self.armed = false;
        self.in_flight = None;
    }

    /// Feeds a viewport observation. `len` is the current sequence length.
    ///
    /// Arms a trigger when the visible window reaches the end of the sequence while idle.
    /// Observations during `Loading` or after exhaustion are ignored. Returns whether a
    /// trigger is armed.
    pub fn observe_viewport(&mut self, visible: VisibleRange, len: usize) -> bool {
        if self.state != LoadState::Idle {
            return false;
        }
        if !visible.is_empty() && visible.end_index >= len {
            if !self.armed {
                ltrace!(end = visible.end_index, len, "PageLoadCoordinator: end reached");
            }
            self.armed = true;
        }
        self.armed
    }

    /// Arms a trigger regardless of the viewport (initial load, pull-to-load).
    pub fn request_load(&mut self) -> bool {
        if self.state == LoadState::Idle {
            self.armed = true;
        }
        self.armed
    }

    /// Runs once per rendering frame. Starts the armed fetch, if any.
    ///
    /// Re-checks the state before starting, so a trigger armed before a concurrent transition
    /// cannot start a second fetch.
    pub fn poll_frame<K, T>(&mut self, current: &[Entry<K, T>]) -> Option<LoadStart<K, T>>
    where
        K: PartialEq + Clone,
        T: PartialEq + Clone,
    {
        if !core::mem::take(&mut self.armed) {
            return None;
        }
        if self.state != LoadState::Idle {
            return None;
        }

        self.state = LoadState::Loading;
        let request = PageRequest {
            offset: item_count(current),
            id: self.next_id,
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.in_flight = Some(request.id);
        let sequence = with_loading(current.to_vec());
        let patch = diff(current, &sequence);
        ldebug!(
            offset = request.offset,
            id = request.id,
            "PageLoadCoordinator: fetch started"
        );

        Some(LoadStart {
            request,
            sequence,
            patch,
        })
    }

    /// Completes the fetch started for `request` with raw records grouped by `policy`.
    pub fn complete<K, T, E>(
        &mut self,
        current: &[Entry<K, T>],
        request: PageRequest,
        outcome: FetchOutcome<T, E>,
        policy: &GroupKeyPolicy<T, K>,
    ) -> LoadFinish<K, T, E>
    where
        K: GroupKey,
        T: PartialEq + Clone,
    {
        let page = match outcome {
            FetchOutcome::Records(records) => Ok(group(records, policy)),
            FetchOutcome::Failed(err) => Err(err),
        };
        self.complete_grouped(current, request, page)
    }

    /// Completes the fetch started for `request` with a page the caller already grouped.
    ///
    /// - A page without items moves to `Exhausted`.
    /// - A non-empty page is merged (see [`crate::merge`]) and returns to `Idle`.
    /// - An error returns to `Idle` with the sequence unchanged apart from the sentinel.
    ///
    /// In every case the loading sentinel is removed. A completion for a request that is not
    /// the fetch in flight (none started, or abandoned by [`Self::reset`]) is logged and
    /// leaves everything unchanged.
    pub fn complete_grouped<K, T, E>(
        &mut self,
        current: &[Entry<K, T>],
        request: PageRequest,
        page: Result<Vec<Entry<K, T>>, E>,
    ) -> LoadFinish<K, T, E>
    where
        K: PartialEq + Clone,
        T: PartialEq + Clone,
    {
        if self.state != LoadState::Loading || self.in_flight != Some(request.id) {
            lwarn!(
                state = ?self.state,
                id = request.id,
                in_flight = ?self.in_flight,
                "PageLoadCoordinator: discarding completion of a fetch not in flight"
            );
            return LoadFinish {
                sequence: current.to_vec(),
                patch: Patch::default(),
                inserted_count: 0,
                state: self.state,
                error: page.err(),
            };
        }

        self.in_flight = None;
        let base = without_loading(current.to_vec());
        let (sequence, inserted_count, error) = match page {
            Ok(page) if item_count(&page) == 0 => {
                self.state = LoadState::Exhausted;
                ldebug!("PageLoadCoordinator: no more pages");
                (base, 0, None)
            }
            Ok(page) => {
                self.state = LoadState::Idle;
                let outcome = merge(base, page);
                ldebug!(
                    inserted = outcome.inserted_count,
                    "PageLoadCoordinator: page merged"
                );
                (outcome.merged, outcome.inserted_count, None)
            }
            Err(err) => {
                self.state = LoadState::Idle;
                lwarn!("PageLoadCoordinator: fetch failed, will retry on next trigger");
                (base, 0, Some(err))
            }
        };

        let patch = diff(current, &sequence);
        LoadFinish {
            sequence,
            patch,
            inserted_count,
            state: self.state,
            error,
        }
    }
}
