use sticky_list::{Entry, PaginationState, Patch};

/// The UI side of a [`crate::ListController`].
///
/// The controller never holds UI objects. Every time it swaps in a new sequence it hands the
/// renderer the new snapshot together with the patch from the previous one, so a list view
/// can animate exactly the rows that changed instead of reloading everything.
pub trait ListRenderer<K, T> {
    /// Called once per sequence swap, after the swap.
    ///
    /// `patch` transforms the previous sequence into `sequence`. An empty patch is never
    /// delivered.
    fn apply(&mut self, sequence: &[Entry<K, T>], patch: &Patch<K, T>);

    /// Called when the loading / has-more flags change.
    fn pagination_changed(&mut self, _state: PaginationState) {}
}

impl<K, T, R: ListRenderer<K, T> + ?Sized> ListRenderer<K, T> for &mut R {
    fn apply(&mut self, sequence: &[Entry<K, T>], patch: &Patch<K, T>) {
        (**self).apply(sequence, patch);
    }

    fn pagination_changed(&mut self, state: PaginationState) {
        (**self).pagination_changed(state);
    }
}

/// A renderer that ignores every notification (headless use, benchmarks).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRenderer;

impl<K, T> ListRenderer<K, T> for NoopRenderer {
    fn apply(&mut self, _sequence: &[Entry<K, T>], _patch: &Patch<K, T>) {}
}
