use crate::*;

use std::collections::VecDeque;
use std::string::String;
use std::vec;
use std::vec::Vec;

use sticky_list::{
    Entry, EntryBounds, FetchOutcome, GroupKeyPolicy, ItemOrder, LoadState, PageRequest,
    PaginationState, Patch, VisibleRange, validate_sequence,
};

#[derive(Clone, Debug, PartialEq, Eq)]
struct Msg {
    id: u32,
    day: u32,
}

fn msg(id: u32, day: u32) -> Msg {
    Msg { id, day }
}

fn controller() -> ListController<Msg, u32> {
    ListController::new(
        GroupKeyPolicy::new(|m: &Msg| m.day)
            .with_keys_descending()
            .with_item_order(ItemOrder::ascending_by(|m: &Msg| m.id)),
    )
}

/// Replays every patch onto its own copy, the way a list view would.
#[derive(Default)]
struct Mirror {
    rows: Vec<Entry<u32, Msg>>,
    patches: usize,
    states: Vec<PaginationState>,
}

impl ListRenderer<u32, Msg> for Mirror {
    fn apply(&mut self, sequence: &[Entry<u32, Msg>], patch: &Patch<u32, Msg>) {
        assert!(!patch.is_empty());
        patch.apply(&mut self.rows).unwrap();
        assert_eq!(self.rows, sequence);
        self.patches += 1;
    }

    fn pagination_changed(&mut self, state: PaginationState) {
        self.states.push(state);
    }
}

#[derive(Default)]
struct Binds {
    log: Vec<String>,
}

impl EntryBinder<u32, Msg> for Binds {
    fn bind_header(&mut self, index: usize, key: &u32) {
        self.log.push(std::format!("{index}:h{key}"));
    }

    fn bind_item(&mut self, index: usize, item: &Msg) {
        self.log.push(std::format!("{index}:i{}", item.id));
    }

    fn bind_loading(&mut self, index: usize) {
        self.log.push(std::format!("{index}:loading"));
    }
}

struct Pages {
    pages: VecDeque<Result<Vec<Msg>, &'static str>>,
    requests: Vec<PageRequest>,
}

impl Pages {
    fn new(pages: impl IntoIterator<Item = Result<Vec<Msg>, &'static str>>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            requests: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl FetchSource<Msg> for Pages {
    type Error = &'static str;

    async fn fetch_page(&mut self, request: PageRequest) -> Result<Vec<Msg>, Self::Error> {
        self.requests.push(request);
        self.pages.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[test]
fn replace_records_groups_and_notifies_renderer() {
    let mut c = controller();
    let mut mirror = Mirror::default();

    c.replace_records(vec![msg(2, 1), msg(1, 2), msg(3, 1)], &mut mirror);
    assert_eq!(
        c.entries(),
        &[
            Entry::Header(2),
            Entry::Item(msg(1, 2)),
            Entry::Header(1),
            Entry::Item(msg(2, 1)),
            Entry::Item(msg(3, 1)),
        ]
    );
    assert_eq!(mirror.patches, 1);

    // Same content: no patch is delivered.
    c.replace_records(vec![msg(3, 1), msg(2, 1), msg(1, 2)], &mut mirror);
    assert_eq!(mirror.patches, 1);
}

#[test]
fn snapshot_is_stable_across_updates() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    c.replace_records(vec![msg(1, 1)], &mut mirror);

    let before = c.snapshot();
    c.replace_records(vec![msg(1, 1), msg(2, 1)], &mut mirror);
    assert_eq!(before.len(), 2);
    assert_eq!(c.len(), 3);
}

#[test]
fn split_phase_paging_round_trip() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    c.replace_records(vec![msg(1, 5), msg(2, 5)], &mut mirror);

    assert!(!c.on_viewport(VisibleRange::new(0, 2)));
    assert!(c.on_frame(&mut mirror).is_none());

    assert!(c.on_viewport(VisibleRange::new(1, 3)));
    let request = c.on_frame(&mut mirror).unwrap();
    assert_eq!(request.offset, 2);
    assert_eq!(c.entries().last(), Some(&Entry::Loading));
    assert_eq!(c.load_state(), LoadState::Loading);

    // Re-entrant triggers are ignored while the fetch is in flight.
    assert!(!c.on_viewport(VisibleRange::new(1, 4)));
    assert!(c.on_frame(&mut mirror).is_none());

    let page = FetchOutcome::<Msg, ()>::Records(vec![msg(3, 5), msg(4, 4)]);
    let progress = c.on_page(request, page, &mut mirror).unwrap();
    assert_eq!(
        progress,
        PageProgress {
            inserted_count: 3,
            has_more: true
        }
    );
    assert_eq!(validate_sequence(c.entries()), Ok(()));
    assert_eq!(item_ids(c.entries()), vec![1, 2, 3, 4]);
    assert_eq!(
        mirror.states,
        vec![
            PaginationState {
                is_loading: true,
                has_more: true
            },
            PaginationState {
                is_loading: false,
                has_more: true
            },
        ]
    );
}

#[test]
fn failed_page_is_reported_and_retried() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    c.replace_records(vec![msg(1, 5)], &mut mirror);
    c.request_load();
    let request = c.on_frame(&mut mirror).unwrap();

    let err = c
        .on_page(request, FetchOutcome::Failed("offline"), &mut mirror)
        .unwrap_err();
    assert_eq!(err, "offline");
    assert!(!c.entries().contains(&Entry::Loading));
    assert!(c.pagination_state().has_more);

    assert!(c.on_viewport(VisibleRange::new(0, 2)));
    assert_eq!(c.on_frame(&mut mirror).unwrap().offset, 1);
}

#[test]
fn replace_abandons_in_flight_fetch() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    c.replace_records(vec![msg(1, 5)], &mut mirror);
    c.request_load();
    let stale = c.on_frame(&mut mirror).unwrap();

    c.replace_records(vec![msg(9, 9)], &mut mirror);
    assert_eq!(c.load_state(), LoadState::Idle);

    let late = c
        .on_page(stale, FetchOutcome::<Msg, ()>::Records(vec![msg(2, 5)]), &mut mirror)
        .unwrap();
    assert_eq!(late.inserted_count, 0);
    assert_eq!(c.entries(), &[Entry::Header(9), Entry::Item(msg(9, 9))]);
}

#[test]
fn late_page_from_replaced_list_does_not_hijack_new_fetch() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    c.replace_records(vec![msg(1, 5)], &mut mirror);
    c.request_load();
    let stale = c.on_frame(&mut mirror).unwrap();

    c.replace_records(vec![msg(9, 9)], &mut mirror);
    c.request_load();
    let fresh = c.on_frame(&mut mirror).unwrap();
    assert_ne!(fresh.id, stale.id);

    let late = c
        .on_page(stale, FetchOutcome::<Msg, ()>::Records(vec![msg(2, 5)]), &mut mirror)
        .unwrap();
    assert_eq!(late.inserted_count, 0);
    assert_eq!(c.load_state(), LoadState::Loading);
    assert_eq!(
        c.entries(),
        &[Entry::Header(9), Entry::Item(msg(9, 9)), Entry::Loading]
    );

    let real = c
        .on_page(fresh, FetchOutcome::<Msg, ()>::Records(vec![msg(10, 9)]), &mut mirror)
        .unwrap();
    assert_eq!(real.inserted_count, 1);
    assert_eq!(
        c.entries(),
        &[Entry::Header(9), Entry::Item(msg(9, 9)), Entry::Item(msg(10, 9))]
    );
    assert_eq!(mirror.rows, c.entries());
}

#[test]
fn pinned_header_follows_visible_range() {
    let mut c = controller();
    c.replace_records(vec![msg(1, 2), msg(2, 2), msg(3, 1)], &mut NoopRenderer);
    // [H2, 1, 2, H1, 3]

    c.on_viewport(VisibleRange::new(1, 4));
    let bounds = [
        EntryBounds::new(-4, 20),
        EntryBounds::new(16, 20),
        EntryBounds::new(36, 10),
    ];
    let pinned = c.pinned_header(&bounds, |_| 12).unwrap();
    assert_eq!(pinned.index, 0);
    assert_eq!(pinned.translate_offset, 0);
    assert!(pinned.rebind);
    assert!(!c.pinned_header(&bounds, |_| 12).unwrap().rebind);

    c.set_sticky_enabled(false);
    assert!(!c.sticky_enabled());
    assert_eq!(c.pinned_header(&bounds, |_| 12), None);
}

#[test]
fn swap_forces_pinned_rebind() {
    let mut c = controller();
    c.replace_records(vec![msg(1, 2), msg(3, 1)], &mut NoopRenderer);
    c.on_viewport(VisibleRange::new(0, 2));
    assert!(c.pinned_header(&[], |_| 10).unwrap().rebind);
    assert!(!c.pinned_header(&[], |_| 10).unwrap().rebind);

    c.request_load();
    c.on_frame(&mut NoopRenderer).unwrap();
    assert!(c.pinned_header(&[], |_| 10).unwrap().rebind);
}

#[test]
fn bind_range_dispatches_by_kind_and_clamps() {
    let mut c = controller();
    c.replace_records(vec![msg(1, 2), msg(3, 1)], &mut NoopRenderer);
    c.request_load();
    c.on_frame(&mut NoopRenderer).unwrap();

    let mut binds = Binds::default();
    assert_eq!(bind_range(c.entries(), VisibleRange::new(2, 99), &mut binds), 3);
    assert_eq!(binds.log, vec!["2:h1", "3:i3", "4:loading"]);

    c.on_viewport(VisibleRange::new(0, 2));
    let mut binds = Binds::default();
    assert_eq!(c.bind_visible(&mut binds), 2);
    assert_eq!(binds.log, vec!["0:h2", "1:i1"]);
}

#[test]
fn bind_pinned_only_on_rebind() {
    let mut c = controller();
    c.replace_records(vec![msg(1, 2), msg(3, 1)], &mut NoopRenderer);
    c.on_viewport(VisibleRange::new(3, 4));

    let mut binds = Binds::default();
    let pinned = c.pinned_header(&[], |_| 10).unwrap();
    assert!(bind_pinned(c.entries(), &pinned, &mut binds));
    let pinned = c.pinned_header(&[], |_| 10).unwrap();
    assert!(!bind_pinned(c.entries(), &pinned, &mut binds));
    assert_eq!(binds.log, vec!["2:h1"]);
}

#[tokio::test]
async fn load_more_pages_until_exhausted() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    let mut source = Pages::new([
        Ok(vec![msg(1, 3), msg(2, 3)]),
        Ok(vec![msg(3, 3), msg(4, 2)]),
    ]);

    assert_eq!(c.load_more(&mut source, &mut mirror).await, Ok(None));

    c.request_load();
    let first = c.load_more(&mut source, &mut mirror).await.unwrap().unwrap();
    assert_eq!(first.inserted_count, 3);

    c.on_viewport(VisibleRange::new(0, c.len()));
    let second = c.load_more(&mut source, &mut mirror).await.unwrap().unwrap();
    assert_eq!(second.inserted_count, 3);

    c.on_viewport(VisibleRange::new(2, c.len()));
    let last = c.load_more(&mut source, &mut mirror).await.unwrap().unwrap();
    assert_eq!(
        last,
        PageProgress {
            inserted_count: 0,
            has_more: false
        }
    );

    assert_eq!(
        source.requests,
        vec![
            PageRequest { offset: 0, id: 0 },
            PageRequest { offset: 2, id: 1 },
            PageRequest { offset: 4, id: 2 },
        ]
    );
    assert_eq!(item_ids(c.entries()), vec![1, 2, 3, 4]);
    assert_eq!(mirror.rows, c.entries());

    assert!(!c.on_viewport(VisibleRange::new(0, c.len())));
    assert_eq!(c.load_more(&mut source, &mut mirror).await, Ok(None));
    assert_eq!(source.requests.len(), 3);
}

#[tokio::test]
async fn load_more_surfaces_fetch_errors() {
    let mut c = controller();
    let mut mirror = Mirror::default();
    let mut source = Pages::new([Err("503"), Ok(vec![msg(1, 1)])]);

    c.request_load();
    assert_eq!(c.load_more(&mut source, &mut mirror).await, Err("503"));
    assert!(c.is_empty());
    assert!(mirror.rows.is_empty());

    c.request_load();
    assert!(c.load_more(&mut source, &mut mirror).await.unwrap().is_some());
    assert_eq!(c.len(), 2);
}

fn item_ids(entries: &[Entry<u32, Msg>]) -> Vec<u32> {
    entries.iter().filter_map(|e| e.item().map(|m| m.id)).collect()
}
