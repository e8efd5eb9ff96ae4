use sticky_list::{
    Entry, EntryBounds, FetchOutcome, GroupKeyPolicy, PaginationState, Patch, VisibleRange,
};
use sticky_list_adapter::{EntryBinder, ListController, ListRenderer, bind_pinned};

#[derive(Clone, Debug, PartialEq)]
struct Track {
    album: &'static str,
    title: String,
}

/// Prints what a list view would do with each notification.
struct Console;

impl ListRenderer<&'static str, Track> for Console {
    fn apply(
        &mut self,
        sequence: &[Entry<&'static str, Track>],
        patch: &Patch<&'static str, Track>,
    ) {
        println!("render: len={} ranges={:?}", sequence.len(), patch.ranges());
    }

    fn pagination_changed(&mut self, state: PaginationState) {
        println!("render: {state:?}");
    }
}

impl EntryBinder<&'static str, Track> for Console {
    fn bind_header(&mut self, index: usize, key: &&'static str) {
        println!("  bind {index}: == {key} ==");
    }

    fn bind_item(&mut self, index: usize, item: &Track) {
        println!("  bind {index}: {}", item.title);
    }

    fn bind_loading(&mut self, index: usize) {
        println!("  bind {index}: loading...");
    }
}

fn fetch(offset: usize) -> Vec<Track> {
    const ALBUMS: [&str; 2] = ["Blue", "Red"];
    if offset >= 8 {
        return Vec::new();
    }
    (offset..offset + 4)
        .map(|i| Track {
            album: ALBUMS[i / 6],
            title: format!("track {i}"),
        })
        .collect()
}

fn main() {
    // Example: a frame loop driving the controller without holding UI objects.
    //
    // An adapter would:
    // - report the visible range after each layout pass
    // - call on_frame once per frame and run the returned request
    // - hand the completed page back through on_page
    let mut c = ListController::new(GroupKeyPolicy::new(|t: &Track| t.album));
    let mut ui = Console;

    c.request_load();
    for frame in 0..8 {
        if let Some(request) = c.on_frame(&mut ui) {
            println!("frame {frame}: fetching offset {}", request.offset);
            let records = fetch(request.offset);
            let outcome = FetchOutcome::<_, ()>::Records(records);
            let progress = c.on_page(request, outcome, &mut ui);
            println!("frame {frame}: {progress:?}");
        }

        // Pretend every row is 20px tall and the viewport shows the last three entries.
        let visible = VisibleRange::new(c.len().saturating_sub(3), c.len());
        c.on_viewport(visible);
        c.bind_visible(&mut ui);

        let bounds: Vec<EntryBounds> = (0..visible.len())
            .map(|k| EntryBounds::new(k as i64 * 20 - 6, 20))
            .collect();
        if let Some(pinned) = c.pinned_header(&bounds, |_| 20) {
            bind_pinned(c.entries(), &pinned, &mut ui);
        }
    }
}
