// Example: resolving the pinned header while scrolling a list of fixed-height rows.
use sticky_list::{Entry, EntryBounds, StickyResolver, VisibleRange};

const ROW: i64 = 20;
const HEADER: i64 = 12;

fn main() {
    let entries: Vec<Entry<char, u32>> = "ABC"
        .chars()
        .flat_map(|key| {
            std::iter::once(Entry::Header(key)).chain((0..3).map(Entry::Item))
        })
        .collect();

    // Entry tops in content coordinates.
    let mut tops = Vec::with_capacity(entries.len());
    let mut y = 0;
    for entry in &entries {
        tops.push(y);
        y += if entry.is_header() { HEADER } else { ROW };
    }

    let viewport = 50;
    let mut resolver = StickyResolver::new();
    for scroll in (0..y - viewport).step_by(4) {
        let start = tops.iter().rposition(|&top| top <= scroll).unwrap_or(0);
        let end = tops
            .iter()
            .position(|&top| top >= scroll + viewport)
            .unwrap_or(entries.len());
        let visible = VisibleRange::new(start, end);
        let bounds: Vec<EntryBounds> = (start..end)
            .map(|i| {
                let height = if entries[i].is_header() { HEADER } else { ROW };
                EntryBounds::new(tops[i] - scroll, height as u32)
            })
            .collect();

        if let Some(pinned) = resolver.resolve(&entries, visible, &bounds, |_| HEADER as u32) {
            println!(
                "scroll={scroll:>3} pinned={:?} offset={:>3}{}",
                entries[pinned.index],
                pinned.translate_offset,
                if pinned.rebind { " (rebind)" } else { "" }
            );
        }
    }
}
