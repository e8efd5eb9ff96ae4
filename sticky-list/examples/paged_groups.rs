// Example: grouping a feed, paging more records in and printing each patch.
use sticky_list::{
    Entry, FetchOutcome, GroupKeyPolicy, ItemOrder, PageLoadCoordinator, VisibleRange, group,
};

#[derive(Clone, Debug, PartialEq)]
struct Order {
    id: u32,
    region: &'static str,
}

fn page(offset: usize) -> Vec<Order> {
    const REGIONS: [&str; 3] = ["north", "south", "west"];
    if offset >= 12 {
        return Vec::new();
    }
    (offset..offset + 4)
        .map(|i| Order {
            id: i as u32,
            region: REGIONS[i * 7 % 3],
        })
        .collect()
}

fn dump(entries: &[Entry<&str, Order>]) {
    for entry in entries {
        match entry {
            Entry::Header(region) => println!("  [{region}]"),
            Entry::Item(order) => println!("    #{}", order.id),
            Entry::Loading => println!("    ..."),
        }
    }
}

fn main() {
    let policy = GroupKeyPolicy::new(|o: &Order| o.region)
        .with_item_order(ItemOrder::descending_by(|o: &Order| o.id));
    let mut entries = group(page(0), &policy);
    let mut paging = PageLoadCoordinator::new();

    println!("initial:");
    dump(&entries);

    loop {
        // The user scrolled to the bottom.
        let visible = VisibleRange::new(entries.len().saturating_sub(3), entries.len());
        if !paging.observe_viewport(visible, entries.len()) {
            break;
        }

        // Next frame: start the fetch.
        let Some(start) = paging.poll_frame(&entries) else {
            break;
        };
        println!("fetch offset={} start_ops={:?}", start.request.offset, start.patch.ranges());
        entries = start.sequence;

        let records = page(start.request.offset);
        let outcome = FetchOutcome::<_, ()>::Records(records);
        let finish = paging.complete(&entries, start.request, outcome, &policy);
        println!(
            "state={:?} inserted={} ranges={:?}",
            finish.state,
            finish.inserted_count,
            finish.patch.ranges()
        );
        entries = finish.sequence;
    }

    println!("final ({:?}):", paging.pagination_state());
    dump(&entries);
}
