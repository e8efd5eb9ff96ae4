// Example: grouping messages by calendar day with "Today" / "Yesterday" headers.
//
// Run with `--features chrono`.
use chrono::{Duration, Local};
use sticky_list::{Entry, day_policy, group_labeled};

#[derive(Clone, Debug)]
struct Message {
    at: chrono::DateTime<Local>,
    text: &'static str,
}

fn main() {
    let now = Local::now();
    let messages = vec![
        Message {
            at: now - Duration::minutes(5),
            text: "see you there",
        },
        Message {
            at: now - Duration::days(1),
            text: "lunch tomorrow?",
        },
        Message {
            at: now - Duration::days(4),
            text: "welcome!",
        },
        Message {
            at: now - Duration::minutes(50),
            text: "on my way",
        },
    ];

    let policy = day_policy(|m: &Message| m.at, true);
    for entry in group_labeled(messages, &policy, now.timestamp_millis()) {
        match entry {
            Entry::Header(label) => println!("== {label} =="),
            Entry::Item(m) => println!("  {} {}", m.at.format("%H:%M"), m.text),
            Entry::Loading => {}
        }
    }
}
