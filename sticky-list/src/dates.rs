//! Calendar-day grouping helpers built on `chrono`.
//!
//! Timestamps are grouped by the start of their calendar day in the timestamp's own time zone
//! (use `chrono::Local` for the active zone), and headers are labelled "Today", "Yesterday" or
//! a formatted date relative to a caller-supplied "now".

use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt::{Display, Write};

use chrono::{DateTime, Datelike, TimeZone};

use crate::{GroupKeyPolicy, ItemOrder, LabelFormatter, descending_by};

/// Used when [`DayLabels::pattern`] is not a valid strftime pattern.
pub const FALLBACK_DAY_PATTERN: &str = "%Y-%m-%d";

/// Titles and date pattern used by [`format_day_label`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayLabels {
    pub today: String,
    pub yesterday: String,
    /// `chrono` strftime pattern for every other day. An invalid pattern (e.g. `%Q`) renders
    /// with [`FALLBACK_DAY_PATTERN`] instead.
    pub pattern: String,
}

impl Default for DayLabels {
    fn default() -> Self {
        Self {
            today: "Today".to_string(),
            yesterday: "Yesterday".to_string(),
            pattern: "%d/%m/%Y".to_string(),
        }
    }
}

/// Truncates `ts` to the first instant of its calendar day.
///
/// Two timestamps on the same local day map to the same value, so the result can be used as
/// a group key directly.
pub fn start_of_day<Tz: TimeZone>(ts: &DateTime<Tz>) -> DateTime<Tz> {
    let tz = ts.timezone();
    let date = ts.date_naive();
    // Midnight may not exist on DST transition days; use the first hour that does.
    (0..24)
        .find_map(|hour| {
            date.and_hms_opt(hour, 0, 0)
                .and_then(|local| tz.from_local_datetime(&local).earliest())
        })
        .unwrap_or_else(|| ts.clone())
}

/// Calendar-day equality by (year, day-of-year), evaluated in `a`'s time zone.
pub fn is_same_day<Tz: TimeZone, Tz2: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz2>) -> bool {
    let b = b.with_timezone(&a.timezone());
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

/// Formats the header label of `day` relative to `now`.
pub fn format_day_label<Tz>(day: &DateTime<Tz>, now: &DateTime<Tz>, labels: &DayLabels) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if is_same_day(day, now) {
        return labels.today.clone();
    }
    let yesterday = now
        .date_naive()
        .pred_opt()
        .map(|date| (date.year(), date.ordinal()));
    let local_day = day.with_timezone(&now.timezone());
    if yesterday == Some((local_day.year(), local_day.ordinal())) {
        return labels.yesterday.clone();
    }
    format_date(day, &labels.pattern)
}

/// Renders `day` with a strftime `pattern`, falling back to [`FALLBACK_DAY_PATTERN`].
fn format_date<Tz>(day: &DateTime<Tz>, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    if write!(out, "{}", day.format(pattern)).is_ok() {
        return out;
    }
    lwarn!("dates: invalid day label pattern, using fallback");
    out.clear();
    // The fallback pattern is valid, so this write cannot fail.
    let _ = write!(out, "{}", day.format(FALLBACK_DAY_PATTERN));
    out
}

/// A [`LabelFormatter`] for day keys.
///
/// "now" arrives as Unix milliseconds and is interpreted in the key's time zone. An
/// unrepresentable instant falls back to the formatted date.
pub fn day_label_formatter<Tz>(labels: DayLabels) -> LabelFormatter<DateTime<Tz>>
where
    Tz: TimeZone + 'static,
    Tz::Offset: Display,
{
    Arc::new(move |day: &DateTime<Tz>, now_ms: i64| {
        match day.timezone().timestamp_millis_opt(now_ms).single() {
            Some(now) => format_day_label(day, &now, &labels),
            None => format_date(day, &labels.pattern),
        }
    })
}

/// Groups records by the calendar day of an extracted timestamp.
///
/// Days are ordered newest first when `newest_first` is set, oldest first otherwise. Records
/// inside a day are ordered newest first; override with
/// [`GroupKeyPolicy::with_item_order`]. Labels use [`DayLabels::default`].
pub fn day_policy<T, Tz>(
    timestamp: impl Fn(&T) -> DateTime<Tz> + Send + Sync + 'static,
    newest_first: bool,
) -> GroupKeyPolicy<T, DateTime<Tz>>
where
    T: 'static,
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Display + Send + Sync,
{
    let timestamp = Arc::new(timestamp);
    let key = Arc::clone(&timestamp);

    let policy = GroupKeyPolicy::new(move |record: &T| key(record))
        .with_normalize(|ts: DateTime<Tz>| start_of_day(&ts))
        .with_item_order(ItemOrder::Sorted(descending_by(move |record: &T| {
            timestamp(record)
        })));
    let policy = if newest_first {
        policy.with_keys_descending()
    } else {
        policy.with_keys_ascending()
    };

    GroupKeyPolicy {
        label_formatter: Some(day_label_formatter(DayLabels::default())),
        ..policy
    }
}
