use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use super::domain::{StatusDuration, StatusEvent};

/// Fold an application's status history into per-status cumulative dwell
/// times.
///
/// Events are stable-sorted ascending by `occurred_at`, so equal timestamps
/// keep their insertion order. Each gap between consecutive events is
/// attributed to the earlier event's status — the status that was current
/// during the interval — and recurrences of a status merge by summation. The
/// open interval from the last event to `now` belongs to the last status,
/// clamped to zero if `now` precedes it (clock skew).
///
/// Returns one entry per distinct status observed; empty history yields an
/// empty list. Pure: no clock access, no mutation of the input.
pub fn status_durations(events: &[StatusEvent], now: DateTime<Utc>) -> Vec<StatusDuration> {
    let mut ordered: Vec<&StatusEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.occurred_at);

    let mut totals: BTreeMap<_, Duration> = BTreeMap::new();

    for pair in ordered.windows(2) {
        let elapsed = pair[1].occurred_at - pair[0].occurred_at;
        let entry = totals.entry(pair[0].status).or_insert_with(Duration::zero);
        *entry = *entry + elapsed;
    }

    if let Some(last) = ordered.last() {
        let open_tail = (now - last.occurred_at).max(Duration::zero());
        let entry = totals.entry(last.status).or_insert_with(Duration::zero);
        *entry = *entry + open_tail;
    }

    totals
        .into_iter()
        .map(|(status, duration)| StatusDuration { status, duration })
        .collect()
}
