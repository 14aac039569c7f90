#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use huddle_engine::api::{
    AvailabilityContribution, BoardItem, BoardVote, ColumnId, ItemId, OptionId, PollOption,
    PollVote, SlotGridSettings, SlotIndex, VoteType,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// UTC grid starting on Monday 2025-06-02.
pub fn utc_grid(day_count: u32, day_start: u32, day_end: u32, slot_minutes: u32) -> SlotGridSettings {
    SlotGridSettings {
        timezone: "UTC".to_string(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        day_count,
        day_start_hour: day_start,
        day_end_hour: day_end,
        slot_minutes,
    }
}

pub fn availability(id: i64, name: &str, slots: &[SlotIndex]) -> AvailabilityContribution {
    AvailabilityContribution::new(id, Some(name), slots.iter().copied())
}

pub fn poll_option(id: i64, text: &str) -> PollOption {
    PollOption {
        id: OptionId(id),
        text: text.to_string(),
        order: id as i32,
        is_archived: false,
        created_by: None,
    }
}

pub fn poll_vote(option_id: i64, voter: &str) -> PollVote {
    PollVote {
        option_id: OptionId(option_id),
        voter_key_hash: voter.to_string(),
    }
}

/// Instant `minutes` after 2025-06-02 09:00 UTC.
pub fn at_minute(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap() + chrono::TimeDelta::minutes(minutes)
}

pub fn board_item(id: i64, created_minute: i64, column: Option<i64>, author: &str) -> BoardItem {
    BoardItem {
        id: ItemId(id),
        column_id: column.map(ColumnId),
        text: format!("Item {}", id),
        created_by_token: author.to_string(),
        created_at: at_minute(created_minute),
    }
}

/// `up` upvotes and `down` downvotes on one item from distinct participants.
pub fn item_votes(item_id: i64, up: usize, down: usize) -> Vec<BoardVote> {
    let ups = (0..up).map(move |i| BoardVote {
        item_id: ItemId(item_id),
        participant_token: format!("up-{}-{}", item_id, i),
        vote_type: VoteType::Up,
    });
    let downs = (0..down).map(move |i| BoardVote {
        item_id: ItemId(item_id),
        participant_token: format!("down-{}-{}", item_id, i),
        vote_type: VoteType::Down,
    });
    ups.chain(downs).collect()
}
