//! Slot grid model for availability boards.
//!
//! An availability board covers `day_count` consecutive calendar days and,
//! within each day, the hours `[day_start_hour, day_end_hour)` split into
//! slots of `slot_minutes`. Every slot has a flat index:
//!
//! ```text
//! index = day_index * slots_per_day + slot_in_day
//! ```
//!
//! Settings are validated once at board creation (see
//! [`crate::validation::validate_grid`]); the free functions in this module
//! assume valid settings and never fail.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::config::LimitsSettings;
use crate::error::{EngineError, Result};

/// Flat index of a slot in `[0, total_slots)`.
pub type SlotIndex = u32;

/// Slot granularities a board may use.
pub const ALLOWED_SLOT_MINUTES: [u32; 3] = [15, 30, 60];

/// Settings describing the availability grid of a board.
///
/// Immutable once the board is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGridSettings {
    /// IANA time zone name the board's dates and hours are expressed in
    pub timezone: String,
    /// First calendar day covered by the board
    pub start_date: NaiveDate,
    pub day_count: u32,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub slot_minutes: u32,
}

impl SlotGridSettings {
    /// Number of slots within a single day.
    pub fn slots_per_day(&self) -> usize {
        debug_assert!(
            self.day_end_hour > self.day_start_hour && self.slot_minutes > 0,
            "grid settings must be validated before use"
        );
        let minutes = self.day_end_hour.saturating_sub(self.day_start_hour) * 60;
        (minutes / self.slot_minutes.max(1)) as usize
    }

    /// Total number of slots across all days.
    pub fn total_slots(&self) -> usize {
        self.day_count as usize * self.slots_per_day()
    }

    /// Smallest window, in slots, that spans at least `min_minutes`.
    pub fn min_window_slots(&self, min_minutes: u32) -> usize {
        let slot = self.slot_minutes.max(1);
        (min_minutes.div_ceil(slot) as usize).max(1)
    }
}

/// Number of slots in the grid described by `settings`.
pub fn slot_count(settings: &SlotGridSettings) -> usize {
    settings.total_slots()
}

/// Split a slot index into its day and the local clock time the slot starts at.
pub fn slot_index_to_time(index: SlotIndex, settings: &SlotGridSettings) -> (u32, NaiveTime) {
    let per_day = settings.slots_per_day().max(1) as u32;
    let day_index = index / per_day;
    let minutes = minutes_of_slot(index % per_day, settings);
    let time = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or_default();
    (day_index, time)
}

/// Calendar date label (`YYYY-MM-DD`) of the given day.
///
/// Uses calendar-day addition on the board's start date, so the label never
/// shifts across DST transitions.
pub fn day_label(day_index: u32, settings: &SlotGridSettings) -> String {
    day_date(day_index, settings)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Calendar date of the given day, `None` only past the representable range.
pub fn day_date(day_index: u32, settings: &SlotGridSettings) -> Option<NaiveDate> {
    settings
        .start_date
        .checked_add_days(Days::new(u64::from(day_index)))
}

/// Minutes after local midnight at which the in-day slot starts.
pub(crate) fn minutes_of_slot(slot_in_day: u32, settings: &SlotGridSettings) -> u32 {
    settings.day_start_hour * 60 + slot_in_day * settings.slot_minutes
}

/// Format minutes after midnight as `HH:MM`; the end of day renders as `24:00`.
pub fn format_clock(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Validated slot grid bound to its resolved time zone.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    settings: SlotGridSettings,
    tz: Tz,
}

impl SlotGrid {
    /// Validate `settings` against the default limits and build the grid.
    pub fn new(settings: SlotGridSettings) -> Result<Self> {
        Self::with_limits(settings, &LimitsSettings::default())
    }

    /// Validate `settings` against explicit limits and build the grid.
    pub fn with_limits(settings: SlotGridSettings, limits: &LimitsSettings) -> Result<Self> {
        crate::validation::validate_grid(&settings, limits)?;
        let tz = parse_timezone(&settings.timezone)?;
        Ok(Self { settings, tz })
    }

    pub fn settings(&self) -> &SlotGridSettings {
        &self.settings
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn slot_count(&self) -> usize {
        self.settings.total_slots()
    }

    pub fn slots_per_day(&self) -> usize {
        self.settings.slots_per_day()
    }

    pub fn day_label(&self, day_index: u32) -> String {
        day_label(day_index, &self.settings)
    }

    pub fn slot_time(&self, index: SlotIndex) -> (u32, NaiveTime) {
        slot_index_to_time(index, &self.settings)
    }

    /// Zone-aware instant at which slot `index` starts.
    ///
    /// Ambiguous local times (DST fold) resolve to the earlier instant; local
    /// times skipped by a DST gap resolve to the first instant after the gap.
    /// Returns `None` for indexes outside the grid.
    pub fn slot_start(&self, index: SlotIndex) -> Option<chrono::DateTime<Tz>> {
        if index as usize >= self.slot_count() {
            return None;
        }
        let (day_index, time) = self.slot_time(index);
        let date = day_date(day_index, &self.settings)?;
        let local = NaiveDateTime::new(date, time);
        resolve_local(self.tz, local)
    }
}

/// Resolve an IANA zone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| EngineError::UnknownTimezone(name.to_string()))
}

fn resolve_local(tz: Tz, local: NaiveDateTime) -> Option<chrono::DateTime<Tz>> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Some(dt);
    }
    // Inside a DST gap: walk forward until the wall clock exists again.
    (1..=4)
        .map(|quarter| local + TimeDelta::minutes(15 * quarter))
        .find_map(|shifted| tz.from_local_datetime(&shifted).earliest())
}
