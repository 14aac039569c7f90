//! Submission and settings rules applied by the boundary.
//!
//! The aggregation services assume these checks already ran: settings are
//! validated once when a board is created, contributions and ballots each
//! time they are written.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::api::OptionId;
use crate::config::LimitsSettings;
use crate::error::{EngineError, Result};
use crate::models::grid::{parse_timezone, ALLOWED_SLOT_MINUTES};
use crate::models::{
    ItemBoardSettings, PollOption, PollSettings, PulseScale, SlotGridSettings, SlotIndex, VoteType,
};

/// Check every structural invariant of the grid settings.
pub fn validate_grid(settings: &SlotGridSettings, limits: &LimitsSettings) -> Result<()> {
    if settings.day_end_hour > 24 {
        return Err(EngineError::InvalidSettings(format!(
            "day_end_hour must be at most 24, got {}",
            settings.day_end_hour
        )));
    }
    if settings.day_end_hour <= settings.day_start_hour {
        return Err(EngineError::InvalidSettings(format!(
            "day_end_hour ({}) must be greater than day_start_hour ({})",
            settings.day_end_hour, settings.day_start_hour
        )));
    }
    if !ALLOWED_SLOT_MINUTES.contains(&settings.slot_minutes) {
        return Err(EngineError::InvalidSettings(format!(
            "slot_minutes must be one of {:?}, got {}",
            ALLOWED_SLOT_MINUTES, settings.slot_minutes
        )));
    }
    if settings.day_count == 0 || settings.day_count > limits.max_day_count {
        return Err(EngineError::InvalidSettings(format!(
            "day_count must be between 1 and {}, got {}",
            limits.max_day_count, settings.day_count
        )));
    }
    let total = settings.total_slots();
    if total > limits.max_total_slots {
        return Err(EngineError::InvalidSettings(format!(
            "grid has {} slots, limit is {}",
            total, limits.max_total_slots
        )));
    }
    parse_timezone(&settings.timezone)?;
    Ok(())
}

/// Keep only in-range slot indexes, de-duplicated and sorted.
pub fn normalize_selection(
    indexes: impl IntoIterator<Item = i64>,
    slot_count: usize,
) -> BTreeSet<SlotIndex> {
    indexes
        .into_iter()
        .filter(|&i| i >= 0 && (i as u64) < slot_count as u64)
        .map(|i| i as SlotIndex)
        .collect()
}

/// Validate a voter's full set of choices for a poll.
///
/// Returns the choices sorted by option id.
pub fn validate_poll_ballot(
    options: &[PollOption],
    chosen: &[OptionId],
    settings: &PollSettings,
) -> Result<Vec<OptionId>> {
    if chosen.is_empty() {
        return Err(EngineError::InvalidBallot(
            "at least one option must be chosen".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(chosen.len());
    for id in chosen {
        if !seen.insert(*id) {
            return Err(EngineError::InvalidBallot(format!(
                "option {} chosen more than once",
                id
            )));
        }
        match options.iter().find(|o| o.id == *id) {
            None => {
                return Err(EngineError::InvalidBallot(format!("unknown option {}", id)));
            }
            Some(option) if option.is_archived => {
                return Err(EngineError::InvalidBallot(format!(
                    "option {} is archived",
                    id
                )));
            }
            Some(_) => {}
        }
    }

    if !settings.multi_select && chosen.len() > 1 {
        return Err(EngineError::InvalidBallot(
            "poll accepts a single choice".to_string(),
        ));
    }
    if let Some(max) = settings.max_selections {
        if settings.multi_select && chosen.len() > max as usize {
            return Err(EngineError::InvalidBallot(format!(
                "poll accepts at most {} choices, got {}",
                max,
                chosen.len()
            )));
        }
    }

    let mut ballot = chosen.to_vec();
    ballot.sort();
    Ok(ballot)
}

/// Clamp a pulse value to the scale and round it to the nearest step.
pub fn round_to_step(value: f64, scale: &PulseScale) -> Result<f64> {
    if !value.is_finite() {
        return Err(EngineError::InvalidContribution(format!(
            "pulse value must be finite, got {}",
            value
        )));
    }

    let clamped = value.clamp(scale.min, scale.max);
    if scale.step <= 0.0 {
        return Ok(clamped);
    }
    let steps = ((clamped - scale.min) / scale.step).round();
    Ok((scale.min + steps * scale.step).min(scale.max))
}

/// Row change needed to apply a vote click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "voteType", rename_all = "snake_case")]
pub enum VoteChange {
    Insert(VoteType),
    Remove,
    Replace(VoteType),
}

impl VoteChange {
    /// Vote held after the change.
    pub fn resulting_vote(&self) -> Option<VoteType> {
        match self {
            VoteChange::Insert(v) | VoteChange::Replace(v) => Some(*v),
            VoteChange::Remove => None,
        }
    }
}

/// Tri-state toggle: clicking the held direction clears it, clicking the
/// other direction switches to it.
pub fn toggle_vote(existing: Option<VoteType>, requested: VoteType) -> VoteChange {
    match existing {
        None => VoteChange::Insert(requested),
        Some(current) if current == requested => VoteChange::Remove,
        Some(_) => VoteChange::Replace(requested),
    }
}

/// Longest accepted board item text, in characters.
pub const MAX_ITEM_TEXT_CHARS: usize = 500;

/// Longest accepted display name, in characters.
pub const MAX_NAME_CHARS: usize = 80;

/// Trim a board item text and check its length.
pub fn normalize_item_text(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(EngineError::InvalidContribution(
            "item text must not be empty".to_string(),
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_ITEM_TEXT_CHARS {
        return Err(EngineError::InvalidContribution(format!(
            "item text has {} characters, limit is {}",
            chars, MAX_ITEM_TEXT_CHARS
        )));
    }
    Ok(text.to_string())
}

/// Trim a display name; blank names become anonymous.
pub fn normalize_name(name: Option<&str>) -> Result<Option<String>> {
    match name.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) if name.chars().count() > MAX_NAME_CHARS => Err(
            EngineError::InvalidContribution(format!(
                "name is longer than {} characters",
                MAX_NAME_CHARS
            )),
        ),
        Some(name) => Ok(Some(name.to_string())),
    }
}

/// Check a poll's option list and selection settings at creation.
pub fn validate_poll_options(options: &[PollOption], settings: &PollSettings) -> Result<()> {
    if options.is_empty() {
        return Err(EngineError::InvalidSettings(
            "poll needs at least one option".to_string(),
        ));
    }
    let mut ids = HashSet::with_capacity(options.len());
    for option in options {
        if !ids.insert(option.id) {
            return Err(EngineError::InvalidSettings(format!(
                "duplicate option id {}",
                option.id
            )));
        }
        if option.text.trim().is_empty() {
            return Err(EngineError::InvalidSettings(format!(
                "option {} has no text",
                option.id
            )));
        }
    }
    if settings.max_selections == Some(0) {
        return Err(EngineError::InvalidSettings(
            "max_selections must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Check a pulse scale is a finite, non-empty range with a positive step.
pub fn validate_pulse_scale(scale: &PulseScale) -> Result<()> {
    let finite = scale.min.is_finite() && scale.max.is_finite() && scale.step.is_finite();
    if !finite || scale.max <= scale.min || scale.step <= 0.0 {
        return Err(EngineError::InvalidSettings(format!(
            "pulse scale must satisfy min < max and step > 0, got [{}, {}] step {}",
            scale.min, scale.max, scale.step
        )));
    }
    Ok(())
}

/// Check an item board's columns have distinct ids.
pub fn validate_board_columns(settings: &ItemBoardSettings) -> Result<()> {
    let mut seen = HashSet::with_capacity(settings.columns.len());
    match settings.columns.iter().find(|c| !seen.insert(c.id)) {
        Some(column) => Err(EngineError::InvalidSettings(format!(
            "duplicate column id {}",
            column.id
        ))),
        None => Ok(()),
    }
}
