use serde::{Deserialize, Serialize};

use crate::models::SlotIndex;

// =========================================================
// Availability types
// =========================================================

/// A candidate contiguous meeting time within one day.
///
/// Slot indexes are flat grid indexes; `end_slot_index` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Window {
    pub day_index: u32,
    pub start_slot_index: SlotIndex,
    pub end_slot_index: SlotIndex,
    /// Participants free for the whole window (minimum over its slots)
    pub available_count: u32,
    pub window_length: u32,
}

/// Human-facing rendering data for a [`Window`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSpan {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// Who is free in a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotParticipants {
    pub slot_index: SlotIndex,
    pub names: Vec<String>,
    /// Contributors who left no name
    pub anonymous_count: u32,
}

/// Complete availability view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    pub heatmap: Vec<u32>,
    pub participant_count: usize,
    pub max_count: u32,
    pub best_windows: Vec<Window>,
}
