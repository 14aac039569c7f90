use serde::{Deserialize, Serialize};

use crate::api::OptionId;
use crate::models::PollOption;

// =========================================================
// Poll types
// =========================================================

/// Count and share of one poll option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionTally {
    pub option_id: OptionId,
    pub vote_count: u32,
    /// Rounded share of `total_votes`, 0-100
    pub percentage: u32,
}

/// Tally over every option of a poll, archived ones included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollTallyResult {
    pub per_option: Vec<OptionTally>,
    /// Vote rows; the percentage base
    pub total_votes: u32,
    /// Distinct voters; the participation figure
    pub voter_count: u32,
}

impl PollTallyResult {
    pub fn option(&self, option_id: OptionId) -> Option<&OptionTally> {
        self.per_option.iter().find(|t| t.option_id == option_id)
    }
}

/// Poll as presented to one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollView {
    /// Options in display order
    pub options: Vec<PollOption>,
    pub results_visible: bool,
    /// Present only when `results_visible`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<PollTallyResult>,
}
