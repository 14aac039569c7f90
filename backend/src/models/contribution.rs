//! Raw contribution and vote records as handed over by the storage collaborator.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::grid::SlotIndex;
use crate::api::{ColumnId, ContributionId, ItemId, OptionId};

/// One participant's availability selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityContribution {
    pub id: ContributionId,
    #[serde(default)]
    pub name: Option<String>,
    pub selected_slot_indexes: BTreeSet<SlotIndex>,
}

impl AvailabilityContribution {
    pub fn new(
        id: i64,
        name: Option<&str>,
        slots: impl IntoIterator<Item = SlotIndex>,
    ) -> Self {
        Self {
            id: ContributionId(id),
            name: name.map(str::to_string),
            selected_slot_indexes: slots.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: OptionId,
    pub text: String,
    pub order: i32,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// One (voter, option) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollVote {
    pub option_id: OptionId,
    pub voter_key_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardItem {
    pub id: ItemId,
    #[serde(default)]
    pub column_id: Option<ColumnId>,
    pub text: String,
    pub created_by_token: String,
    /// Submission time, the recency tie-break for ranking
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    Up,
    Down,
}

/// One (item, participant) vote row; at most one per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardVote {
    pub item_id: ItemId,
    pub participant_token: String,
    pub vote_type: VoteType,
}

/// A scalar readiness/pulse submission, already rounded to the scale step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseContribution {
    pub id: ContributionId,
    #[serde(default)]
    pub name: Option<String>,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_contribution_dedups() {
        let c = AvailabilityContribution::new(1, Some("Ada"), [3, 1, 3, 2]);
        assert_eq!(
            c.selected_slot_indexes.iter().copied().collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_contribution_wire_shape() {
        let c = AvailabilityContribution::new(7, None, [0, 1]);
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["selectedSlotIndexes"], serde_json::json!([0, 1]));
    }

    #[test]
    fn test_vote_type_serde() {
        let vote: BoardVote = serde_json::from_str(
            r#"{"itemId": 3, "participantToken": "p1", "voteType": "down"}"#,
        )
        .unwrap();
        assert_eq!(vote.vote_type, VoteType::Down);
        assert_eq!(vote.item_id, ItemId(3));
    }
}
