use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{ColumnId, ItemId};
use crate::models::{BoardColumn, VoteType};

// =========================================================
// Item board types
// =========================================================

/// Board item with its vote tally and viewer-relative flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedItem {
    pub id: ItemId,
    pub column_id: Option<ColumnId>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub upvote_count: u32,
    pub downvote_count: u32,
    pub net_score: i64,
    /// The viewer's own vote on this item
    pub user_vote: Option<VoteType>,
    pub user_can_edit: bool,
}

/// Items of one column in rank order; `column` is `None` for the
/// unassigned group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedColumn {
    pub column: Option<BoardColumn>,
    pub items: Vec<RankedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBoardView {
    pub voting_enabled: bool,
    pub items: Vec<RankedItem>,
    pub columns: Vec<RankedColumn>,
}
