//! Board item vote tally and ranking.
//!
//! Each (item, participant) pair holds at most one vote row; a removed vote is
//! simply absent. Ranking produces a total order:
//!
//! - voting enabled: net score descending, then newest first
//! - voting disabled: newest first
//!
//! Items submitted at the same instant fall back to ascending id.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::api::ItemId;
use crate::models::{BoardColumn, BoardItem, BoardVote, ItemBoardSettings, ViewerContext, VoteType};
use crate::routes::board::{ItemBoardView, RankedColumn, RankedItem};

#[derive(Debug, Default, Clone, Copy)]
struct VoteCounts {
    up: u32,
    down: u32,
}

/// Tally votes per item and order items for display.
pub fn rank(
    items: &[BoardItem],
    votes: &[BoardVote],
    voting_enabled: bool,
    viewer: &ViewerContext,
) -> Vec<RankedItem> {
    let mut counts: HashMap<ItemId, VoteCounts> = HashMap::with_capacity(items.len());
    let mut own_votes: HashMap<ItemId, VoteType> = HashMap::new();

    for vote in votes {
        let entry = counts.entry(vote.item_id).or_default();
        match vote.vote_type {
            VoteType::Up => entry.up += 1,
            VoteType::Down => entry.down += 1,
        }
        if viewer.owns(&vote.participant_token) {
            own_votes.insert(vote.item_id, vote.vote_type);
        }
    }

    let mut ranked: Vec<RankedItem> = items
        .iter()
        .map(|item| {
            let tally = counts.get(&item.id).copied().unwrap_or_default();
            RankedItem {
                id: item.id,
                column_id: item.column_id,
                text: item.text.clone(),
                created_at: item.created_at,
                upvote_count: tally.up,
                downvote_count: tally.down,
                net_score: i64::from(tally.up) - i64::from(tally.down),
                user_vote: own_votes.get(&item.id).copied(),
                user_can_edit: viewer.is_editor || viewer.owns(&item.created_by_token),
            }
        })
        .collect();

    ranked.sort_by(|a, b| compare_ranked(a, b, voting_enabled));
    ranked
}

/// Display order of two ranked items.
pub fn compare_ranked(a: &RankedItem, b: &RankedItem, voting_enabled: bool) -> Ordering {
    let by_score = if voting_enabled {
        b.net_score.cmp(&a.net_score)
    } else {
        Ordering::Equal
    };

    by_score
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Split ranked items into board columns, keeping rank order within each.
///
/// Columns appear in their configured order, empty ones included. Items with
/// no column, or a column that no longer exists, form a trailing unassigned
/// group when there are any.
pub fn group_by_column(ranked: &[RankedItem], columns: &[BoardColumn]) -> Vec<RankedColumn> {
    let mut ordered: Vec<&BoardColumn> = columns.iter().collect();
    ordered.sort_by_key(|c| (c.order, c.id));

    let mut groups: Vec<RankedColumn> = ordered
        .iter()
        .map(|column| RankedColumn {
            column: Some((*column).clone()),
            items: ranked
                .iter()
                .filter(|item| item.column_id == Some(column.id))
                .cloned()
                .collect(),
        })
        .collect();

    let unassigned: Vec<RankedItem> = ranked
        .iter()
        .filter(|item| match item.column_id {
            Some(id) => !ordered.iter().any(|c| c.id == id),
            None => true,
        })
        .cloned()
        .collect();

    if !unassigned.is_empty() {
        groups.push(RankedColumn {
            column: None,
            items: unassigned,
        });
    }

    groups
}

/// Complete item board view for `viewer`.
pub fn item_board_view(
    items: &[BoardItem],
    votes: &[BoardVote],
    settings: &ItemBoardSettings,
    viewer: &ViewerContext,
) -> ItemBoardView {
    let ranked = rank(items, votes, settings.voting_enabled, viewer);
    let columns = group_by_column(&ranked, &settings.columns);

    ItemBoardView {
        voting_enabled: settings.voting_enabled,
        items: ranked,
        columns,
    }
}
