//! Poll tally.
//!
//! Archived options keep their historical rows and counts; whether an option
//! is still votable is a submission-time concern. The tally never looks at
//! how many rows one voter contributed, so single- and multi-select polls
//! fold the same way.

use std::collections::{HashMap, HashSet};

use crate::api::OptionId;
use crate::models::{PollOption, PollSettings, PollVote, ViewerContext};
use crate::routes::poll::{OptionTally, PollTallyResult, PollView};

/// Fold vote rows into per-option counts and percentages.
///
/// `total_votes` counts every row that references a known option; rows for
/// unknown options are dropped. Percentages are rounded independently and
/// need not sum to 100.
pub fn tally(options: &[PollOption], votes: &[PollVote]) -> PollTallyResult {
    let known: HashSet<OptionId> = options.iter().map(|o| o.id).collect();
    let mut counts: HashMap<OptionId, u32> = HashMap::with_capacity(options.len());
    let mut voters: HashSet<&str> = HashSet::new();
    let mut total_votes = 0u32;
    let mut orphaned = 0usize;

    for vote in votes {
        if !known.contains(&vote.option_id) {
            orphaned += 1;
            continue;
        }
        *counts.entry(vote.option_id).or_insert(0) += 1;
        voters.insert(vote.voter_key_hash.as_str());
        total_votes += 1;
    }

    if orphaned > 0 {
        log::debug!("Dropped {} poll votes for unknown options", orphaned);
    }

    let per_option = display_order(options)
        .into_iter()
        .map(|option| {
            let vote_count = counts.get(&option.id).copied().unwrap_or(0);
            OptionTally {
                option_id: option.id,
                vote_count,
                percentage: percentage(vote_count, total_votes),
            }
        })
        .collect();

    PollTallyResult {
        per_option,
        total_votes,
        voter_count: voters.len() as u32,
    }
}

/// `round(100 * count / total)`, or 0 when nothing was cast.
pub fn percentage(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * f64::from(count) / f64::from(total)).round() as u32
}

/// Poll as shown to `viewer`; results are computed either way and withheld
/// when the visibility rule says so.
pub fn poll_view(
    options: &[PollOption],
    votes: &[PollVote],
    settings: &PollSettings,
    viewer: &ViewerContext,
) -> PollView {
    let results = tally(options, votes);
    let results_visible = settings.results_visibility.reveals(viewer);

    PollView {
        options: display_order(options).into_iter().cloned().collect(),
        results_visible,
        results: results_visible.then_some(results),
    }
}

fn display_order(options: &[PollOption]) -> Vec<&PollOption> {
    let mut ordered: Vec<&PollOption> = options.iter().collect();
    ordered.sort_by_key(|o| (o.order, o.id));
    ordered
}
