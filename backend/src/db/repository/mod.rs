//! Repository trait for board storage.
//!
//! The aggregation engine never talks to storage; the repository hands it
//! immutable [`BoardSnapshot`]s and applies the write-side rules (validation,
//! replace-on-resubmit, vote toggling and rate limiting) before anything is
//! stored.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use super::models::{BoardRecord, NewBoard};
use crate::api::{BoardId, ColumnId, ItemId, OptionId};
use crate::models::{AvailabilityContribution, BoardItem, PollVote, PulseContribution, VoteType};
use crate::services::aggregate::BoardSnapshot;
use crate::validation::VoteChange;

/// Storage operations for boards and their contributions.
///
/// `participant_token` identifies a submitter within a board. Availability
/// and pulse submissions are replaced per token, poll ballots per voter key
/// hash, and board votes per (item, token) pair.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Check whether the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Validate and store a new board.
    async fn create_board(&self, board: NewBoard) -> RepositoryResult<BoardRecord>;

    async fn get_board(&self, board_id: BoardId) -> RepositoryResult<BoardRecord>;

    /// Close a board. Closed boards reject further submissions.
    async fn close_board(&self, board_id: BoardId) -> RepositoryResult<BoardRecord>;

    /// Store a participant's availability, replacing any earlier selection.
    ///
    /// Out-of-range indexes are dropped and duplicates collapsed.
    async fn submit_availability(
        &self,
        board_id: BoardId,
        participant_token: &str,
        name: Option<&str>,
        slot_indexes: &[i64],
    ) -> RepositoryResult<AvailabilityContribution>;

    /// Replace a voter's full ballot on a poll.
    async fn cast_poll_ballot(
        &self,
        board_id: BoardId,
        voter_key_hash: &str,
        option_ids: &[OptionId],
    ) -> RepositoryResult<Vec<PollVote>>;

    /// Hide an option from new ballots. Existing votes keep counting.
    async fn archive_poll_option(
        &self,
        board_id: BoardId,
        option_id: OptionId,
    ) -> RepositoryResult<()>;

    async fn add_board_item(
        &self,
        board_id: BoardId,
        participant_token: &str,
        column_id: Option<ColumnId>,
        text: &str,
    ) -> RepositoryResult<BoardItem>;

    /// Apply a vote click with tri-state toggle semantics.
    async fn toggle_board_vote(
        &self,
        board_id: BoardId,
        item_id: ItemId,
        participant_token: &str,
        vote_type: VoteType,
    ) -> RepositoryResult<VoteChange>;

    /// Store a pulse value, rounded to the board scale, replacing any
    /// earlier value from the same participant.
    async fn submit_pulse(
        &self,
        board_id: BoardId,
        participant_token: &str,
        name: Option<&str>,
        value: f64,
    ) -> RepositoryResult<PulseContribution>;

    /// Consistent snapshot of a board for aggregation, with an anonymous viewer
    /// whose `is_closed` reflects the board at the time of the read.
    async fn load_snapshot(&self, board_id: BoardId) -> RepositoryResult<BoardSnapshot>;
}
