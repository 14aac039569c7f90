//! In-memory local repository implementation.
//!
//! Boards and their contributions live in a `HashMap` behind a single
//! `RwLock`. Snapshots are cloned out under the read lock, so aggregation
//! never observes a half-applied write.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::api::{BoardId, ColumnId, ContributionId, ItemId, OptionId};
use crate::config::{EngineConfig, LimitsSettings};
use crate::db::models::{BoardConfig, BoardRecord, NewBoard};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, SnapshotRepository};
use crate::error::EngineError;
use crate::limits::{FixedWindowRateLimiter, RateLimiter};
use crate::models::grid::slot_count;
use crate::models::{
    AvailabilityContribution, BoardItem, BoardKind, BoardVote, PollVote, PulseContribution,
    ViewerContext, VoteType,
};
use crate::services::aggregate::{
    AvailabilitySnapshot, BoardSnapshot, ItemBoardSnapshot, PollSnapshot, PulseSnapshot,
};
use crate::validation::{self, toggle_vote, VoteChange};

/// Source of the current instant.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// In-memory local repository.
///
/// Cloning shares the underlying storage.
///
/// # Example
/// ```
/// use huddle_engine::db::models::{BoardConfig, NewBoard};
/// use huddle_engine::db::repositories::LocalRepository;
/// use huddle_engine::db::repository::SnapshotRepository;
/// use huddle_engine::models::PulseScale;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// let board = repo
///     .create_board(NewBoard::new(
///         "Sprint confidence",
///         BoardConfig::Pulse { scale: PulseScale::default() },
///     ))
///     .await
///     .unwrap();
/// let stored = repo.submit_pulse(board.id, "token-1", Some("Ada"), 4.2).await.unwrap();
/// assert_eq!(stored.value, 4.0);
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    limits: LimitsSettings,
    rate_limiter: Arc<dyn RateLimiter>,
    clock: Clock,
}

#[derive(Debug)]
struct IdCounters {
    next_board_id: i64,
    next_contribution_id: i64,
    next_item_id: i64,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            next_board_id: 1,
            next_contribution_id: 1,
            next_item_id: 1,
        }
    }
}

impl IdCounters {
    fn board(&mut self) -> BoardId {
        let id = BoardId(self.next_board_id);
        self.next_board_id += 1;
        id
    }

    fn contribution(&mut self) -> ContributionId {
        let id = ContributionId(self.next_contribution_id);
        self.next_contribution_id += 1;
        id
    }

    fn item(&mut self) -> ItemId {
        let id = ItemId(self.next_item_id);
        self.next_item_id += 1;
        id
    }
}

/// A stored submission tagged with the participant that owns it.
#[derive(Debug, Clone)]
struct Owned<T> {
    participant_token: String,
    value: T,
}

#[derive(Debug)]
struct BoardState {
    record: BoardRecord,
    availability: Vec<Owned<AvailabilityContribution>>,
    poll_votes: Vec<PollVote>,
    items: Vec<BoardItem>,
    item_votes: Vec<BoardVote>,
    pulses: Vec<Owned<PulseContribution>>,
}

impl BoardState {
    fn new(record: BoardRecord) -> Self {
        Self {
            record,
            availability: Vec::new(),
            poll_votes: Vec::new(),
            items: Vec::new(),
            item_votes: Vec::new(),
            pulses: Vec::new(),
        }
    }

    fn expect_kind(&self, expected: BoardKind, operation: &str) -> RepositoryResult<()> {
        let found = self.record.kind();
        if found != expected {
            return Err(RepositoryError::from(EngineError::KindMismatch { expected, found })
                .with_operation(operation)
                .for_board(self.record.id));
        }
        Ok(())
    }

    fn expect_open(&self, operation: &str) -> RepositoryResult<()> {
        if self.record.is_closed {
            return Err(RepositoryError::validation_with_context(
                "board is closed",
                ErrorContext::new(operation)
                    .with_entity("board")
                    .with_entity_id(self.record.id),
            ));
        }
        Ok(())
    }

    /// Snapshot with an anonymous viewer carrying the board's closed flag.
    fn snapshot(&self) -> BoardSnapshot {
        let viewer = ViewerContext {
            is_closed: self.record.is_closed,
            ..Default::default()
        };
        match &self.record.config {
            BoardConfig::Availability { grid } => BoardSnapshot::Availability(AvailabilitySnapshot {
                settings: grid.clone(),
                contributions: self.availability.iter().map(|c| c.value.clone()).collect(),
            }),
            BoardConfig::Poll { settings, options } => BoardSnapshot::Poll(PollSnapshot {
                settings: settings.clone(),
                options: options.clone(),
                votes: self.poll_votes.clone(),
                viewer,
            }),
            BoardConfig::Board { settings } => BoardSnapshot::Board(ItemBoardSnapshot {
                settings: settings.clone(),
                items: self.items.clone(),
                votes: self.item_votes.clone(),
                viewer,
            }),
            BoardConfig::Pulse { scale } => BoardSnapshot::Pulse(PulseSnapshot {
                scale: *scale,
                contributions: self.pulses.iter().map(|c| c.value.clone()).collect(),
            }),
        }
    }
}

#[derive(Debug)]
struct LocalData {
    boards: HashMap<BoardId, BoardState>,
    ids: IdCounters,
    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            boards: HashMap::new(),
            ids: IdCounters::default(),
            is_healthy: true,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository with default limits.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create a repository enforcing the limits of `config`.
    pub fn with_config(config: &EngineConfig) -> Self {
        let limiter = FixedWindowRateLimiter::per_minute(config.limits.submissions_per_minute);
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
            limits: config.limits.clone(),
            rate_limiter: Arc::new(limiter),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the rate limiter.
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    /// Replace the clock used for timestamps and rate limiting.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of boards stored.
    pub fn board_count(&self) -> usize {
        self.data.read().boards.len()
    }

    /// Remove all boards, keeping the health flag.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Repository is not healthy"));
        }
        Ok(())
    }

    fn check_rate(
        &self,
        board_id: BoardId,
        participant_token: &str,
        operation: &str,
    ) -> RepositoryResult<()> {
        let key = format!("{}:{}", board_id, participant_token);
        self.rate_limiter
            .check(&key, (self.clock)())
            .into_result()
            .map_err(|e| {
                RepositoryError::from(e)
                    .with_operation(operation)
                    .for_board(board_id)
            })
    }

    /// Write to an open board of `kind` under the write lock.
    ///
    /// `prepare` validates the payload without mutating anything; only a
    /// valid submission reaches the rate limiter and then `apply`. Rejected
    /// submissions do not consume the participant's quota.
    fn write_board<P, T>(
        &self,
        board_id: BoardId,
        kind: BoardKind,
        participant_token: &str,
        operation: &str,
        prepare: impl FnOnce(&BoardState) -> RepositoryResult<P>,
        apply: impl FnOnce(&mut BoardState, &mut IdCounters, P) -> T,
    ) -> RepositoryResult<T> {
        self.check_health()?;
        let mut guard = self.data.write();
        let LocalData { boards, ids, .. } = &mut *guard;

        let board = boards
            .get_mut(&board_id)
            .ok_or_else(|| board_not_found(board_id, operation))?;
        board.expect_kind(kind, operation)?;
        board.expect_open(operation)?;

        let prepared =
            prepare(board).map_err(|e| e.with_operation(operation).for_board(board_id))?;
        self.check_rate(board_id, participant_token, operation)?;

        Ok(apply(board, ids, prepared))
    }
}

fn board_not_found(board_id: BoardId, operation: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("Board {} not found", board_id),
        ErrorContext::new(operation)
            .with_entity("board")
            .with_entity_id(board_id),
    )
}

fn validate_config(config: &BoardConfig, limits: &LimitsSettings) -> Result<(), EngineError> {
    match config {
        BoardConfig::Availability { grid } => validation::validate_grid(grid, limits),
        BoardConfig::Poll { settings, options } => {
            validation::validate_poll_options(options, settings)
        }
        BoardConfig::Board { settings } => validation::validate_board_columns(settings),
        BoardConfig::Pulse { scale } => validation::validate_pulse_scale(scale),
    }
}

#[async_trait]
impl SnapshotRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_board(&self, board: NewBoard) -> RepositoryResult<BoardRecord> {
        self.check_health()?;

        let title = board.title.trim();
        if title.is_empty() {
            return Err(RepositoryError::validation_with_context(
                "board title must not be empty",
                ErrorContext::new("create_board").with_entity("board"),
            ));
        }
        validate_config(&board.config, &self.limits)
            .map_err(|e| RepositoryError::from(e).with_operation("create_board"))?;

        let mut data = self.data.write();
        let record = BoardRecord {
            id: data.ids.board(),
            title: title.to_string(),
            config: board.config,
            is_closed: false,
        };
        log::debug!("Created {} board {}", record.kind(), record.id);
        data.boards.insert(record.id, BoardState::new(record.clone()));
        Ok(record)
    }

    async fn get_board(&self, board_id: BoardId) -> RepositoryResult<BoardRecord> {
        self.check_health()?;
        let data = self.data.read();
        data.boards
            .get(&board_id)
            .map(|b| b.record.clone())
            .ok_or_else(|| board_not_found(board_id, "get_board"))
    }

    async fn close_board(&self, board_id: BoardId) -> RepositoryResult<BoardRecord> {
        self.check_health()?;
        let mut data = self.data.write();
        let board = data
            .boards
            .get_mut(&board_id)
            .ok_or_else(|| board_not_found(board_id, "close_board"))?;
        board.record.is_closed = true;
        Ok(board.record.clone())
    }

    async fn submit_availability(
        &self,
        board_id: BoardId,
        participant_token: &str,
        name: Option<&str>,
        slot_indexes: &[i64],
    ) -> RepositoryResult<AvailabilityContribution> {
        self.write_board(
            board_id,
            BoardKind::Availability,
            participant_token,
            "submit_availability",
            |board| {
                let total = match &board.record.config {
                    BoardConfig::Availability { grid } => slot_count(grid),
                    _ => 0,
                };
                let selected = validation::normalize_selection(slot_indexes.iter().copied(), total);
                if selected.len() < slot_indexes.len() {
                    log::debug!(
                        "Dropped {} out-of-range or repeated slot indexes",
                        slot_indexes.len() - selected.len()
                    );
                }
                let name = validation::normalize_name(name)?;
                Ok((selected, name))
            },
            |board, ids, (selected, name)| {
                let existing = board
                    .availability
                    .iter_mut()
                    .find(|c| c.participant_token == participant_token);
                match existing {
                    Some(stored) => {
                        stored.value.name = name;
                        stored.value.selected_slot_indexes = selected;
                        stored.value.clone()
                    }
                    None => {
                        let contribution = AvailabilityContribution {
                            id: ids.contribution(),
                            name,
                            selected_slot_indexes: selected,
                        };
                        board.availability.push(Owned {
                            participant_token: participant_token.to_string(),
                            value: contribution.clone(),
                        });
                        contribution
                    }
                }
            },
        )
    }

    async fn cast_poll_ballot(
        &self,
        board_id: BoardId,
        voter_key_hash: &str,
        option_ids: &[OptionId],
    ) -> RepositoryResult<Vec<PollVote>> {
        self.write_board(
            board_id,
            BoardKind::Poll,
            voter_key_hash,
            "cast_poll_ballot",
            |board| match &board.record.config {
                BoardConfig::Poll { settings, options } => {
                    validation::validate_poll_ballot(options, option_ids, settings)
                        .map_err(RepositoryError::from)
                }
                _ => Ok(Vec::new()),
            },
            |board, _, ballot| {
                board.poll_votes.retain(|v| v.voter_key_hash != voter_key_hash);
                let votes: Vec<PollVote> = ballot
                    .into_iter()
                    .map(|option_id| PollVote {
                        option_id,
                        voter_key_hash: voter_key_hash.to_string(),
                    })
                    .collect();
                board.poll_votes.extend(votes.iter().cloned());
                votes
            },
        )
    }

    async fn archive_poll_option(
        &self,
        board_id: BoardId,
        option_id: OptionId,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        let board = data
            .boards
            .get_mut(&board_id)
            .ok_or_else(|| board_not_found(board_id, "archive_poll_option"))?;
        board.expect_kind(BoardKind::Poll, "archive_poll_option")?;

        let option = match &mut board.record.config {
            BoardConfig::Poll { options, .. } => options.iter_mut().find(|o| o.id == option_id),
            _ => None,
        };
        match option {
            Some(option) => {
                option.is_archived = true;
                Ok(())
            }
            None => Err(RepositoryError::not_found_with_context(
                format!("Option {} not found", option_id),
                ErrorContext::new("archive_poll_option")
                    .with_entity("option")
                    .with_entity_id(option_id),
            )),
        }
    }

    async fn add_board_item(
        &self,
        board_id: BoardId,
        participant_token: &str,
        column_id: Option<ColumnId>,
        text: &str,
    ) -> RepositoryResult<BoardItem> {
        let created_at = (self.clock)();
        self.write_board(
            board_id,
            BoardKind::Board,
            participant_token,
            "add_board_item",
            |board| {
                let text = validation::normalize_item_text(text)?;
                if let (Some(column_id), BoardConfig::Board { settings }) =
                    (column_id, &board.record.config)
                {
                    if !settings.columns.iter().any(|c| c.id == column_id) {
                        return Err(EngineError::InvalidContribution(format!(
                            "unknown column {}",
                            column_id
                        ))
                        .into());
                    }
                }
                Ok(text)
            },
            |board, ids, text| {
                let item = BoardItem {
                    id: ids.item(),
                    column_id,
                    text,
                    created_by_token: participant_token.to_string(),
                    created_at,
                };
                board.items.push(item.clone());
                item
            },
        )
    }

    async fn toggle_board_vote(
        &self,
        board_id: BoardId,
        item_id: ItemId,
        participant_token: &str,
        vote_type: VoteType,
    ) -> RepositoryResult<VoteChange> {
        self.write_board(
            board_id,
            BoardKind::Board,
            participant_token,
            "toggle_board_vote",
            |board| {
                let voting_enabled = match &board.record.config {
                    BoardConfig::Board { settings } => settings.voting_enabled,
                    _ => false,
                };
                if !voting_enabled {
                    return Err(RepositoryError::validation(
                        "voting is disabled on this board",
                    ));
                }
                if !board.items.iter().any(|i| i.id == item_id) {
                    return Err(RepositoryError::not_found_with_context(
                        format!("Item {} not found", item_id),
                        ErrorContext::default()
                            .with_entity("item")
                            .with_entity_id(item_id),
                    ));
                }
                Ok(())
            },
            |board, _, ()| {
                let position = board
                    .item_votes
                    .iter()
                    .position(|v| v.item_id == item_id && v.participant_token == participant_token);
                let existing = position.map(|i| board.item_votes[i].vote_type);
                let change = toggle_vote(existing, vote_type);

                match (change, position) {
                    (VoteChange::Replace(vote_type), Some(i)) => {
                        board.item_votes[i].vote_type = vote_type
                    }
                    (VoteChange::Remove, Some(i)) => {
                        board.item_votes.swap_remove(i);
                    }
                    // Replace and Remove only follow an existing vote
                    (VoteChange::Insert(vote_type), _)
                    | (VoteChange::Replace(vote_type), None) => {
                        board.item_votes.push(BoardVote {
                            item_id,
                            participant_token: participant_token.to_string(),
                            vote_type,
                        })
                    }
                    (VoteChange::Remove, None) => {}
                }
                change
            },
        )
    }

    async fn submit_pulse(
        &self,
        board_id: BoardId,
        participant_token: &str,
        name: Option<&str>,
        value: f64,
    ) -> RepositoryResult<PulseContribution> {
        self.write_board(
            board_id,
            BoardKind::Pulse,
            participant_token,
            "submit_pulse",
            |board| {
                let value = match &board.record.config {
                    BoardConfig::Pulse { scale } => validation::round_to_step(value, scale)?,
                    _ => value,
                };
                let name = validation::normalize_name(name)?;
                Ok((value, name))
            },
            |board, ids, (value, name)| {
                let existing = board
                    .pulses
                    .iter_mut()
                    .find(|c| c.participant_token == participant_token);
                match existing {
                    Some(stored) => {
                        stored.value.name = name;
                        stored.value.value = value;
                        stored.value.clone()
                    }
                    None => {
                        let contribution = PulseContribution {
                            id: ids.contribution(),
                            name,
                            value,
                        };
                        board.pulses.push(Owned {
                            participant_token: participant_token.to_string(),
                            value: contribution.clone(),
                        });
                        contribution
                    }
                }
            },
        )
    }

    async fn load_snapshot(&self, board_id: BoardId) -> RepositoryResult<BoardSnapshot> {
        self.check_health()?;
        let data = self.data.read();
        data.boards
            .get(&board_id)
            .map(BoardState::snapshot)
            .ok_or_else(|| board_not_found(board_id, "load_snapshot"))
    }
}
