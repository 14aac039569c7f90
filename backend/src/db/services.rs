//! High-level service layer over any [`SnapshotRepository`].
//!
//! These functions combine a repository read with the pure engine. They are
//! the entry points an HTTP layer or the CLI should call.

use log::{debug, info};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, SnapshotRepository};
use crate::api::BoardId;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::grid::slot_count;
use crate::models::{BoardKind, SlotIndex, ViewerContext};
use crate::routes::availability::SlotParticipants;
use crate::routes::view::BoardView;
use crate::services::aggregate::{aggregate, Aggregate, BoardSnapshot};
use crate::services::heatmap::participants_at;

/// Check if the repository is healthy.
pub async fn health_check<R: SnapshotRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Aggregate the current state of a board for `viewer`.
///
/// The closed flag comes from the same snapshot read as the contributions;
/// the remaining viewer flags (`is_editor`, `has_voted`) come from the
/// caller's authorization step.
pub async fn get_board_view<R: SnapshotRepository + ?Sized>(
    repo: &R,
    board_id: BoardId,
    viewer: ViewerContext,
    config: &EngineConfig,
) -> RepositoryResult<BoardView> {
    let snapshot = repo.load_snapshot(board_id).await?.with_viewer(viewer);
    let view = aggregate(&snapshot, config);
    info!("Built {} view for board {}", view.kind(), board_id);
    Ok(view)
}

/// Who is free in one slot of an availability board.
pub async fn get_slot_participants<R: SnapshotRepository + ?Sized>(
    repo: &R,
    board_id: BoardId,
    slot_index: SlotIndex,
) -> RepositoryResult<SlotParticipants> {
    let context = || {
        ErrorContext::new("get_slot_participants")
            .with_entity("board")
            .with_entity_id(board_id)
    };

    match repo.load_snapshot(board_id).await? {
        BoardSnapshot::Availability(snapshot) => {
            let total = slot_count(&snapshot.settings);
            if slot_index as usize >= total {
                return Err(RepositoryError::validation_with_context(
                    format!("slot {} is outside a grid of {} slots", slot_index, total),
                    context(),
                ));
            }
            debug!("Listing participants of slot {} on board {}", slot_index, board_id);
            Ok(participants_at(slot_index, &snapshot.contributions))
        }
        other => Err(RepositoryError::from(EngineError::KindMismatch {
            expected: BoardKind::Availability,
            found: other.kind(),
        })
        .with_operation("get_slot_participants")
        .for_board(board_id)),
    }
}
