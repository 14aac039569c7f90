use serde::{Deserialize, Serialize};

use super::availability::AvailabilityView;
use super::board::ItemBoardView;
use super::poll::PollView;
use super::pulse::PulseSummary;
use crate::models::BoardKind;

/// Aggregated public view of a board, tagged by tool type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum BoardView {
    Availability(AvailabilityView),
    Poll(PollView),
    Board(ItemBoardView),
    Pulse(PulseSummary),
}

impl BoardView {
    pub fn kind(&self) -> BoardKind {
        match self {
            BoardView::Availability(_) => BoardKind::Availability,
            BoardView::Poll(_) => BoardKind::Poll,
            BoardView::Board(_) => BoardKind::Board,
            BoardView::Pulse(_) => BoardKind::Pulse,
        }
    }
}
