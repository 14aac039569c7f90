//! Stored board records.

use serde::{Deserialize, Serialize};

use crate::api::BoardId;
use crate::models::{
    BoardKind, ItemBoardSettings, PollOption, PollSettings, PulseScale, SlotGridSettings,
};

/// Tool-specific configuration of a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardConfig {
    Availability {
        grid: SlotGridSettings,
    },
    Poll {
        #[serde(default)]
        settings: PollSettings,
        options: Vec<PollOption>,
    },
    Board {
        #[serde(default)]
        settings: ItemBoardSettings,
    },
    Pulse {
        #[serde(default)]
        scale: PulseScale,
    },
}

impl BoardConfig {
    pub fn kind(&self) -> BoardKind {
        match self {
            BoardConfig::Availability { .. } => BoardKind::Availability,
            BoardConfig::Poll { .. } => BoardKind::Poll,
            BoardConfig::Board { .. } => BoardKind::Board,
            BoardConfig::Pulse { .. } => BoardKind::Pulse,
        }
    }
}

/// A board as held by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub id: BoardId,
    pub title: String,
    pub config: BoardConfig,
    #[serde(default)]
    pub is_closed: bool,
}

impl BoardRecord {
    pub fn kind(&self) -> BoardKind {
        self.config.kind()
    }
}

/// Input for creating a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBoard {
    pub title: String,
    pub config: BoardConfig,
}

impl NewBoard {
    pub fn new(title: impl Into<String>, config: BoardConfig) -> Self {
        Self {
            title: title.into(),
            config,
        }
    }
}
