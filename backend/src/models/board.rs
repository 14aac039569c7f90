//! Board-level settings and the viewer context supplied by the boundary.

use serde::{Deserialize, Serialize};

use crate::api::ColumnId;

/// Tool type of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardKind {
    Availability,
    Poll,
    Board,
    Pulse,
}

impl std::fmt::Display for BoardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BoardKind::Availability => "availability",
            BoardKind::Poll => "poll",
            BoardKind::Board => "board",
            BoardKind::Pulse => "pulse",
        };
        f.write_str(name)
    }
}

/// When poll results are revealed to participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultsVisibility {
    #[default]
    Immediately,
    AfterVote,
    AfterClose,
}

impl ResultsVisibility {
    /// Whether results should be shown to `viewer`.
    ///
    /// The flags are resolved by the authorization collaborator; editors
    /// always see results.
    pub fn reveals(&self, viewer: &ViewerContext) -> bool {
        if viewer.is_editor {
            return true;
        }
        match self {
            ResultsVisibility::Immediately => true,
            ResultsVisibility::AfterVote => viewer.has_voted || viewer.is_closed,
            ResultsVisibility::AfterClose => viewer.is_closed,
        }
    }
}

/// Poll configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSettings {
    #[serde(default)]
    pub multi_select: bool,
    /// Upper bound on choices per voter in multi-select mode; unbounded if absent
    #[serde(default)]
    pub max_selections: Option<u32>,
    #[serde(default)]
    pub results_visibility: ResultsVisibility,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            multi_select: false,
            max_selections: None,
            results_visibility: ResultsVisibility::Immediately,
        }
    }
}

/// Item board (retrospective / idea board) configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBoardSettings {
    #[serde(default = "default_voting_enabled")]
    pub voting_enabled: bool,
    #[serde(default)]
    pub columns: Vec<BoardColumn>,
}

fn default_voting_enabled() -> bool {
    true
}

impl Default for ItemBoardSettings {
    fn default() -> Self {
        Self {
            voting_enabled: true,
            columns: Vec::new(),
        }
    }
}

/// A column of an item board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub id: ColumnId,
    pub title: String,
    pub order: i32,
}

/// Numeric scale of a readiness/pulse board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseScale {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for PulseScale {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 5.0,
            step: 1.0,
        }
    }
}

/// Identity-dependent facts about the caller, resolved by the authorization
/// collaborator before aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerContext {
    /// Opaque participant token, if the caller has one for this board
    #[serde(default)]
    pub participant_token: Option<String>,
    #[serde(default)]
    pub is_editor: bool,
    #[serde(default)]
    pub has_voted: bool,
    #[serde(default)]
    pub is_closed: bool,
}

impl ViewerContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn participant(token: impl Into<String>) -> Self {
        Self {
            participant_token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn editor() -> Self {
        Self {
            is_editor: true,
            ..Default::default()
        }
    }

    /// Whether the caller is the holder of `token`.
    pub fn owns(&self, token: &str) -> bool {
        self.participant_token.as_deref() == Some(token)
    }
}
