//! Unified aggregation contract across board tools.
//!
//! Every tool follows the same shape: an immutable snapshot of settings and
//! contributions goes in, a pure view comes out. [`BoardSnapshot`] tags the
//! snapshot by tool type and [`BoardView`] tags the result the same way, so a
//! new board type is one new variant plus one [`Aggregate`] impl.

use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, LimitsSettings};
use crate::error::Result;
use crate::models::{
    AvailabilityContribution, BoardItem, BoardKind, BoardVote, ItemBoardSettings, PollOption,
    PollSettings, PollVote, PulseContribution, PulseScale, SlotGridSettings, ViewerContext,
};
use crate::routes::availability::AvailabilityView;
use crate::routes::board::ItemBoardView;
use crate::routes::poll::PollView;
use crate::routes::pulse::PulseSummary;
use crate::routes::view::BoardView;
use crate::services::{heatmap, poll_tally, pulse, ranking};
use crate::validation;

/// Fold a snapshot into its public view.
///
/// Implementations are pure: equal snapshots and configs give equal output.
pub trait Aggregate {
    type Output;

    fn kind(&self) -> BoardKind;

    fn aggregate(&self, config: &EngineConfig) -> Self::Output;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    pub settings: SlotGridSettings,
    #[serde(default)]
    pub contributions: Vec<AvailabilityContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollSnapshot {
    #[serde(default)]
    pub settings: PollSettings,
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub votes: Vec<PollVote>,
    #[serde(default)]
    pub viewer: ViewerContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBoardSnapshot {
    #[serde(default)]
    pub settings: ItemBoardSettings,
    #[serde(default)]
    pub items: Vec<BoardItem>,
    #[serde(default)]
    pub votes: Vec<BoardVote>,
    #[serde(default)]
    pub viewer: ViewerContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseSnapshot {
    #[serde(default)]
    pub scale: PulseScale,
    #[serde(default)]
    pub contributions: Vec<PulseContribution>,
}

impl Aggregate for AvailabilitySnapshot {
    type Output = AvailabilityView;

    fn kind(&self) -> BoardKind {
        BoardKind::Availability
    }

    fn aggregate(&self, config: &EngineConfig) -> AvailabilityView {
        heatmap::availability_view(&self.settings, &self.contributions, &config.windows)
    }
}

impl Aggregate for PollSnapshot {
    type Output = PollView;

    fn kind(&self) -> BoardKind {
        BoardKind::Poll
    }

    fn aggregate(&self, _config: &EngineConfig) -> PollView {
        poll_tally::poll_view(&self.options, &self.votes, &self.settings, &self.viewer)
    }
}

impl Aggregate for ItemBoardSnapshot {
    type Output = ItemBoardView;

    fn kind(&self) -> BoardKind {
        BoardKind::Board
    }

    fn aggregate(&self, _config: &EngineConfig) -> ItemBoardView {
        ranking::item_board_view(&self.items, &self.votes, &self.settings, &self.viewer)
    }
}

impl Aggregate for PulseSnapshot {
    type Output = PulseSummary;

    fn kind(&self) -> BoardKind {
        BoardKind::Pulse
    }

    fn aggregate(&self, config: &EngineConfig) -> PulseSummary {
        pulse::summarize_contributions(&self.contributions, &self.scale, config.pulse.bucket_count)
    }
}

/// Snapshot of any board, tagged by tool type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardSnapshot {
    Availability(AvailabilitySnapshot),
    Poll(PollSnapshot),
    Board(ItemBoardSnapshot),
    Pulse(PulseSnapshot),
}

impl Aggregate for BoardSnapshot {
    type Output = BoardView;

    fn kind(&self) -> BoardKind {
        match self {
            BoardSnapshot::Availability(s) => s.kind(),
            BoardSnapshot::Poll(s) => s.kind(),
            BoardSnapshot::Board(s) => s.kind(),
            BoardSnapshot::Pulse(s) => s.kind(),
        }
    }

    fn aggregate(&self, config: &EngineConfig) -> BoardView {
        match self {
            BoardSnapshot::Availability(s) => BoardView::Availability(s.aggregate(config)),
            BoardSnapshot::Poll(s) => BoardView::Poll(s.aggregate(config)),
            BoardSnapshot::Board(s) => BoardView::Board(s.aggregate(config)),
            BoardSnapshot::Pulse(s) => BoardView::Pulse(s.aggregate(config)),
        }
    }
}

impl BoardSnapshot {
    /// Replace the viewer on snapshots whose output depends on identity.
    ///
    /// A snapshot taken from a closed board stays closed whatever the new
    /// viewer says.
    pub fn with_viewer(mut self, mut viewer: ViewerContext) -> Self {
        match &mut self {
            BoardSnapshot::Poll(PollSnapshot { viewer: current, .. })
            | BoardSnapshot::Board(ItemBoardSnapshot { viewer: current, .. }) => {
                viewer.is_closed |= current.is_closed;
                *current = viewer;
            }
            BoardSnapshot::Availability(_) | BoardSnapshot::Pulse(_) => {}
        }
        self
    }

    /// Apply the settings checks a stored board passed at creation.
    ///
    /// Snapshots read from outside the repository (files, stdin) must pass
    /// this before [`aggregate`]: the services assume well-formed settings.
    pub fn validate(&self, limits: &LimitsSettings) -> Result<()> {
        match self {
            BoardSnapshot::Availability(s) => validation::validate_grid(&s.settings, limits),
            BoardSnapshot::Poll(s) => validation::validate_poll_options(&s.options, &s.settings),
            BoardSnapshot::Board(s) => validation::validate_board_columns(&s.settings),
            BoardSnapshot::Pulse(s) => validation::validate_pulse_scale(&s.scale),
        }
    }
}

/// Aggregate any snapshot with `config`.
pub fn aggregate(snapshot: &BoardSnapshot, config: &EngineConfig) -> BoardView {
    let view = snapshot.aggregate(config);
    log::debug!("Aggregated {} board snapshot", snapshot.kind());
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OptionId;

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "kind": "availability",
            "settings": {
                "timezone": "UTC",
                "startDate": "2025-06-02",
                "dayCount": 1,
                "dayStartHour": 9,
                "dayEndHour": 11,
                "slotMinutes": 60
            },
            "contributions": [
                {"id": 1, "name": "P1", "selectedSlotIndexes": [0, 1]},
                {"id": 2, "name": "P2", "selectedSlotIndexes": [0]}
            ]
        }"#;

        let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.kind(), BoardKind::Availability);

        match aggregate(&snapshot, &EngineConfig::default()) {
            BoardView::Availability(view) => assert_eq!(view.heatmap, vec![2, 1]),
            other => panic!("unexpected view {:?}", other.kind()),
        }
    }

    #[test]
    fn test_view_serializes_with_kind_tag() {
        let snapshot = BoardSnapshot::Pulse(PulseSnapshot {
            scale: PulseScale::default(),
            contributions: vec![],
        });
        let json = serde_json::to_value(aggregate(&snapshot, &EngineConfig::default())).unwrap();
        assert_eq!(json["kind"], "pulse");
        assert_eq!(json["view"]["count"], 0);
    }

    #[test]
    fn test_with_viewer() {
        let snapshot = BoardSnapshot::Poll(PollSnapshot {
            settings: PollSettings::default(),
            options: vec![PollOption {
                id: OptionId(1),
                text: "Yes".to_string(),
                order: 0,
                is_archived: false,
                created_by: None,
            }],
            votes: vec![],
            viewer: ViewerContext::anonymous(),
        })
        .with_viewer(ViewerContext::editor());

        match snapshot {
            BoardSnapshot::Poll(poll) => assert!(poll.viewer.is_editor),
            _ => panic!("expected poll snapshot"),
        }
    }

    #[test]
    fn test_with_viewer_keeps_closed_flag() {
        let closed = ViewerContext {
            is_closed: true,
            ..Default::default()
        };
        let snapshot = BoardSnapshot::Board(ItemBoardSnapshot {
            settings: ItemBoardSettings::default(),
            items: vec![],
            votes: vec![],
            viewer: closed,
        })
        .with_viewer(ViewerContext::participant("p1"));

        match snapshot {
            BoardSnapshot::Board(board) => {
                assert!(board.viewer.is_closed);
                assert!(board.viewer.owns("p1"));
            }
            _ => panic!("expected board snapshot"),
        }
    }

    #[test]
    fn test_validate_rejects_inverted_hours() {
        let json = r#"{
            "kind": "availability",
            "settings": {
                "timezone": "UTC",
                "startDate": "2025-06-02",
                "dayCount": 1,
                "dayStartHour": 17,
                "dayEndHour": 9,
                "slotMinutes": 60
            }
        }"#;
        let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
        let limits = LimitsSettings::default();

        assert!(matches!(
            snapshot.validate(&limits),
            Err(crate::error::EngineError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_grid() {
        let json = r#"{
            "kind": "availability",
            "settings": {
                "timezone": "UTC",
                "startDate": "2025-06-02",
                "dayCount": 4000000000,
                "dayStartHour": 0,
                "dayEndHour": 24,
                "slotMinutes": 15
            }
        }"#;
        let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.validate(&LimitsSettings::default()).is_err());
    }

    #[test]
    fn test_validate_per_kind() {
        let limits = LimitsSettings::default();
        let pulse = BoardSnapshot::Pulse(PulseSnapshot {
            scale: PulseScale {
                min: 5.0,
                max: 1.0,
                step: 1.0,
            },
            contributions: vec![],
        });
        assert!(pulse.validate(&limits).is_err());

        let poll = BoardSnapshot::Poll(PollSnapshot {
            settings: PollSettings::default(),
            options: vec![],
            votes: vec![],
            viewer: ViewerContext::anonymous(),
        });
        assert!(poll.validate(&limits).is_err());

        let board = BoardSnapshot::Board(ItemBoardSnapshot {
            settings: ItemBoardSettings::default(),
            items: vec![],
            votes: vec![],
            viewer: ViewerContext::anonymous(),
        });
        assert!(board.validate(&limits).is_ok());
    }
}
