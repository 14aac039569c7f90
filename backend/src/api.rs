//! Public API surface of the engine.
//!
//! This file consolidates identifier types and the response DTOs so that
//! collaborators can depend on a single module. All types derive
//! Serialize/Deserialize for JSON serialization.

pub use crate::models::{
    AvailabilityContribution, BoardColumn, BoardItem, BoardKind, BoardVote, ItemBoardSettings,
    PollOption, PollSettings, PollVote, PulseContribution, PulseScale, ResultsVisibility,
    SlotGrid, SlotGridSettings, SlotIndex, ViewerContext, VoteType,
};
pub use crate::routes::availability::{AvailabilityView, SlotParticipants, Window, WindowSpan};
pub use crate::routes::board::{ItemBoardView, RankedColumn, RankedItem};
pub use crate::routes::poll::{OptionTally, PollTallyResult, PollView};
pub use crate::routes::pulse::{DistributionBucket, PulseSummary};
pub use crate::routes::view::BoardView;
pub use crate::services::aggregate::BoardSnapshot;

use crate::define_id_type;

define_id_type!(i64, BoardId);
define_id_type!(i64, ContributionId);
define_id_type!(i64, OptionId);
define_id_type!(i64, ItemId);
define_id_type!(i64, ColumnId);
