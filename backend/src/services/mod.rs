//! Aggregation services.
//!
//! Pure functions from an immutable snapshot (settings plus contribution or
//! vote rows) to a view. Nothing in this module performs I/O or keeps state
//! between calls.

pub mod aggregate;
pub mod heatmap;
pub mod poll_tally;
pub mod pulse;
pub mod ranking;
pub mod windows;

pub use aggregate::{aggregate, Aggregate, BoardSnapshot};
pub use heatmap::{availability_view, participants_at};
pub use poll_tally::{poll_view, tally};
pub use pulse::summarize;
pub use ranking::{group_by_column, item_board_view, rank};
pub use windows::{best_windows, describe_window, DEFAULT_TOP_K};
