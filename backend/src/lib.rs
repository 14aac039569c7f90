//! # Huddle Engine
//!
//! Contribution aggregation and ranking for small collaborative boards.
//!
//! Participants contribute to a board (availability selections, poll ballots,
//! idea/retrospective items with votes, or a readiness value) and the engine
//! folds those contributions into a deterministic view: a heatmap with the
//! best meeting windows, poll percentages, a ranked item list, or a pulse
//! summary.
//!
//! ## Architecture
//!
//! - [`api`]: Public types and id newtypes
//! - [`models`]: Settings and raw contribution records
//! - [`services`]: Pure aggregation (heatmap, windows, poll tally, ranking, pulse)
//! - [`routes`]: View types returned per board tool
//! - [`validation`]: Settings and submission rules applied before storage
//! - [`limits`]: Submission rate limiting
//! - [`db`]: Repository boundary, in-memory repository and service layer
//! - [`config`]: TOML configuration with environment overrides
//!
//! Every aggregation is a pure function of an immutable snapshot: the same
//! snapshot always yields the same view, and nothing is cached between calls.

// RepositoryError carries a rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod limits;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

pub use error::{EngineError, Result};
