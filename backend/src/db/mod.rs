//! Board storage boundary.
//!
//! The aggregation engine is pure; this module is where the write-side rules
//! live and where snapshots for the engine come from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Caller (CLI, HTTP layer, tests)                        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - viewer resolution against the stored board           │
//! │  - snapshot -> view aggregation                         │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  SnapshotRepository trait (repository/)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────┐
//!     │        Local Repository          │
//!     │          (in-memory)             │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use huddle_engine::config::EngineConfig;
//! use huddle_engine::db::{repositories::LocalRepository, services};
//! use huddle_engine::api::{BoardId, ViewerContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let config = EngineConfig::load()?;
//!
//!     let view =
//!         services::get_board_view(&repo, BoardId(1), ViewerContext::anonymous(), &config)
//!             .await?;
//!     println!("{}", serde_json::to_string_pretty(&view)?);
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod models;
pub mod repositories;
pub mod repository;
pub mod services;

pub use models::{BoardConfig, BoardRecord, NewBoard};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, SnapshotRepository};
