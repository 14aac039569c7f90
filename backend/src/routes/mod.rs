//! Response types, one module per board tool.
//!
//! These shapes are serialized verbatim by the presentation collaborator;
//! field names are part of the public contract.

pub mod availability;
pub mod board;
pub mod poll;
pub mod pulse;
pub mod view;
