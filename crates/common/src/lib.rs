//! Shared helpers for the clinic site crates: logging bootstrap, startup
//! environment checks and a few response types used by every binary.

pub mod types;
pub mod utils;
pub mod env;
