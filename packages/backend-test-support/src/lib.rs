//! Backend test support utilities
//!
//! Shared helpers for the Hokm backend's unit and integration tests: unified
//! logging initialization, Problem Details assertions, and helpers for
//! picking apart recorded server frames.

pub mod frames;
pub mod problem_details;
pub mod test_logging;
