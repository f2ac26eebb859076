//! Small helpers shared across layers.

pub mod join_code;
