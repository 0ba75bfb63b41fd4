//! CLI command implementations.

pub mod normalize;
pub mod replay;
