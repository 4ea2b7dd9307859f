//! Shared value types: node identifiers and spatial transforms.

mod types;

pub use types::{NodeId, Transform};
