//! Scene graph: the nodes every renderer mode draws.
//!
//! # Invariants
//! - Renderers only ever read the scene; all mutations flow through `Scene`.
//! - Every mutation bumps the revision and appends a change record.

pub mod scene;

pub use scene::{NodeKind, Scene, SceneChange, SceneNode};
