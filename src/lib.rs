//! tilestep: fixed-step body physics on a square tile grid
//!
//! Bodies track a grid cell plus a fractional offset inside it, integrate
//! per-tick velocity with friction, and clamp against solid orthogonal
//! neighbours reported by a caller-supplied [`TileQuery`]. Step policies such
//! as [`SimpleBody`] compose the primitives of [`PhysicsBody`] into one tick.

pub mod types;
pub mod api;
pub mod body;
pub mod policy;
pub mod tiles;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::body::PhysicsBody;
pub use crate::policy::{FloatingBody, SimpleBody};
pub use crate::tiles::{OutOfBounds, TileGrid};
