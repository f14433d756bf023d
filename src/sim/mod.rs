//! Simulation module
//!
//! All table logic lives here. This module is pure and single-threaded:
//! - `tick` is the only mutator of a `SimState`
//! - Motion and collisions use the table plane (x, z) only
//! - No rendering, windowing or platform dependencies

pub mod ball;
pub mod collision;
pub mod state;
pub mod tick;
pub mod wall;

pub use ball::{Ball, BallRole, Drag, Motion};
pub use collision::{
    Contact, Correction, correct, correct_wall, intersects, reflect, resolve, resolve_wall,
    wall_intersects,
};
pub use state::{BallView, RoundPhase, SimEvent, SimState};
pub use tick::{FrameInput, tick};
pub use wall::{Axis, EdgeRule, Response, Wall, WallEdge};
