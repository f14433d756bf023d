//! Virtual Billiard - a single-cue table simulation
//!
//! Core modules:
//! - `sim`: Simulation core (balls, walls, collisions, frame tick)
//! - `settings`: Table geometry and tuning, loadable from JSON

pub mod settings;
pub mod sim;

pub use settings::{SettingsError, TableSettings};

use glam::{Vec2, Vec3};

/// Table configuration constants
pub mod consts {
    use glam::{Vec2, Vec3};

    /// Ball radius shared by every ball on the table
    pub const BALL_RADIUS: f32 = 0.21;
    /// Amplifies raw velocity units into world units per second
    pub const TIME_SCALE: f32 = 3.3;
    /// Below this per-axis speed a ball is considered stopped
    pub const STOP_SPEED: f32 = 0.01;
    /// Per-step velocity decay when rolling drag is enabled
    pub const DECREASE_RATE: f32 = 0.9982;

    /// Table dimensions (x = width, z = depth)
    pub const TABLE_WIDTH: f32 = 6.6;
    pub const TABLE_DEPTH: f32 = 9.0;

    /// Wall defaults
    pub const WALL_THICKNESS: f32 = 0.12;
    pub const WALL_HEIGHT: f32 = 0.3;
    pub const WALL_Y: f32 = 0.12;
    /// Side walls sit just outside the felt
    pub const SIDE_WALL_X: f32 = 3.24;
    pub const END_WALL_Z: f32 = 4.5;

    /// Default aim line (marker z) and marker/cue height
    pub const AIM_Z: f32 = -4.5;
    pub const AIM_Y: f32 = 0.12;
    /// World units per pixel of pointer drag
    pub const AIM_SENSITIVITY: f32 = 0.007;

    /// Cue ball z below which the round ends
    pub const EXIT_Z: f32 = -5.0;
    /// Velocity given to the cue ball on launch
    pub const LAUNCH_VELOCITY: Vec2 = Vec2::new(0.0, 2.0);

    /// Where potted balls are parked
    pub const OFF_TABLE: Vec3 = Vec3::new(-100.0, -100.0, -100.0);

    /// Starting (x, z) of the target balls
    pub const TARGET_LAYOUT: [[f32; 2]; 6] = [
        [-2.0, 0.0],
        [0.0, 0.0],
        [2.0, 0.0],
        [-2.3, 1.0],
        [0.0, 1.0],
        [2.3, 1.0],
    ];
}

/// Project a world position onto the table plane (x, z)
#[inline]
pub fn planar(pos: Vec3) -> Vec2 {
    Vec2::new(pos.x, pos.z)
}

/// Lift a table-plane point back to world space at height `y`
#[inline]
pub fn lift(p: Vec2, y: f32) -> Vec3 {
    Vec3::new(p.x, y, p.y)
}
