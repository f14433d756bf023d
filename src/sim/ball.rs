//! Ball entity and motion integration
//!
//! Balls live on the table plane: x/z move, y (height) is fixed per ball.
//! Velocity is planar, stored as `Vec2(vx, vz)`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{lift, planar};

/// What a ball does when the cue ball runs into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallRole {
    /// Object ball, potted on cue contact
    Target,
    /// The ball the player launches
    Cue,
    /// Stationary aim marker on the aim line; bounces the cue, never potted
    Marker,
}

/// Velocity decay applied by the integrator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Drag {
    /// Velocity is constant until a collision or the stop cutoff
    #[default]
    None,
    /// Velocity is multiplied by the rate after every committed move
    Decay(f32),
}

/// Integrator tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Amplifies raw velocity units into world units
    pub time_scale: f32,
    pub drag: Drag,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            time_scale: TIME_SCALE,
            drag: Drag::None,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub role: BallRole,
    pub pos: Vec3,
    /// Planar (x, z) position at the start of the last integration step
    pub prev: Vec2,
    /// Planar velocity (vx, vz)
    pub vel: Vec2,
    pub radius: f32,
    pub exists: bool,
}

impl Ball {
    pub fn new(id: u32, role: BallRole, pos: Vec3, radius: f32) -> Self {
        Self {
            id,
            role,
            pos,
            prev: planar(pos),
            vel: Vec2::ZERO,
            radius,
            exists: true,
        }
    }

    /// Center on the table plane
    #[inline]
    pub fn center(&self) -> Vec2 {
        planar(self.pos)
    }

    /// Move the center on the table plane, keeping height
    #[inline]
    pub fn set_center(&mut self, p: Vec2) {
        self.pos = lift(p, self.pos.y);
    }

    /// Move halfway back toward the previous position
    pub fn retract_halfway(&mut self) {
        let mid = (self.center() + self.prev) / 2.0;
        self.set_center(mid);
    }

    /// Jump all the way back to the previous position
    pub fn roll_back(&mut self) {
        self.set_center(self.prev);
    }

    /// True if either velocity component is above the stop cutoff
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.vel.x.abs() > STOP_SPEED || self.vel.y.abs() > STOP_SPEED
    }

    /// Advance position by `time_scale * dt * vel`
    ///
    /// Snapshots the current position into `prev` first. A ball below the
    /// stop cutoff has its velocity zeroed instead of moving. Returns whether
    /// the ball moved.
    pub fn advance(&mut self, dt: f32, motion: Motion) -> bool {
        let center = self.center();
        self.prev = center;

        if !self.is_moving() {
            self.vel = Vec2::ZERO;
            return false;
        }

        let moved = center + motion.time_scale * dt * self.vel;
        self.set_center(moved);

        if let Drag::Decay(rate) = motion.drag {
            self.vel *= rate;
        }
        true
    }

    /// Put the ball back in play at `pos`, at rest
    pub fn reset(&mut self, pos: Vec3) {
        self.pos = pos;
        self.prev = planar(pos);
        self.vel = Vec2::ZERO;
        self.exists = true;
    }

    /// Take the ball out of play and park it off the table
    pub fn pot(&mut self) {
        self.exists = false;
        self.vel = Vec2::ZERO;
        self.pos = OFF_TABLE;
        self.prev = planar(OFF_TABLE);
    }
}
