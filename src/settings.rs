//! Table settings
//!
//! Geometry, layout and tuning for a table. Every field has a default, so a
//! settings file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ball::{Drag, Motion};

/// Why a settings file could not be used
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Table geometry and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    // === Balls ===
    pub ball_radius: f32,
    /// Starting (x, z) of each target ball
    pub target_layout: Vec<[f32; 2]>,

    // === Motion ===
    pub time_scale: f32,
    /// Enable per-step velocity decay (off reproduces the classic feel)
    pub rolling_drag: bool,
    /// Per-step velocity multiplier when `rolling_drag` is on
    pub decay_rate: f32,
    /// Cue velocity on launch (vx, vz)
    pub launch_velocity: [f32; 2],

    // === Table ===
    pub table_width: f32,
    pub table_depth: f32,
    pub wall_thickness: f32,
    pub wall_height: f32,

    // === Aim / round ===
    /// World units per pointer pixel
    pub aim_sensitivity: f32,
    /// Cue z below which the round ends
    pub exit_z: f32,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            target_layout: TARGET_LAYOUT.to_vec(),

            time_scale: TIME_SCALE,
            rolling_drag: false,
            decay_rate: DECREASE_RATE,
            launch_velocity: [LAUNCH_VELOCITY.x, LAUNCH_VELOCITY.y],

            table_width: TABLE_WIDTH,
            table_depth: TABLE_DEPTH,
            wall_thickness: WALL_THICKNESS,
            wall_height: WALL_HEIGHT,

            aim_sensitivity: AIM_SENSITIVITY,
            exit_z: EXIT_Z,
        }
    }
}

impl TableSettings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded table settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Integrator tuning selected by these settings
    pub fn motion(&self) -> Motion {
        let drag = if self.rolling_drag {
            Drag::Decay(self.decay_rate)
        } else {
            Drag::None
        };
        Motion {
            time_scale: self.time_scale,
            drag,
        }
    }

    /// x of the side wall centers (mirrored for the left wall)
    pub fn side_wall_x(&self) -> f32 {
        self.table_width / 2.0 - self.wall_thickness / 2.0
    }

    /// z of the end wall centers (mirrored for the back wall)
    pub fn end_wall_z(&self) -> f32 {
        self.table_depth / 2.0
    }

    /// Half the playable width, between the inner faces of the side walls
    pub fn inner_half_width(&self) -> f32 {
        self.side_wall_x() - self.wall_thickness / 2.0
    }

    /// Furthest the aim marker may sit from the center line
    pub fn aim_limit(&self) -> f32 {
        (self.inner_half_width() - self.ball_radius).max(0.0)
    }

    /// Check that a table can be built from these settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        let scalars = [
            ("ball_radius", self.ball_radius),
            ("time_scale", self.time_scale),
            ("decay_rate", self.decay_rate),
            ("table_width", self.table_width),
            ("table_depth", self.table_depth),
            ("wall_thickness", self.wall_thickness),
            ("wall_height", self.wall_height),
            ("aim_sensitivity", self.aim_sensitivity),
            ("exit_z", self.exit_z),
            ("launch_velocity.x", self.launch_velocity[0]),
            ("launch_velocity.z", self.launch_velocity[1]),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }

        if self.ball_radius <= 0.0 {
            return Err(invalid("ball_radius must be positive"));
        }
        if self.time_scale <= 0.0 {
            return Err(invalid("time_scale must be positive"));
        }
        if self.decay_rate <= 0.0 || self.decay_rate > 1.0 {
            return Err(invalid("decay_rate must be in (0, 1]"));
        }
        if self.wall_thickness <= 0.0 || self.wall_height <= 0.0 {
            return Err(invalid("walls must have positive thickness and height"));
        }
        if self.aim_limit() <= 0.0 {
            return Err(invalid("table is too narrow for a ball"));
        }
        let [vx, vz] = self.launch_velocity;
        if vz <= 0.0 {
            return Err(invalid("launch_velocity must point toward the front wall"));
        }
        // Anything slower is stopped by the integrator on the first frame
        if vx.abs() <= STOP_SPEED && vz <= STOP_SPEED {
            return Err(invalid(format!(
                "launch_velocity must exceed {STOP_SPEED} on some axis"
            )));
        }
        // The round ends past the near end, not on the table
        if self.exit_z >= -self.end_wall_z() {
            return Err(invalid("exit_z must lie beyond the open end of the table"));
        }

        let half_w = self.inner_half_width() - self.ball_radius;
        let half_d = self.end_wall_z() - self.wall_thickness / 2.0 - self.ball_radius;
        // Targets must clear the cue ball at its spawn point anywhere along the aim line
        let spawn_clear_z = -self.end_wall_z() + 4.0 * self.ball_radius;
        for (i, [x, z]) in self.target_layout.iter().enumerate() {
            if !x.is_finite() || !z.is_finite() || x.abs() > half_w || z.abs() > half_d {
                return Err(invalid(format!("target {i} at ({x}, {z}) is off the table")));
            }
            if *z < spawn_clear_z {
                return Err(invalid(format!(
                    "target {i} at ({x}, {z}) is in the cue ball's spawn area"
                )));
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> SettingsError {
    SettingsError::Invalid(msg.into())
}
