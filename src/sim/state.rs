//! Simulation state
//!
//! One `SimState` owns every ball and wall on the table. The frame driver is
//! its only mutator; renderers read `snapshot()`.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallRole};
use super::wall::{Wall, WallEdge};
use crate::consts::*;
use crate::settings::{SettingsError, TableSettings};

/// Where the cue ball is in its round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for launch; cue follows the aim marker
    Idle,
    /// Cue ball rolling after launch
    InFlight,
    /// Round over (cue left through the open end or came to rest); respawn pending
    Exited,
}

/// Something that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Launched { round: u32 },
    TargetPotted { id: u32 },
    MarkerBounce,
    WallBounce { edge: WallEdge },
    CueExited { round: u32 },
    /// Cue ball came to rest on the table (only possible with rolling drag)
    CueStopped { round: u32 },
    /// Last target potted
    TableCleared,
}

/// What a renderer needs to draw one ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallView {
    pub id: u32,
    pub role: BallRole,
    pub pos: Vec3,
    pub exists: bool,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            id: ball.id,
            role: ball.role,
            pos: ball.pos,
            exists: ball.exists,
        }
    }
}

/// Complete table state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub settings: TableSettings,
    pub phase: RoundPhase,
    /// Rounds finished so far
    pub round: u32,
    /// Frames ticked
    pub frames: u64,
    /// Target balls (sorted by id)
    pub targets: Vec<Ball>,
    pub cue: Ball,
    /// Aim marker on the aim line
    pub marker: Ball,
    pub walls: Vec<Wall>,
    next_id: u32,
}

impl Default for SimState {
    fn default() -> Self {
        Self::build(TableSettings::default())
    }
}

impl SimState {
    /// Set up a table from validated settings
    pub fn new(settings: TableSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    fn build(settings: TableSettings) -> Self {
        let r = settings.ball_radius;
        // Aim line runs along the open end
        let marker_pos = Vec3::new(0.0, AIM_Y, -settings.end_wall_z());

        let mut state = Self {
            phase: RoundPhase::Idle,
            round: 0,
            frames: 0,
            targets: Vec::with_capacity(settings.target_layout.len()),
            cue: Ball::new(0, BallRole::Cue, cue_spawn(marker_pos, r), r),
            marker: Ball::new(0, BallRole::Marker, marker_pos, r),
            walls: build_walls(&settings),
            settings,
            next_id: 1,
        };

        state.marker.id = state.next_entity_id();
        state.cue.id = state.next_entity_id();

        let layout = state.settings.target_layout.clone();
        for [x, z] in layout {
            let id = state.next_entity_id();
            state
                .targets
                .push(Ball::new(id, BallRole::Target, Vec3::new(x, r, z), r));
        }

        log::info!(
            "Table ready: {} targets, {} walls",
            state.targets.len(),
            state.walls.len()
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Where the cue ball sits when waiting for launch
    pub fn spawn_position(&self) -> Vec3 {
        cue_spawn(self.marker.pos, self.cue.radius)
    }

    /// Move the aim marker sideways, kept inside the side walls
    pub fn nudge_aim(&mut self, dx: f32) {
        let limit = self.settings.aim_limit();
        let x = (self.marker.pos.x + dx).clamp(-limit, limit);
        let marker = Vec3::new(x, self.marker.pos.y, self.marker.pos.z);
        self.marker.reset(marker);
    }

    /// Snap the idle cue ball to its spot in front of the marker
    pub fn follow_aim(&mut self) {
        self.cue.pos = self.spawn_position();
    }

    /// Put the cue ball back in front of the marker and start a new round
    pub fn respawn_cue(&mut self) {
        let spawn = self.spawn_position();
        self.cue.reset(spawn);
        self.round += 1;
        self.phase = RoundPhase::Idle;
        log::info!("Round {} over, cue ball back at {:?}", self.round, spawn);
    }

    /// Targets still on the table
    pub fn remaining_targets(&self) -> usize {
        self.targets.iter().filter(|b| b.exists).count()
    }

    /// Position and existence of every ball, for rendering
    pub fn snapshot(&self) -> Vec<BallView> {
        self.targets
            .iter()
            .chain([&self.marker, &self.cue])
            .map(BallView::from)
            .collect()
    }
}

fn cue_spawn(marker: Vec3, radius: f32) -> Vec3 {
    marker + Vec3::new(0.0, 0.0, 2.0 * radius)
}

fn build_walls(settings: &TableSettings) -> Vec<Wall> {
    let x = settings.side_wall_x();
    let z = settings.end_wall_z();
    let t = settings.wall_thickness;
    let h = settings.wall_height;
    let w = settings.table_width;
    let d = settings.table_depth;

    vec![
        Wall::new(WallEdge::Front, Vec3::new(0.0, WALL_Y, z), w, h, t),
        Wall::new(WallEdge::Right, Vec3::new(x, WALL_Y, 0.0), t, h, d),
        Wall::new(WallEdge::Left, Vec3::new(-x, WALL_Y, 0.0), t, h, d),
        Wall::new(WallEdge::Back, Vec3::new(0.0, WALL_Y, -z), w, h, t),
    ]
}
