//! Per-frame simulation step
//!
//! Driven by the host render loop with the real elapsed time of each frame;
//! no fixed timestep is assumed. Order within a frame:
//! inputs -> collisions -> integration -> respawn.

use glam::Vec2;

use super::collision::{resolve, resolve_wall};
use super::state::{RoundPhase, SimEvent, SimState};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Launch the cue ball (only honored while idle)
    pub launch: bool,
    /// Horizontal pointer drag since last frame, in pixels (moves the marker)
    pub aim_drag: Option<f32>,
}

/// Advance the table by one frame of `dt` seconds
///
/// Returns the events that happened during the frame.
pub fn tick(state: &mut SimState, input: &FrameInput, dt: f32) -> Vec<SimEvent> {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let motion = state.settings.motion();
    let mut events = Vec::new();

    state.frames += 1;

    // The marker can be dragged at any time; the cue only follows it while idle
    if let Some(drag) = input.aim_drag {
        state.nudge_aim(drag * state.settings.aim_sensitivity);
    }

    if state.phase == RoundPhase::Idle {
        state.follow_aim();

        if input.launch {
            let [vx, vz] = state.settings.launch_velocity;
            state.cue.vel = Vec2::new(vx, vz);
            state.phase = RoundPhase::InFlight;
            events.push(SimEvent::Launched { round: state.round });
            log::debug!("Round {} launched from {:?}", state.round, state.cue.pos);
        }
    }

    match state.phase {
        RoundPhase::Idle => {
            state.cue.advance(dt, motion);
        }
        RoundPhase::InFlight => {
            resolve_contacts(state, &mut events);

            for target in state.targets.iter_mut().filter(|b| b.exists) {
                target.advance(dt, motion);
            }
            state.marker.advance(dt, motion);
            state.cue.advance(dt, motion);

            if state.cue.pos.z < state.settings.exit_z {
                state.phase = RoundPhase::Exited;
                events.push(SimEvent::CueExited { round: state.round });
            } else if state.cue.vel == Vec2::ZERO {
                state.phase = RoundPhase::Exited;
                events.push(SimEvent::CueStopped { round: state.round });
            }
        }
        RoundPhase::Exited => {}
    }

    if state.phase == RoundPhase::Exited {
        state.respawn_cue();
    }

    events
}

/// Check the cue ball against every other ball and wall
fn resolve_contacts(state: &mut SimState, events: &mut Vec<SimEvent>) {
    let had_targets = state.remaining_targets() > 0;

    for target in &mut state.targets {
        if resolve(target, &mut state.cue).is_some_and(|c| c.potted) {
            events.push(SimEvent::TargetPotted { id: target.id });
            log::info!("Target {} potted", target.id);
        }
    }

    if had_targets && state.remaining_targets() == 0 {
        events.push(SimEvent::TableCleared);
        log::info!("Table cleared in round {}", state.round);
    }

    for wall in &state.walls {
        if resolve_wall(wall, &mut state.cue).is_some() {
            events.push(SimEvent::WallBounce { edge: wall.edge });
        }
    }

    if resolve(&mut state.marker, &mut state.cue).is_some() {
        events.push(SimEvent::MarkerBounce);
    }
}
