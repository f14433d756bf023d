//! Virtual Billiard entry point
//!
//! Headless host loop: plays seeded demo rounds with a jittery frame time,
//! standing in for a render loop, and logs what happens on the table.
//!
//! Usage: `virtual-billiard [--config table.json] [--seed N] [--rounds N] [--json]`

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::path::PathBuf;

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use virtual_billiard::TableSettings;
    use virtual_billiard::sim::{FrameInput, RoundPhase, SimEvent, SimState, tick};

    /// Abandon a round after this many frames (cue trapped bouncing)
    const MAX_ROUND_FRAMES: u32 = 60 * 60;
    /// Frames spent dragging the aim before each shot
    const AIM_FRAMES: u32 = 10;
    /// Pointer pixels per frame when pulling the marker out of the way
    const DODGE_DRAG: f32 = 30.0;

    /// Headless billiard table demo
    #[derive(Parser, Debug)]
    #[command(name = "virtual-billiard")]
    pub struct Options {
        /// Table settings file (JSON)
        #[arg(long)]
        pub config: Option<PathBuf>,
        #[arg(long, default_value_t = 12345)]
        pub seed: u64,
        #[arg(long, default_value_t = 5)]
        pub rounds: u32,
        /// Print the final ball positions as JSON
        #[arg(long)]
        pub json: bool,
    }

    /// What happened in one round
    #[derive(Debug, Default)]
    struct RoundSummary {
        frames: u32,
        potted: usize,
        wall_bounces: usize,
        marker_bounces: usize,
        exited: bool,
    }

    /// Demo host owning the table, like a render loop would
    pub struct Host {
        state: SimState,
        rng: Pcg32,
        /// Simulated wall-clock seconds
        elapsed: f64,
    }

    impl Host {
        pub fn new(state: SimState, seed: u64) -> Self {
            Self {
                state,
                rng: Pcg32::seed_from_u64(seed),
                elapsed: 0.0,
            }
        }

        pub fn state(&self) -> &SimState {
            &self.state
        }

        /// Frame time of a host running somewhere between 45 and 75 fps
        fn frame_time(&mut self) -> f32 {
            self.rng.random_range(1.0 / 75.0..1.0 / 45.0)
        }

        fn frame(&mut self, input: &FrameInput, summary: &mut RoundSummary) {
            let dt = self.frame_time();
            self.elapsed += f64::from(dt);
            summary.frames += 1;

            for event in tick(&mut self.state, input, dt) {
                log::debug!("{:.3}s {:?}", self.elapsed, event);
                match event {
                    SimEvent::TargetPotted { .. } => summary.potted += 1,
                    SimEvent::WallBounce { .. } => summary.wall_bounces += 1,
                    SimEvent::MarkerBounce => summary.marker_bounces += 1,
                    SimEvent::CueExited { .. } | SimEvent::CueStopped { .. } => {
                        summary.exited = true
                    }
                    SimEvent::Launched { .. } | SimEvent::TableCleared => {}
                }
            }
        }

        /// Aim somewhere random, shoot, and wait for the cue ball to leave
        fn play_round(&mut self) -> RoundSummary {
            let mut summary = RoundSummary::default();

            let total_drag: f32 = self.rng.random_range(-300.0..300.0);
            let drag = FrameInput {
                aim_drag: Some(total_drag / AIM_FRAMES as f32),
                ..Default::default()
            };
            for _ in 0..AIM_FRAMES {
                self.frame(&drag, &mut summary);
            }

            let shoot = FrameInput {
                launch: true,
                ..Default::default()
            };
            self.frame(&shoot, &mut summary);

            while !summary.exited && summary.frames < MAX_ROUND_FRAMES {
                let input = self.dodge();
                self.frame(&input, &mut summary);
            }

            if self.state.phase == RoundPhase::InFlight {
                log::warn!(
                    "Cue ball still rolling after {} frames, calling the round",
                    summary.frames
                );
                self.state.respawn_cue();
            }
            summary
        }

        /// Pull the marker sideways while the cue ball rolls back at it
        fn dodge(&self) -> FrameInput {
            let cue = &self.state.cue;
            let marker = &self.state.marker;
            let clearance = 4.0 * cue.radius;
            if cue.vel.y >= 0.0 || (cue.pos.x - marker.pos.x).abs() > clearance {
                return FrameInput::default();
            }

            // Away from the cue, unless the marker is already against that wall
            let mut drag = if cue.pos.x >= marker.pos.x {
                -DODGE_DRAG
            } else {
                DODGE_DRAG
            };
            if marker.pos.x.abs() >= self.state.settings.aim_limit() - f32::EPSILON
                && drag.signum() == marker.pos.x.signum()
            {
                drag = -drag;
            }
            FrameInput {
                aim_drag: Some(drag),
                ..Default::default()
            }
        }

        pub fn run(&mut self, rounds: u32) {
            for round in 0..rounds {
                if self.state.remaining_targets() == 0 {
                    log::info!("No targets left after {} rounds", round);
                    break;
                }

                let summary = self.play_round();
                log::info!(
                    "Round {}: {} potted, {} wall / {} marker bounces, {} frames, aim x {:.2}",
                    round + 1,
                    summary.potted,
                    summary.wall_bounces,
                    summary.marker_bounces,
                    summary.frames,
                    self.state.marker.pos.x
                );
            }

            log::info!(
                "Done after {:.1}s simulated: {} of {} targets left",
                self.elapsed,
                self.state.remaining_targets(),
                self.state.targets.len()
            );
        }
    }

    pub fn load_state(options: &Options) -> Result<SimState, virtual_billiard::SettingsError> {
        let settings = match &options.config {
            Some(path) => TableSettings::load(path)?,
            None => TableSettings::default(),
        };
        SimState::new(settings)
    }

}

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let options = host::Options::parse();

    let state = match host::load_state(&options) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Setup failed: {e}");
            std::process::exit(1);
        }
    };

    log::info!("Virtual Billiard (headless) starting, seed {}", options.seed);
    let mut host = host::Host::new(state, options.seed);
    host.run(options.rounds);

    if options.json {
        match serde_json::to_string_pretty(&host.state().snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialize snapshot: {e}"),
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `sim::tick` from their own render loop
}
