//! Solo Pong headless driver
//!
//! Runs the autoplay demo, then one real round steered by the same autopilot,
//! and prints the final frame as JSON.
//!
//! Usage: `solo-pong [seed] [demo-frames] [tuning.json]`

use std::process::ExitCode;

use solo_pong::Tuning;
use solo_pong::sim::{
    Decision, GameEvent, GameState, RoundStatus, TickInput, autoplay, step_demo, step_round,
};

/// Upper bound on frames for the autopiloted round
const MAX_ROUND_FRAMES: u64 = 60 * 60 * 10;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345u64);
    let demo_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(600u64);

    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };
    let dt = tuning.frame_dt();

    log::info!("Solo Pong (headless) starting with seed {seed}");

    // Demo
    let mut demo = match GameState::new(tuning.clone(), seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut respawns = 0;
    for _ in 0..demo_frames {
        step_demo(&mut demo, dt);
        respawns += demo
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::BallRespawned { .. }))
            .count();
    }
    log::info!(
        "Demo: {} frames, {} paddle hits, {} respawns, {} balls in play",
        demo_frames,
        demo.score,
        respawns,
        demo.balls.len()
    );

    // Real round, autopiloted through the input interface
    let mut round = match GameState::new(tuning, seed.wrapping_add(1)) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut status = RoundStatus::InPlay;
    while !status.is_ended() && round.time_ticks < MAX_ROUND_FRAMES {
        let input = autopilot_input(&round);
        status = step_round(&mut round, &input, dt);
    }
    match status {
        RoundStatus::Ended { score } => {
            log::info!("Round ended after {} frames, score {score}", round.time_ticks)
        }
        RoundStatus::InPlay => log::info!(
            "Round still running after {} frames, score {}",
            round.time_ticks,
            round.score
        ),
    }

    match serde_json::to_string_pretty(&round.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to encode snapshot: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

/// Translate the autopilot's decision into held keys
fn autopilot_input(state: &GameState) -> TickInput {
    let tuning = &state.tuning;
    let field = solo_pong::sim::Field {
        width: tuning.screen.width,
        height: tuning.screen.height,
        ball: &tuning.ball,
    };
    let Some(hit) = autoplay::soonest_intercept(
        &state.balls,
        state.paddle.rect().top(),
        &field,
        state.speed_factor(),
        tuning.autoplay.max_frames,
    ) else {
        return TickInput::default();
    };

    let decision = autoplay::decide(
        state.paddle.center_x(),
        hit.x,
        hit.frames,
        tuning.paddle.speed,
        tuning.autoplay.lead_frames,
    );
    match decision {
        Decision::Move(v) => TickInput {
            left: v < 0.0,
            right: v > 0.0,
        },
        Decision::Idle | Decision::Snap(_) => TickInput::default(),
    }
}
