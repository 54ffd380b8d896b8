//! Per-frame simulation step
//!
//! Drives one frame: effect timers, paddle, power-up spawn, every ball, then
//! power-up expiry. A real round ends when the last ball is lost; the demo
//! always refills.

use super::autoplay;
use super::kinematics::{self, Field};
use super::paddle;
use super::powerup::{self, Triggered};
use super::state::{BallId, GameEvent, GamePhase, GameState};

/// Player input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move left held
    pub left: bool,
    /// Move right held
    pub right: bool,
}

/// Result of advancing a real round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    InPlay,
    Ended { score: u64 },
}

impl RoundStatus {
    pub fn is_ended(&self) -> bool {
        matches!(self, RoundStatus::Ended { .. })
    }
}

/// Who moves the paddle this frame
#[derive(Debug, Clone, Copy)]
enum Driver<'a> {
    Player(&'a TickInput),
    Autoplay,
}

/// Advance a real round by one frame of `dt` seconds
pub fn step_round(state: &mut GameState, input: &TickInput, dt: f32) -> RoundStatus {
    if state.is_ended() {
        return RoundStatus::Ended { score: state.score };
    }

    advance_frame(state, Driver::Player(input), dt);

    if state.balls.is_empty() {
        state.phase = GamePhase::Ended;
        state.events.push(GameEvent::RoundOver { score: state.score });
        log::info!(
            "Round over after {} frames with score {}",
            state.time_ticks,
            state.score
        );
        return RoundStatus::Ended { score: state.score };
    }
    RoundStatus::InPlay
}

/// Advance the autoplay demo by one frame; never ends
pub fn step_demo(state: &mut GameState, dt: f32) {
    advance_frame(state, Driver::Autoplay, dt);

    if state.balls.is_empty() {
        let id = state.spawn_random_ball();
        state.events.push(GameEvent::BallRespawned { ball: id });
        log::info!("Demo out of balls, respawned ball {id}");
    }
}

fn advance_frame(state: &mut GameState, driver: Driver, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    if state.slow_timer > 0.0 {
        state.slow_timer = (state.slow_timer - dt).max(0.0);
    }
    let speed_factor = state.speed_factor();

    let screen_width = state.tuning.screen.width;
    if paddle::tick_resize(&mut state.paddle, dt, screen_width) {
        state.events.push(GameEvent::PaddleRestored);
    }

    match driver {
        Driver::Player(input) => {
            let target = paddle::target_velocity(
                &state.paddle,
                input.left,
                input.right,
                state.tuning.paddle.speed,
                screen_width,
            );
            paddle::drive(&mut state.paddle, target, dt, &state.tuning.paddle, screen_width);
        }
        Driver::Autoplay => steer_autoplay(state, speed_factor),
    }

    if let Some(kind) = powerup::maybe_spawn(&mut state.powerup, &state.tuning, &mut state.rng) {
        state.events.push(GameEvent::PowerupSpawned(kind));
    }

    update_balls(state, speed_factor, dt);

    if let Some(kind) = powerup::tick_lifetime(&mut state.powerup, dt) {
        state.events.push(GameEvent::PowerupExpired(kind));
    }

    log::trace!(
        "tick {}: {} balls, score {}, slow {:.2}s",
        state.time_ticks,
        state.balls.len(),
        state.score,
        state.slow_timer
    );
}

/// Point the paddle at the ball that will arrive first
fn steer_autoplay(state: &mut GameState, speed_factor: f32) {
    let tuning = &state.tuning;
    let field = Field {
        width: tuning.screen.width,
        height: tuning.screen.height,
        ball: &tuning.ball,
    };
    let paddle_top = state.paddle.rect().top();

    let Some(hit) = autoplay::soonest_intercept(
        &state.balls,
        paddle_top,
        &field,
        speed_factor,
        tuning.autoplay.max_frames,
    ) else {
        state.paddle.velocity = 0.0;
        return;
    };

    let target = autoplay::jittered(hit.x, tuning.autoplay.jitter, &mut state.rng);
    let decision = autoplay::decide(
        state.paddle.center_x(),
        target,
        hit.frames,
        tuning.paddle.speed,
        tuning.autoplay.lead_frames,
    );
    autoplay::apply(&mut state.paddle, decision, tuning.screen.width);
}

/// Move every ball, resolve paddle and power-up contacts, drop lost balls
fn update_balls(state: &mut GameState, speed_factor: f32, dt: f32) {
    let GameState {
        tuning,
        paddle,
        balls,
        powerup,
        ids,
        rng,
        events,
        score,
        slow_timer,
        ..
    } = state;
    let field = Field {
        width: tuning.screen.width,
        height: tuning.screen.height,
        ball: &tuning.ball,
    };

    let mut spawned = Vec::new();
    let mut lost: Vec<BallId> = Vec::new();

    for ball in balls.iter_mut() {
        let prev_vel = ball.vel;
        let contacts = kinematics::advance_ball(ball, paddle, &field, &tuning.paddle, speed_factor);

        if contacts.wall() {
            events.push(GameEvent::WallBounce { ball: ball.id });
        }
        if contacts.paddle {
            *score += 1;
            events.push(GameEvent::PaddleBounce {
                ball: ball.id,
                score: *score,
            });
        }

        let kind = powerup.as_ref().map(|p| p.kind);
        let contact = powerup::resolve_contact(powerup, ball, ball.rect(), ids, tuning, rng);
        if let Some(triggered) = contact {
            if let Some(kind) = kind {
                events.push(GameEvent::PowerupTriggered { kind, ball: ball.id });
            }
            match triggered {
                Triggered::SlowMotion => *slow_timer = tuning.powerups.slow.effect_duration,
                Triggered::Duplicate(clone) => spawned.push(clone),
                Triggered::Resize(factor) => paddle::apply_resize(
                    paddle,
                    factor,
                    tuning.powerups.resize.duration,
                    tuning.screen.width,
                ),
            }
        }

        ball.accel = kinematics::acceleration(prev_vel, ball.vel, dt);

        if contacts.out_of_play {
            lost.push(ball.id);
        }
    }

    if !lost.is_empty() {
        balls.retain(|b| !lost.contains(&b.id));
        for id in lost {
            log::debug!("Ball {id} fell off the screen");
            events.push(GameEvent::BallLost { ball: id });
        }
    }
    balls.extend(spawned);
}
