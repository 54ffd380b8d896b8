//! Game state and core simulation types
//!
//! A `GameState` owns everything mutable about one round or demo episode:
//! balls, paddle, the active power-up, timers, score, id allocation and RNG.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::paddle::VelocityEase;
use super::rect::Rect;
use crate::tuning::{BallTuning, PaddleTuning, PowerupSpec, PowerupTuning, Tuning, TuningError};

/// Unique ball identifier (never reused within a session)
pub type BallId = u32;

/// Monotonic ball id allocator owned by a session
#[derive(Debug, Clone, Default)]
pub struct BallIds {
    next: BallId,
}

impl BallIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id
    pub fn allocate(&mut self) -> BallId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Random starting velocity: integer components drawn from the tuned ranges,
/// vertical component negated for an upward launch
pub fn random_velocity(tuning: &BallTuning, up: bool, rng: &mut impl Rng) -> Vec2 {
    let (x_lo, x_hi) = tuning.speed_x_range;
    let (y_lo, y_hi) = tuning.speed_y_range;
    let vx = rng.random_range(x_lo..x_hi) as f32;
    let mut vy = rng.random_range(y_lo..y_hi) as f32;
    if up {
        vy = -vy;
    }
    Vec2::new(vx, vy)
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: BallId,
    /// Top-left corner, sub-pixel
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    pub size: f32,
    /// Velocity change per second over the last frame (debug display only)
    #[serde(skip)]
    pub accel: Vec2,
}

impl Ball {
    pub fn new(id: BallId, pos: Vec2, vel: Vec2, size: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            size,
            accel: Vec2::ZERO,
        }
    }

    /// Ball at a random spot on the horizontal midline with a random velocity
    pub fn spawn_random(id: BallId, tuning: &Tuning, up: bool, rng: &mut impl Rng) -> Self {
        let margin = tuning.ball.spawn_margin as i32;
        let center_x = rng.random_range(margin..=(tuning.screen.width as i32 - margin)) as f32;
        let center_y = (tuning.screen.height / 2.0).floor();
        let half = tuning.ball.size / 2.0;
        let vel = random_velocity(&tuning.ball, up, rng);
        Self::new(
            id,
            Vec2::new(center_x - half, center_y - half),
            vel,
            tuning.ball.size,
        )
    }

    /// Rounded hitbox derived from the sub-pixel position
    pub fn rect(&self) -> Rect {
        Rect::from_f32(self.pos.x, self.pos.y, self.size, self.size)
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge, sub-pixel
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Width restored when a resize effect ends
    pub base_width: f32,
    /// Horizontal pixels per frame applied on the last update
    pub velocity: f32,
    /// Seconds left on the active resize effect (0 when not resized)
    pub resize_timer: f32,
    /// Easing state for keyboard-driven movement
    #[serde(skip)]
    pub ease: VelocityEase,
}

impl Paddle {
    /// Centered paddle resting `bottom_margin` above the bottom edge
    pub fn new(tuning: &PaddleTuning, screen_width: f32, screen_height: f32) -> Self {
        Self {
            x: (screen_width / 2.0).floor() - (tuning.width / 2.0).floor(),
            y: screen_height - tuning.bottom_margin - tuning.height,
            width: tuning.width,
            height: tuning.height,
            base_width: tuning.width,
            velocity: 0.0,
            resize_timer: 0.0,
            ease: VelocityEase::default(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_f32(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn set_center_x(&mut self, center: f32) {
        self.x = center - self.width / 2.0;
    }

    #[inline]
    pub fn is_resized(&self) -> bool {
        self.resize_timer > 0.0
    }

    /// Keep the paddle fully on screen (clamped, never bounced)
    pub fn clamp_to(&mut self, screen_width: f32) {
        self.x = self.x.clamp(0.0, (screen_width - self.width).max(0.0));
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Splits the touching ball in two
    Duplicate,
    PaddleEnlarge,
    PaddleShrink,
    /// Consumed on first touch; slows every ball for a while
    SlowMotion,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 4] = [
        PowerupKind::Duplicate,
        PowerupKind::PaddleEnlarge,
        PowerupKind::PaddleShrink,
        PowerupKind::SlowMotion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Duplicate => "duplicate",
            PowerupKind::PaddleEnlarge => "paddle-enlarge",
            PowerupKind::PaddleShrink => "paddle-shrink",
            PowerupKind::SlowMotion => "slow-motion",
        }
    }

    /// Tuned hitbox and lifetime for this kind
    pub fn spec(self, tuning: &PowerupTuning) -> &PowerupSpec {
        match self {
            PowerupKind::Duplicate => &tuning.duplicate,
            PowerupKind::PaddleEnlarge => &tuning.enlarge,
            PowerupKind::PaddleShrink => &tuning.shrink,
            PowerupKind::SlowMotion => &tuning.slow_motion,
        }
    }

    /// Whether touching it consumes it
    pub fn is_consumable(self) -> bool {
        self == PowerupKind::SlowMotion
    }
}

/// A power-up bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub rect: Rect,
    /// Seconds left before it disappears
    pub timer: f32,
    /// Balls currently overlapping that have already triggered it
    pub collided: BTreeSet<BallId>,
}

impl Powerup {
    pub fn new(kind: PowerupKind, rect: Rect, timer: f32) -> Self {
        Self {
            kind,
            rect,
            timer,
            collided: BTreeSet::new(),
        }
    }
}

/// Notable things that happened during one step (for audio/UI layers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WallBounce { ball: BallId },
    PaddleBounce { ball: BallId, score: u64 },
    PowerupSpawned(PowerupKind),
    PowerupTriggered { kind: PowerupKind, ball: BallId },
    PowerupExpired(PowerupKind),
    PaddleRestored,
    BallLost { ball: BallId },
    BallRespawned { ball: BallId },
    RoundOver { score: u64 },
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Last ball lost (real game only)
    Ended,
}

/// Read-only view of a ball for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallView {
    pub id: BallId,
    pub rect: Rect,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub paddle: Rect,
    pub balls: Vec<BallView>,
    pub powerup: Option<(Rect, PowerupKind)>,
    pub score: u64,
    pub slow_motion: bool,
}

/// Per-ball numbers for the debug overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallStats {
    pub id: BallId,
    pub speed: f32,
    pub accel: f32,
}

/// Complete state of one round or demo episode
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session RNG was built from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Paddle bounces so far
    pub score: u64,
    /// Steps taken
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// Active balls, in creation order
    pub balls: Vec<Ball>,
    /// At most one power-up at a time
    pub powerup: Option<Powerup>,
    /// Seconds of slow motion left
    pub slow_timer: f32,
    /// Events raised by the latest step
    pub events: Vec<GameEvent>,
    pub ids: BallIds,
    pub rng: Pcg32,
}

impl GameState {
    /// Validate the tuning and set up a fresh round with one random ball
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;

        let paddle = Paddle::new(&tuning.paddle, tuning.screen.width, tuning.screen.height);
        let mut state = Self {
            seed,
            tuning,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            paddle,
            balls: Vec::new(),
            powerup: None,
            slow_timer: 0.0,
            events: Vec::new(),
            ids: BallIds::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.spawn_random_ball();
        log::info!("New session with seed {seed}");

        Ok(state)
    }

    /// Add a downward-travelling ball at a random spot; returns its id
    pub fn spawn_random_ball(&mut self) -> BallId {
        let id = self.ids.allocate();
        let ball = Ball::spawn_random(id, &self.tuning, false, &mut self.rng);
        self.balls.push(ball);
        id
    }

    /// Multiplier applied to ball motion this frame
    pub fn speed_factor(&self) -> f32 {
        if self.slow_timer > 0.0 {
            self.tuning.powerups.slow.speed_factor
        } else {
            1.0
        }
    }

    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// Rendering view of the current frame
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            paddle: self.paddle.rect(),
            balls: self
                .balls
                .iter()
                .map(|b| BallView {
                    id: b.id,
                    rect: b.rect(),
                })
                .collect(),
            powerup: self.powerup.as_ref().map(|p| (p.rect, p.kind)),
            score: self.score,
            slow_motion: self.slow_timer > 0.0,
        }
    }

    /// Speed and acceleration magnitude of every active ball
    pub fn ball_stats(&self) -> Vec<BallStats> {
        self.balls
            .iter()
            .map(|b| BallStats {
                id: b.id,
                speed: b.speed(),
                accel: b.accel.length(),
            })
            .collect()
    }
}
