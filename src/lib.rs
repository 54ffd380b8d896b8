//! Solo Pong - single-player Pong with gravity and power-ups
//!
//! Core modules:
//! - `sim`: Simulation core (ball physics, power-ups, paddle easing, autoplay)
//! - `tuning`: Data-driven game balance with validation

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Default gameplay constants (tuned for ~60 frames per second)
pub mod consts {
    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 512.0;
    pub const SCREEN_HEIGHT: f32 = 640.0;
    pub const FPS: u32 = 60;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 80.0;
    pub const PADDLE_HEIGHT: f32 = 6.0;
    /// Pixels per frame at full speed
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Easing progress per second
    pub const PADDLE_TRANSITION_RATE: f32 = 12.0;
    /// Share of paddle velocity handed to the ball on contact
    pub const PADDLE_VEL_INFLUENCE: f32 = 0.5;
    /// Gap between paddle bottom and screen bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 20.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 10.0;
    /// Half-open integer ranges for the starting velocity
    pub const BALL_SPEED_X_RANGE: (i32, i32) = (-3, 3);
    pub const BALL_SPEED_Y_RANGE: (i32, i32) = (3, 5);
    pub const BALL_SPEED_INCREMENT: f32 = 1.05;
    pub const BALL_MAX_SPEED: f32 = 15.0;
    pub const BALL_ANGLE_INFLUENCE: f32 = 5.0;
    pub const BALL_GRAVITY: f32 = 0.02;
    /// Horizontal margin for randomly placed balls
    pub const BALL_SPAWN_MARGIN: f32 = 40.0;

    /// Power-up bar defaults (shared by all kinds)
    pub const POWERUP_WIDTH: f32 = 100.0;
    pub const POWERUP_HEIGHT: f32 = 4.0;
    /// Seconds a power-up stays on screen
    pub const POWERUP_LIFETIME: f32 = 8.0;
    /// Per-frame spawn chances
    pub const DUPLICATE_CHANCE: f32 = 0.005;
    pub const ENLARGE_CHANCE: f32 = 0.003;
    pub const SHRINK_CHANCE: f32 = 0.003;
    pub const SLOW_CHANCE: f32 = 0.003;
    pub const POWERUP_MARGIN_X: f32 = 20.0;
    pub const POWERUP_MIN_Y: f32 = 80.0;

    /// Paddle resize effect
    pub const ENLARGE_FACTOR: f32 = 1.5;
    pub const SHRINK_FACTOR: f32 = 0.5;
    pub const SIZE_DURATION: f32 = 8.0;

    /// Slow-motion effect
    pub const SLOW_SPEED_FACTOR: f32 = 0.5;
    pub const SLOW_EFFECT_TIME: f32 = 4.0;

    /// Autoplay
    pub const AUTOPLAY_JITTER: f32 = 2.0;
    pub const AUTOPLAY_LEAD_FRAMES: u32 = 3;
    pub const AUTOPLAY_MAX_FRAMES: u32 = 2000;
}

/// Evaluate a one-dimensional cubic Bézier curve at `t`
#[inline]
pub fn cubic_bezier(t: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Snappy ease-in-out used for paddle velocity transitions.
///
/// `t` is clamped to `[0, 1]`.
#[inline]
pub fn snappy_ease(t: f32) -> f32 {
    cubic_bezier(t.clamp(0.0, 1.0), 0.0, 0.1, 0.9, 1.0)
}
