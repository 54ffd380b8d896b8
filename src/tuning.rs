//! Game balance configuration
//!
//! Every constant the simulation consumes lives here. Defaults come from
//! [`crate::consts`]; a JSON document may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Configuration rejected at setup time
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} is an empty range")]
    EmptyRange { field: &'static str },
    #[error("{field} spawn chance {value} is outside [0, 1]")]
    ChanceOutOfRange { field: &'static str, value: f32 },
    #[error("combined power-up spawn chance {0} exceeds 1")]
    ChanceSumExceeded(f32),
    #[error("enlarged paddle ({0} px) does not fit on screen")]
    PaddleTooWide(f32),
    #[error("slow-motion speed factor {0} must be in (0, 1]")]
    SlowFactorOutOfRange(f32),
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be a whole number of pixels (got {value})")]
    FractionalPixels { field: &'static str, value: f32 },
    #[error("invalid tuning document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Window dimensions and nominal frame rate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    pub width: f32,
    pub height: f32,
    pub fps: u32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            fps: FPS,
        }
    }
}

/// Paddle dimensions and movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    pub width: f32,
    pub height: f32,
    /// Pixels per frame at full speed
    pub speed: f32,
    pub transition_rate: f32,
    pub vel_influence: f32,
    pub bottom_margin: f32,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
            transition_rate: PADDLE_TRANSITION_RATE,
            vel_influence: PADDLE_VEL_INFLUENCE,
            bottom_margin: PADDLE_BOTTOM_MARGIN,
        }
    }
}

/// Ball size and physics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    pub size: f32,
    /// Half-open range of integer starting vx values
    pub speed_x_range: (i32, i32),
    /// Half-open range of integer starting |vy| values
    pub speed_y_range: (i32, i32),
    pub speed_increment: f32,
    pub max_speed: f32,
    pub angle_influence: f32,
    pub gravity: f32,
    pub spawn_margin: f32,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            size: BALL_SIZE,
            speed_x_range: BALL_SPEED_X_RANGE,
            speed_y_range: BALL_SPEED_Y_RANGE,
            speed_increment: BALL_SPEED_INCREMENT,
            max_speed: BALL_MAX_SPEED,
            angle_influence: BALL_ANGLE_INFLUENCE,
            gravity: BALL_GRAVITY,
            spawn_margin: BALL_SPAWN_MARGIN,
        }
    }
}

/// Hitbox, lifetime and spawn chance of one power-up kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupSpec {
    pub width: f32,
    pub height: f32,
    /// Seconds before the power-up disappears
    pub lifetime: f32,
    /// Per-frame spawn chance
    pub chance: f32,
}

impl PowerupSpec {
    fn with_chance(chance: f32) -> Self {
        Self {
            chance,
            ..Self::default()
        }
    }
}

impl Default for PowerupSpec {
    fn default() -> Self {
        Self {
            width: POWERUP_WIDTH,
            height: POWERUP_HEIGHT,
            lifetime: POWERUP_LIFETIME,
            chance: DUPLICATE_CHANCE,
        }
    }
}

/// Paddle enlarge/shrink effect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeTuning {
    pub enlarge_factor: f32,
    pub shrink_factor: f32,
    /// Seconds before the paddle reverts to its base width
    pub duration: f32,
}

impl Default for ResizeTuning {
    fn default() -> Self {
        Self {
            enlarge_factor: ENLARGE_FACTOR,
            shrink_factor: SHRINK_FACTOR,
            duration: SIZE_DURATION,
        }
    }
}

/// Global slow-motion effect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowMotionTuning {
    pub speed_factor: f32,
    pub effect_duration: f32,
}

impl Default for SlowMotionTuning {
    fn default() -> Self {
        Self {
            speed_factor: SLOW_SPEED_FACTOR,
            effect_duration: SLOW_EFFECT_TIME,
        }
    }
}

/// All power-up settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    pub duplicate: PowerupSpec,
    pub enlarge: PowerupSpec,
    pub shrink: PowerupSpec,
    pub slow_motion: PowerupSpec,
    pub resize: ResizeTuning,
    pub slow: SlowMotionTuning,
    /// Horizontal gap kept between a power-up and the side walls
    pub margin_x: f32,
    /// Highest point (smallest y) a power-up may appear at
    pub min_y: f32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            duplicate: PowerupSpec::with_chance(DUPLICATE_CHANCE),
            enlarge: PowerupSpec::with_chance(ENLARGE_CHANCE),
            shrink: PowerupSpec::with_chance(SHRINK_CHANCE),
            slow_motion: PowerupSpec::with_chance(SLOW_CHANCE),
            resize: ResizeTuning::default(),
            slow: SlowMotionTuning::default(),
            margin_x: POWERUP_MARGIN_X,
            min_y: POWERUP_MIN_Y,
        }
    }
}

impl PowerupTuning {
    /// Chance that some power-up appears on a frame with none active
    pub fn total_chance(&self) -> f32 {
        self.duplicate.chance + self.enlarge.chance + self.shrink.chance + self.slow_motion.chance
    }
}

/// Demo-mode autopilot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayTuning {
    /// Target is offset by a uniform sample from `[-jitter, jitter]` each frame
    pub jitter: f32,
    /// Frames early the paddle aims to arrive
    pub lead_frames: u32,
    /// Simulation cap for trajectory prediction
    pub max_frames: u32,
}

impl Default for AutoplayTuning {
    fn default() -> Self {
        Self {
            jitter: AUTOPLAY_JITTER,
            lead_frames: AUTOPLAY_LEAD_FRAMES,
            max_frames: AUTOPLAY_MAX_FRAMES,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub screen: ScreenTuning,
    pub paddle: PaddleTuning,
    pub ball: BallTuning,
    pub powerups: PowerupTuning,
    pub autoplay: AutoplayTuning,
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NonPositive { field, value })
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NonFinite { field, value })
    }
}

fn whole_pixels(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.fract() == 0.0 {
        Ok(())
    } else {
        Err(TuningError::FractionalPixels { field, value })
    }
}

fn non_empty(field: &'static str, lo: f32, hi: f32) -> Result<(), TuningError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(TuningError::EmptyRange { field })
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let Tuning {
            screen,
            paddle,
            ball,
            powerups,
            autoplay,
        } = self;

        positive("screen.width", screen.width)?;
        positive("screen.height", screen.height)?;
        positive("screen.fps", screen.fps as f32)?;
        whole_pixels("screen.width", screen.width)?;
        whole_pixels("screen.height", screen.height)?;

        positive("paddle.width", paddle.width)?;
        positive("paddle.height", paddle.height)?;
        positive("paddle.speed", paddle.speed)?;
        positive("paddle.transition_rate", paddle.transition_rate)?;
        whole_pixels("paddle.width", paddle.width)?;
        finite("paddle.vel_influence", paddle.vel_influence)?;
        finite("paddle.bottom_margin", paddle.bottom_margin)?;
        if paddle.width > screen.width {
            return Err(TuningError::PaddleTooWide(paddle.width));
        }

        positive("ball.size", ball.size)?;
        positive("ball.speed_increment", ball.speed_increment)?;
        positive("ball.max_speed", ball.max_speed)?;
        finite("ball.gravity", ball.gravity)?;
        finite("ball.angle_influence", ball.angle_influence)?;
        finite("ball.spawn_margin", ball.spawn_margin)?;
        if ball.speed_x_range.0 >= ball.speed_x_range.1 {
            return Err(TuningError::EmptyRange {
                field: "ball.speed_x_range",
            });
        }
        if ball.speed_y_range.0 >= ball.speed_y_range.1 {
            return Err(TuningError::EmptyRange {
                field: "ball.speed_y_range",
            });
        }
        non_empty(
            "ball.spawn_margin",
            ball.spawn_margin,
            screen.width - ball.spawn_margin,
        )?;

        finite("powerups.margin_x", powerups.margin_x)?;
        finite("powerups.min_y", powerups.min_y)?;

        let specs = [
            ("powerups.duplicate", &powerups.duplicate),
            ("powerups.enlarge", &powerups.enlarge),
            ("powerups.shrink", &powerups.shrink),
            ("powerups.slow_motion", &powerups.slow_motion),
        ];
        for (field, spec) in specs {
            positive(field, spec.width)?;
            positive(field, spec.height)?;
            positive(field, spec.lifetime)?;
            if !(0.0..=1.0).contains(&spec.chance) {
                return Err(TuningError::ChanceOutOfRange {
                    field,
                    value: spec.chance,
                });
            }
            non_empty(
                field,
                powerups.margin_x,
                screen.width - spec.width - powerups.margin_x,
            )?;
        }
        let total = powerups.total_chance();
        if total > 1.0 {
            return Err(TuningError::ChanceSumExceeded(total));
        }
        non_empty("powerups.min_y", powerups.min_y, screen.height / 2.0)?;

        positive("powerups.resize.enlarge_factor", powerups.resize.enlarge_factor)?;
        positive("powerups.resize.shrink_factor", powerups.resize.shrink_factor)?;
        positive("powerups.resize.duration", powerups.resize.duration)?;
        let widest = paddle.width
            * powerups
                .resize
                .enlarge_factor
                .max(powerups.resize.shrink_factor);
        if widest > screen.width {
            return Err(TuningError::PaddleTooWide(widest));
        }

        let slow = powerups.slow.speed_factor;
        if !(slow > 0.0 && slow <= 1.0) {
            return Err(TuningError::SlowFactorOutOfRange(slow));
        }
        positive("powerups.slow.effect_duration", powerups.slow.effect_duration)?;

        positive("autoplay.max_frames", autoplay.max_frames as f32)?;
        finite("autoplay.jitter", autoplay.jitter)?;
        if autoplay.jitter < 0.0 {
            return Err(TuningError::NonPositive {
                field: "autoplay.jitter",
                value: autoplay.jitter,
            });
        }

        Ok(())
    }

    /// Nominal seconds per frame
    pub fn frame_dt(&self) -> f32 {
        1.0 / self.screen.fps as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert!((tuning.powerups.total_chance() - 0.014).abs() < 1e-6);
        assert_eq!(tuning.paddle.width, 80.0);
        assert_eq!(tuning.powerups.resize.enlarge_factor, 1.5);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning =
            Tuning::from_json(r#"{ "ball": { "gravity": 0.05 }, "screen": { "fps": 30 } }"#)
                .expect("partial document should parse");
        assert_eq!(tuning.ball.gravity, 0.05);
        assert_eq!(tuning.ball.size, BALL_SIZE);
        assert_eq!(tuning.screen.fps, 30);
        assert_eq!(tuning.screen.width, SCREEN_WIDTH);
    }

    #[test]
    fn test_rejects_negative_dimension() {
        let mut tuning = Tuning::default();
        tuning.paddle.height = -1.0;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive { field: "paddle.height", .. })
        ));
    }

    #[test]
    fn test_rejects_excess_spawn_chance() {
        let mut tuning = Tuning::default();
        tuning.powerups.duplicate.chance = 0.6;
        tuning.powerups.slow_motion.chance = 0.6;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::ChanceSumExceeded(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_enlarge() {
        let mut tuning = Tuning::default();
        tuning.powerups.resize.enlarge_factor = 10.0;
        assert!(matches!(tuning.validate(), Err(TuningError::PaddleTooWide(_))));
    }

    #[test]
    fn test_rejects_bad_slow_factor() {
        let mut tuning = Tuning::default();
        tuning.powerups.slow.speed_factor = 1.5;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::SlowFactorOutOfRange(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_physics() {
        let mut tuning = Tuning::default();
        tuning.ball.gravity = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonFinite { field: "ball.gravity", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.ball.angle_influence = f32::INFINITY;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonFinite { field: "ball.angle_influence", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.paddle.vel_influence = f32::NAN;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonFinite { field: "paddle.vel_influence", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.autoplay.jitter = f32::INFINITY;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_fractional_widths() {
        let mut tuning = Tuning::default();
        tuning.paddle.width = 80.5;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::FractionalPixels { field: "paddle.width", .. })
        ));

        let mut tuning = Tuning::default();
        tuning.screen.width = 511.25;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::FractionalPixels { field: "screen.width", .. })
        ));

        // Odd widths are fine
        let mut tuning = Tuning::default();
        tuning.paddle.width = 81.0;
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(TuningError::Json(_))));
    }
}
