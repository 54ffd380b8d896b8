//! Demo-mode autopilot
//!
//! Each ball is flown forward on a copy, with the same gravity and wall rules
//! the real step uses, until it reaches paddle height. The paddle tracks the
//! ball that arrives first and only starts moving when it has to.

use rand::Rng;

use super::kinematics::{Field, advance_free_flight};
use super::state::{Ball, Paddle};

/// Where and when a ball is expected to reach the paddle's top edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    /// Predicted ball center x
    pub x: f32,
    /// Frames until arrival (equals the cap when no arrival was found)
    pub frames: u32,
}

/// Paddle action for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// Not time to move yet
    Idle,
    /// Close enough: jump the paddle center to this x and stop
    Snap(f32),
    /// Move at this velocity (pixels per frame)
    Move(f32),
}

/// Fly a copy of `ball` forward until its bottom edge reaches `paddle_top`.
///
/// The paddle itself is not simulated. If `max_frames` pass without arrival
/// the last simulated x is returned with `frames == max_frames`.
pub fn predict_intercept(
    ball: &Ball,
    paddle_top: i32,
    field: &Field,
    speed_factor: f32,
    max_frames: u32,
) -> Intercept {
    let mut ghost = ball.clone();
    for frame in 0..max_frames {
        let (rect, _) = advance_free_flight(&mut ghost, field, speed_factor);
        if rect.bottom() >= paddle_top {
            return Intercept {
                x: rect.center_x(),
                frames: frame,
            };
        }
    }
    Intercept {
        x: ghost.rect().center_x(),
        frames: max_frames,
    }
}

/// The intercept that happens first across all balls (earliest ball wins ties)
pub fn soonest_intercept(
    balls: &[Ball],
    paddle_top: i32,
    field: &Field,
    speed_factor: f32,
    max_frames: u32,
) -> Option<Intercept> {
    balls
        .iter()
        .map(|ball| predict_intercept(ball, paddle_top, field, speed_factor, max_frames))
        .fold(None, |best: Option<Intercept>, next| match best {
            Some(b) if b.frames <= next.frames => Some(b),
            _ => Some(next),
        })
}

/// Offset `x` by a fresh uniform sample from `[-jitter, jitter]`
pub fn jittered(x: f32, jitter: f32, rng: &mut impl Rng) -> f32 {
    if jitter > 0.0 {
        x + rng.random_range(-jitter..=jitter)
    } else {
        x
    }
}

/// Decide how to move so the paddle arrives `lead_frames` before the ball
pub fn decide(
    paddle_center: f32,
    target_x: f32,
    frames_left: u32,
    speed: f32,
    lead_frames: u32,
) -> Decision {
    let dist = (target_x - paddle_center).abs();
    let move_frames = (dist / speed).ceil() as u32;
    if frames_left > move_frames.saturating_add(lead_frames) {
        return Decision::Idle;
    }

    if dist <= speed {
        Decision::Snap(target_x)
    } else if target_x > paddle_center {
        Decision::Move(speed)
    } else {
        Decision::Move(-speed)
    }
}

/// Carry out a decision and keep the paddle on screen
pub fn apply(paddle: &mut Paddle, decision: Decision, screen_width: f32) {
    match decision {
        Decision::Idle => paddle.velocity = 0.0,
        Decision::Snap(center) => {
            paddle.set_center_x(center);
            paddle.velocity = 0.0;
        }
        Decision::Move(velocity) => {
            paddle.x += velocity;
            paddle.velocity = velocity;
        }
    }
    paddle.clamp_to(screen_width);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field(tuning: &Tuning) -> Field<'_> {
        Field {
            width: tuning.screen.width,
            height: tuning.screen.height,
            ball: &tuning.ball,
        }
    }

    #[test]
    fn test_straight_drop() {
        let mut tuning = Tuning::default();
        tuning.ball.gravity = 0.0;
        let ball = Ball::new(0, Vec2::new(100.0, 500.0), Vec2::new(0.0, 4.0), 10.0);
        // Bottom starts at 510 and needs to reach 614: 26 moves, frame index 25
        let hit = predict_intercept(&ball, 614, &field(&tuning), 1.0, 2000);
        assert_eq!(hit.frames, 25);
        assert_eq!(hit.x, 105.0);
    }

    #[test]
    fn test_prediction_follows_wall_bounce() {
        let mut tuning = Tuning::default();
        tuning.ball.gravity = 0.0;
        let ball = Ball::new(0, Vec2::new(20.0, 500.0), Vec2::new(-2.0, 4.0), 10.0);
        let hit = predict_intercept(&ball, 614, &field(&tuning), 1.0, 2000);
        // Bounces off the left wall at x = 0 and comes back out
        assert!(hit.x > 0.0 && hit.x < 60.0);
        assert_eq!(hit.frames, 25);
    }

    #[test]
    fn test_prediction_does_not_touch_real_ball() {
        let tuning = Tuning::default();
        let ball = Ball::new(0, Vec2::new(100.0, 100.0), Vec2::new(1.0, -3.0), 10.0);
        let before = ball.clone();
        predict_intercept(&ball, 614, &field(&tuning), 1.0, 2000);
        assert_eq!(ball.pos, before.pos);
        assert_eq!(ball.vel, before.vel);
    }

    #[test]
    fn test_prediction_cap() {
        let mut tuning = Tuning::default();
        tuning.ball.gravity = 0.0;
        // Purely horizontal: never reaches the paddle
        let ball = Ball::new(0, Vec2::new(100.0, 300.0), Vec2::new(3.0, 0.0), 10.0);
        let hit = predict_intercept(&ball, 614, &field(&tuning), 1.0, 50);
        assert_eq!(hit.frames, 50);
        assert_eq!(hit.x, ball.pos.x + 150.0 + 5.0);
    }

    #[test]
    fn test_soonest_picks_earliest() {
        let mut tuning = Tuning::default();
        tuning.ball.gravity = 0.0;
        let balls = [
            Ball::new(0, Vec2::new(100.0, 100.0), Vec2::new(0.0, 4.0), 10.0),
            Ball::new(1, Vec2::new(300.0, 550.0), Vec2::new(0.0, 4.0), 10.0),
        ];
        let hit = soonest_intercept(&balls, 614, &field(&tuning), 1.0, 2000).expect("two balls");
        assert_eq!(hit.x, 305.0);
        assert!(soonest_intercept(&[], 614, &field(&tuning), 1.0, 2000).is_none());
    }

    #[test]
    fn test_decide() {
        // 80 px away at 8 px/frame needs 10 frames; 3 lead frames
        assert_eq!(decide(100.0, 180.0, 14, 8.0, 3), Decision::Idle);
        assert_eq!(decide(100.0, 180.0, 13, 8.0, 3), Decision::Move(8.0));
        assert_eq!(decide(180.0, 100.0, 0, 8.0, 3), Decision::Move(-8.0));
        assert_eq!(decide(100.0, 105.0, 2, 8.0, 3), Decision::Snap(105.0));
    }

    #[test]
    fn test_decide_huge_lead_always_moves() {
        assert_eq!(decide(100.0, 180.0, 5, 8.0, u32::MAX), Decision::Move(8.0));
        assert_eq!(
            decide(100.0, 180.0, u32::MAX, 8.0, u32::MAX),
            Decision::Move(8.0)
        );
    }

    #[test]
    fn test_demo_with_max_lead_frames() {
        let mut tuning = Tuning::default();
        tuning.autoplay.lead_frames = u32::MAX;
        let mut state = crate::sim::GameState::new(tuning, 11).expect("valid");
        for _ in 0..120 {
            crate::sim::step_demo(&mut state, 1.0 / 60.0);
        }
        assert!(!state.balls.is_empty());
    }

    #[test]
    fn test_apply_snap_and_move() {
        let tuning = Tuning::default();
        let mut paddle = Paddle::new(&tuning.paddle, 512.0, 640.0);
        apply(&mut paddle, Decision::Snap(300.0), 512.0);
        assert_eq!(paddle.center_x(), 300.0);
        assert_eq!(paddle.velocity, 0.0);

        apply(&mut paddle, Decision::Move(-8.0), 512.0);
        assert_eq!(paddle.center_x(), 292.0);
        assert_eq!(paddle.velocity, -8.0);

        apply(&mut paddle, Decision::Snap(5000.0), 512.0);
        assert_eq!(paddle.x + paddle.width, 512.0);
    }

    #[test]
    fn test_jitter_range() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            let x = jittered(100.0, 2.0, &mut rng);
            assert!((98.0..=102.0).contains(&x));
        }
        assert_eq!(jittered(100.0, 0.0, &mut rng), 100.0);
    }
}
