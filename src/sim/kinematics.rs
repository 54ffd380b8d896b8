//! Ball kinematics and collision response
//!
//! One call advances one ball by one frame. Order is fixed: gravity,
//! integration, side walls, top wall, paddle. Positions stay in floating
//! point; only the derived `Rect` is rounded.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, Paddle};
use crate::tuning::{BallTuning, PaddleTuning};

/// Contacts detected while advancing a ball
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub side_wall: bool,
    pub top_wall: bool,
    pub paddle: bool,
    /// Top edge passed below the screen; remove the ball after this pass
    pub out_of_play: bool,
}

impl Contacts {
    /// Any wall (not paddle) contact
    pub fn wall(&self) -> bool {
        self.side_wall || self.top_wall
    }
}

/// Playfield bounds and the physics constants a ball needs
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    pub width: f32,
    pub height: f32,
    pub ball: &'a BallTuning,
}

/// Add gravity, scaled by the slow-motion factor
#[inline]
pub fn apply_gravity(vel: &mut Vec2, gravity: f32, speed_factor: f32) {
    vel.y += gravity * speed_factor;
}

/// Move by one frame of velocity
#[inline]
pub fn integrate(ball: &mut Ball, speed_factor: f32) {
    ball.pos += ball.vel * speed_factor;
}

/// Flip vx when touching either side wall
pub fn bounce_side_walls(ball: &mut Ball, rect: Rect, screen_width: f32) -> bool {
    if rect.left() <= 0 || rect.right() as f32 >= screen_width {
        ball.vel.x = -ball.vel.x;
        true
    } else {
        false
    }
}

/// Flip vy off the ceiling, then speed up (keeping direction) unless already
/// at the cap
pub fn bounce_top_wall(ball: &mut Ball, rect: Rect, tuning: &BallTuning) -> bool {
    if rect.top() > 0 {
        return false;
    }

    ball.vel.y = -ball.vel.y;
    let speed = ball.vel.length();
    if speed < tuning.max_speed {
        let speed = (speed * tuning.speed_increment).min(tuning.max_speed);
        let angle = ball.vel.y.atan2(ball.vel.x);
        ball.vel = Vec2::new(angle.cos() * speed, angle.sin() * speed);
    }
    true
}

/// Send a falling ball back up off the paddle.
///
/// The farther from the paddle's center the ball lands, the sharper the new
/// angle; paddle motion adds to vx. Both components are then sped up and
/// clamped to `±max_speed` independently.
pub fn bounce_off_paddle(
    ball: &mut Ball,
    rect: Rect,
    paddle: &Paddle,
    ball_tuning: &BallTuning,
    paddle_tuning: &PaddleTuning,
) -> bool {
    if ball.vel.y <= 0.0 || !rect.overlaps(&paddle.rect()) {
        return false;
    }

    let offset = (rect.center_x() - paddle.rect().center_x()) / (paddle.base_width / 2.0);
    let max = ball_tuning.max_speed;
    ball.vel.y = -ball.vel.y;
    ball.vel.x +=
        offset * ball_tuning.angle_influence + paddle.velocity * paddle_tuning.vel_influence;
    ball.vel.x = (ball.vel.x * ball_tuning.speed_increment).clamp(-max, max);
    ball.vel.y = (ball.vel.y * ball_tuning.speed_increment).clamp(-max, max);
    true
}

/// Gravity, motion and wall bounces (everything except the paddle).
///
/// Returns the ball's rect after the step along with the wall contacts.
pub fn advance_free_flight(ball: &mut Ball, field: &Field, speed_factor: f32) -> (Rect, Contacts) {
    apply_gravity(&mut ball.vel, field.ball.gravity, speed_factor);
    integrate(ball, speed_factor);

    let rect = ball.rect();
    let contacts = Contacts {
        side_wall: bounce_side_walls(ball, rect, field.width),
        top_wall: bounce_top_wall(ball, rect, field.ball),
        ..Contacts::default()
    };
    (rect, contacts)
}

/// Advance one ball by one frame against the walls and the paddle
pub fn advance_ball(
    ball: &mut Ball,
    paddle: &Paddle,
    field: &Field,
    paddle_tuning: &PaddleTuning,
    speed_factor: f32,
) -> Contacts {
    let (rect, mut contacts) = advance_free_flight(ball, field, speed_factor);
    contacts.paddle = bounce_off_paddle(ball, rect, paddle, field.ball, paddle_tuning);
    contacts.out_of_play = rect.top() as f32 > field.height;
    contacts
}

/// Velocity change per second; zero when no time elapsed
pub fn acceleration(prev_vel: Vec2, vel: Vec2, dt: f32) -> Vec2 {
    if dt > 0.0 {
        (vel - prev_vel) / dt
    } else {
        Vec2::ZERO
    }
}
