//! Paddle movement and resizing
//!
//! Keyboard intent becomes a target velocity; the actual velocity eases
//! toward it along a snappy Bézier curve so starts and stops feel smooth but
//! quick. Resize power-ups change the width around the current center.

use serde::{Deserialize, Serialize};

use super::state::Paddle;
use crate::snappy_ease;
use crate::tuning::PaddleTuning;

/// Eased transition between paddle velocities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityEase {
    pub current: f32,
    pub target: f32,
    /// Velocity when the current transition began
    pub start: f32,
    /// 0 at the start of a transition, 1 once settled
    pub progress: f32,
}

impl Default for VelocityEase {
    fn default() -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            start: 0.0,
            progress: 1.0,
        }
    }
}

impl VelocityEase {
    /// Advance by `dt` seconds toward `target` and return the new velocity
    pub fn update(&mut self, target: f32, dt: f32, rate: f32) -> f32 {
        if target != self.target {
            self.target = target;
            self.start = self.current;
            self.progress = 0.0;
        }

        if self.progress < 1.0 {
            self.progress = (self.progress + rate * dt).min(1.0);
            let eased = snappy_ease(self.progress);
            self.current = self.start + (self.target - self.start) * eased;
        } else {
            self.current = self.target;
        }
        self.current
    }
}

/// Target velocity for the held direction keys.
///
/// Right wins when both are held. A direction is ignored while the paddle
/// already touches that wall.
pub fn target_velocity(
    paddle: &Paddle,
    left: bool,
    right: bool,
    speed: f32,
    screen_width: f32,
) -> f32 {
    let rect = paddle.rect();
    let mut target = 0.0;
    if left && rect.left() > 0 {
        target = -speed;
    }
    if right && (rect.right() as f32) < screen_width {
        target = speed;
    }
    target
}

/// Ease toward the requested velocity, move and clamp on screen
pub fn drive(
    paddle: &mut Paddle,
    target: f32,
    dt: f32,
    tuning: &PaddleTuning,
    screen_width: f32,
) {
    let velocity = paddle.ease.update(target, dt, tuning.transition_rate);
    paddle.velocity = velocity;
    paddle.x += velocity;
    paddle.clamp_to(screen_width);
}

/// Scale the paddle to `base_width * factor` around its center and (re)start
/// the resize timer.
///
/// The new width is truncated to whole pixels so the rounded rect never
/// spills past a wall once clamped.
pub fn apply_resize(paddle: &mut Paddle, factor: f32, duration: f32, screen_width: f32) {
    let center = paddle.center_x();
    paddle.width = (paddle.base_width * factor).trunc().max(1.0);
    paddle.set_center_x(center);
    paddle.clamp_to(screen_width);
    paddle.resize_timer = duration;
}

/// Count down the resize effect; returns true when the paddle was restored
pub fn tick_resize(paddle: &mut Paddle, dt: f32, screen_width: f32) -> bool {
    if paddle.resize_timer <= 0.0 {
        return false;
    }
    paddle.resize_timer -= dt;
    if paddle.resize_timer > 0.0 {
        return false;
    }

    paddle.resize_timer = 0.0;
    let center = paddle.center_x();
    paddle.width = paddle.base_width;
    paddle.set_center_x(center);
    paddle.clamp_to(screen_width);
    log::debug!("Paddle restored to {} px", paddle.width);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn paddle() -> Paddle {
        let tuning = Tuning::default();
        Paddle::new(&tuning.paddle, 512.0, 640.0)
    }

    #[test]
    fn test_ease_reaches_target() {
        let mut ease = VelocityEase::default();
        let mut v = 0.0;
        // Rate 12/s at 60 fps needs five frames to complete
        for _ in 0..5 {
            v = ease.update(8.0, DT, 12.0);
        }
        assert!((v - 8.0).abs() < 1e-4);
        assert_eq!(ease.update(8.0, DT, 12.0), 8.0);
    }

    #[test]
    fn test_ease_is_gradual() {
        let mut ease = VelocityEase::default();
        let first = ease.update(8.0, DT, 12.0);
        assert!(first > 0.0 && first < 8.0);
        let second = ease.update(8.0, DT, 12.0);
        assert!(second > first);
    }

    #[test]
    fn test_ease_restarts_from_current_velocity() {
        let mut ease = VelocityEase::default();
        ease.update(8.0, DT, 12.0);
        let before = ease.update(8.0, DT, 12.0);
        ease.update(-8.0, DT, 12.0);
        assert_eq!(ease.start, before);
        assert!(ease.current < before);
    }

    #[test]
    fn test_target_velocity_respects_walls() {
        let mut p = paddle();
        assert_eq!(target_velocity(&p, true, false, 8.0, 512.0), -8.0);
        assert_eq!(target_velocity(&p, false, true, 8.0, 512.0), 8.0);
        assert_eq!(target_velocity(&p, true, true, 8.0, 512.0), 8.0);
        assert_eq!(target_velocity(&p, false, false, 8.0, 512.0), 0.0);

        p.x = 0.0;
        assert_eq!(target_velocity(&p, true, false, 8.0, 512.0), 0.0);
        p.x = 432.0;
        assert_eq!(target_velocity(&p, false, true, 8.0, 512.0), 0.0);
    }

    #[test]
    fn test_drive_stays_on_screen() {
        let tuning = Tuning::default();
        let mut p = paddle();
        for _ in 0..200 {
            drive(&mut p, -8.0, DT, &tuning.paddle, 512.0);
            assert!(p.x >= 0.0);
        }
        assert_eq!(p.x, 0.0);
        for _ in 0..200 {
            drive(&mut p, 8.0, DT, &tuning.paddle, 512.0);
            assert!(p.x + p.width <= 512.0);
        }
        assert_eq!(p.x + p.width, 512.0);
    }

    #[test]
    fn test_enlarge_then_revert_keeps_center() {
        let mut p = paddle();
        let center = p.center_x();
        apply_resize(&mut p, 1.5, 8.0, 512.0);
        assert_eq!(p.width, 120.0);
        assert_eq!(p.center_x(), center);

        let mut restored = false;
        let mut elapsed = 0.0;
        while !restored {
            restored = tick_resize(&mut p, DT, 512.0);
            elapsed += DT;
            assert!(elapsed < 8.5, "resize never reverted");
        }
        assert!(elapsed >= 8.0 - 1e-3);
        assert_eq!(p.width, 80.0);
        assert_eq!(p.center_x(), center);
        assert!(!p.is_resized());
    }

    #[test]
    fn test_resize_while_active_resets_timer() {
        let mut p = paddle();
        apply_resize(&mut p, 1.5, 8.0, 512.0);
        tick_resize(&mut p, 5.0, 512.0);
        apply_resize(&mut p, 0.5, 8.0, 512.0);
        assert_eq!(p.width, 40.0);
        assert_eq!(p.resize_timer, 8.0);
    }

    #[test]
    fn test_resize_near_wall_is_clamped() {
        let mut p = paddle();
        p.x = 0.0;
        apply_resize(&mut p, 1.5, 8.0, 512.0);
        assert_eq!(p.x, 0.0);
        assert_eq!(p.width, 120.0);
    }

    #[test]
    fn test_odd_width_enlarge_stays_inside_right_wall() {
        let mut tuning = Tuning::default();
        tuning.paddle.width = 81.0;
        let mut p = Paddle::new(&tuning.paddle, 512.0, 640.0);
        apply_resize(&mut p, 1.5, 8.0, 512.0);
        assert_eq!(p.width, 121.0);

        for _ in 0..200 {
            drive(&mut p, 8.0, DT, &tuning.paddle, 512.0);
            let rect = p.rect();
            assert!(rect.left() >= 0);
            assert!(rect.right() <= 512, "rect {rect:?} crosses the wall");
        }
        assert_eq!(p.rect().right(), 512);

        for _ in 0..200 {
            drive(&mut p, -8.0, DT, &tuning.paddle, 512.0);
            assert!(p.rect().left() >= 0);
        }
    }

    #[test]
    fn test_shrink_truncates_to_whole_pixels() {
        let mut tuning = Tuning::default();
        tuning.paddle.width = 81.0;
        let mut p = Paddle::new(&tuning.paddle, 512.0, 640.0);
        apply_resize(&mut p, 0.5, 8.0, 512.0);
        assert_eq!(p.width, 40.0);
    }
}
