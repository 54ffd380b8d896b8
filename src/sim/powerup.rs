//! Power-up spawning, contact resolution and expiry
//!
//! At most one power-up exists at a time. Slow motion is consumed on first
//! touch; the others stay until they time out and may fire again for a ball
//! that leaves and re-enters the bar.

use glam::Vec2;
use rand::Rng;

use super::rect::Rect;
use super::state::{Ball, BallIds, Powerup, PowerupKind};
use crate::tuning::Tuning;

/// Smallest |vx| accepted for a duplicated ball
const MIN_DUPLICATE_VX: f32 = 1e-3;
/// Launch angle bounds for duplicated balls (radians), excluding near-horizontal
const DUPLICATE_ANGLE_MIN: f32 = 0.1;
const DUPLICATE_ANGLE_MAX: f32 = 3.04;

/// What a ball touching the power-up caused
#[derive(Debug, Clone)]
pub enum Triggered {
    /// Start (or restart) global slow motion; the power-up is gone
    SlowMotion,
    /// A new ball to add after the current pass
    Duplicate(Ball),
    /// Resize the paddle to `base_width * factor`
    Resize(f32),
}

/// Same speed, new random direction, same up/down sense as the original
pub fn duplicate_velocity(vel: Vec2, rng: &mut impl Rng) -> Vec2 {
    let speed = vel.length();
    let sense = if vel.y < 0.0 { -1.0 } else { 1.0 };
    // Too slow for any angle to clear the vx floor: take the shallowest angle
    if speed * DUPLICATE_ANGLE_MIN.cos() < MIN_DUPLICATE_VX {
        let (sin, cos) = DUPLICATE_ANGLE_MIN.sin_cos();
        return Vec2::new(speed * cos, sense * speed * sin);
    }
    loop {
        let angle: f32 = rng.random_range(DUPLICATE_ANGLE_MIN..DUPLICATE_ANGLE_MAX);
        let vx = speed * angle.cos();
        if vx.abs() < MIN_DUPLICATE_VX {
            continue;
        }
        return Vec2::new(vx, sense * speed * angle.sin());
    }
}

/// Every kind is equally likely once a spawn happens
pub fn choose_kind(rng: &mut impl Rng) -> PowerupKind {
    PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())]
}

/// Build a power-up of `kind` somewhere in the upper half of the screen
pub fn spawn(kind: PowerupKind, tuning: &Tuning, rng: &mut impl Rng) -> Powerup {
    let spec = kind.spec(&tuning.powerups);
    let margin = tuning.powerups.margin_x as i32;
    let max_x = (tuning.screen.width - spec.width) as i32 - margin;
    let min_y = tuning.powerups.min_y as i32;
    let max_y = (tuning.screen.height / 2.0).floor() as i32;

    let x = rng.random_range(margin..=max_x);
    let y = rng.random_range(min_y..=max_y);
    let rect = Rect::new(x, y, spec.width.round() as i32, spec.height.round() as i32);
    Powerup::new(kind, rect, spec.lifetime)
}

/// Roll for a new power-up when none is active.
///
/// One uniform sample per frame against the combined chance of all kinds.
pub fn maybe_spawn(
    slot: &mut Option<Powerup>,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<PowerupKind> {
    if slot.is_some() {
        return None;
    }
    let roll: f32 = rng.random();
    if roll >= tuning.powerups.total_chance() {
        return None;
    }

    let kind = choose_kind(rng);
    let powerup = spawn(kind, tuning, rng);
    log::debug!("Spawned {} power-up at {:?}", kind.as_str(), powerup.rect);
    *slot = Some(powerup);
    Some(kind)
}

/// Check one ball against the active power-up.
///
/// Repeatable kinds fire once per overlap episode: the ball id is remembered
/// while it overlaps and forgotten once it leaves.
pub fn resolve_contact(
    slot: &mut Option<Powerup>,
    ball: &Ball,
    ball_rect: Rect,
    ids: &mut BallIds,
    tuning: &Tuning,
    rng: &mut impl Rng,
) -> Option<Triggered> {
    let powerup = slot.as_mut()?;
    let overlapping = powerup.rect.overlaps(&ball_rect);

    if powerup.kind.is_consumable() {
        if overlapping {
            log::debug!("Ball {} consumed slow-motion power-up", ball.id);
            *slot = None;
            return Some(Triggered::SlowMotion);
        }
        return None;
    }

    if !overlapping {
        powerup.collided.remove(&ball.id);
        return None;
    }
    if powerup.collided.contains(&ball.id) {
        return None;
    }

    let resize = &tuning.powerups.resize;
    let triggered = match powerup.kind {
        PowerupKind::Duplicate => {
            let id = ids.allocate();
            let vel = duplicate_velocity(ball.vel, rng);
            powerup.collided.insert(id);
            Triggered::Duplicate(Ball::new(id, ball.pos, vel, ball.size))
        }
        PowerupKind::PaddleEnlarge => Triggered::Resize(resize.enlarge_factor),
        PowerupKind::PaddleShrink => Triggered::Resize(resize.shrink_factor),
        PowerupKind::SlowMotion => Triggered::SlowMotion,
    };
    powerup.collided.insert(ball.id);
    log::debug!("Ball {} triggered {} power-up", ball.id, powerup.kind.as_str());

    Some(triggered)
}

/// Count down the power-up's lifetime; returns the kind if it just expired
pub fn tick_lifetime(slot: &mut Option<Powerup>, dt: f32) -> Option<PowerupKind> {
    let powerup = slot.as_mut()?;
    powerup.timer -= dt;
    if powerup.timer > 0.0 {
        return None;
    }
    let kind = powerup.kind;
    *slot = None;
    log::debug!("{} power-up expired", kind.as_str());
    Some(kind)
}
