//! Simulation module
//!
//! All gameplay logic lives here. This module is pure and synchronous:
//! - One call per rendered frame, variable `dt`
//! - Seeded RNG only
//! - Stable iteration order (ball creation order)
//! - No rendering, audio or platform dependencies

pub mod autoplay;
pub mod kinematics;
pub mod paddle;
pub mod powerup;
pub mod rect;
pub mod state;
pub mod tick;

pub use autoplay::{Decision, Intercept, predict_intercept};
pub use kinematics::{Contacts, Field, advance_ball};
pub use paddle::VelocityEase;
pub use powerup::{Triggered, duplicate_velocity};
pub use rect::Rect;
pub use state::{
    Ball, BallId, BallIds, BallStats, BallView, FrameSnapshot, GameEvent, GamePhase, GameState,
    Paddle, Powerup, PowerupKind,
};
pub use tick::{RoundStatus, TickInput, step_demo, step_round};
