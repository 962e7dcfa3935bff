//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed interval only (one `tick` = one step, no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (projectiles in spawn order, targets by index)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod body;
pub mod state;
pub mod tick;

pub use autopilot::{Autopilot, ShotPlan, plan_shot};
pub use body::{CircleBody, circles_collide, touches_floor};
pub use state::{
    BallColor, GameEvent, GamePhase, GameState, Gun, Projectile, RngState, Target,
    floor_rest_y, launch_velocity,
};
pub use tick::{PointerEvent, TickInput, start_round, tick};
