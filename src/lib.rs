//! Cannonade - a cannon-vs-targets ballistics toy
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ballistics, collisions, round flow)
//! - `scene`: Backend-agnostic display list built from the simulation state
//! - `session`: Input queueing + fixed-step scheduling around the simulation
//! - `timer`: Fixed-interval tick scheduler
//! - `tuning`: Data-driven game balance
//! - `settings`: Runtime configuration

pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;
pub mod timer;
pub mod tuning;

pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation interval in milliseconds (one tick)
    pub const TICK_INTERVAL_MS: u64 = 30;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Canvas dimensions (screen coordinates, y grows downward)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Gun pivot (aim line origin, angle reference)
    pub const GUN_PIVOT_X: f32 = 20.0;
    pub const GUN_PIVOT_Y: f32 = 450.0;
    /// Shortest aim line drawn, even at low power
    pub const AIM_LINE_MIN_LEN: f32 = 20.0;

    /// Where destroyed targets are parked
    pub const OFF_CANVAS_X: f32 = -10.0;
    pub const OFF_CANVAS_Y: f32 = -10.0;

    /// HUD text anchors
    pub const SCORE_TEXT_X: f32 = 30.0;
    pub const SCORE_TEXT_Y: f32 = 30.0;
    pub const MESSAGE_TEXT_X: f32 = 400.0;
    pub const MESSAGE_TEXT_Y: f32 = 300.0;
}

/// Arctangent of `dy / dx` with the denominator kept at least `min_dx` away
/// from zero (sign preserved, `dx == 0` treated as positive).
///
/// Always finite: a pointer straight above or below the pivot gives an angle
/// just short of ±π/2.
#[inline]
pub fn safe_atan_ratio(dy: f32, dx: f32, min_dx: f32) -> f32 {
    let dx = if dx.abs() < min_dx {
        if dx < 0.0 { -min_dx } else { min_dx }
    } else {
        dx
    };
    (dy / dx).atan()
}
