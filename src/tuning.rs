//! Data-driven game balance
//!
//! Every gameplay constant the tick reads lives here so balance can be tweaked
//! from a JSON file without recompiling. `Default` is the reference tuning.

use serde::{Deserialize, Serialize};

/// Physics and round-flow tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Projectile ballistics ===
    /// Downward acceleration applied to vy each airborne tick
    pub gravity: f32,
    /// Horizontal decay divisor per tick
    pub horizontal_drag: f32,
    /// Vertical decay divisor per tick
    pub vertical_drag: f32,
    /// Floor line (screen y); contact when `y + r >= floor_y`
    pub floor_y: f32,
    /// vy divisor on floor contact (after reflection)
    pub bounce_damping: f32,
    /// On floor contact the center is set to `floor_y - floor_margin - r / 2`,
    /// leaving the ball half-sunk so low bounces stay in contact and die out
    pub floor_margin: f32,
    /// vx divisor on floor contact
    pub floor_friction: f32,
    /// Projectile is at rest once `|vx| + |vy| <= rest_threshold`
    pub rest_threshold: f32,
    /// Spawn point of new projectiles
    pub projectile_spawn: (f32, f32),
    /// Radius of new projectiles
    pub projectile_radius: f32,
    /// Initial (unused) life counter
    pub projectile_life: u32,

    // === Gun ===
    /// Charge power floor (and reset value after firing)
    pub min_power: u32,
    /// Charge power ceiling
    pub max_power: u32,
    /// Smallest |dx| used in the aim angle computation
    pub aim_min_dx: f32,

    // === Targets ===
    /// Spawn x range (half-open, integer draws)
    pub target_x_range: (i32, i32),
    /// Spawn y range (half-open, integer draws)
    pub target_y_range: (i32, i32),
    /// Radius range (half-open, integer draws)
    pub target_radius_range: (i32, i32),
    /// Vertical speed range (half-open, integer draws)
    pub target_speed_range: (i32, i32),
    /// Targets reverse when `y <= top`
    pub target_bounce_top: f32,
    /// Targets reverse when `y >= bottom`
    pub target_bounce_bottom: f32,

    // === Round flow ===
    /// Ticks between clearing a round and the next round starting
    pub restart_delay_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 2.5,
            horizontal_drag: 1.005,
            vertical_drag: 1.05,
            floor_y: 600.0,
            bounce_damping: 1.2,
            floor_margin: 1.0,
            floor_friction: 1.07,
            rest_threshold: 0.05,
            projectile_spawn: (40.0, 450.0),
            projectile_radius: 15.0,
            projectile_life: 30,

            min_power: 10,
            max_power: 100,
            aim_min_dx: 1e-3,

            target_x_range: (600, 780),
            target_y_range: (300, 550),
            target_radius_range: (10, 50),
            target_speed_range: (-5, 5),
            target_bounce_top: 300.0,
            target_bounce_bottom: 600.0,

            // 700 ms at 30 ms per tick
            restart_delay_ticks: 24,
        }
    }
}

#[cfg(test)]
impl Tuning {
    /// Same tuning with gravity switched off
    pub(crate) fn without_gravity(&self) -> Self {
        Self {
            gravity: 0.0,
            ..self.clone()
        }
    }
}
