//! Runtime settings
//!
//! Loaded from an optional JSON file; anything missing falls back to defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SUBSTEPS, TICK_INTERVAL_MS};
use crate::tuning::Tuning;

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation interval (milliseconds per tick)
    pub tick_interval_ms: u64,
    /// Maximum ticks run per frame
    pub max_substeps: u32,
    /// Fixed run seed; a time-based seed is used when absent
    pub seed: Option<u64>,
    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: TICK_INTERVAL_MS,
            max_substeps: MAX_SUBSTEPS,
            seed: None,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject settings that would break the simulation invariants
    pub fn validate(&self) -> anyhow::Result<()> {
        let t = &self.tuning;
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        ensure!(self.max_substeps > 0, "max_substeps must be positive");
        ensure!(
            t.projectile_radius > 0.0,
            "projectile_radius must be positive (got {})",
            t.projectile_radius
        );
        ensure!(
            t.target_radius_range.0 >= 1,
            "target radii must be positive (range starts at {})",
            t.target_radius_range.0
        );
        ensure!(
            t.min_power <= t.max_power,
            "min_power {} exceeds max_power {}",
            t.min_power,
            t.max_power
        );
        ensure!(
            t.target_bounce_top < t.target_bounce_bottom,
            "target bounce band is inverted ({} >= {})",
            t.target_bounce_top,
            t.target_bounce_bottom
        );
        ensure!(
            t.horizontal_drag > 0.0 && t.vertical_drag > 0.0,
            "drag divisors must be positive"
        );
        ensure!(
            t.bounce_damping > 0.0 && t.floor_friction > 0.0,
            "floor damping divisors must be positive"
        );
        ensure!(t.aim_min_dx > 0.0, "aim_min_dx must be positive");
        Ok(())
    }

    /// Load settings from a file, falling back to defaults on any problem
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not read settings {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(settings) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Malformed settings in {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
