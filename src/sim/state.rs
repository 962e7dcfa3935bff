//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here, so a `GameState` can be
//! cloned for look-ahead or serialized for a snapshot.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{CircleBody, touches_floor};
use crate::consts::*;
use crate::safe_atan_ratio;
use crate::tuning::Tuning;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Targets alive, gun accepts input
    Playing,
    /// Both targets down; next round starts when the countdown runs out
    RoundOver { ticks_left: u32 },
}

/// Cosmetic projectile color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallColor {
    Blue,
    Green,
    Red,
    Brown,
}

impl BallColor {
    pub const ALL: [BallColor; 4] = [
        BallColor::Blue,
        BallColor::Green,
        BallColor::Red,
        BallColor::Brown,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: CircleBody,
    /// Velocity; `vel.y` is upward-positive while `body.pos.y` grows downward
    pub vel: Vec2,
    pub color: BallColor,
    /// Life counter carried for frontends, never decremented by the sim
    pub life: u32,
}

impl Projectile {
    /// Spawn a projectile at the launch point moving at `power` along `angle`
    pub fn launch(id: u32, tuning: &Tuning, angle: f32, power: u32, color: BallColor) -> Self {
        let (x, y) = tuning.projectile_spawn;
        Self {
            id,
            body: CircleBody::new(Vec2::new(x, y), tuning.projectile_radius),
            vel: launch_velocity(angle, power),
            color,
            life: tuning.projectile_life,
        }
    }

    /// Advance one tick: integrate, decay, then either bounce off the floor
    /// or fall under gravity
    pub fn step(&mut self, tuning: &Tuning) {
        self.body.pos.x += self.vel.x;
        self.body.pos.y -= self.vel.y;
        self.vel.x /= tuning.horizontal_drag;
        self.vel.y /= tuning.vertical_drag;

        if touches_floor(&self.body, tuning.floor_y) {
            self.vel.y = -self.vel.y / tuning.bounce_damping;
            self.vel.x /= tuning.floor_friction;
            self.body.pos.y = floor_rest_y(&self.body, tuning);
        } else {
            self.vel.y -= tuning.gravity;
        }
    }

    /// Slow enough to be considered at rest (and removed)
    #[inline]
    pub fn at_rest(&self, tuning: &Tuning) -> bool {
        self.vel.x.abs() + self.vel.y.abs() <= tuning.rest_threshold
    }
}

/// Center height a projectile is clamped to on floor contact
#[inline]
pub fn floor_rest_y(body: &CircleBody, tuning: &Tuning) -> f32 {
    tuning.floor_y - tuning.floor_margin - body.radius / 2.0
}

/// Launch velocity for a given aim angle (screen space) and power
#[inline]
pub fn launch_velocity(angle: f32, power: u32) -> Vec2 {
    let power = power as f32;
    Vec2::new(power * angle.cos(), -power * angle.sin())
}

/// A target bouncing up and down on the right side of the canvas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: usize,
    pub body: CircleBody,
    /// Vertical speed in pixels per tick (screen y)
    pub speed: f32,
    /// Liveness flag; dead targets are parked off-canvas and ignored
    pub live: bool,
}

impl Target {
    /// Fresh target with randomized speed, position and radius
    pub fn spawn(id: usize, rng: &mut impl Rng, tuning: &Tuning) -> Self {
        let speed = draw(rng, tuning.target_speed_range);
        let x = draw(rng, tuning.target_x_range);
        let y = draw(rng, tuning.target_y_range);
        let r = draw(rng, tuning.target_radius_range).max(1.0);
        Self {
            id,
            body: CircleBody::new(Vec2::new(x, y), r),
            speed,
            live: true,
        }
    }

    /// Move vertically, reversing at the edges of the bounce band
    pub fn step(&mut self, tuning: &Tuning) {
        if !self.live {
            return;
        }
        self.body.pos.y += self.speed;
        if self.body.pos.y <= tuning.target_bounce_top || self.body.pos.y >= tuning.target_bounce_bottom
        {
            self.speed = -self.speed;
        }
    }

    /// Clear the liveness flag and park the target off-canvas
    pub fn destroy(&mut self) {
        self.live = false;
        self.body.pos = Vec2::new(OFF_CANVAS_X, OFF_CANVAS_Y);
    }
}

/// Integer draw from a half-open range; an empty range yields its start
fn draw(rng: &mut impl Rng, (lo, hi): (i32, i32)) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi) as f32
    } else {
        lo as f32
    }
}

/// The launcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gun {
    /// Aim angle in radians (screen space: negative points up)
    pub angle: f32,
    /// Charge power, kept within `[min_power, max_power]`
    pub power: u32,
    /// Fire control held
    pub charging: bool,
    /// Last pointer position the aim was derived from
    pub aim_point: Vec2,
}

impl Gun {
    pub fn new(tuning: &Tuning) -> Self {
        let aim_point = Self::pivot() + Vec2::new(30.0, -30.0);
        Self {
            angle: Self::angle_for(aim_point, tuning.aim_min_dx),
            power: tuning.min_power,
            charging: false,
            aim_point,
        }
    }

    /// Fixed pivot the aim is measured from
    #[inline]
    pub fn pivot() -> Vec2 {
        Vec2::new(GUN_PIVOT_X, GUN_PIVOT_Y)
    }

    /// Aim angle for a pointer at `point`
    pub fn angle_for(point: Vec2, min_dx: f32) -> f32 {
        let delta = point - Self::pivot();
        safe_atan_ratio(delta.y, delta.x, min_dx)
    }

    /// Re-aim at a pointer position
    pub fn aim_at(&mut self, point: Vec2, min_dx: f32) {
        self.aim_point = point;
        self.angle = Self::angle_for(point, min_dx);
    }

    pub fn start_charge(&mut self) {
        self.charging = true;
    }

    /// One tick of charging (no-op unless held)
    pub fn power_up(&mut self, max_power: u32) {
        if self.charging && self.power < max_power {
            self.power += 1;
        }
    }

    /// Stop charging and hand back the accumulated power, resetting to the floor
    pub fn release(&mut self, min_power: u32) -> u32 {
        let power = self.power;
        self.power = min_power;
        self.charging = false;
        power
    }

    /// Drop a held charge without firing
    pub fn cancel_charge(&mut self, min_power: u32) {
        self.power = min_power;
        self.charging = false;
    }

    /// End point of the aim line
    pub fn aim_line_end(&self) -> Vec2 {
        let len = (self.power as f32).max(AIM_LINE_MIN_LEN);
        Self::pivot() + Vec2::new(self.angle.cos(), self.angle.sin()) * len
    }
}

/// Things that happened during the last tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { projectile: u32, power: u32, angle: f32 },
    TargetDestroyed { target: usize, projectile: u32 },
    ProjectileRested { projectile: u32 },
    RoundCleared { round: u32, shots: u32, score: u64 },
    RoundStarted { round: u32 },
}

/// RNG state wrapper for serialization
///
/// Each draw site asks for a fresh generator on the next stream, so the
/// sequence only depends on the seed and how many times it was asked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::seed_from_u64(
            self.seed
                .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        );
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,
    pub tuning: Tuning,
    /// Cleared rounds; never reset
    pub score: u64,
    /// Current round number (1-based)
    pub round: u32,
    /// Shots fired this round
    pub shots: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub gun: Gun,
    pub targets: [Target; 2],
    /// Live projectiles in spawn order
    pub projectiles: Vec<Projectile>,
    /// Round-cleared banner, shown during the restart delay
    pub message: Option<String>,
    /// Events from the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the reference tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game and spawn the first round's targets
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng_state = RngState::new(seed);
        let mut rng = rng_state.next_rng();
        let targets = [
            Target::spawn(0, &mut rng, &tuning),
            Target::spawn(1, &mut rng, &tuning),
        ];
        let gun = Gun::new(&tuning);

        Self {
            seed,
            rng_state,
            tuning,
            score: 0,
            round: 1,
            shots: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            gun,
            targets,
            projectiles: Vec::new(),
            message: None,
            events: vec![GameEvent::RoundStarted { round: 1 }],
            next_id: 1,
        }
    }

    /// Allocate a new projectile ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn live_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| t.live)
    }

    pub fn all_targets_down(&self) -> bool {
        self.targets.iter().all(|t| !t.live)
    }

    /// Text for the HUD banner after a round is cleared
    pub fn cleared_message(shots: u32) -> String {
        let noun = if shots == 1 { "shot" } else { "shots" };
        format!("You destroyed the targets in {shots} {noun}")
    }
}
