//! Demo-mode autopilot
//!
//! Plays the game through the same pointer events a player would send. Shots
//! are planned by running candidate launches forward with the real step
//! functions, so a planned hit is a guaranteed hit unless another projectile
//! gets there first.

use glam::Vec2;

use super::body::circles_collide;
use super::state::{BallColor, GamePhase, GameState, Gun, Projectile, Target};
use super::tick::{PointerEvent, TickInput};

/// Flight ticks simulated per candidate
const PLAN_HORIZON_TICKS: u32 = 200;
/// Candidate aim angles (radians, screen space; negative aims up)
const AIM_MIN_ANGLE: f32 = -1.48;
const AIM_MAX_ANGLE: f32 = 0.35;
const AIM_STEPS: u32 = 104;
/// Power candidates are tried in steps of this size
const POWER_STEP: u32 = 5;
/// Distance from the pivot at which the virtual pointer is placed
const AIM_REACH: f32 = 100.0;

/// A planned shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPlan {
    /// Pointer position to aim with
    pub aim_point: Vec2,
    /// Power to release at
    pub power: u32,
    /// Target the shot connects with
    pub target: usize,
    /// Ticks from the press until the hit (charging included)
    pub ticks_to_hit: u32,
}

/// Find the quickest hit against any live target not in `skip`
pub fn plan_shot(state: &GameState, skip: Option<usize>) -> Option<ShotPlan> {
    let tuning = &state.tuning;
    let start_power = state.gun.power.clamp(tuning.min_power, tuning.max_power);

    let mut powers: Vec<u32> = (start_power..=tuning.max_power)
        .step_by(POWER_STEP as usize)
        .collect();
    if powers.last() != Some(&tuning.max_power) {
        powers.push(tuning.max_power);
    }

    let mut best: Option<ShotPlan> = None;
    for &power in &powers {
        let charge_ticks = power - start_power;
        if best.is_some_and(|b| b.ticks_to_hit <= charge_ticks) {
            break;
        }

        // Targets as they will be on the release tick
        let mut targets_at_release = state.targets.clone();
        for _ in 0..charge_ticks {
            for target in &mut targets_at_release {
                target.step(tuning);
            }
        }

        for i in 0..=AIM_STEPS {
            let angle = AIM_MIN_ANGLE + (AIM_MAX_ANGLE - AIM_MIN_ANGLE) * i as f32 / AIM_STEPS as f32;
            let aim_point = Gun::pivot() + Vec2::new(angle.cos(), angle.sin()) * AIM_REACH;

            let Some((target, flight)) = simulate_shot(state, &targets_at_release, aim_point, power, skip)
            else {
                continue;
            };
            let ticks_to_hit = charge_ticks + flight;
            if best.is_none_or(|b| ticks_to_hit < b.ticks_to_hit) {
                best = Some(ShotPlan {
                    aim_point,
                    power,
                    target,
                    ticks_to_hit,
                });
            }
        }
    }
    best
}

/// Fly one candidate shot; returns the first target hit and the release-tick
/// relative tick it happens on (1 = the release tick itself)
fn simulate_shot(
    state: &GameState,
    targets: &[Target; 2],
    aim_point: Vec2,
    power: u32,
    skip: Option<usize>,
) -> Option<(usize, u32)> {
    let tuning = &state.tuning;
    let mut targets = targets.clone();
    let angle = Gun::angle_for(aim_point, tuning.aim_min_dx);
    let mut projectile = Projectile::launch(0, tuning, angle, power, BallColor::Blue);

    for flight in 1..=PLAN_HORIZON_TICKS {
        projectile.step(tuning);
        for target in targets.iter().filter(|t| t.live && Some(t.id) != skip) {
            if circles_collide(&projectile.body, &target.body) {
                return Some((target.id, flight));
            }
        }
        if projectile.at_rest(tuning) {
            return None;
        }
        for target in &mut targets {
            target.step(tuning);
        }
    }
    None
}

/// A shot in flight expected to take a target down
#[derive(Debug, Clone, Copy)]
struct Claim {
    target: usize,
    until_tick: u64,
}

/// Stateful driver turning plans into press / hold / release input
#[derive(Debug, Default)]
pub struct Autopilot {
    plan: Option<ShotPlan>,
    claim: Option<Claim>,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Input for the next tick of `state`
    pub fn next_input(&mut self, state: &GameState) -> TickInput {
        if !matches!(state.phase, GamePhase::Playing) {
            self.plan = None;
            self.claim = None;
            return TickInput::default();
        }

        // Forget claims that landed or lapsed
        if let Some(claim) = self.claim {
            if !state.targets[claim.target].live || state.time_ticks > claim.until_tick {
                self.claim = None;
            }
        }

        if self.plan.is_some() && !state.gun.charging {
            self.plan = None;
        }

        if let Some(plan) = self.plan {
            if state.gun.power >= plan.power {
                self.plan = None;
                self.stake_claim(state, &plan);
                return TickInput::new()
                    .with(PointerEvent::Move(plan.aim_point))
                    .with(PointerEvent::Release);
            }
            return TickInput::default();
        }

        let skip = self.claim.map(|c| c.target);
        if state.live_targets().all(|t| Some(t.id) == skip) {
            // Everything left is already spoken for
            return TickInput::default();
        }

        let plan = plan_shot(state, skip).unwrap_or_else(|| fallback_plan(state, skip));
        log::debug!(
            "Autopilot: target {} at power {}, hit in {} ticks",
            plan.target,
            plan.power,
            plan.ticks_to_hit
        );

        let input = TickInput::new()
            .with(PointerEvent::Move(plan.aim_point))
            .with(PointerEvent::Press);
        if state.gun.power >= plan.power {
            self.stake_claim(state, &plan);
            return input.with(PointerEvent::Release);
        }
        self.plan = Some(plan);
        input
    }

    fn stake_claim(&mut self, state: &GameState, plan: &ShotPlan) {
        self.claim = Some(Claim {
            target: plan.target,
            until_tick: state.time_ticks + plan.ticks_to_hit as u64 + 1,
        });
    }
}

/// No hit found: lob a full-power shot straight at the first open target
fn fallback_plan(state: &GameState, skip: Option<usize>) -> ShotPlan {
    let target = state
        .live_targets()
        .find(|t| Some(t.id) != skip)
        .map(|t| (t.id, t.body.pos))
        .unwrap_or((0, Gun::pivot() + Vec2::new(AIM_REACH, -AIM_REACH)));
    ShotPlan {
        aim_point: target.1,
        power: state.tuning.max_power,
        target: target.0,
        ticks_to_hit: PLAN_HORIZON_TICKS,
    }
}
