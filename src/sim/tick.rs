//! Fixed-interval simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! tick; pointer input gathered since the previous tick is applied first.

use glam::Vec2;

use super::body::circles_collide;
use super::state::{BallColor, GameEvent, GamePhase, GameState, Projectile, Target};

/// A pointer event delivered between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved (canvas coordinates)
    Move(Vec2),
    /// Fire control pressed: start charging
    Press,
    /// Fire control released: fire
    Release,
}

/// Input for a single tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<PointerEvent>,
}

impl TickInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style push
    pub fn with(mut self, event: PointerEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    /// Append another input's events after this one's
    pub fn extend(&mut self, other: TickInput) {
        self.events.extend(other.events);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();
    state.time_ticks += 1;

    let accepts_fire = matches!(state.phase, GamePhase::Playing);
    for event in &input.events {
        match *event {
            PointerEvent::Move(point) => state.gun.aim_at(point, state.tuning.aim_min_dx),
            // Fire controls are unbound while the round-over banner is up
            PointerEvent::Press if accepts_fire => state.gun.start_charge(),
            PointerEvent::Release if accepts_fire => fire(state),
            PointerEvent::Press | PointerEvent::Release => {}
        }
    }

    match state.phase {
        GamePhase::RoundOver { ticks_left } => {
            if ticks_left <= 1 {
                start_round(state);
            } else {
                state.phase = GamePhase::RoundOver {
                    ticks_left: ticks_left - 1,
                };
            }
        }

        GamePhase::Playing => {
            advance_projectiles(state);

            if state.all_targets_down() {
                clear_round(state);
            } else {
                for target in &mut state.targets {
                    target.step(&state.tuning);
                }
            }

            state.gun.power_up(state.tuning.max_power);
        }
    }
}

/// Launch a projectile with the gun's current aim and charge
fn fire(state: &mut GameState) {
    let power = state.gun.release(state.tuning.min_power);
    let angle = state.gun.angle;
    let id = state.next_entity_id();
    let color = BallColor::random(&mut state.rng_state.next_rng());

    state
        .projectiles
        .push(Projectile::launch(id, &state.tuning, angle, power, color));
    state.shots += 1;
    state.events.push(GameEvent::Fired {
        projectile: id,
        power,
        angle,
    });
    log::debug!("Shot {} fired: power {power}, angle {angle:.3}", state.shots);
}

/// Move every projectile, resolve hits against live targets, drop resting ones
fn advance_projectiles(state: &mut GameState) {
    let tuning = &state.tuning;
    let targets = &mut state.targets;
    let events = &mut state.events;

    state.projectiles.retain_mut(|projectile| {
        projectile.step(tuning);

        for target in targets.iter_mut().filter(|t| t.live) {
            if circles_collide(&projectile.body, &target.body) {
                target.destroy();
                events.push(GameEvent::TargetDestroyed {
                    target: target.id,
                    projectile: projectile.id,
                });
                log::debug!("Target {} destroyed by projectile {}", target.id, projectile.id);
            }
        }

        if projectile.at_rest(tuning) {
            events.push(GameEvent::ProjectileRested {
                projectile: projectile.id,
            });
            log::debug!("Projectile {} came to rest", projectile.id);
            return false;
        }
        true
    });
}

/// Both targets down: score once, clear the field and start the countdown
fn clear_round(state: &mut GameState) {
    state.score += 1;
    state.projectiles.clear();
    // Release is unbound until the next round, so a held charge cannot finish
    state.gun.cancel_charge(state.tuning.min_power);
    state.message = Some(GameState::cleared_message(state.shots));
    state.events.push(GameEvent::RoundCleared {
        round: state.round,
        shots: state.shots,
        score: state.score,
    });
    log::info!(
        "Round {} cleared in {} shots (score {})",
        state.round,
        state.shots,
        state.score
    );

    if state.tuning.restart_delay_ticks == 0 {
        start_round(state);
    } else {
        state.phase = GamePhase::RoundOver {
            ticks_left: state.tuning.restart_delay_ticks,
        };
    }
}

/// Fresh targets, empty field, shot counter reset
pub fn start_round(state: &mut GameState) {
    let mut rng = state.rng_state.next_rng();
    state.targets = [
        Target::spawn(0, &mut rng, &state.tuning),
        Target::spawn(1, &mut rng, &state.tuning),
    ];
    state.round += 1;
    state.shots = 0;
    state.projectiles.clear();
    state.message = None;
    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::RoundStarted { round: state.round });
    log::info!("Round {} started", state.round);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::CircleBody;
    use crate::sim::state::Gun;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Place both targets by hand, stationary
    fn place_targets(state: &mut GameState, a: Vec2, b: Vec2, r: f32) {
        for (target, pos) in state.targets.iter_mut().zip([a, b]) {
            target.body = CircleBody::new(pos, r);
            target.speed = 0.0;
            target.live = true;
        }
    }

    fn projectile_at(state: &mut GameState, pos: Vec2, vel: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut p = Projectile::launch(id, &state.tuning, 0.0, 10, BallColor::Red);
        p.body.pos = pos;
        p.vel = vel;
        state.projectiles.push(p);
        id
    }

    #[test]
    fn test_charge_fifty_ticks_then_fire() {
        let mut state = GameState::new(12345);
        place_targets(&mut state, Vec2::new(700.0, 100.0), Vec2::new(750.0, 100.0), 10.0);
        let aim = Vec2::new(120.0, 350.0);

        let press = TickInput::new()
            .with(PointerEvent::Move(aim))
            .with(PointerEvent::Press);
        tick(&mut state, &press);
        for _ in 1..50 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.gun.power, 60);
        assert!(state.gun.charging);

        tick(&mut state, &TickInput::new().with(PointerEvent::Release));
        assert_eq!(state.gun.power, 10);
        assert!(!state.gun.charging);
        assert_eq!(state.shots, 1);

        let angle = Gun::angle_for(aim, state.tuning.aim_min_dx);
        assert!(matches!(
            state.events[0],
            GameEvent::Fired { power: 60, angle: a, .. } if (a - angle).abs() < 1e-6
        ));
        // Launched at speed 60, then stepped once in the release tick
        let p = &state.projectiles[0];
        let launched = crate::sim::state::launch_velocity(angle, 60);
        assert!((launched.length() - 60.0).abs() < 1e-3);
        assert!((p.vel.x - launched.x / 1.005).abs() < 1e-3);
        assert!((p.vel.y - (launched.y / 1.05 - 2.5)).abs() < 1e-3);
    }

    #[test]
    fn test_press_and_release_same_tick_fires_minimum() {
        let mut state = GameState::new(1);
        let input = TickInput::new()
            .with(PointerEvent::Press)
            .with(PointerEvent::Release);
        tick(&mut state, &input);
        assert!(matches!(state.events[0], GameEvent::Fired { power: 10, .. }));
        assert_eq!(state.gun.power, 10);
    }

    #[test]
    fn test_release_without_press_still_fires() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput::new().with(PointerEvent::Release));
        assert_eq!(state.shots, 1);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_vertical_aim_is_finite() {
        let mut state = GameState::new(3);
        let above_pivot = Gun::pivot() - Vec2::new(0.0, 200.0);
        let input = TickInput::new()
            .with(PointerEvent::Move(above_pivot))
            .with(PointerEvent::Release);
        tick(&mut state, &input);
        let p = &state.projectiles[0];
        assert!(p.vel.x.is_finite() && p.vel.y.is_finite());
        assert!(p.vel.y > 0.0, "straight-up aim should launch upward");
    }

    #[test]
    fn test_hit_destroys_target_projectile_survives() {
        let mut state = GameState::new(5);
        place_targets(&mut state, Vec2::new(400.0, 300.0), Vec2::new(750.0, 100.0), 20.0);
        let id = projectile_at(&mut state, Vec2::new(360.0, 300.0), Vec2::new(10.0, 0.0));

        tick(&mut state, &TickInput::default());

        assert!(!state.targets[0].live);
        assert_eq!(state.targets[0].body.pos, Vec2::new(-10.0, -10.0));
        assert!(state.targets[1].live);
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].id, id);
        assert!(state.events.contains(&GameEvent::TargetDestroyed { target: 0, projectile: id }));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_dead_targets_stop_moving() {
        let mut state = GameState::new(5);
        state.targets[0].speed = 3.0;
        state.targets[0].destroy();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.targets[0].body.pos, Vec2::new(-10.0, -10.0));
    }

    #[test]
    fn test_both_targets_same_tick_scores_once() {
        let mut state = GameState::new(9);
        place_targets(&mut state, Vec2::new(400.0, 300.0), Vec2::new(400.0, 340.0), 20.0);
        projectile_at(&mut state, Vec2::new(390.0, 320.0), Vec2::new(10.0, 0.0));
        projectile_at(&mut state, Vec2::new(390.0, 320.0), Vec2::new(10.0, 0.0));
        state.shots = 2;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 1);
        assert!(matches!(state.phase, GamePhase::RoundOver { .. }));
        assert!(state.projectiles.is_empty());
        assert_eq!(
            state.message.as_deref(),
            Some("You destroyed the targets in 2 shots")
        );
        let cleared = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RoundCleared { .. }))
            .count();
        assert_eq!(cleared, 1);

        // The countdown does not score again
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_round_restarts_after_delay() {
        let mut state = GameState::new(21);
        let delay = state.tuning.restart_delay_ticks;
        place_targets(&mut state, Vec2::new(400.0, 300.0), Vec2::new(400.0, 340.0), 20.0);
        projectile_at(&mut state, Vec2::new(390.0, 320.0), Vec2::new(10.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::RoundOver { ticks_left: delay });

        // Fire input is ignored during the countdown
        let fire = TickInput::new()
            .with(PointerEvent::Press)
            .with(PointerEvent::Release);
        for _ in 1..delay {
            tick(&mut state, &fire);
            assert!(matches!(state.phase, GamePhase::RoundOver { .. }));
        }
        assert_eq!(state.shots, 0);
        assert!(state.projectiles.is_empty());
        assert!(!state.gun.charging);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.round, 2);
        assert_eq!(state.score, 1);
        assert!(state.targets.iter().all(|t| t.live));
        assert!(state.message.is_none());
        assert!(state.events.contains(&GameEvent::RoundStarted { round: 2 }));
    }

    #[test]
    fn test_zero_delay_restarts_immediately() {
        let tuning = Tuning {
            restart_delay_ticks: 0,
            ..Tuning::default()
        };
        let mut state = GameState::with_tuning(4, tuning);
        place_targets(&mut state, Vec2::new(400.0, 300.0), Vec2::new(400.0, 340.0), 20.0);
        projectile_at(&mut state, Vec2::new(390.0, 320.0), Vec2::new(10.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.round, 2);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_charge_held_across_round_end_is_dropped() {
        let mut state = GameState::new(33);
        place_targets(&mut state, Vec2::new(700.0, 100.0), Vec2::new(750.0, 100.0), 10.0);
        tick(&mut state, &TickInput::new().with(PointerEvent::Press));
        assert!(state.gun.charging);

        place_targets(&mut state, Vec2::new(400.0, 300.0), Vec2::new(400.0, 340.0), 20.0);
        projectile_at(&mut state, Vec2::new(390.0, 320.0), Vec2::new(10.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert!(matches!(state.phase, GamePhase::RoundOver { .. }));
        assert!(!state.gun.charging);
        assert_eq!(state.gun.power, state.tuning.min_power);

        // Release lands during the countdown and is ignored
        tick(&mut state, &TickInput::new().with(PointerEvent::Release));
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.gun.charging);
        assert_eq!(state.gun.power, state.tuning.min_power);
        assert_eq!(state.shots, 0);
    }

    #[test]
    fn test_move_aims_during_round_over() {
        let mut state = GameState::new(8);
        place_targets(&mut state, Vec2::new(400.0, 300.0), Vec2::new(400.0, 340.0), 20.0);
        projectile_at(&mut state, Vec2::new(390.0, 320.0), Vec2::new(10.0, 0.0));
        tick(&mut state, &TickInput::default());
        assert!(matches!(state.phase, GamePhase::RoundOver { .. }));

        let point = Vec2::new(300.0, 250.0);
        tick(&mut state, &TickInput::new().with(PointerEvent::Move(point)));
        assert!(matches!(state.phase, GamePhase::RoundOver { .. }));
        assert_eq!(state.gun.aim_point, point);
        assert_eq!(state.gun.angle, Gun::angle_for(point, state.tuning.aim_min_dx));
    }

    #[test]
    fn test_resting_projectile_removed() {
        let mut state = GameState::new(2);
        place_targets(&mut state, Vec2::new(700.0, 100.0), Vec2::new(750.0, 100.0), 10.0);
        let rest_y = crate::sim::state::floor_rest_y(
            &CircleBody::new(Vec2::ZERO, state.tuning.projectile_radius),
            &state.tuning,
        );
        let id = projectile_at(&mut state, Vec2::new(200.0, rest_y), Vec2::new(0.02, 0.01));
        tick(&mut state, &TickInput::default());
        assert!(state.projectiles.is_empty());
        assert!(state.events.contains(&GameEvent::ProjectileRested { projectile: id }));
    }

    #[test]
    fn test_determinism() {
        let script = |t: u64| -> TickInput {
            match t % 40 {
                0 => TickInput::new()
                    .with(PointerEvent::Move(Vec2::new(300.0, 200.0 + t as f32)))
                    .with(PointerEvent::Press),
                25 => TickInput::new().with(PointerEvent::Release),
                _ => TickInput::default(),
            }
        };

        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        for t in 0..2000 {
            tick(&mut state1, &script(t));
            tick(&mut state2, &script(t));
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.shots, state2.shots);
        assert_eq!(state1.projectiles.len(), state2.projectiles.len());
        for (a, b) in state1.projectiles.iter().zip(&state2.projectiles) {
            assert_eq!(a.body.pos, b.body.pos);
            assert_eq!(a.color, b.color);
        }
        for (a, b) in state1.targets.iter().zip(&state2.targets) {
            assert_eq!(a.body.pos, b.body.pos);
        }
    }

    proptest! {
        #[test]
        fn prop_power_never_exceeds_max(hold in 0u32..400) {
            let mut state = GameState::new(77);
            tick(&mut state, &TickInput::new().with(PointerEvent::Press));
            for _ in 0..hold {
                tick(&mut state, &TickInput::default());
                prop_assert!(state.gun.power <= 100);
                prop_assert!(state.gun.power >= 10);
            }
            prop_assert_eq!(state.gun.power, (11 + hold).min(100));

            tick(&mut state, &TickInput::new().with(PointerEvent::Release));
            prop_assert_eq!(state.gun.power, 10);
        }
    }
}
