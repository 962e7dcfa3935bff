//! A running game: simulation state, tick timer and queued pointer input
//!
//! Frontends forward raw pointer events and elapsed frame time; the session
//! decides when ticks happen and hands every event to the next one.

use std::time::Duration;

use glam::Vec2;

use crate::scene::{Scene, build_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, PointerEvent, TickInput, tick};
use crate::timer::TickTimer;

/// One player's game, driven by wall time and pointer input
pub struct Session {
    pub state: GameState,
    timer: TickTimer,
    input: TickInput,
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let state = GameState::with_tuning(seed, settings.tuning.clone());
        let events = state.events.clone();
        Self {
            state,
            timer: TickTimer::new(settings.tick_interval(), settings.max_substeps),
            input: TickInput::default(),
            events,
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.input.push(PointerEvent::Move(Vec2::new(x, y)));
    }

    pub fn pointer_press(&mut self) {
        self.input.push(PointerEvent::Press);
    }

    pub fn pointer_release(&mut self) {
        self.input.push(PointerEvent::Release);
    }

    /// Advance by a frame's worth of wall time; returns ticks run
    pub fn update(&mut self, elapsed: Duration) -> u32 {
        self.update_with(elapsed, |_| TickInput::default())
    }

    /// Like `update`, with extra per-tick input computed from the state
    /// (autopilot, replays). Queued pointer events go first.
    pub fn update_with(
        &mut self,
        elapsed: Duration,
        mut feed: impl FnMut(&GameState) -> TickInput,
    ) -> u32 {
        let Self {
            state,
            timer,
            input,
            events,
        } = self;
        timer.run_due(elapsed, || {
            let mut tick_input = std::mem::take(input);
            tick_input.extend(feed(state));
            run_tick(state, events, &tick_input);
        })
    }

    /// Run exactly one tick with the queued input
    pub fn step(&mut self) {
        let input = std::mem::take(&mut self.input);
        run_tick(&mut self.state, &mut self.events, &input);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn scene(&self) -> Scene {
        build_scene(&self.state)
    }

    /// Tick length the session runs at
    pub fn tick_interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }
}

/// Tick once and keep the tick's events for the next drain
fn run_tick(state: &mut GameState, events: &mut Vec<GameEvent>, input: &TickInput) {
    tick(state, input);
    events.extend(state.events.iter().cloned());
}
