//! Cannonade entry point
//!
//! Headless driver: runs a session under the autopilot, logging round
//! progress, optionally paced in real time and dumping the final scene.

use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, bail};

use cannonade::Settings;
use cannonade::session::Session;
use cannonade::sim::{Autopilot, GameEvent};

/// Frame length used when not pacing in real time (~60 fps display)
const HEADLESS_FRAME: Duration = Duration::from_millis(16);

#[derive(Debug)]
struct Args {
    seed: Option<u64>,
    rounds: u64,
    max_ticks: u64,
    settings: Option<PathBuf>,
    realtime: bool,
    dump_scene: bool,
    print_settings: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            seed: None,
            rounds: 3,
            max_ticks: 20_000,
            settings: None,
            realtime: false,
            dump_scene: false,
            print_settings: false,
        }
    }
}

impl Args {
    fn parse(mut raw: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut args = Args::default();
        while let Some(arg) = raw.next() {
            match arg.as_str() {
                "--seed" => args.seed = Some(parse_value(&arg, raw.next())?),
                "--rounds" => args.rounds = parse_value(&arg, raw.next())?,
                "--max-ticks" => args.max_ticks = parse_value(&arg, raw.next())?,
                "--settings" => {
                    let path = raw.next().context("--settings needs a path")?;
                    args.settings = Some(PathBuf::from(path));
                }
                "--realtime" => args.realtime = true,
                "--dump-scene" => args.dump_scene = true,
                "--print-settings" => args.print_settings = true,
                other => bail!("unknown argument: {other}"),
            }
        }
        Ok(args)
    }
}

fn parse_value<T>(flag: &str, value: Option<String>) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value.with_context(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .with_context(|| format!("invalid value for {flag}: {value}"))
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::RoundCleared { round, shots, score } => {
            log::info!("Round {round} cleared with {shots} shots, score {score}")
        }
        GameEvent::RoundStarted { round } => log::info!("Round {round} begins"),
        other => log::debug!("{other:?}"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse(std::env::args().skip(1))?;
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    if args.print_settings {
        println!("{}", settings.to_json_pretty()?);
        return Ok(());
    }

    let seed = args.seed.or(settings.seed).unwrap_or_else(time_seed);
    log::info!("Cannonade (headless) starting with seed {seed}");

    let mut session = Session::new(&settings, seed);
    let mut pilot = Autopilot::new();
    let mut last_frame = Instant::now();

    while session.score() < args.rounds && session.state.time_ticks < args.max_ticks {
        let elapsed = if args.realtime {
            std::thread::sleep(session.tick_interval());
            let now = Instant::now();
            let elapsed = now - last_frame;
            last_frame = now;
            elapsed
        } else {
            HEADLESS_FRAME
        };

        session.update_with(elapsed, |state| pilot.next_input(state));
        for event in session.drain_events() {
            log_event(&event);
        }
    }

    if session.score() < args.rounds {
        log::warn!(
            "Stopped after {} ticks with {} of {} rounds cleared",
            session.state.time_ticks,
            session.score(),
            args.rounds
        );
    }
    log::info!(
        "Final score {} after {} ticks",
        session.score(),
        session.state.time_ticks
    );

    if args.dump_scene {
        let scene = serde_json::to_string_pretty(&session.scene())?;
        println!("{scene}");
    }

    Ok(())
}
