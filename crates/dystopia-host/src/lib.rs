//! Headless driver for the runner simulation.
//!
//! The host owns the clock and the input source. It steps the game at the
//! game's own tick rate and forwards results to a [`ScoreSink`].

use std::time::Duration;

use dystopia_core::Millis;
use dystopia_core::game_trait::{ArcadeGame, GameEvent};
use dystopia_runner::input::FrameInput;
use dystopia_runner::{DystopiaRunner, RunnerState};

/// Environment variable bounding the number of host ticks.
pub const MAX_TICKS_ENV: &str = "DYSTOPIA_MAX_TICKS";

/// How many ticks of scrolling ahead the autopilot watches for hazards.
const LOOK_AHEAD_TICKS: f32 = 25.0;

/// Supplies one input frame per tick.
pub trait InputSource {
    fn next_frame(&mut self, state: &RunnerState) -> FrameInput;
}

/// Built-in bot: fires continuously and jumps over whatever is coming.
#[derive(Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    fn hazard_ahead(state: &RunnerState) -> bool {
        let player = &state.player;
        let front = player.x + player.width;
        let reach = front + state.scroll_speed * LOOK_AHEAD_TICKS;
        let (top, bottom) = (player.y, player.bottom());
        let ahead = |x: f32, y: f32, w: f32, h: f32| {
            x + w > front && x < reach && y < bottom && y + h > top
        };
        state
            .obstacles
            .iter()
            .any(|o| ahead(o.x, o.y, o.width, o.height))
            || state.cats.iter().any(|c| ahead(c.x, c.y, c.width, c.height))
    }
}

impl InputSource for Autopilot {
    fn next_frame(&mut self, state: &RunnerState) -> FrameInput {
        FrameInput {
            jump: state.player.grounded && Self::hazard_ahead(state),
            fire: true,
            ..Default::default()
        }
    }
}

/// Receives the score of a finished run.
pub trait ScoreSink {
    fn report(&mut self, score: u64);
}

#[derive(Debug, Default)]
pub struct LogScoreSink;

impl ScoreSink for LogScoreSink {
    fn report(&mut self, score: u64) {
        tracing::info!(score, "Run finished");
    }
}

/// What a host run ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub score: u64,
    pub level: u8,
    pub game_over: bool,
}

fn summarize(game: &DystopiaRunner, ticks: u64) -> RunSummary {
    RunSummary {
        ticks,
        score: game.score(),
        level: game.state().current_level(),
        game_over: game.is_game_over(),
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::LevelUp { level } => tracing::info!(level, "Level up"),
            GameEvent::EncounterCleared { level } => tracing::info!(level, "Encounter cleared"),
            GameEvent::PlayerHurt { health } => tracing::debug!(health, "Player hurt"),
            GameEvent::GameOver { score } => tracing::info!(score, "Game over"),
            GameEvent::ScoreUpdate { .. } | GameEvent::Restarted => {},
        }
    }
}

fn tick_interval(game: &DystopiaRunner) -> Duration {
    Duration::from_secs_f32(1.0 / game.tick_rate())
}

/// Synthetic clock reading after `tick` ticks at `tick_rate` Hz, rounded to
/// the nearest millisecond without accumulating rounding error.
pub fn synthetic_clock_ms(tick: u64, tick_rate: f32) -> Millis {
    (tick as f64 * 1_000.0 / f64::from(tick_rate)).round() as Millis
}

/// Step the game `max_ticks` times on a synthetic clock, stopping early on
/// game over.
pub fn run_ticks(
    game: &mut DystopiaRunner,
    input: &mut dyn InputSource,
    sink: &mut dyn ScoreSink,
    max_ticks: u64,
) -> RunSummary {
    let tick_rate = game.tick_rate();
    let mut ticks = 0;
    while ticks < max_ticks && !game.is_game_over() {
        ticks += 1;
        let now = synthetic_clock_ms(ticks, tick_rate);
        let frame = input.next_frame(game.state());
        log_events(&game.update(now, &frame));
    }
    sink.report(game.score());
    summarize(game, ticks)
}

/// Drive the game in real time on a tokio interval at its tick rate.
/// Missed ticks are skipped rather than replayed.
pub async fn run_game_loop(
    game: &mut DystopiaRunner,
    input: &mut dyn InputSource,
    sink: &mut dyn ScoreSink,
    max_ticks: Option<u64>,
) -> RunSummary {
    let mut interval = tokio::time::interval(tick_interval(game));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let start = tokio::time::Instant::now();
    let mut ticks: u64 = 0;
    loop {
        interval.tick().await;
        let now = start.elapsed().as_millis() as Millis;
        let frame = input.next_frame(game.state());
        log_events(&game.update(now, &frame));
        ticks += 1;

        if game.is_game_over() || max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
    }
    sink.report(game.score());
    summarize(game, ticks)
}

/// Tick budget from [`MAX_TICKS_ENV`]; `None` when unset or unparsable.
pub fn max_ticks_from_env() -> Option<u64> {
    let raw = std::env::var(MAX_TICKS_ENV).ok()?;
    match raw.trim().parse() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Ignoring invalid tick budget");
            None
        },
    }
}
