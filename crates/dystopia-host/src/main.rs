use tracing_subscriber::EnvFilter;

use dystopia_core::game_trait::ArcadeGame;
use dystopia_host::{Autopilot, LogScoreSink, max_ticks_from_env, run_game_loop};
use dystopia_runner::DystopiaRunner;
use dystopia_runner::config::{Capabilities, RunnerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = RunnerConfig::load();
    // No asset provider in headless mode: a single enemy animation frame.
    let mut game = DystopiaRunner::with_config(config, Capabilities::default());
    let max_ticks = max_ticks_from_env();

    let meta = game.metadata();
    tracing::info!(game = %meta.name, tick_rate = game.tick_rate(), ?max_ticks, "Dystopia host starting");

    let summary = run_game_loop(&mut game, &mut Autopilot, &mut LogScoreSink, max_ticks).await;

    let report = serde_json::json!({
        "ticks": summary.ticks,
        "score": summary.score,
        "level": summary.level,
        "game_over": summary.game_over,
    });
    println!("{report}");
}
