use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::config::RunnerConfig;
use crate::obstacles::{Obstacle, ObstacleKind, Platform};
use crate::powerups::{Cheeseball, PowerKind};

/// One generation batch, appended to the world by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chunk {
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub pickups: Vec<Cheeseball>,
}

/// Whether the world needs another chunk: no platforms left, or the
/// rightmost platform's trailing edge has entered the visible window.
pub fn needs_chunk(platforms: &[Platform], cfg: &RunnerConfig) -> bool {
    platforms
        .iter()
        .map(Platform::right)
        .reduce(f32::max)
        .is_none_or(|right| right < cfg.world.width)
}

/// Generate one chunk starting past both the visible window and the
/// rightmost existing platform.
///
/// Platforms are laid out left to right with a random gap after each one,
/// so they never overlap. Each platform independently may carry one
/// obstacle seated on its top and one pickup hovering above it. No
/// traversability check is made.
pub fn extend_world<R: Rng + ?Sized>(
    platforms: &[Platform],
    cfg: &RunnerConfig,
    rng: &mut R,
) -> Chunk {
    let p = &cfg.platforms;
    let rightmost = platforms
        .iter()
        .map(Platform::right)
        .fold(f32::MIN, f32::max);
    let start = cfg.world.width.max(rightmost);
    let end = start + cfg.generation.chunk_length;
    let ground = cfg.world.ground_y.round() as i64;
    let top_min = ground - i64::from(p.height_variance);
    let top_max = (ground - p.height as i64).max(top_min);

    let mut chunk = Chunk::default();
    let mut x = start;
    while x < end {
        let width = rng.random_range(p.min_width..=p.max_width) as f32;
        let y = rng.random_range(top_min..=top_max) as f32;
        chunk.platforms.push(Platform {
            x,
            y,
            width,
            height: p.height,
        });

        let mid_x = x + (width / 2.0).floor();
        if rng.random_bool(cfg.generation.obstacle_chance.clamp(0.0, 1.0))
            && let Some(&kind) = ObstacleKind::ALL.choose(rng)
        {
            let height = kind.dims(&cfg.obstacles).height;
            chunk
                .obstacles
                .push(Obstacle::new(kind, mid_x, y - height, &cfg.obstacles));
        }

        if rng.random_bool(cfg.generation.pickup_chance.clamp(0.0, 1.0))
            && let Some(&kind) = PowerKind::ALL.choose(rng)
        {
            let size = cfg.power_ups.pickup_size;
            chunk.pickups.push(Cheeseball::new(
                mid_x,
                y - size - cfg.power_ups.hover_gap,
                size,
                kind,
            ));
        }

        x += width + rng.random_range(p.min_gap..=p.max_gap) as f32;
    }

    tracing::debug!(
        start,
        platforms = chunk.platforms.len(),
        obstacles = chunk.obstacles.len(),
        pickups = chunk.pickups.len(),
        "Generated chunk"
    );
    chunk
}
