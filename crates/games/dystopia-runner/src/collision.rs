use rand::Rng;

use dystopia_core::game_trait::GameEvent;
use dystopia_core::{Aabb, Millis};

use crate::RunnerState;
use crate::config::RunnerConfig;
use crate::obstacles::Platform;
use crate::scoring::{HitTarget, elimination_score};

/// Support test shared by the player and the cats: descending (or resting),
/// feet inside the platform's band, horizontal spans overlapping.
pub fn supported_by(body: &Aabb, vy: f32, platform: &Platform) -> bool {
    let feet = body.bottom();
    vy >= 0.0
        && feet >= platform.y
        && feet <= platform.y + platform.height
        && body.overlaps_horizontally(&platform.bounds())
}

/// Resolve every interaction for one tick, in category order. Removals are
/// applied as each category finishes, so later categories never see a
/// consumed entity.
pub fn resolve<R: Rng + ?Sized>(
    state: &mut RunnerState,
    now: Millis,
    cfg: &RunnerConfig,
    rng: &mut R,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    resolve_support(state);

    if resolve_damage(state, cfg, rng, &mut events) {
        return events;
    }

    resolve_pickups(state, now, cfg, rng);
    resolve_projectiles(state, cfg, rng, &mut events);

    events
}

fn resolve_support(state: &mut RunnerState) {
    let player_box = state.player.bounds();
    if let Some(top) = state
        .platforms
        .iter()
        .find(|p| supported_by(&player_box, state.player.vy, p))
        .map(|p| p.y)
    {
        state.player.land_on(top);
    }

    for cat in &mut state.cats {
        let cat_box = cat.bounds();
        if let Some(top) = state
            .platforms
            .iter()
            .find(|p| supported_by(&cat_box, cat.vy, p))
            .map(|p| p.y)
        {
            cat.land_on(top);
        }
    }
}

/// Returns `true` when the run ended this tick.
fn resolve_damage<R: Rng + ?Sized>(
    state: &mut RunnerState,
    cfg: &RunnerConfig,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) -> bool {
    let player_box = state.player.bounds();
    let touching = state
        .obstacles
        .iter()
        .map(|o| o.bounds())
        .chain(state.cats.iter().map(|c| c.bounds()))
        .any(|b| player_box.overlaps(&b));

    if touching && state.player.take_damage(cfg, rng) {
        events.push(GameEvent::PlayerHurt {
            health: state.player.health,
        });
    }

    if state.player.health == 0 && !state.player.unlimited_health {
        state.game_over = true;
        tracing::info!(score = state.score, level = state.progression.current_level, "Game over");
        events.push(GameEvent::GameOver { score: state.score });
        return true;
    }
    false
}

fn resolve_pickups<R: Rng + ?Sized>(
    state: &mut RunnerState,
    now: Millis,
    cfg: &RunnerConfig,
    rng: &mut R,
) {
    let player_box = state.player.bounds();
    for ball in &mut state.pickups {
        if !ball.collected && player_box.overlaps(&ball.bounds()) {
            ball.collected = true;
            state.player.activate_power_up(ball.kind, now, cfg, rng);
            tracing::debug!(kind = ?ball.kind, "Collected power-up");
        }
    }
    state.pickups.retain(|b| !b.collected);
}

/// Each laser is consumed by at most one target: cats first, then
/// obstacles, then an engaged boss. A consumed laser is marked inactive and
/// swept once every laser has been checked.
fn resolve_projectiles<R: Rng + ?Sized>(
    state: &mut RunnerState,
    cfg: &RunnerConfig,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    let mut lasers = std::mem::take(&mut state.player.lasers);

    for laser in lasers.iter_mut().filter(|l| l.active) {
        let bolt = laser.bounds();

        if let Some(i) = state.cats.iter().position(|c| c.bounds().overlaps(&bolt)) {
            state.cats.remove(i);
            award(state, elimination_score(HitTarget::Enemy, &cfg.scoring), events);
            tracing::debug!(score = state.score, "Cat eliminated");
            laser.active = false;
            continue;
        }

        if let Some(i) = state
            .obstacles
            .iter()
            .position(|o| o.bounds().overlaps(&bolt))
        {
            let obstacle = state.obstacles.remove(i);
            award(state, elimination_score(HitTarget::Obstacle, &cfg.scoring), events);
            tracing::debug!(kind = ?obstacle.kind, score = state.score, "Obstacle destroyed");
            laser.active = false;
            continue;
        }

        let level = state.progression.current_level;
        let Some(i) = state
            .encounters
            .iter()
            .position(|e| e.is_engaged(level) && e.bounds().overlaps(&bolt))
        else {
            continue;
        };
        let Some(enc_cfg) = cfg.encounters.get(i) else {
            continue;
        };
        if let Some(outcome) = state.encounters[i].hit(enc_cfg, rng) {
            award(state, outcome.score, events);
            if outcome.defeated {
                events.push(GameEvent::EncounterCleared { level });
                if state
                    .progression
                    .enter_level(enc_cfg.advance_to, cfg, &mut state.scroll_speed)
                {
                    events.push(GameEvent::LevelUp {
                        level: enc_cfg.advance_to,
                    });
                }
            }
        }
        laser.active = false;
    }

    lasers.retain(|l| l.active);
    state.player.lasers = lasers;
}

fn award(state: &mut RunnerState, points: u64, events: &mut Vec<GameEvent>) {
    state.score += points;
    events.push(GameEvent::ScoreUpdate { score: state.score });
}
