//! Scripted boss encounters.
//!
//! Every boss shares one shape: a Lissajous path around a fixed center, a
//! taunt on a wall-clock cooldown, a health pool and a defeat payload. The
//! per-boss content lives in [`EncounterConfig`]; this module holds only the
//! mutable state and the rules that drive it.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use dystopia_core::{Aabb, DeadlineTimer, Millis, TickTimer, TimedMessage};

use crate::config::EncounterConfig;

/// Result of a laser landing on a boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitOutcome {
    /// Points awarded for this hit, defeat bonus included.
    pub score: u64,
    pub defeated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedEncounter {
    pub name: String,
    pub level: u8,
    /// Center of the hitbox.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub phase: f32,
    pub health: u8,
    pub max_health: u8,
    pub defeated: bool,
    pub taunt_cooldown: DeadlineTimer,
    /// Taunt or defeat line.
    pub message: TimedMessage,
    /// Damage flash, frame counted.
    pub flash: TickTimer,
}

impl ScriptedEncounter {
    pub fn new(cfg: &EncounterConfig, fade_ticks: u32) -> Self {
        Self {
            name: cfg.name.clone(),
            level: cfg.level,
            x: cfg.center.0,
            y: cfg.center.1,
            width: cfg.width,
            height: cfg.height,
            phase: 0.0,
            health: cfg.health,
            max_health: cfg.health,
            defeated: false,
            taunt_cooldown: DeadlineTimer::unset(),
            message: TimedMessage::with_fade(fade_ticks),
            flash: TickTimer::idle(),
        }
    }

    /// On its level and still standing.
    pub fn is_engaged(&self, current_level: u8) -> bool {
        current_level == self.level && !self.defeated
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::centered(self.x, self.y, self.width, self.height)
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: Millis,
        current_level: u8,
        cfg: &EncounterConfig,
        rng: &mut R,
    ) {
        self.message.tick();
        self.flash.tick();
        if !self.is_engaged(current_level) {
            return;
        }

        self.phase += cfg.phase_step;
        self.x = cfg.center.0 + self.phase.sin() * cfg.amplitude.0;
        self.y = cfg.center.1 + (2.0 * self.phase).sin() * cfg.amplitude.1;

        if self.taunt_cooldown.is_ready(now)
            && let Some(taunt) = cfg.taunts.choose(rng)
        {
            self.message.show(taunt.as_str(), cfg.taunt_ticks);
            self.taunt_cooldown.start(now, cfg.taunt_interval_ms);
        }
    }

    /// Apply one laser hit. `None` once the boss is already defeated.
    pub fn hit<R: Rng + ?Sized>(&mut self, cfg: &EncounterConfig, rng: &mut R) -> Option<HitOutcome> {
        if self.defeated {
            return None;
        }
        self.health = self.health.saturating_sub(1);
        self.flash.start(cfg.flash_ticks);
        let mut score = cfg.hit_score;
        if self.health == 0 {
            self.defeated = true;
            score += cfg.defeat_bonus;
            if let Some(line) = cfg.defeat_messages.choose(rng) {
                self.message.show(line.as_str(), cfg.defeat_message_ticks);
            }
            tracing::info!(boss = %self.name, "Encounter defeated");
        }
        Some(HitOutcome {
            score,
            defeated: self.defeated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dalbird() -> EncounterConfig {
        RunnerConfig::default()
            .encounters
            .into_iter()
            .find(|e| e.name == "Dalbird")
            .unwrap()
    }

    #[test]
    fn idle_off_level() {
        let cfg = dalbird();
        let mut rng = StdRng::seed_from_u64(1);
        let mut boss = ScriptedEncounter::new(&cfg, 30);
        boss.update(10_000, 5, &cfg, &mut rng);
        assert_eq!(boss.phase, 0.0);
        assert!(boss.message.text().is_none());
    }

    #[test]
    fn follows_figure_eight_path() {
        let cfg = dalbird();
        let mut rng = StdRng::seed_from_u64(1);
        let mut boss = ScriptedEncounter::new(&cfg, 30);
        for i in 0..100 {
            boss.update(i, 6, &cfg, &mut rng);
        }
        let phase = 100.0 * 0.02f32;
        assert!((boss.phase - phase).abs() < 1e-3);
        assert!((boss.x - (600.0 + phase.sin() * 200.0)).abs() < 0.1);
        assert!((boss.y - (200.0 + (2.0 * phase).sin() * 100.0)).abs() < 0.1);
    }

    #[test]
    fn taunts_on_interval() {
        let cfg = dalbird();
        let mut rng = StdRng::seed_from_u64(1);
        let mut boss = ScriptedEncounter::new(&cfg, 30);
        boss.update(100, 6, &cfg, &mut rng);
        let taunt = boss.message.text().map(str::to_string).unwrap();
        assert!(cfg.taunts.contains(&taunt));
        assert_eq!(boss.taunt_cooldown.deadline(), Some(5_100));
        boss.update(4_000, 6, &cfg, &mut rng);
        assert_eq!(boss.taunt_cooldown.deadline(), Some(5_100));
        boss.update(5_100, 6, &cfg, &mut rng);
        assert_eq!(boss.taunt_cooldown.deadline(), Some(10_200));
    }

    #[test]
    fn defeat_happens_exactly_once() {
        let cfg = dalbird();
        let mut rng = StdRng::seed_from_u64(1);
        let mut boss = ScriptedEncounter::new(&cfg, 30);
        for _ in 0..4 {
            let outcome = boss.hit(&cfg, &mut rng).unwrap();
            assert_eq!(outcome.score, 200);
            assert!(!outcome.defeated);
        }
        assert_eq!(boss.flash.remaining(), 30);
        let last = boss.hit(&cfg, &mut rng).unwrap();
        assert_eq!(last.score, 2_200);
        assert!(last.defeated);
        assert_eq!(boss.health, 0);
        let line = boss.message.text().map(str::to_string).unwrap();
        assert!(cfg.defeat_messages.contains(&line));

        assert!(boss.hit(&cfg, &mut rng).is_none());
        assert_eq!(boss.health, 0);
        assert!(!boss.is_engaged(6));
    }

    #[test]
    fn hitbox_centered_on_position() {
        let cfg = dalbird();
        let boss = ScriptedEncounter::new(&cfg, 30);
        let b = boss.bounds();
        assert_eq!((b.x, b.y, b.width, b.height), (525.0, 125.0, 150.0, 150.0));
    }
}
