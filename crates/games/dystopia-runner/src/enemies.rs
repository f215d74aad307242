use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use dystopia_core::{Aabb, DeadlineTimer, Millis, TimedMessage};

use crate::config::{Capabilities, RunnerConfig};

/// Behavioral mode, re-evaluated every tick from the distance to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatMode {
    Patrol,
    Chase,
}

/// What a cat reads from the world during its update.
pub struct EnemyContext {
    pub now: Millis,
    pub player_x: f32,
    pub player_y: f32,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cat {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub mode: CatMode,
    /// Mirrors `Chase` for the renderer.
    pub angry: bool,
    pub grounded: bool,
    pub message: TimedMessage,
    pub taunt_cooldown: DeadlineTimer,
    pub jump_cooldown: DeadlineTimer,
    pub animation_ticks: u32,
    pub frame_index: u32,
    frame_counter: u32,
}

impl Cat {
    /// A cat standing on the ground at horizontal position `x`.
    pub fn spawn(x: f32, cfg: &RunnerConfig) -> Self {
        let e = &cfg.enemy;
        Self {
            x,
            y: cfg.world.ground_y - e.height,
            vx: -e.patrol_speed,
            vy: 0.0,
            width: e.width,
            height: e.height,
            mode: CatMode::Patrol,
            angry: false,
            grounded: true,
            message: TimedMessage::with_fade(cfg.messages.fade_ticks),
            taunt_cooldown: DeadlineTimer::unset(),
            jump_cooldown: DeadlineTimer::unset(),
            animation_ticks: 0,
            frame_index: 0,
            frame_counter: 0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }

    pub fn land_on(&mut self, top: f32) {
        self.y = top - self.height;
        self.vy = 0.0;
        self.grounded = true;
    }

    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &EnemyContext, cfg: &RunnerConfig, rng: &mut R) {
        let e = &cfg.enemy;
        self.animation_ticks = self.animation_ticks.wrapping_add(1);
        self.message.tick();

        self.grounded = false;
        self.vy += cfg.player.gravity;
        self.y += self.vy;
        if self.bottom() > cfg.world.ground_y {
            self.land_on(cfg.world.ground_y);
        }

        let dx = ctx.player_x - self.x;
        let dy = ctx.player_y - self.y;
        if dx.hypot(dy) < e.detection_range {
            self.mode = CatMode::Chase;
            self.vx += if dx > 0.0 {
                e.acceleration
            } else {
                -e.acceleration
            };

            if self.taunt_cooldown.is_ready(ctx.now)
                && rng.random_bool(e.taunt_chance.clamp(0.0, 1.0))
                && let Some(taunt) = e.taunts.choose(rng)
            {
                self.message.show(taunt.as_str(), cfg.messages.duration_ticks);
                self.taunt_cooldown.start(ctx.now, e.taunt_cooldown_ms);
            }

            if dy < -e.jump_trigger_height && self.jump_cooldown.is_ready(ctx.now) {
                self.vy = e.jump_velocity;
                self.jump_cooldown.start(ctx.now, e.jump_cooldown_ms);
            }
        } else {
            self.mode = CatMode::Patrol;
            self.vx = -e.patrol_speed;
        }
        self.angry = self.mode == CatMode::Chase;

        self.vx = self.vx.clamp(-e.max_speed, e.max_speed);
        self.x += self.vx;

        self.frame_counter += 1;
        if self.frame_counter >= e.frame_delay {
            self.frame_counter = 0;
            self.frame_index = (self.frame_index + 1) % ctx.capabilities.enemy_frames.max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ctx(now: Millis, player_x: f32, player_y: f32) -> EnemyContext {
        EnemyContext {
            now,
            player_x,
            player_y,
            capabilities: Capabilities::default(),
        }
    }

    #[test]
    fn far_player_means_patrol() {
        let cfg = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(1_000.0, &cfg);
        cat.update(&ctx(0, 0.0, 620.0), &cfg, &mut rng);
        assert_eq!(cat.mode, CatMode::Patrol);
        assert!(!cat.angry);
        assert_eq!(cat.vx, -2.0);
        assert_eq!(cat.x, 998.0);
        assert_eq!(cat.bottom(), cfg.world.ground_y);
    }

    #[test]
    fn near_player_accelerates_toward_them() {
        let cfg = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(400.0, &cfg);
        cat.vx = 0.0;
        // Player to the right and level with the cat.
        cat.update(&ctx(0, 500.0, cat.y), &cfg, &mut rng);
        assert_eq!(cat.mode, CatMode::Chase);
        assert!(cat.angry);
        assert!((cat.vx - 0.1).abs() < 1e-6);
    }

    #[test]
    fn chase_speed_is_capped() {
        let cfg = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(400.0, &cfg);
        for i in 0..200 {
            let player_x = cat.x - 100.0;
            let y = cat.y;
            cat.update(&ctx(i, player_x, y), &cfg, &mut rng);
            assert!(cat.vx.abs() <= cfg.enemy.max_speed + 1e-6);
        }
        assert_eq!(cat.vx, -cfg.enemy.max_speed);
    }

    #[test]
    fn jumps_at_raised_player_with_cooldown() {
        let cfg = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(400.0, &cfg);
        let player_y = cat.y - 100.0;
        cat.update(&ctx(0, 450.0, player_y), &cfg, &mut rng);
        assert_eq!(cat.vy, cfg.enemy.jump_velocity);

        cat.land_on(cfg.world.ground_y);
        let player_y = cat.y - 100.0;
        cat.update(&ctx(500, 450.0, player_y), &cfg, &mut rng);
        assert_eq!(cat.vy, 0.0, "jump is on cooldown");

        cat.land_on(cfg.world.ground_y);
        let player_y = cat.y - 100.0;
        cat.update(&ctx(1_000, 450.0, player_y), &cfg, &mut rng);
        assert_eq!(cat.vy, cfg.enemy.jump_velocity);
    }

    #[test]
    fn taunts_respect_cooldown() {
        let mut cfg = RunnerConfig::default();
        cfg.enemy.taunt_chance = 1.0;
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(400.0, &cfg);
        let y = cat.y;
        cat.update(&ctx(0, 450.0, y), &cfg, &mut rng);
        let first = cat.message.text().map(str::to_string);
        assert!(first.is_some());
        assert!(cfg.enemy.taunts.contains(first.as_ref().unwrap()));
        assert_eq!(cat.taunt_cooldown.deadline(), Some(4_000));

        cat.update(&ctx(1_000, 450.0, y), &cfg, &mut rng);
        assert_eq!(cat.taunt_cooldown.deadline(), Some(4_000));
    }

    #[test]
    fn animation_frame_wraps_at_capability_count() {
        let cfg = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(1_000.0, &cfg);
        let mut c = ctx(0, 0.0, 0.0);
        c.capabilities.enemy_frames = 4;
        let mut seen = Vec::new();
        for _ in 0..15 {
            cat.update(&c, &cfg, &mut rng);
            seen.push(cat.frame_index);
        }
        assert_eq!(seen[2], 1);
        assert_eq!(seen[11], 0, "12 ticks = 4 frames, wraps to start");
        assert!(seen.iter().all(|&f| f < 4));
    }

    #[test]
    fn single_frame_capability_stays_on_zero() {
        let cfg = RunnerConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut cat = Cat::spawn(1_000.0, &cfg);
        for _ in 0..10 {
            cat.update(&ctx(0, 0.0, 0.0), &cfg, &mut rng);
        }
        assert_eq!(cat.frame_index, 0);
    }
}
