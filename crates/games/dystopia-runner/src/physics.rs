use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use dystopia_core::powerup::{self, PowerUpKind};
use dystopia_core::{Aabb, DeadlineTimer, Millis, TickTimer, TimedMessage};

use crate::config::{PlayerConfig, RunnerConfig};
use crate::input::FrameInput;
use crate::obstacles::Obstacle;
use crate::powerups::{ActivePowerUp, PowerKind};
use crate::projectile::Laser;

/// Number of particle colors the renderer cycles through.
pub const PARTICLE_COLORS: u8 = 3;

/// Discrete player state. Exactly one holds per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Running,
    Jumping,
    Falling,
    Hurt,
    Squatting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Cosmetic particle. Never participates in collisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: TickTimer,
    pub color: u8,
}

impl Particle {
    fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life.tick();
    }
}

/// What the player reads from the world during its own update.
pub struct PlayerContext<'a> {
    pub now: Millis,
    pub obstacles: &'a [Obstacle],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub normal_height: f32,
    pub state: PlayerState,
    pub health: u8,
    pub invulnerability: TickTimer,
    /// Supported by the ground or a platform at the end of the last tick.
    pub grounded: bool,
    /// Airborne because of a jump (cleared on landing).
    pub jumping: bool,
    pub squatting: bool,
    pub double_jump_available: bool,
    pub power_ups: Vec<ActivePowerUp>,
    pub facing: Facing,
    /// Body tilt in degrees for the renderer.
    pub tilt: f32,
    pub animation_ticks: u32,
    pub lasers: Vec<Laser>,
    pub fire_cooldown: DeadlineTimer,
    pub unlimited_health: bool,
    pub particles: Vec<Particle>,
    /// Power-up announcement shown above the player.
    pub message: TimedMessage,
}

impl Player {
    pub fn new(cfg: &RunnerConfig) -> Self {
        let p = &cfg.player;
        Self {
            x: p.start_x,
            y: cfg.world.ground_y - p.height,
            vx: 0.0,
            vy: 0.0,
            width: p.width,
            height: p.height,
            normal_height: p.height,
            state: PlayerState::Idle,
            health: p.initial_health,
            invulnerability: TickTimer::idle(),
            grounded: true,
            jumping: false,
            squatting: false,
            double_jump_available: true,
            power_ups: Vec::new(),
            facing: Facing::Right,
            tilt: 0.0,
            animation_ticks: 0,
            lasers: Vec::new(),
            fire_cooldown: DeadlineTimer::unset(),
            unlimited_health: false,
            particles: Vec::new(),
            message: TimedMessage::with_fade(cfg.messages.fade_ticks),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerability.is_active()
    }

    pub fn has_power_up(&self, kind: PowerKind) -> bool {
        powerup::is_active(&self.power_ups, kind)
    }

    /// Wall-clock deadline of an active power-up.
    pub fn power_up_expiry(&self, kind: PowerKind) -> Option<Millis> {
        self.power_ups
            .iter()
            .find(|p| p.kind == kind)
            .and_then(|p| p.expires_at())
    }

    fn speed_multiplier(&self, cfg: &RunnerConfig) -> f32 {
        if self.has_power_up(PowerKind::Speed) {
            cfg.power_ups.speed_multiplier
        } else {
            1.0
        }
    }

    fn jump_multiplier(&self, cfg: &RunnerConfig) -> f32 {
        if self.has_power_up(PowerKind::Jump) {
            cfg.power_ups.jump_multiplier
        } else {
            1.0
        }
    }

    /// Advance the player one tick and return the resulting state.
    ///
    /// Platform support is applied afterwards by the collision resolver via
    /// [`land_on`](Self::land_on); only the ground plane is handled here.
    pub fn update(
        &mut self,
        input: &FrameInput,
        ctx: &PlayerContext<'_>,
        cfg: &RunnerConfig,
    ) -> PlayerState {
        powerup::expire(&mut self.power_ups, ctx.now);
        self.message.tick();

        if input.squat {
            if !self.squatting && self.grounded && !self.jumping {
                self.enter_squat(cfg.player.squat_height);
            }
        } else if self.squatting && self.can_stand(ctx.obstacles) {
            self.stand_up();
        }

        let base_speed = if self.squatting {
            cfg.player.squat_speed
        } else {
            cfg.player.speed
        };
        self.vx = input.move_dir() * base_speed * self.speed_multiplier(cfg);
        self.x = (self.x + self.vx).clamp(0.0, (cfg.world.width - self.width).max(0.0));

        self.grounded = false;
        self.vy += cfg.player.gravity;
        self.y += self.vy;
        if self.bottom() > cfg.world.ground_y {
            self.land_on(cfg.world.ground_y);
        }

        self.invulnerability.tick();

        for p in &mut self.particles {
            p.update();
        }
        self.particles.retain(|p| p.life.is_active());

        self.animation_ticks = self.animation_ticks.wrapping_add(1);
        self.update_tilt(&cfg.player);

        for laser in &mut self.lasers {
            laser.update();
        }
        let world_width = cfg.world.width;
        self.lasers.retain(|l| !l.is_off_screen(world_width));

        if self.vx > 0.0 {
            self.facing = Facing::Right;
        } else if self.vx < 0.0 {
            self.facing = Facing::Left;
        }

        self.refresh_state();
        self.state
    }

    /// Snap the feet to `top`, stop falling and restore the double jump.
    pub fn land_on(&mut self, top: f32) {
        self.y = top - self.height;
        self.vy = 0.0;
        self.grounded = true;
        self.jumping = false;
        self.double_jump_available = true;
        self.refresh_state();
    }

    /// Re-derive the discrete state from the physical flags.
    pub fn refresh_state(&mut self) {
        self.state = if self.invulnerability.is_active() {
            PlayerState::Hurt
        } else if self.squatting {
            PlayerState::Squatting
        } else if !self.grounded {
            if self.vy < 0.0 {
                PlayerState::Jumping
            } else {
                PlayerState::Falling
            }
        } else if self.vx != 0.0 {
            PlayerState::Running
        } else {
            PlayerState::Idle
        };
    }

    fn update_tilt(&mut self, cfg: &PlayerConfig) {
        if self.jumping {
            self.tilt = -cfg.tilt_max * (self.vy / cfg.jump_velocity);
        } else if !self.squatting {
            self.tilt = cfg.tilt_max * (self.animation_ticks as f32 * cfg.wobble_speed).sin();
        }
    }

    fn enter_squat(&mut self, squat_height: f32) {
        let feet = self.bottom();
        self.squatting = true;
        self.height = squat_height;
        self.y = feet - self.height;
    }

    fn stand_up(&mut self) {
        let feet = self.bottom();
        self.squatting = false;
        self.height = self.normal_height;
        self.y = feet - self.height;
    }

    /// Whether the full-height box at the current feet position is clear.
    pub fn can_stand(&self, obstacles: &[Obstacle]) -> bool {
        let standing = Aabb::new(
            self.x,
            self.bottom() - self.normal_height,
            self.width,
            self.normal_height,
        );
        !obstacles.iter().any(|o| standing.overlaps(&o.bounds()))
    }

    /// Full jump until one has been taken since the last landing (walking off
    /// a ledge still leaves it available), then the one-shot double jump.
    /// Returns `false` when the jump had no effect.
    pub fn jump<R: Rng + ?Sized>(&mut self, cfg: &RunnerConfig, rng: &mut R) -> bool {
        if self.squatting {
            return false;
        }
        let power = cfg.player.jump_velocity * self.jump_multiplier(cfg);
        if !self.jumping {
            self.vy = power;
            self.grounded = false;
            self.jumping = true;
            self.double_jump_available = true;
            self.spawn_burst(&cfg.player, rng);
        } else if self.double_jump_available {
            self.vy = power * cfg.player.double_jump_factor;
            self.jumping = true;
            self.double_jump_available = false;
            self.spawn_burst(&cfg.player, rng);
            self.spawn_burst(&cfg.player, rng);
        } else {
            return false;
        }
        self.refresh_state();
        true
    }

    /// Fire a laser from the player's leading edge. No-op while on cooldown.
    pub fn shoot(&mut self, now: Millis, cfg: &RunnerConfig) -> bool {
        if !self.fire_cooldown.is_ready(now) {
            return false;
        }
        self.lasers.push(Laser::new(
            self.x + self.width,
            self.y + self.height / 2.0,
            &cfg.laser,
        ));
        self.fire_cooldown.start(now, cfg.laser.cooldown_ms);
        true
    }

    /// Lose one health point unless protected. Returns whether damage applied.
    pub fn take_damage<R: Rng + ?Sized>(&mut self, cfg: &RunnerConfig, rng: &mut R) -> bool {
        if self.unlimited_health || self.invulnerability.is_active() {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.invulnerability.start(cfg.player.invulnerability_ticks);
        self.state = PlayerState::Hurt;
        self.spawn_burst(&cfg.player, rng);
        true
    }

    /// Grant (or extend) a power-up and announce it.
    pub fn activate_power_up<R: Rng + ?Sized>(
        &mut self,
        kind: PowerKind,
        now: Millis,
        cfg: &RunnerConfig,
        rng: &mut R,
    ) {
        powerup::grant(&mut self.power_ups, kind, now, cfg.power_ups.duration_ms);
        self.message.show(kind.label(), cfg.messages.duration_ticks);
        for _ in 0..cfg.power_ups.celebration_bursts {
            self.spawn_burst(&cfg.player, rng);
        }
    }

    fn spawn_burst<R: Rng + ?Sized>(&mut self, cfg: &PlayerConfig, rng: &mut R) {
        let (cx, cy) = self.bounds().center();
        for _ in 0..cfg.particle_count {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(cfg.particle_speed_min..=cfg.particle_speed_max);
            self.particles.push(Particle {
                x: cx,
                y: cy,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: TickTimer::running(cfg.particle_lifetime_ticks),
                color: rng.random_range(0..PARTICLE_COLORS),
            });
        }
    }
}
