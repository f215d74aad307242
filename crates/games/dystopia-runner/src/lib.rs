pub mod collision;
pub mod config;
pub mod encounter;
pub mod enemies;
pub mod input;
pub mod obstacles;
pub mod physics;
pub mod powerups;
pub mod progression;
pub mod projectile;
pub mod scoring;
pub mod world_gen;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use dystopia_core::arcade_game_boilerplate;
use dystopia_core::game_trait::{ArcadeGame, GameEvent, GameMetadata};
use dystopia_core::{DeadlineTimer, Millis, TimedMessage};

use config::{Capabilities, RunnerConfig};
use encounter::ScriptedEncounter;
use enemies::{Cat, EnemyContext};
use input::FrameInput;
use obstacles::{Obstacle, Platform};
use physics::{Player, PlayerContext};
use powerups::Cheeseball;
use progression::Progression;

/// Complete simulation state, handed to the renderer every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerState {
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub obstacles: Vec<Obstacle>,
    pub cats: Vec<Cat>,
    pub pickups: Vec<Cheeseball>,
    /// One entry per configured encounter, same order.
    pub encounters: Vec<ScriptedEncounter>,
    pub progression: Progression,
    pub score: u64,
    pub scroll_speed: f32,
    pub paused: bool,
    /// Pause overlay opacity, 0..=255.
    pub pause_alpha: u8,
    pub game_over: bool,
    pub cheat_entry_open: bool,
    pub cheat_message: TimedMessage,
    /// Armed on the first simulated tick of a run.
    pub enemy_spawn: DeadlineTimer,
    pub ticks: u64,
}

impl RunnerState {
    /// Fresh run: full health, level 1, base scroll speed and one chunk of
    /// world ahead of the window.
    pub fn new<R: Rng + ?Sized>(cfg: &RunnerConfig, rng: &mut R) -> Self {
        let chunk = world_gen::extend_world(&[], cfg, rng);
        Self {
            player: Player::new(cfg),
            platforms: chunk.platforms,
            obstacles: chunk.obstacles,
            cats: Vec::new(),
            pickups: chunk.pickups,
            encounters: cfg
                .encounters
                .iter()
                .map(|e| ScriptedEncounter::new(e, cfg.messages.fade_ticks))
                .collect(),
            progression: Progression::new(cfg),
            score: 0,
            scroll_speed: cfg.scroll.base_speed,
            paused: false,
            pause_alpha: 0,
            game_over: false,
            cheat_entry_open: false,
            cheat_message: TimedMessage::with_fade(cfg.messages.fade_ticks),
            enemy_spawn: DeadlineTimer::unset(),
            ticks: 0,
        }
    }

    pub fn current_level(&self) -> u8 {
        self.progression.current_level
    }
}

/// The Dystopia Runner game.
pub struct DystopiaRunner {
    config: RunnerConfig,
    capabilities: Capabilities,
    rng: StdRng,
    state: RunnerState,
}

impl DystopiaRunner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default(), Capabilities::default())
    }

    pub fn with_config(config: RunnerConfig, capabilities: Capabilities) -> Self {
        Self::from_rng(config, capabilities, StdRng::from_os_rng())
    }

    /// Reproducible runs for tests.
    pub fn with_seed(config: RunnerConfig, seed: u64) -> Self {
        Self::from_rng(config, Capabilities::default(), StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: RunnerConfig, capabilities: Capabilities, mut rng: StdRng) -> Self {
        let state = RunnerState::new(&config, &mut rng);
        Self {
            config,
            capabilities,
            rng,
            state,
        }
    }

    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[cfg(test)]
    fn state_mut(&mut self) -> &mut RunnerState {
        &mut self.state
    }

    fn toggle_pause(&mut self) {
        if self.state.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn handle_cheat(&mut self, code: &str) {
        self.state.cheat_entry_open = false;
        if !code.eq_ignore_ascii_case(&self.config.messages.cheat_code) {
            return;
        }
        let player = &mut self.state.player;
        player.unlimited_health = !player.unlimited_health;
        let text = if player.unlimited_health {
            "Unlimited Health Activated!"
        } else {
            "Unlimited Health Deactivated!"
        };
        self.state
            .cheat_message
            .show(text, self.config.messages.duration_ticks);
        tracing::info!(enabled = player.unlimited_health, "Cheat toggled");
    }

    /// One simulated tick in fixed order: player, generation, entity motion,
    /// collisions, progression.
    fn step(&mut self, now: Millis, input: &FrameInput) -> Vec<GameEvent> {
        let cfg = &self.config;
        let rng = &mut self.rng;
        let st = &mut self.state;

        st.cheat_message.tick();

        if input.jump {
            st.player.jump(cfg, rng);
        }
        if input.fire {
            st.player.shoot(now, cfg);
        }
        let ctx = PlayerContext {
            now,
            obstacles: &st.obstacles,
        };
        st.player.update(input, &ctx, cfg);

        if world_gen::needs_chunk(&st.platforms, cfg) {
            let chunk = world_gen::extend_world(&st.platforms, cfg, rng);
            st.platforms.extend(chunk.platforms);
            st.obstacles.extend(chunk.obstacles);
            st.pickups.extend(chunk.pickups);
        }

        let scroll = st.scroll_speed;
        for platform in &mut st.platforms {
            platform.update(scroll);
        }
        for obstacle in &mut st.obstacles {
            obstacle.update(scroll, &cfg.obstacles);
        }
        for ball in &mut st.pickups {
            ball.update(scroll);
        }
        let enemy_ctx = EnemyContext {
            now,
            player_x: st.player.x,
            player_y: st.player.y,
            capabilities: self.capabilities,
        };
        for cat in &mut st.cats {
            cat.update(&enemy_ctx, cfg, rng);
        }

        if st.enemy_spawn.deadline().is_none() {
            st.enemy_spawn.start(now, cfg.enemy.spawn_interval_ms);
        } else if st.enemy_spawn.is_expired(now) {
            st.cats
                .push(Cat::spawn(cfg.world.width + cfg.enemy.spawn_offset, cfg));
            st.enemy_spawn.start(now, cfg.enemy.spawn_interval_ms);
            tracing::debug!(count = st.cats.len(), "Spawned cat");
        }

        st.score += scoring::distance_score(&cfg.scoring);
        st.scroll_speed += cfg.scroll.drift_per_tick;

        st.platforms.retain(|p| !p.is_off_screen());
        st.obstacles.retain(|o| !o.is_off_screen());
        st.pickups.retain(|b| !b.is_off_screen());
        st.cats.retain(|c| !c.is_off_screen());

        let mut events = collision::resolve(st, now, cfg, rng);

        if !st.game_over {
            if let Some(level) = st.progression.tick(st.score, cfg, &mut st.scroll_speed) {
                events.push(GameEvent::LevelUp { level });
            }
            let level = st.progression.current_level;
            for (enc, enc_cfg) in st.encounters.iter_mut().zip(&cfg.encounters) {
                enc.update(now, level, enc_cfg, rng);
            }
        }

        st.ticks += 1;
        events
    }
}

impl Default for DystopiaRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeGame for DystopiaRunner {
    type Input = FrameInput;

    fn metadata(&self) -> GameMetadata {
        GameMetadata {
            name: "Dystopia Runner".to_string(),
            description: "Outrun the cats, collect cheese and survive the dystopia!".to_string(),
        }
    }

    fn tick_rate(&self) -> f32 {
        60.0
    }

    fn update(&mut self, now: Millis, input: &FrameInput) -> Vec<GameEvent> {
        if input.restart {
            self.restart();
            return vec![GameEvent::Restarted];
        }
        if self.state.game_over {
            return Vec::new();
        }

        if input.pause {
            self.toggle_pause();
        }
        if self.state.paused {
            let msg = &self.config.messages;
            self.state.pause_alpha = self
                .state
                .pause_alpha
                .saturating_add(msg.pause_alpha_step)
                .min(msg.pause_alpha_max);
            return Vec::new();
        }

        if input.cheat_toggle {
            self.state.cheat_entry_open = !self.state.cheat_entry_open;
        }
        if self.state.cheat_entry_open {
            if let Some(code) = &input.cheat_submit {
                self.handle_cheat(code);
            }
            return Vec::new();
        }

        self.step(now, input)
    }

    fn restart(&mut self) {
        tracing::info!(score = self.state.score, "Restarting run");
        self.state = RunnerState::new(&self.config, &mut self.rng);
    }

    fn pause(&mut self) {
        if self.state.game_over {
            return;
        }
        self.state.paused = true;
        self.state.pause_alpha = 0;
    }

    fn resume(&mut self) {
        self.state.paused = false;
    }

    arcade_game_boilerplate!(state_type: RunnerState);
}

#[cfg(test)]
mod tests {
    use super::*;
    use dystopia_core::test_helpers::{self, TICK_MS};
    use obstacles::ObstacleKind;
    use powerups::PowerKind;

    fn make_game() -> DystopiaRunner {
        DystopiaRunner::with_seed(RunnerConfig::default(), 42)
    }

    /// Game with the generated world removed so nothing can touch the player.
    fn quiet_game() -> DystopiaRunner {
        let mut game = make_game();
        let st = game.state_mut();
        st.obstacles.clear();
        st.pickups.clear();
        game
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    // ================================================================
    // Contract tests
    // ================================================================

    #[test]
    fn contract_fresh_game_has_state() {
        test_helpers::contract_fresh_game_has_state(&make_game());
    }

    #[test]
    fn contract_update_advances_state() {
        test_helpers::contract_update_advances_state(&mut make_game());
    }

    #[test]
    fn contract_pause_stops_updates() {
        test_helpers::contract_pause_stops_updates(&mut make_game());
    }

    #[test]
    fn contract_state_roundtrip_preserves() {
        let mut game = make_game();
        test_helpers::run_game_ticks(&mut game, 20, 0);
        test_helpers::contract_state_roundtrip_preserves(&mut game);
    }

    #[test]
    fn contract_garbage_state_ignored() {
        test_helpers::contract_garbage_state_ignored(&mut make_game());
    }

    #[test]
    fn contract_restart_resets_score() {
        test_helpers::contract_restart_resets_score(&mut make_game());
    }

    // ================================================================
    // Simulation loop
    // ================================================================

    #[test]
    fn idle_tick_on_ground() {
        let mut game = quiet_game();
        let (x, health) = (game.state().player.x, game.state().player.health);
        game.update(TICK_MS, &idle());
        let st = game.state();
        assert_eq!(st.player.x, x);
        assert_eq!(st.player.health, health);
        assert!(matches!(
            st.player.state,
            physics::PlayerState::Idle | physics::PlayerState::Running
        ));
        assert_eq!(st.score, 1);
    }

    #[test]
    fn fatal_hit_ends_run_in_same_tick() {
        let mut game = quiet_game();
        let st = game.state_mut();
        st.player.health = 1;
        let spike = Obstacle::new(
            ObstacleKind::Spike,
            st.player.x + 10.0,
            st.player.y + 20.0,
            &RunnerConfig::default().obstacles,
        );
        st.obstacles.push(spike);
        let events = game.update(TICK_MS, &idle());
        assert_eq!(game.state().player.health, 0);
        assert!(game.is_game_over());
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn game_over_freezes_until_restart() {
        let mut game = quiet_game();
        game.state_mut().game_over = true;
        let before = game.serialize_state();
        game.update(TICK_MS, &idle());
        let pause = FrameInput {
            pause: true,
            ..Default::default()
        };
        game.update(2 * TICK_MS, &pause);
        assert_eq!(before, game.serialize_state());
        assert!(!game.is_paused(), "pause is ignored after game over");

        let restart = FrameInput {
            restart: true,
            ..Default::default()
        };
        let events = game.update(3 * TICK_MS, &restart);
        assert_eq!(events, vec![GameEvent::Restarted]);
        assert!(!game.is_game_over());
        assert_eq!(game.state().player.health, 3);
        assert_eq!(game.state().current_level(), 1);
    }

    #[test]
    fn pause_toggle_fades_overlay() {
        let mut game = quiet_game();
        let pause = FrameInput {
            pause: true,
            ..Default::default()
        };
        game.update(TICK_MS, &pause);
        assert!(game.is_paused());
        assert_eq!(game.state().pause_alpha, 10);
        for i in 0..30 {
            game.update(TICK_MS * (i + 2), &idle());
        }
        assert_eq!(game.state().pause_alpha, 180);
        assert_eq!(game.score(), 0);

        game.update(TICK_MS * 40, &pause);
        assert!(!game.is_paused());
        game.update(TICK_MS * 41, &pause);
        assert_eq!(game.state().pause_alpha, 10, "pausing again restarts the fade");
    }

    #[test]
    fn cheat_code_toggles_unlimited_health() {
        let mut game = quiet_game();
        let open = FrameInput {
            cheat_toggle: true,
            ..Default::default()
        };
        game.update(TICK_MS, &open);
        assert!(game.state().cheat_entry_open);
        game.update(2 * TICK_MS, &idle());
        assert_eq!(game.score(), 0, "simulation frozen while entering a code");

        let submit = FrameInput {
            cheat_submit: Some("huggyb".to_string()),
            ..Default::default()
        };
        game.update(3 * TICK_MS, &submit);
        assert!(game.state().player.unlimited_health);
        assert!(!game.state().cheat_entry_open);
        assert_eq!(
            game.state().cheat_message.text(),
            Some("Unlimited Health Activated!")
        );
    }

    #[test]
    fn wrong_cheat_code_is_ignored() {
        let mut game = quiet_game();
        let open = FrameInput {
            cheat_toggle: true,
            ..Default::default()
        };
        game.update(TICK_MS, &open);
        let submit = FrameInput {
            cheat_submit: Some("HugB".to_string()),
            ..Default::default()
        };
        game.update(2 * TICK_MS, &submit);
        assert!(!game.state().player.unlimited_health);
        assert!(game.state().cheat_message.text().is_none());
    }

    #[test]
    fn cats_spawn_on_wall_clock_interval() {
        let mut game = quiet_game();
        game.update(0, &idle());
        assert!(game.state().cats.is_empty());
        game.update(5_000, &idle());
        assert!(game.state().cats.is_empty());
        game.update(5_001, &idle());
        assert_eq!(game.state().cats.len(), 1);
        let cat = &game.state().cats[0];
        assert!(cat.x > game.config().world.width);
    }

    #[test]
    fn score_jump_reaches_highest_level_in_one_tick() {
        let mut game = quiet_game();
        game.state_mut().score = 900;
        game.update(TICK_MS, &idle());
        assert_eq!(game.state().current_level(), 1);
        game.state_mut().score = 2_599;
        let events = game.update(2 * TICK_MS, &idle());
        assert_eq!(game.state().current_level(), 3);
        assert_eq!(events, vec![GameEvent::LevelUp { level: 3 }]);
    }

    #[test]
    fn firing_spawns_laser_on_cooldown() {
        let mut game = quiet_game();
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        game.update(1_000, &fire);
        game.update(1_016, &fire);
        assert_eq!(game.state().player.lasers.len(), 1);
        game.update(1_500, &fire);
        assert_eq!(game.state().player.lasers.len(), 2);
    }

    #[test]
    fn speed_pickup_through_loop() {
        let mut game = quiet_game();
        let st = game.state_mut();
        let (cx, cy) = st.player.bounds().center();
        st.pickups
            .push(Cheeseball::new(cx + 3.0, cy, 25.0, PowerKind::Speed));
        game.update(2_000, &idle());
        assert!(game.state().player.has_power_up(PowerKind::Speed));
        assert_eq!(
            game.state().player.power_up_expiry(PowerKind::Speed),
            Some(7_000)
        );
        assert_eq!(game.state().player.message.text(), Some("Super Speed!"));
    }

    #[test]
    fn snapshot_exposes_renderer_fields() {
        let game = make_game();
        let json = serde_json::to_value(game.state()).unwrap();
        assert!(json["player"]["state"].is_string());
        assert!(json["progression"]["announcement"].is_object());
        assert!(json["scroll_speed"].is_number());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn input_from(bits: u8) -> FrameInput {
            FrameInput {
                move_left: bits & 1 != 0,
                move_right: bits & 2 != 0,
                squat: bits & 4 != 0,
                jump: bits & 8 != 0,
                fire: bits & 16 != 0,
                ..Default::default()
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn run_invariants_hold(
                seed in 0u64..1_000,
                inputs in proptest::collection::vec(any::<u8>(), 50..400),
            ) {
                let mut game = DystopiaRunner::with_seed(RunnerConfig::default(), seed);
                let max_health = game.config().player.initial_health;
                let mut now: Millis = 0;
                for bits in inputs {
                    let before = game.state().clone();
                    now += TICK_MS;
                    game.update(now, &input_from(bits));
                    let st = game.state();

                    prop_assert!(st.player.health <= max_health);
                    prop_assert!(st.score >= before.score);
                    prop_assert!(st.scroll_speed >= before.scroll_speed);
                    prop_assert!(st.current_level() >= before.current_level());
                    if before.player.invulnerability.remaining() > 1 || before.player.unlimited_health {
                        prop_assert_eq!(st.player.health, before.player.health);
                    }
                    prop_assert!(st.platforms.iter().all(|p| p.right() >= 0.0));
                    prop_assert!(st.obstacles.iter().all(|o| o.x + o.width >= 0.0));
                    prop_assert!(st.pickups.iter().all(|b| b.x + b.size >= 0.0));
                    prop_assert!(st.cats.iter().all(|c| c.x + c.width >= 0.0));
                    prop_assert!(!st.platforms.is_empty());
                    if st.game_over {
                        prop_assert_eq!(st.player.health, 0);
                        break;
                    }
                }
            }
        }
    }
}
