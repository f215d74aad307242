pub mod game_trait;
pub mod geometry;
pub mod message;
pub mod powerup;
pub mod timer;

pub use geometry::Aabb;
pub use message::TimedMessage;
pub use timer::{DeadlineTimer, Millis, TickTimer};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::{ArcadeGame, GameEvent};
    use crate::timer::Millis;

    /// Milliseconds per tick at 60 Hz, rounded down.
    pub const TICK_MS: Millis = 16;

    /// Run `n` ticks with default input, starting the clock at `start_ms`.
    /// Returns all accumulated events and the clock value after the last tick.
    pub fn run_game_ticks<G: ArcadeGame>(
        game: &mut G,
        n: usize,
        start_ms: Millis,
    ) -> (Vec<GameEvent>, Millis) {
        let input = G::Input::default();
        let mut now = start_ms;
        let mut all_events = Vec::new();
        for _ in 0..n {
            now += TICK_MS;
            all_events.extend(game.update(now, &input));
        }
        (all_events, now)
    }

    /// Assert that the game's serialized state differs from `before`.
    pub fn assert_game_state_changed<G: ArcadeGame>(game: &G, before: &[u8]) {
        let after = game.serialize_state();
        assert_ne!(
            before,
            &after[..],
            "Game state should have changed after operation"
        );
    }

    // ================================================================
    // Game Trait Contract Tests
    // ================================================================
    // Generic checks every ArcadeGame implementation must pass. Game crates
    // call them from their own #[cfg(test)] modules with a fresh instance.

    /// serialize_state() must return non-empty bytes for a fresh game.
    pub fn contract_fresh_game_has_state<G: ArcadeGame>(game: &G) {
        assert!(
            !game.serialize_state().is_empty(),
            "serialize_state() must return non-empty bytes"
        );
        assert!(!game.is_game_over(), "A fresh game must not be over");
        assert!(!game.is_paused(), "A fresh game must not be paused");
    }

    /// update() must advance the simulation.
    pub fn contract_update_advances_state<G: ArcadeGame>(game: &mut G) {
        let before = game.serialize_state();
        run_game_ticks(game, 1, 0);
        assert_game_state_changed(game, &before);
    }

    /// The score must not move while paused, and must move again on resume.
    pub fn contract_pause_stops_updates<G: ArcadeGame>(game: &mut G) {
        game.pause();
        assert!(game.is_paused());
        let before = game.score();
        let (_, now) = run_game_ticks(game, 10, 0);
        assert_eq!(before, game.score(), "Score must not change while paused");

        game.resume();
        run_game_ticks(game, 10, now);
        assert!(game.score() > before, "Score must advance after resume");
    }

    /// serialize_state -> apply_state must be stable after one roundtrip.
    pub fn contract_state_roundtrip_preserves<G: ArcadeGame>(game: &mut G) {
        let state_a = game.serialize_state();
        game.apply_state(&state_a);
        let state_b = game.serialize_state();
        game.apply_state(&state_b);
        let state_c = game.serialize_state();
        assert_eq!(
            state_b, state_c,
            "State must be stable after serialize→apply→serialize roundtrip"
        );
    }

    /// Garbage snapshots must leave the state untouched.
    pub fn contract_garbage_state_ignored<G: ArcadeGame>(game: &mut G) {
        let before = game.serialize_state();
        game.apply_state(&[0xFF, 0xFE, 0x00, 0x01, 0xAB, 0xCD]);
        assert_eq!(before, game.serialize_state());
    }

    /// restart() must reset the score to zero.
    pub fn contract_restart_resets_score<G: ArcadeGame>(game: &mut G) {
        run_game_ticks(game, 30, 0);
        assert!(game.score() > 0, "Score should grow with elapsed ticks");
        game.restart();
        assert_eq!(game.score(), 0, "restart() must reset the score");
        assert!(!game.is_game_over());
    }
}
