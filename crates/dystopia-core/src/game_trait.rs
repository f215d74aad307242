use serde::{Deserialize, Serialize};

use crate::timer::Millis;

/// Core trait the host loop drives.
///
/// The host owns the clock, input devices, rendering and score reporting;
/// the game only advances its own state one fixed step at a time.
pub trait ArcadeGame: Send + Sync {
    /// Per-tick input snapshot consumed by [`update`](Self::update).
    type Input: Default;

    /// Game metadata for window titles and logs.
    fn metadata(&self) -> GameMetadata;

    /// Simulation steps per second.
    fn tick_rate(&self) -> f32 {
        60.0
    }

    /// Advance exactly one step. `now` is the host's wall clock, used only by
    /// deadline-based timers; frame-counted timers ignore it.
    fn update(&mut self, now: Millis, input: &Self::Input) -> Vec<GameEvent>;

    /// Discard the whole run and rebuild it from initial values.
    fn restart(&mut self);

    /// Serialize the complete state for the renderer.
    fn serialize_state(&self) -> Vec<u8>;

    /// Replace the state with a previously serialized snapshot.
    /// Malformed input is ignored.
    fn apply_state(&mut self, state: &[u8]);

    fn pause(&mut self);

    fn resume(&mut self);

    fn is_paused(&self) -> bool;

    /// Terminal state of a run; only [`restart`](Self::restart) leaves it.
    fn is_game_over(&self) -> bool;

    /// Score of the current run.
    fn score(&self) -> u64;
}

/// Game metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMetadata {
    pub name: String,
    pub description: String,
}

/// Events emitted by a game during update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreUpdate { score: u64 },
    LevelUp { level: u8 },
    PlayerHurt { health: u8 },
    EncounterCleared { level: u8 },
    GameOver { score: u64 },
    Restarted,
}

/// Generates the `ArcadeGame` methods that only read or replace the state
/// struct: `serialize_state`, `apply_state`, `is_paused`, `is_game_over`,
/// `score`.
///
/// Requires the implementing struct to have a `state: $StateType` field, and
/// `$StateType` to have `paused: bool`, `game_over: bool` and `score: u64`.
#[macro_export]
macro_rules! arcade_game_boilerplate {
    (state_type: $StateType:ty) => {
        fn serialize_state(&self) -> Vec<u8> {
            rmp_serde::to_vec(&self.state).expect("game state serialization must succeed")
        }

        fn apply_state(&mut self, state: &[u8]) {
            match rmp_serde::from_slice::<$StateType>(state) {
                Ok(s) => self.state = s,
                Err(e) => tracing::debug!(error = %e, "Ignored malformed state snapshot"),
            }
        }

        fn is_paused(&self) -> bool {
            self.state.paused
        }

        fn is_game_over(&self) -> bool {
            self.state.game_over
        }

        fn score(&self) -> u64 {
            self.state.score
        }
    };
}
