use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::timer::{DeadlineTimer, Millis};

/// Trait for game-specific power-up kind enums.
pub trait PowerUpKind: Clone + Copy + PartialEq + Serialize + DeserializeOwned {
    /// Short announcement shown when the power-up is activated.
    fn label(&self) -> &'static str;
}

/// Active power-up effect, generic over the kind enum.
///
/// Duration is wall-clock based: collecting the same kind again pushes the
/// deadline out instead of stacking a second multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ActivePowerUp<K: PowerUpKind> {
    pub kind: K,
    pub expiry: DeadlineTimer,
}

impl<K: PowerUpKind> ActivePowerUp<K> {
    pub fn new(kind: K, now: Millis, duration_ms: Millis) -> Self {
        Self {
            kind,
            expiry: DeadlineTimer::starting_at(now, duration_ms),
        }
    }

    /// Restart the window from `now`.
    pub fn extend(&mut self, now: Millis, duration_ms: Millis) {
        self.expiry.start(now, duration_ms);
    }

    pub fn is_expired(&self, now: Millis) -> bool {
        self.expiry.is_expired(now)
    }

    pub fn expires_at(&self) -> Option<Millis> {
        self.expiry.deadline()
    }
}

/// Grant `kind` to `active`, extending an existing entry of the same kind.
pub fn grant<K: PowerUpKind>(
    active: &mut Vec<ActivePowerUp<K>>,
    kind: K,
    now: Millis,
    duration_ms: Millis,
) {
    match active.iter_mut().find(|p| p.kind == kind) {
        Some(existing) => existing.extend(now, duration_ms),
        None => active.push(ActivePowerUp::new(kind, now, duration_ms)),
    }
}

/// Whether an entry of `kind` is currently held.
pub fn is_active<K: PowerUpKind>(active: &[ActivePowerUp<K>], kind: K) -> bool {
    active.iter().any(|p| p.kind == kind)
}

/// Drop every entry whose deadline has passed. Returns the kinds removed.
pub fn expire<K: PowerUpKind>(active: &mut Vec<ActivePowerUp<K>>, now: Millis) -> Vec<K> {
    let mut expired = Vec::new();
    active.retain(|p| {
        if p.is_expired(now) {
            expired.push(p.kind);
            false
        } else {
            true
        }
    });
    expired
}
