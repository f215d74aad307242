use serde::{Deserialize, Serialize};

use dystopia_core::Aabb;
use dystopia_core::powerup;

/// Runner power-up types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerKind {
    Speed,
    Jump,
}

impl PowerKind {
    pub const ALL: [PowerKind; 2] = [PowerKind::Speed, PowerKind::Jump];
}

impl powerup::PowerUpKind for PowerKind {
    fn label(&self) -> &'static str {
        match self {
            PowerKind::Speed => "Super Speed!",
            PowerKind::Jump => "Super Jump!",
        }
    }
}

/// Active power-up effect on the player.
pub type ActivePowerUp = powerup::ActivePowerUp<PowerKind>;

/// Cheeseball pickup floating above a platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cheeseball {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub kind: PowerKind,
    pub collected: bool,
    /// Drives the renderer's glow pulse.
    pub animation_ticks: u32,
}

impl Cheeseball {
    pub fn new(x: f32, y: f32, size: f32, kind: PowerKind) -> Self {
        Self {
            x,
            y,
            size,
            kind,
            collected: false,
            animation_ticks: 0,
        }
    }

    pub fn update(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
        self.animation_ticks = self.animation_ticks.wrapping_add(1);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.size, self.size)
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.size < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dystopia_core::powerup::PowerUpKind;

    #[test]
    fn labels_match_announcements() {
        assert_eq!(PowerKind::Speed.label(), "Super Speed!");
        assert_eq!(PowerKind::Jump.label(), "Super Jump!");
    }

    #[test]
    fn cheeseball_scrolls_off_screen() {
        let mut ball = Cheeseball::new(2.0, 600.0, 25.0, PowerKind::Jump);
        assert!(!ball.is_off_screen());
        for _ in 0..10 {
            ball.update(3.0);
        }
        assert!(ball.is_off_screen());
        assert_eq!(ball.animation_ticks, 10);
    }
}
