use serde::{Deserialize, Serialize};

use dystopia_core::Aabb;

use crate::config::LaserConfig;

/// A laser bolt fired by the player. Travels right at constant speed and is
/// not affected by the world scroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub width: f32,
    pub height: f32,
    pub active: bool,
}

impl Laser {
    /// Spawn with the bolt's left edge at `x` and its vertical center at `center_y`.
    pub fn new(x: f32, center_y: f32, cfg: &LaserConfig) -> Self {
        Self {
            x,
            y: center_y - cfg.height / 2.0,
            vx: cfg.speed,
            width: cfg.width,
            height: cfg.height,
            active: true,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Past the right edge of the world, or behind the left edge.
    pub fn is_off_screen(&self, world_width: f32) -> bool {
        self.x > world_width || self.x + self.width < 0.0
    }
}
