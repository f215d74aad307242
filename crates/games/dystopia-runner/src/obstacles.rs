use serde::{Deserialize, Serialize};

use dystopia_core::Aabb;

use crate::config::{ObstacleConfig, ObstacleDims};

/// Hazard type, chosen uniformly by the world generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Spike,
    LaserHazard,
    Drone,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [
        ObstacleKind::Spike,
        ObstacleKind::LaserHazard,
        ObstacleKind::Drone,
    ];

    pub fn dims(self, cfg: &ObstacleConfig) -> ObstacleDims {
        match self {
            ObstacleKind::Spike => cfg.spike,
            ObstacleKind::LaserHazard => cfg.laser,
            ObstacleKind::Drone => cfg.drone,
        }
    }
}

/// Static world platform. Scrolls left with the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn update(&mut self, scroll_speed: f32) {
        self.x -= scroll_speed;
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_off_screen(&self) -> bool {
        self.right() < 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub damage: u8,
    /// Resting height of a drone; equal to `y` for static hazards.
    pub base_y: f32,
    /// Oscillation phase accumulator (drones only).
    pub phase: f32,
    pub facing_left: bool,
}

impl Obstacle {
    pub fn new(kind: ObstacleKind, x: f32, y: f32, cfg: &ObstacleConfig) -> Self {
        let dims = kind.dims(cfg);
        Self {
            kind,
            x,
            y,
            width: dims.width,
            height: dims.height,
            damage: dims.damage,
            base_y: y,
            phase: 0.0,
            facing_left: true,
        }
    }

    pub fn update(&mut self, scroll_speed: f32, cfg: &ObstacleConfig) {
        self.x -= scroll_speed;
        if self.kind == ObstacleKind::Drone {
            self.phase += cfg.drone_phase_step;
            self.y = self.base_y + self.phase.sin() * cfg.drone_amplitude;
            self.facing_left = self.phase.cos() <= 0.0;
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_off_screen(&self) -> bool {
        self.x + self.width < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spike_only_scrolls() {
        let cfg = ObstacleConfig::default();
        let mut spike = Obstacle::new(ObstacleKind::Spike, 500.0, 550.0, &cfg);
        spike.update(3.0, &cfg);
        assert_eq!(spike.x, 497.0);
        assert_eq!(spike.y, 550.0);
        assert_eq!(spike.damage, 1);
    }

    #[test]
    fn laser_hazard_dims() {
        let cfg = ObstacleConfig::default();
        let hazard = Obstacle::new(ObstacleKind::LaserHazard, 0.0, 0.0, &cfg);
        assert_eq!((hazard.width, hazard.height, hazard.damage), (10.0, 100.0, 2));
    }

    #[test]
    fn drone_oscillates_around_base() {
        let cfg = ObstacleConfig::default();
        let mut drone = Obstacle::new(ObstacleKind::Drone, 500.0, 500.0, &cfg);
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        for _ in 0..200 {
            drone.update(0.0, &cfg);
            min_y = min_y.min(drone.y);
            max_y = max_y.max(drone.y);
        }
        assert!(max_y <= 550.0 + 1e-3);
        assert!(min_y >= 450.0 - 1e-3);
        assert!(max_y - min_y > 90.0, "drone should sweep most of its range");
    }

    #[test]
    fn drone_faces_right_while_cosine_positive() {
        let cfg = ObstacleConfig::default();
        let mut drone = Obstacle::new(ObstacleKind::Drone, 0.0, 0.0, &cfg);
        drone.update(0.0, &cfg);
        assert!(!drone.facing_left);
        // Past a quarter period the cosine turns negative.
        for _ in 0..40 {
            drone.update(0.0, &cfg);
        }
        assert!(drone.facing_left);
    }

    #[test]
    fn platform_off_screen_by_trailing_edge() {
        let mut p = Platform {
            x: 10.0,
            y: 600.0,
            width: 60.0,
            height: 20.0,
        };
        p.update(69.0);
        assert!(!p.is_off_screen());
        p.update(2.0);
        assert!(p.is_off_screen());
    }
}
