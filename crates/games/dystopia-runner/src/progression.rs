use serde::{Deserialize, Serialize};

use dystopia_core::TimedMessage;

use crate::config::{LevelConfig, Rgb, RunnerConfig, Theme};

/// Theme colors with fractional channels, eased toward a target every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeTransition {
    pub background: [f32; 3],
    pub ground: [f32; 3],
    pub platform: [f32; 3],
    pub target: Theme,
}

impl ThemeTransition {
    pub fn settled(theme: Theme) -> Self {
        Self {
            background: to_f32(theme.background),
            ground: to_f32(theme.ground),
            platform: to_f32(theme.platform),
            target: theme,
        }
    }

    pub fn retarget(&mut self, theme: Theme) {
        self.target = theme;
    }

    /// Close `speed / 255` of the remaining gap on every channel. Channels
    /// within one unit of the target snap onto it.
    pub fn step(&mut self, speed: f32) {
        let t = speed / 255.0;
        ease(&mut self.background, self.target.background, t);
        ease(&mut self.ground, self.target.ground, t);
        ease(&mut self.platform, self.target.platform, t);
    }

    pub fn is_settled(&self) -> bool {
        self.current() == self.target
            && [self.background, self.ground, self.platform]
                .iter()
                .flatten()
                .all(|c| c.fract() == 0.0)
    }

    /// Colors to draw this frame.
    pub fn current(&self) -> Theme {
        Theme {
            background: to_rgb(self.background),
            ground: to_rgb(self.ground),
            platform: to_rgb(self.platform),
        }
    }
}

fn ease(current: &mut [f32; 3], target: Rgb, t: f32) {
    for (c, &goal) in current.iter_mut().zip(target.iter()) {
        let goal = f32::from(goal);
        let diff = goal - *c;
        if diff.abs() < 1.0 {
            *c = goal;
        } else {
            *c += diff * t;
        }
    }
}

fn to_f32(rgb: Rgb) -> [f32; 3] {
    rgb.map(f32::from)
}

fn to_rgb(channels: [f32; 3]) -> Rgb {
    channels.map(|c| c.round().clamp(0.0, 255.0) as u8)
}

/// Score-driven level state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub current_level: u8,
    pub theme: ThemeTransition,
    /// Level name (or welcome text) shown on entering a level.
    pub announcement: TimedMessage,
}

impl Progression {
    pub fn new(cfg: &RunnerConfig) -> Self {
        let mut announcement = TimedMessage::with_fade(cfg.messages.fade_ticks);
        let theme = match cfg.level(1) {
            Some(first) => {
                announcement.show(first.announcement(), cfg.messages.announcement_ticks);
                first.theme
            },
            None => Theme {
                background: [0, 0, 0],
                ground: [0, 0, 0],
                platform: [0, 0, 0],
            },
        };
        Self {
            current_level: 1,
            theme: ThemeTransition::settled(theme),
            announcement,
        }
    }

    /// Highest-threshold level reachable at `score` that lies above the
    /// current one.
    pub fn eligible_level(&self, score: u64, levels: &[LevelConfig]) -> Option<u8> {
        let mut by_threshold: Vec<&LevelConfig> = levels.iter().collect();
        by_threshold.sort_by(|a, b| b.score_required.cmp(&a.score_required));
        by_threshold
            .into_iter()
            .find(|l| l.score_required <= score && l.id > self.current_level)
            .map(|l| l.id)
    }

    /// Switch to level `id`: retarget the theme, restart the announcement and
    /// scale the scroll speed. Returns `false` for unknown or non-advancing ids.
    pub fn enter_level(&mut self, id: u8, cfg: &RunnerConfig, scroll_speed: &mut f32) -> bool {
        let Some(level) = cfg.level(id) else {
            debug_assert!(false, "level {id} missing from the level table");
            return false;
        };
        if id <= self.current_level {
            return false;
        }
        self.current_level = id;
        self.theme.retarget(level.theme);
        self.announcement
            .show(level.announcement(), cfg.messages.announcement_ticks);
        *scroll_speed *= cfg.scroll.level_scale;
        tracing::info!(level = id, name = %level.name, scroll_speed = *scroll_speed, "Entered level");
        true
    }

    /// One progression step. Returns the level entered this tick, if any.
    pub fn tick(&mut self, score: u64, cfg: &RunnerConfig, scroll_speed: &mut f32) -> Option<u8> {
        self.announcement.tick();
        let entered = match self.eligible_level(score, &cfg.levels) {
            Some(id) if self.enter_level(id, cfg, scroll_speed) => Some(id),
            _ => None,
        };
        self.theme.step(cfg.messages.theme_transition_speed);
        entered
    }
}
