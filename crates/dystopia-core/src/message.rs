use serde::{Deserialize, Serialize};

use crate::timer::TickTimer;

/// Ticks over which a message fades out before it disappears.
pub const DEFAULT_FADE_TICKS: u32 = 30;

/// A frame-counted on-screen message (taunt, announcement, power-up label).
///
/// The renderer reads [`text`](Self::text) and [`alpha`](Self::alpha); the
/// simulation only starts and ticks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedMessage {
    text: String,
    timer: TickTimer,
    fade_ticks: u32,
}

impl TimedMessage {
    pub fn new() -> Self {
        Self::with_fade(DEFAULT_FADE_TICKS)
    }

    pub fn with_fade(fade_ticks: u32) -> Self {
        Self {
            text: String::new(),
            timer: TickTimer::idle(),
            fade_ticks,
        }
    }

    /// Replace the current text and restart the display window.
    pub fn show(&mut self, text: impl Into<String>, ticks: u32) {
        self.text = text.into();
        self.timer.start(ticks);
    }

    pub fn tick(&mut self) {
        self.timer.tick();
    }

    pub fn is_visible(&self) -> bool {
        self.timer.is_active()
    }

    /// Visible text, or `None` once the window has run out.
    pub fn text(&self) -> Option<&str> {
        self.is_visible().then_some(self.text.as_str())
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.timer.remaining()
    }

    /// Opacity in `[0, 1]`: fully opaque until the last `fade_ticks` frames.
    pub fn alpha(&self) -> f32 {
        let remaining = self.timer.remaining();
        if remaining == 0 {
            0.0
        } else if self.fade_ticks == 0 || remaining >= self.fade_ticks {
            1.0
        } else {
            remaining as f32 / self.fade_ticks as f32
        }
    }
}

impl Default for TimedMessage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_hides_after_window() {
        let mut m = TimedMessage::new();
        assert!(m.text().is_none());
        m.show("Super Speed!", 2);
        assert_eq!(m.text(), Some("Super Speed!"));
        m.tick();
        m.tick();
        assert!(m.text().is_none());
        assert_eq!(m.alpha(), 0.0);
    }

    #[test]
    fn alpha_fades_in_final_ticks() {
        let mut m = TimedMessage::new();
        m.show("taunt", 60);
        assert_eq!(m.alpha(), 1.0);
        for _ in 0..45 {
            m.tick();
        }
        assert!((m.alpha() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn show_replaces_text_and_restarts() {
        let mut m = TimedMessage::new();
        m.show("first", 5);
        m.tick();
        m.show("second", 5);
        assert_eq!(m.text(), Some("second"));
        assert_eq!(m.remaining_ticks(), 5);
    }
}
