use serde::{Deserialize, Serialize};

/// Input sampled once per tick.
///
/// Held controls report the key state for the whole frame; pressed
/// controls are edge-triggered and true only on the frame the key went down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub move_left: bool,
    pub move_right: bool,
    pub squat: bool,
    pub fire: bool,
    pub jump: bool,
    pub pause: bool,
    pub restart: bool,
    /// Open or close the cheat-code entry.
    pub cheat_toggle: bool,
    /// Text submitted from the cheat-code entry this frame.
    pub cheat_submit: Option<String>,
}

impl FrameInput {
    /// Horizontal intent: -1 (left), 0, +1 (right). Right wins when both are held.
    pub fn move_dir(&self) -> f32 {
        if self.move_right {
            1.0
        } else if self.move_left {
            -1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idle() {
        let input = FrameInput::default();
        assert_eq!(input.move_dir(), 0.0);
        assert!(!input.jump && !input.fire && !input.squat);
        assert!(input.cheat_submit.is_none());
    }

    #[test]
    fn right_overrides_left() {
        let input = FrameInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(input.move_dir(), 1.0);
    }
}
