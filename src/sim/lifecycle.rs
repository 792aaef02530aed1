//! Running / Paused / GameOver state machine

use serde::{Deserialize, Serialize};

/// Whether ticks are processed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Running,
    Paused,
    /// Terminal until a reset replaces the session
    GameOver,
}

impl Lifecycle {
    #[inline]
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    /// Running <-> Paused. Returns false (no change) at GameOver.
    pub fn toggle_pause(&mut self) -> bool {
        match *self {
            Lifecycle::Running => *self = Lifecycle::Paused,
            Lifecycle::Paused => *self = Lifecycle::Running,
            Lifecycle::GameOver => return false,
        }
        true
    }

    /// Running -> GameOver. Any other state is left alone.
    pub fn end(&mut self) -> bool {
        if *self == Lifecycle::Running {
            *self = Lifecycle::GameOver;
            true
        } else {
            false
        }
    }
}
