//! Input resolution
//!
//! Raw keyboard and touch events are folded into one current intent
//! (direction + fire). The first touch press locks movement to touch for the
//! rest of the session. Pause/reset keys keep working under the lock unless
//! the game opts out.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Direction;

/// Logical keyboard keys the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Pause,
    Reset,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" | "Spacebar" => Some(Key::Fire),
            "p" | "P" | "Escape" => Some(Key::Pause),
            "r" | "R" => Some(Key::Reset),
            _ => None,
        }
    }

    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }

    /// Game-control keys (as opposed to movement/action keys)
    pub fn is_control(self) -> bool {
        matches!(self, Key::Pause | Key::Reset)
    }
}

/// On-screen touch buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchButton {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl TouchButton {
    pub fn direction(self) -> Option<Direction> {
        match self {
            TouchButton::Up => Some(Direction::Up),
            TouchButton::Down => Some(Direction::Down),
            TouchButton::Left => Some(Direction::Left),
            TouchButton::Right => Some(Direction::Right),
            TouchButton::Fire => None,
        }
    }
}

/// A raw event delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    Touch(TouchButton),
}

impl InputEvent {
    pub fn is_control(&self) -> bool {
        matches!(self, InputEvent::KeyDown(k) if k.is_control())
    }
}

/// Which modality has driven movement so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    Unset,
    Keyboard,
    /// Locks out keyboard movement for the rest of the session
    Touch,
}

/// How the player entity is steered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovementModel {
    /// One current direction, kept until changed (snake style)
    DiscreteDirection { allow_reversal: bool },
    /// Every held direction contributes a unit step each tick
    HeldKeySet,
}

/// Game-control commands the resolver hands back to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    TogglePause,
    Reset,
}

/// Set of currently held direction keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeldKeys(u8);

impl HeldKeys {
    fn bit(dir: Direction) -> u8 {
        match dir {
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 4,
            Direction::Right => 8,
            Direction::None => 0,
        }
    }

    pub fn press(&mut self, dir: Direction) {
        self.0 |= Self::bit(dir);
    }

    pub fn release(&mut self, dir: Direction) {
        self.0 &= !Self::bit(dir);
    }

    pub fn contains(&self, dir: Direction) -> bool {
        let bit = Self::bit(dir);
        bit != 0 && self.0 & bit != 0
    }

    /// Sum of the unit steps of every held direction
    pub fn vector(&self) -> IVec2 {
        Direction::ALL
            .iter()
            .filter(|d| self.contains(**d))
            .fold(IVec2::ZERO, |acc, d| acc + d.delta())
    }
}

/// Merges keyboard and touch into a single intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputResolver {
    model: MovementModel,
    controls_bypass_lock: bool,
    mode: InputMode,
    /// Requested direction (discrete model) or last pressed one (held model)
    direction: Direction,
    /// Direction the last movement tick actually used
    last_applied: Direction,
    held: HeldKeys,
    /// One-shot touch step for the held-key model
    impulse: Option<Direction>,
    fire: bool,
}

impl InputResolver {
    pub fn new(model: MovementModel, initial: Direction, controls_bypass_lock: bool) -> Self {
        Self {
            model,
            controls_bypass_lock,
            mode: InputMode::Unset,
            direction: initial,
            last_applied: initial,
            held: HeldKeys::default(),
            impulse: None,
            fire: false,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// Keyboard movement is ignored once locked
    pub fn is_locked(&self) -> bool {
        self.mode == InputMode::Touch
    }

    /// Feed one raw event. Returns a control command for pause/reset keys.
    pub fn handle(&mut self, event: InputEvent) -> Option<ControlCommand> {
        match event {
            InputEvent::Touch(button) => {
                if self.mode != InputMode::Touch {
                    log::info!("Touch input detected, keyboard movement disabled");
                    // Keys still held down would otherwise keep steering
                    self.held = HeldKeys::default();
                }
                self.mode = InputMode::Touch;
                match button.direction() {
                    Some(dir) => self.touch_direction(dir),
                    None => self.fire = true,
                }
                None
            }
            InputEvent::KeyDown(key) if key.is_control() => {
                if self.is_locked() && !self.controls_bypass_lock {
                    return None;
                }
                Some(match key {
                    Key::Pause => ControlCommand::TogglePause,
                    _ => ControlCommand::Reset,
                })
            }
            InputEvent::KeyDown(key) => {
                if self.is_locked() {
                    return None;
                }
                self.mode = InputMode::Keyboard;
                match key.direction() {
                    Some(dir) => match self.model {
                        MovementModel::DiscreteDirection { .. } => self.request_direction(dir),
                        MovementModel::HeldKeySet => {
                            self.held.press(dir);
                            self.direction = dir;
                        }
                    },
                    None => self.fire = true,
                }
                None
            }
            InputEvent::KeyUp(key) => {
                if let (false, Some(dir), MovementModel::HeldKeySet) =
                    (self.is_locked(), key.direction(), self.model)
                {
                    self.held.release(dir);
                }
                None
            }
        }
    }

    fn touch_direction(&mut self, dir: Direction) {
        match self.model {
            MovementModel::DiscreteDirection { .. } => self.request_direction(dir),
            MovementModel::HeldKeySet => {
                self.impulse = Some(dir);
                self.direction = dir;
            }
        }
    }

    /// Accept a new direction unless it reverses the last applied one
    fn request_direction(&mut self, dir: Direction) {
        let no_reversal = matches!(
            self.model,
            MovementModel::DiscreteDirection {
                allow_reversal: false
            }
        );
        if no_reversal && dir.is_opposite(self.last_applied) {
            log::debug!("Ignoring reversal {:?} -> {:?}", self.last_applied, dir);
            return;
        }
        self.direction = dir;
    }

    /// Direction the player is currently steering (or facing)
    pub fn current_direction(&self) -> Direction {
        self.direction
    }

    /// Consume the direction for one movement tick (discrete model)
    pub fn commit_direction(&mut self) -> Direction {
        self.last_applied = self.direction;
        self.direction
    }

    /// Consume the summed step for one movement tick (held-key model)
    pub fn movement_vector(&mut self) -> IVec2 {
        let mut v = self.held.vector();
        if let Some(dir) = self.impulse.take() {
            v += dir.delta();
        }
        let v = v.clamp(IVec2::splat(-1), IVec2::splat(1));
        if v != IVec2::ZERO {
            self.last_applied = Direction::from_delta(v);
        }
        v
    }

    /// Take the latched fire request
    pub fn trigger_action(&mut self) -> bool {
        std::mem::take(&mut self.fire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_input() -> InputResolver {
        InputResolver::new(
            MovementModel::DiscreteDirection {
                allow_reversal: false,
            },
            Direction::Up,
            true,
        )
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code(" "), Some(Key::Fire));
        assert_eq!(Key::from_code("r"), Some(Key::Reset));
        assert_eq!(Key::from_code("F5"), None);
    }

    #[test]
    fn test_only_control_presses_are_control_events() {
        assert!(InputEvent::KeyDown(Key::Pause).is_control());
        assert!(InputEvent::KeyDown(Key::Reset).is_control());
        assert!(!InputEvent::KeyUp(Key::Pause).is_control());
        assert!(!InputEvent::KeyDown(Key::Fire).is_control());
        assert!(!InputEvent::Touch(TouchButton::Fire).is_control());
    }

    #[test]
    fn test_reversal_rejected() {
        let mut input = snake_input();
        input.handle(InputEvent::KeyDown(Key::Down));
        assert_eq!(input.current_direction(), Direction::Up);
        input.handle(InputEvent::KeyDown(Key::Left));
        assert_eq!(input.current_direction(), Direction::Left);
    }

    #[test]
    fn test_reversal_checked_against_applied_direction() {
        let mut input = snake_input();
        // Left then Down within one tick would fold the snake onto itself
        input.handle(InputEvent::KeyDown(Key::Left));
        input.handle(InputEvent::KeyDown(Key::Down));
        assert_eq!(input.current_direction(), Direction::Left);
        assert_eq!(input.commit_direction(), Direction::Left);
        input.handle(InputEvent::KeyDown(Key::Down));
        assert_eq!(input.current_direction(), Direction::Down);
    }

    #[test]
    fn test_touch_locks_keyboard_movement() {
        let mut input = snake_input();
        input.handle(InputEvent::Touch(TouchButton::Left));
        assert_eq!(input.mode(), InputMode::Touch);
        input.handle(InputEvent::KeyDown(Key::Up));
        assert_eq!(input.current_direction(), Direction::Left);
        // Control keys stay live
        assert_eq!(
            input.handle(InputEvent::KeyDown(Key::Pause)),
            Some(ControlCommand::TogglePause)
        );
    }

    #[test]
    fn test_lock_can_cover_control_keys() {
        let mut input = InputResolver::new(MovementModel::HeldKeySet, Direction::Up, false);
        input.handle(InputEvent::Touch(TouchButton::Fire));
        assert_eq!(input.handle(InputEvent::KeyDown(Key::Reset)), None);
        assert!(input.trigger_action());
        assert!(!input.trigger_action());
    }

    #[test]
    fn test_held_keys_sum() {
        let mut input = InputResolver::new(MovementModel::HeldKeySet, Direction::Up, true);
        input.handle(InputEvent::KeyDown(Key::Up));
        input.handle(InputEvent::KeyDown(Key::Right));
        assert_eq!(input.movement_vector(), IVec2::new(1, -1));
        input.handle(InputEvent::KeyDown(Key::Down));
        assert_eq!(input.movement_vector(), IVec2::new(1, 0));
        input.handle(InputEvent::KeyUp(Key::Right));
        input.handle(InputEvent::KeyUp(Key::Up));
        assert_eq!(input.movement_vector(), IVec2::new(0, 1));
    }

    #[test]
    fn test_touch_impulse_is_one_shot() {
        let mut input = InputResolver::new(MovementModel::HeldKeySet, Direction::Up, true);
        input.handle(InputEvent::Touch(TouchButton::Left));
        assert_eq!(input.movement_vector(), IVec2::new(-1, 0));
        assert_eq!(input.movement_vector(), IVec2::ZERO);
        assert_eq!(input.current_direction(), Direction::Left);
    }
}
