//! Level-triggered input polling
//!
//! The simulation asks "is this action held right now?" once per tick. How
//! actions map to keys, pads or touch is the platform layer's business.

/// Player actions the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
    Pause,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::MoveUp,
        Action::MoveDown,
        Action::Fire,
        Action::Pause,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Fire => "fire",
            Action::Pause => "pause",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Action::ALL.into_iter().find(|a| a.as_str() == s)
    }
}

/// Source of action state, polled once per tick
pub trait InputSource {
    fn is_action_active(&self, action: Action) -> bool;
}

/// Snapshot of held actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionState {
    held: u8,
}

impl ActionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for scripted input
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    pub fn set(&mut self, action: Action, active: bool) {
        if active {
            self.held |= action.bit();
        } else {
            self.held &= !action.bit();
        }
    }
}

impl InputSource for ActionState {
    fn is_action_active(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }
}
