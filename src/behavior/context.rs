use glam::Vec2;

use crate::pet::direction::Direction;

/// What the pet is doing. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PetState {
    Idle,
    Walk,
    Dragging,
}

impl PetState {
    pub fn label(self) -> &'static str {
        match self {
            PetState::Idle => "Idle",
            PetState::Walk => "Walk",
            PetState::Dragging => "Dragging",
        }
    }
}

/// Mutable per-pet state. Only the state machine writes to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorContext {
    pub state: PetState,
    /// Current facing, and walk direction while walking.
    pub facing: Direction,
    /// Time left before the current Idle/Walk phase is re-evaluated.
    pub dwell_remaining_ms: f32,
    /// Sprite centre in viewport pixels.
    pub position: Vec2,
    /// Pointer minus centre, captured on pointer-down. Only set while dragging.
    pub drag_offset: Option<Vec2>,
}

impl BehaviorContext {
    pub fn new(position: Vec2, dwell_ms: f32) -> Self {
        Self {
            state: PetState::Idle,
            facing: Direction::South,
            dwell_remaining_ms: dwell_ms,
            position,
            drag_offset: None,
        }
    }
}
