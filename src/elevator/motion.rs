use crate::shared::{Direction, MotionState};

/// A motion state change, `(from, to)`.
pub type MotionChange = (MotionState, MotionState);

/**
 * Car motion state machine.
 *
 * `Idle` is the initial state. A hop may only start from `Idle`. `Emergency` is reachable from
 * every state and is left only through `clear_emergency`.
 */
#[derive(Debug, Clone)]
pub struct Motion {
    state: MotionState,
}

impl Motion {
    pub fn new() -> Motion {
        Motion {
            state: MotionState::Idle,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Starts a hop. Returns `None` when the car is not idle or there is nowhere to go.
    pub fn depart(&mut self, direction: Direction) -> Option<MotionChange> {
        if !self.state.is_idle() {
            return None;
        }
        match direction {
            Direction::Up => self.set(MotionState::MovingUp),
            Direction::Down => self.set(MotionState::MovingDown),
            Direction::Idle => None,
        }
    }

    pub fn arrive(&mut self) -> Option<MotionChange> {
        match self.state {
            MotionState::MovingUp | MotionState::MovingDown => self.set(MotionState::Idle),
            _ => None,
        }
    }

    pub fn enter_emergency(&mut self) -> Option<MotionChange> {
        self.set(MotionState::Emergency)
    }

    pub fn clear_emergency(&mut self) -> Option<MotionChange> {
        match self.state {
            MotionState::Emergency => self.set(MotionState::Idle),
            _ => None,
        }
    }

    fn set(&mut self, target: MotionState) -> Option<MotionChange> {
        if self.state == target {
            return None;
        }
        let from = self.state;
        self.state = target;
        Some((from, target))
    }
}

impl Default for Motion {
    fn default() -> Self {
        Motion::new()
    }
}
