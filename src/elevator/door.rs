use crate::shared::{DoorState, MotionState};

/// Why a door command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorRejection {
    CarNotIdle(MotionState),
    Jammed,
}

/// Result of a door command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorOutcome {
    Changed { from: DoorState, to: DoorState },
    Unchanged,
    Rejected(DoorRejection),
}

/**
 * Door state machine.
 *
 * Open and close are only honoured while the car is idle. `Jammed` blocks both until
 * `clear_jam` is called; `force_close` is the emergency override and ignores every guard.
 */
#[derive(Debug, Clone)]
pub struct Door {
    state: DoorState,
}

impl Door {
    pub fn new() -> Door {
        Door {
            state: DoorState::Closed,
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn open(&mut self, motion: MotionState) -> DoorOutcome {
        self.command(DoorState::Open, motion)
    }

    pub fn close(&mut self, motion: MotionState) -> DoorOutcome {
        self.command(DoorState::Closed, motion)
    }

    /// Hardware fault. Reachable from any state.
    pub fn jam(&mut self) -> DoorOutcome {
        self.set(DoorState::Jammed)
    }

    /// External repair. Leaves the door closed.
    pub fn clear_jam(&mut self) -> DoorOutcome {
        match self.state {
            DoorState::Jammed => self.set(DoorState::Closed),
            _ => DoorOutcome::Unchanged,
        }
    }

    pub fn force_close(&mut self) -> DoorOutcome {
        self.set(DoorState::Closed)
    }

    fn command(&mut self, target: DoorState, motion: MotionState) -> DoorOutcome {
        if self.state == DoorState::Jammed {
            return DoorOutcome::Rejected(DoorRejection::Jammed);
        }
        if !motion.is_idle() {
            return DoorOutcome::Rejected(DoorRejection::CarNotIdle(motion));
        }
        self.set(target)
    }

    fn set(&mut self, target: DoorState) -> DoorOutcome {
        if self.state == target {
            return DoorOutcome::Unchanged;
        }
        let from = self.state;
        self.state = target;
        DoorOutcome::Changed { from, to: target }
    }
}

impl Default for Door {
    fn default() -> Self {
        Door::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_when_idle() {
        let mut door = Door::new();

        assert_eq!(
            door.open(MotionState::Idle),
            DoorOutcome::Changed { from: DoorState::Closed, to: DoorState::Open }
        );
        assert_eq!(door.open(MotionState::Idle), DoorOutcome::Unchanged);
        assert_eq!(
            door.close(MotionState::Idle),
            DoorOutcome::Changed { from: DoorState::Open, to: DoorState::Closed }
        );
        assert_eq!(door.close(MotionState::Idle), DoorOutcome::Unchanged);
    }

    #[test]
    fn test_rejected_while_not_idle() {
        // Purpose: Door commands never change the door while the car is not idle

        for motion in [MotionState::MovingUp, MotionState::MovingDown, MotionState::Emergency] {
            let mut door = Door::new();
            assert_eq!(
                door.open(motion),
                DoorOutcome::Rejected(DoorRejection::CarNotIdle(motion))
            );
            assert_eq!(door.state(), DoorState::Closed);
        }
    }

    #[test]
    fn test_jam_blocks_until_cleared() {
        let mut door = Door::new();
        door.open(MotionState::Idle);

        assert!(matches!(door.jam(), DoorOutcome::Changed { to: DoorState::Jammed, .. }));
        assert_eq!(door.close(MotionState::Idle), DoorOutcome::Rejected(DoorRejection::Jammed));
        assert_eq!(door.state(), DoorState::Jammed);

        assert_eq!(
            door.clear_jam(),
            DoorOutcome::Changed { from: DoorState::Jammed, to: DoorState::Closed }
        );
        assert_eq!(door.clear_jam(), DoorOutcome::Unchanged);
    }

    #[test]
    fn test_force_close_overrides_jam() {
        let mut door = Door::new();
        door.jam();
        door.force_close();
        assert_eq!(door.state(), DoorState::Closed);
    }
}
