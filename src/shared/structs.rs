/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Idle,
}

impl Direction {
    /// Direction of travel from `from` to `to`. Equal floors are `Idle`.
    pub fn between(from: i32, to: i32) -> Direction {
        if to > from {
            Direction::Up
        } else if to < from {
            Direction::Down
        } else {
            Direction::Idle
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "movingUp")]
    MovingUp,
    #[serde(rename = "movingDown")]
    MovingDown,
    #[serde(rename = "emergency")]
    Emergency,
}

impl MotionState {
    pub fn is_idle(&self) -> bool {
        *self == MotionState::Idle
    }
}

impl fmt::Display for MotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionState::Idle => write!(f, "idle"),
            MotionState::MovingUp => write!(f, "moving up"),
            MotionState::MovingDown => write!(f, "moving down"),
            MotionState::Emergency => write!(f, "emergency"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DoorState {
    Open,
    Closed,
    Jammed,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestOrigin {
    /// Button pressed inside the car.
    Button,
    /// Hall call button.
    Call,
    /// Building management system.
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElevatorCategory {
    #[default]
    Passenger,
    Freight,
    Service,
}

impl fmt::Display for ElevatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElevatorCategory::Passenger => write!(f, "passenger"),
            ElevatorCategory::Freight => write!(f, "freight"),
            ElevatorCategory::Service => write!(f, "service"),
        }
    }
}

/// Snapshot of a car, broadcast on request by the car worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CarStatus {
    pub id: u32,
    pub category: ElevatorCategory,
    pub floor: i32,
    pub motion: MotionState,
    pub door: DoorState,
    #[serde(rename = "emergencyActive")]
    pub emergency_active: bool,
    #[serde(rename = "pendingUp")]
    pub pending_up: usize,
    #[serde(rename = "pendingDown")]
    pub pending_down: usize,
}
