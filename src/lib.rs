//! Dispatch core for a single elevator car: request admission into per-direction queues,
//! the service loop with its door and motion state machines, and latched emergency handling.

pub mod config;
pub mod elevator;
pub mod shared;

pub use config::Config;
pub use elevator::{CarController, CarEvent, CarFSM, CarHandle, EventKind, EventSink, Request};
pub use shared::{
    CarStatus, Direction, DoorState, ElevatorCategory, InvalidRequestError, MotionState,
    RequestOrigin, ValidationError,
};
