use crossbeam_channel as cbc;
use serde::Serialize;
use std::time::SystemTime;

use super::request::Request;
use crate::shared::{Direction, DoorState, MotionState};

/// What changed. For `RequestAdmitted` the old value carries the queue direction.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    MotionChanged,
    DoorChanged,
    FloorChanged,
    RequestAdmitted,
    RequestServiced,
    RequestSkipped,
    DoorRejected,
    TravelInterrupted,
    DwellInterrupted,
    QueuesCleared,
    EmergencyEntered,
    EmergencyCleared,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum EventValue {
    Floor(i32),
    Motion(MotionState),
    Door(DoorState),
    Direction(Direction),
    Request(Request),
    Dropped(usize),
}

/// One observable change of a car.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarEvent {
    pub car_id: u32,
    pub kind: EventKind,
    pub old_value: Option<EventValue>,
    pub new_value: Option<EventValue>,
    pub timestamp: SystemTime,
}

impl CarEvent {
    pub fn new(
        car_id: u32,
        kind: EventKind,
        old_value: Option<EventValue>,
        new_value: Option<EventValue>,
    ) -> CarEvent {
        CarEvent {
            car_id,
            kind,
            old_value,
            new_value,
            timestamp: SystemTime::now(),
        }
    }
}

/// Receives every event a car emits. Implementations must not block for long.
pub trait EventSink: Send {
    fn emit(&self, event: CarEvent);
}

impl EventSink for cbc::Sender<CarEvent> {
    fn emit(&self, event: CarEvent) {
        // A dropped receiver only means nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Discards events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: CarEvent) {}
}
