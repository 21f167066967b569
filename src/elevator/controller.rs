use std::time::Duration;

use super::door::{Door, DoorOutcome};
use super::events::{CarEvent, EventKind, EventSink, EventValue, NullSink};
use super::motion::{Motion, MotionChange};
use super::queue::DirectionQueue;
use super::request::Request;
use super::timer::EmergencyLatch;
use crate::config::{CarConfig, Config, TimingConfig};
use crate::shared::{
    CarStatus, Direction, DoorState, ElevatorCategory, InvalidRequestError, MotionState,
    RequestOrigin,
};

/**
 * Owns one car: its floor, motion and door state machines, and its two direction queues.
 *
 * All methods take `&mut self`; the controller is meant to be driven by exactly one owner
 * (see `CarFSM`). The only state shared with other threads is the emergency latch, which
 * the hop and dwell waits watch so an emergency cuts them short.
 *
 * Every change is reported to the event sink. The controller itself never logs.
 *
 * # Fields
 * - `id`:                  Car identifier, copied into every event.
 * - `category`:            Kind of requests this car accepts.
 * - `current_floor`:       Floor of the last completed hop.
 * - `min_floor`/`max_floor`: Served floor range.
 * - `safe_floor`:          Floor the emergency drill homes the car to.
 * - `hop_time`:            Fixed travel time of one hop, independent of distance.
 * - `dwell_time`:          How long the door stays open at a stop.
 * - `emergency`:           Latched emergency signal.
 */
pub struct CarController {
    id: u32,
    category: ElevatorCategory,
    current_floor: i32,
    min_floor: i32,
    max_floor: i32,
    safe_floor: i32,
    hop_time: Duration,
    dwell_time: Duration,
    motion: Motion,
    door: Door,
    emergency: EmergencyLatch,
    up_queue: DirectionQueue,
    down_queue: DirectionQueue,
    sink: Box<dyn EventSink>,
}

impl CarController {
    pub fn new(config: &Config, sink: Box<dyn EventSink>) -> CarController {
        CarController {
            id: config.car.id,
            category: config.car.category,
            current_floor: config.car.initial_floor,
            min_floor: config.car.min_floor,
            max_floor: config.car.max_floor,
            safe_floor: config.car.safe_floor,
            hop_time: config.timing.hop(),
            dwell_time: config.timing.dwell(),
            motion: Motion::new(),
            door: Door::new(),
            emergency: EmergencyLatch::new(),
            up_queue: DirectionQueue::new(),
            down_queue: DirectionQueue::new(),
            sink,
        }
    }

    /// Passenger car serving every floor, with default timing and no event listener.
    pub fn new_car(id: u32, initial_floor: i32) -> CarController {
        let config = Config {
            car: CarConfig {
                id,
                initial_floor,
                min_floor: i32::MIN,
                max_floor: i32::MAX,
                ..CarConfig::default()
            },
            timing: TimingConfig::default(),
        };
        CarController::new(&config, Box::new(NullSink))
    }

    /***************************************/
    /*              Accessors              */
    /***************************************/
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn category(&self) -> ElevatorCategory {
        self.category
    }

    pub fn current_floor(&self) -> i32 {
        self.current_floor
    }

    pub fn motion(&self) -> MotionState {
        self.motion.state()
    }

    pub fn door(&self) -> DoorState {
        self.door.state()
    }

    pub fn is_emergency_active(&self) -> bool {
        self.emergency.is_raised()
    }

    pub fn pending_up(&self) -> usize {
        self.up_queue.len()
    }

    pub fn pending_down(&self) -> usize {
        self.down_queue.len()
    }

    /// A handle other threads can use to raise or lower the emergency signal.
    pub fn emergency_latch(&self) -> EmergencyLatch {
        self.emergency.clone()
    }

    pub fn status(&self) -> CarStatus {
        CarStatus {
            id: self.id,
            category: self.category,
            floor: self.current_floor,
            motion: self.motion.state(),
            door: self.door.state(),
            emergency_active: self.emergency.is_raised(),
            pending_up: self.up_queue.len(),
            pending_down: self.down_queue.len(),
        }
    }

    /***************************************/
    /*              Admission              */
    /***************************************/
    pub fn add_up_request(&mut self, request: Request) -> Result<(), InvalidRequestError> {
        self.validate(&request)?;
        if request.origin() == RequestOrigin::Call {
            self.enqueue(Direction::Up, request.pickup());
        }
        self.enqueue(Direction::Up, request);
        Ok(())
    }

    pub fn add_down_request(&mut self, request: Request) -> Result<(), InvalidRequestError> {
        self.validate(&request)?;
        if request.origin() == RequestOrigin::Call {
            self.enqueue(Direction::Down, request.drop_off());
        }
        self.enqueue(Direction::Down, request);
        Ok(())
    }

    fn validate(&self, request: &Request) -> Result<(), InvalidRequestError> {
        if self.emergency.is_raised() || self.motion.state() == MotionState::Emergency {
            return Err(InvalidRequestError::EmergencyActive);
        }
        if request.category() != self.category {
            return Err(InvalidRequestError::CategoryMismatch {
                request: request.category(),
                car: self.category,
            });
        }
        let floors = [Some(request.origin_floor()), request.target_floor()];
        for floor in floors.into_iter().flatten() {
            if floor < self.min_floor || floor > self.max_floor {
                return Err(InvalidRequestError::FloorOutOfRange {
                    floor,
                    min: self.min_floor,
                    max: self.max_floor,
                });
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, direction: Direction, request: Request) {
        self.emit(
            EventKind::RequestAdmitted,
            Some(EventValue::Direction(direction)),
            Some(EventValue::Request(request.clone())),
        );
        match direction {
            Direction::Down => self.down_queue.push(request),
            _ => self.up_queue.push(request),
        }
    }

    /***************************************/
    /*            Service loop             */
    /***************************************/

    /// Serves both queues until they are empty, or until an emergency halts the car.
    pub fn operate(&mut self) {
        while !self.up_queue.is_empty() || !self.down_queue.is_empty() {
            if self.motion.state() == MotionState::Emergency {
                return;
            }
            if self.emergency.is_raised() {
                self.halt();
                return;
            }
            self.process_up_requests();
            self.process_down_requests();
        }
        let change = self.motion.arrive();
        self.change_motion(change);
    }

    pub fn process_up_requests(&mut self) {
        self.process_queue(Direction::Up);
    }

    pub fn process_down_requests(&mut self) {
        self.process_queue(Direction::Down);
    }

    fn process_queue(&mut self, direction: Direction) {
        if self.motion.state() == MotionState::Emergency {
            return;
        }
        loop {
            if self.emergency.is_raised() {
                self.halt();
                return;
            }

            let next = match direction {
                Direction::Down => self.down_queue.pop(),
                _ => self.up_queue.pop(),
            };
            let Some(request) = next else {
                return;
            };

            if !self.service(request) {
                return;
            }
        }
    }

    /// Moves to the request's destination and cycles the door. Returns false if an emergency
    /// cut the stop short.
    fn service(&mut self, request: Request) -> bool {
        let target = request.destination();
        if target == self.current_floor {
            self.emit(
                EventKind::RequestSkipped,
                Some(EventValue::Floor(self.current_floor)),
                Some(EventValue::Request(request)),
            );
            return true;
        }

        // Travel direction follows the floors, not the queue the request came from.
        let heading = Direction::between(self.current_floor, target);
        let change = self.motion.depart(heading);
        self.change_motion(change);

        if self.emergency.wait(self.hop_time).is_err() {
            // Position is only known at completed hops.
            self.emit(
                EventKind::TravelInterrupted,
                Some(EventValue::Floor(self.current_floor)),
                Some(EventValue::Floor(target)),
            );
            self.halt();
            return false;
        }

        self.set_floor(target);
        let change = self.motion.arrive();
        self.change_motion(change);

        self.open_door();
        if self.emergency.wait(self.dwell_time).is_err() {
            self.emit(
                EventKind::DwellInterrupted,
                Some(EventValue::Door(self.door.state())),
                Some(EventValue::Request(request)),
            );
            self.halt();
            return false;
        }
        self.close_door();

        self.emit(
            EventKind::RequestServiced,
            Some(EventValue::Floor(self.current_floor)),
            Some(EventValue::Request(request)),
        );
        true
    }

    /***************************************/
    /*               Doors                 */
    /***************************************/
    pub fn open_door(&mut self) {
        let outcome = self.door.open(self.motion.state());
        self.report_door(outcome);
    }

    pub fn close_door(&mut self) {
        let outcome = self.door.close(self.motion.state());
        self.report_door(outcome);
    }

    /// Hardware fault signal.
    pub fn jam_door(&mut self) {
        let outcome = self.door.jam();
        self.report_door(outcome);
    }

    pub fn clear_door_jam(&mut self) {
        let outcome = self.door.clear_jam();
        self.report_door(outcome);
    }

    fn report_door(&mut self, outcome: DoorOutcome) {
        match outcome {
            DoorOutcome::Changed { from, to } => self.emit(
                EventKind::DoorChanged,
                Some(EventValue::Door(from)),
                Some(EventValue::Door(to)),
            ),
            DoorOutcome::Rejected(_) => self.emit(
                EventKind::DoorRejected,
                Some(EventValue::Door(self.door.state())),
                Some(EventValue::Motion(self.motion.state())),
            ),
            DoorOutcome::Unchanged => {}
        }
    }

    /***************************************/
    /*             Emergency               */
    /***************************************/

    /// Raises or lowers the latched emergency signal. Takes effect at the next check.
    pub fn set_emergency(&mut self, active: bool) {
        self.emergency.set(active);
    }

    /// Sets the latch to `active` and runs the drill for that level in one step, so a raise
    /// that is lowered again right after is still handled.
    pub fn apply_emergency(&mut self, active: bool) {
        self.set_emergency(active);
        self.process_emergency();
    }

    /// Runs the emergency drill for the current latch level.
    ///
    /// Raised: enter `Emergency`, drop every queued request, home to the safe floor with the
    /// doors closed. Lowered: leave `Emergency` for `Idle`, again homed with the doors closed.
    pub fn process_emergency(&mut self) {
        if self.emergency.is_raised() {
            let change = self.motion.enter_emergency();
            self.change_motion(change);
            self.drop_queues();
            self.set_floor(self.safe_floor);
            self.force_close_door();
            self.emit(
                EventKind::EmergencyEntered,
                None,
                Some(EventValue::Floor(self.current_floor)),
            );
        } else {
            if self.motion.state() == MotionState::Emergency {
                self.set_floor(self.safe_floor);
                self.force_close_door();
                let change = self.motion.clear_emergency();
                self.change_motion(change);
            }
            self.emit(
                EventKind::EmergencyCleared,
                None,
                Some(EventValue::Floor(self.current_floor)),
            );
        }
    }

    /// Emergency stop from inside the service loop. The car stays where its last
    /// completed hop left it.
    fn halt(&mut self) {
        let change = self.motion.enter_emergency();
        self.change_motion(change);
        self.drop_queues();
        self.force_close_door();
        self.emit(
            EventKind::EmergencyEntered,
            None,
            Some(EventValue::Floor(self.current_floor)),
        );
    }

    fn drop_queues(&mut self) {
        let dropped = self.up_queue.clear() + self.down_queue.clear();
        self.emit(EventKind::QueuesCleared, None, Some(EventValue::Dropped(dropped)));
    }

    fn force_close_door(&mut self) {
        let outcome = self.door.force_close();
        self.report_door(outcome);
    }

    /***************************************/
    /*              Helpers                */
    /***************************************/
    fn set_floor(&mut self, floor: i32) {
        if floor == self.current_floor {
            return;
        }
        let old = self.current_floor;
        self.current_floor = floor;
        self.emit(
            EventKind::FloorChanged,
            Some(EventValue::Floor(old)),
            Some(EventValue::Floor(floor)),
        );
    }

    fn change_motion(&mut self, change: Option<MotionChange>) {
        if let Some((from, to)) = change {
            self.emit(
                EventKind::MotionChanged,
                Some(EventValue::Motion(from)),
                Some(EventValue::Motion(to)),
            );
        }
    }

    fn emit(&self, kind: EventKind, old_value: Option<EventValue>, new_value: Option<EventValue>) {
        self.sink
            .emit(CarEvent::new(self.id, kind, old_value, new_value));
    }
}
