pub mod controller;
pub mod door;
pub mod events;
pub mod fsm;
pub mod fsm_tests;
pub mod motion;
pub mod queue;
pub mod request;
pub mod timer;

pub use controller::CarController;
pub use door::{Door, DoorOutcome, DoorRejection};
pub use events::{CarEvent, EventKind, EventSink, EventValue, NullSink};
pub use fsm::{CarFSM, CarHandle, Command};
pub use motion::Motion;
pub use queue::DirectionQueue;
pub use request::Request;
pub use timer::{EmergencyLatch, Interrupted};
