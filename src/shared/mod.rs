pub mod errors;
pub mod macros;
pub mod structs;

pub use errors::ConfigError;
pub use errors::InvalidRequestError;
pub use errors::ValidationError;
pub use structs::CarStatus;
pub use structs::Direction;
pub use structs::DoorState;
pub use structs::ElevatorCategory;
pub use structs::MotionState;
pub use structs::RequestOrigin;
