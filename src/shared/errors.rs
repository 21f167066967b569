// ---------------------------------------------------------------------------
// Error types returned synchronously to callers of the car API.
// Runtime advisories (door rejected, travel interrupted) are events instead.
// ---------------------------------------------------------------------------

use std::fmt;

use crate::shared::ElevatorCategory;

/// A request field could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Origin floor is not an integer.
    OriginFloor(String),
    /// Target floor is present but not an integer.
    TargetFloor(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OriginFloor(raw) => {
                write!(f, "Origin floor must be an integer, got {raw:?}")
            }
            ValidationError::TargetFloor(raw) => {
                write!(f, "Target floor must be an integer or absent, got {raw:?}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Admission refused. The car's state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequestError {
    FloorOutOfRange { floor: i32, min: i32, max: i32 },
    CategoryMismatch {
        request: ElevatorCategory,
        car: ElevatorCategory,
    },
    EmergencyActive,
    /// The car worker has stopped and can no longer take commands.
    CarUnavailable,
}

impl fmt::Display for InvalidRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidRequestError::FloorOutOfRange { floor, min, max } => {
                write!(f, "Floor {floor} is outside the served range {min}..={max}")
            }
            InvalidRequestError::CategoryMismatch { request, car } => {
                write!(f, "A {request} request cannot be served by a {car} car")
            }
            InvalidRequestError::EmergencyActive => {
                write!(f, "Car is in emergency mode and accepts no requests")
            }
            InvalidRequestError::CarUnavailable => write!(f, "Car worker is not running"),
        }
    }
}

impl std::error::Error for InvalidRequestError {}

/// Configuration could not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// Values parsed but are inconsistent with each other.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read configuration file: {e}"),
            ConfigError::Parse(e) => write!(f, "Failed to parse configuration file: {e}"),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}
