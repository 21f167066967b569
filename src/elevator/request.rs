use serde::Serialize;
use std::time::SystemTime;

use crate::shared::{Direction, ElevatorCategory, RequestOrigin, ValidationError};

/**
 * A single trip for one car.
 *
 * Built once by the caller (button press, hall call or building system) and never mutated.
 * The direction is derived from the floors at construction time.
 *
 * # Fields
 * - `origin`:          What produced the request.
 * - `origin_floor`:    Floor the request was made from.
 * - `target_floor`:    Destination floor. `None` for a pure hall call that has no destination yet.
 * - `direction`:       Up, Down, or Idle when the floors are equal or the target is absent.
 * - `category`:        Kind of car the request is meant for.
 * - `created_at`:      Wall-clock time the request was built.
 */
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Request {
    origin: RequestOrigin,
    origin_floor: i32,
    target_floor: Option<i32>,
    direction: Direction,
    category: ElevatorCategory,
    created_at: SystemTime,
}

impl Request {
    pub fn new(origin: RequestOrigin, origin_floor: i32, target_floor: Option<i32>) -> Request {
        let direction = match target_floor {
            Some(target) => Direction::between(origin_floor, target),
            None => Direction::Idle,
        };

        Request {
            origin,
            origin_floor,
            target_floor,
            direction,
            category: ElevatorCategory::Passenger,
            created_at: SystemTime::now(),
        }
    }

    /// Builds a request from untyped floor values, e.g. command line arguments.
    pub fn parse(
        origin: RequestOrigin,
        origin_floor: &str,
        target_floor: Option<&str>,
    ) -> Result<Request, ValidationError> {
        let origin_floor = origin_floor
            .trim()
            .parse::<i32>()
            .map_err(|_| ValidationError::OriginFloor(origin_floor.to_string()))?;

        let target_floor = match target_floor {
            Some(raw) => Some(
                raw.trim()
                    .parse::<i32>()
                    .map_err(|_| ValidationError::TargetFloor(raw.to_string()))?,
            ),
            None => None,
        };

        Ok(Request::new(origin, origin_floor, target_floor))
    }

    pub fn with_category(mut self, category: ElevatorCategory) -> Request {
        self.category = category;
        self
    }

    pub fn origin(&self) -> RequestOrigin {
        self.origin
    }

    pub fn origin_floor(&self) -> i32 {
        self.origin_floor
    }

    pub fn target_floor(&self) -> Option<i32> {
        self.target_floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn category(&self) -> ElevatorCategory {
        self.category
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn is_call(&self) -> bool {
        self.target_floor.is_none()
    }

    /// Floor the car must reach to satisfy this request. A pure call is satisfied at its origin.
    pub fn destination(&self) -> i32 {
        self.target_floor.unwrap_or(self.origin_floor)
    }

    /// Companion request that brings the car to the caller before the trip itself.
    pub(crate) fn pickup(&self) -> Request {
        Request::new(self.origin, self.origin_floor, Some(self.origin_floor))
            .with_category(self.category)
    }

    /// Companion request that stops the car at the drop-off floor.
    pub(crate) fn drop_off(&self) -> Request {
        let floor = self.destination();
        Request::new(self.origin, floor, Some(floor)).with_category(self.category)
    }
}
