/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{ConfigError, ElevatorCategory};

/***************************************/
/*       Public data structures        */
/***************************************/
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    pub car: CarConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CarConfig {
    pub id: u32,
    #[serde(default)]
    pub category: ElevatorCategory,
    #[serde(default)]
    pub initial_floor: i32,
    pub min_floor: i32,
    pub max_floor: i32,
    /// Floor the car is homed to by the emergency drill.
    #[serde(default)]
    pub safe_floor: i32,
}

/// Durations in milliseconds.
#[derive(Deserialize, Clone, Debug)]
pub struct TimingConfig {
    pub hop_time: u64,
    pub door_dwell_time: u64,
}

impl Default for CarConfig {
    fn default() -> Self {
        CarConfig {
            id: 0,
            category: ElevatorCategory::Passenger,
            initial_floor: 0,
            min_floor: 0,
            max_floor: 9,
            safe_floor: 0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig {
            hop_time: 2500,
            door_dwell_time: 3000,
        }
    }
}

impl TimingConfig {
    pub fn hop(&self) -> Duration {
        Duration::from_millis(self.hop_time)
    }

    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.door_dwell_time)
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let car = &self.car;
        if car.min_floor > car.max_floor {
            return Err(ConfigError::Invalid(format!(
                "min_floor {} is above max_floor {}",
                car.min_floor, car.max_floor
            )));
        }
        for (name, floor) in [("initial_floor", car.initial_floor), ("safe_floor", car.safe_floor)] {
            if floor < car.min_floor || floor > car.max_floor {
                return Err(ConfigError::Invalid(format!(
                    "{name} {floor} is outside {}..={}",
                    car.min_floor, car.max_floor
                )));
            }
        }
        Ok(())
    }
}

/***************************************/
/*             Public API              */
/***************************************/
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str)
}

pub fn parse_config(config_str: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(config_str)?;
    config.validate()?;
    Ok(config)
}
