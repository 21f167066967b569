/* 3rd party libraries */
use clap::{Arg, Command};
use crossbeam_channel as cbc;
use log::{info, warn};
use std::thread::{sleep, Builder};
use std::time::Duration;

/* Custom libraries */
use elevator_dispatch::config;
use elevator_dispatch::elevator::{CarEvent, CarFSM, CarHandle};
use elevator_dispatch::unwrap_or_exit;
use elevator_dispatch::{ElevatorCategory, Request, RequestOrigin, ValidationError};

fn cli() -> Command<'static> {
    Command::new("elevator_dispatch")
        .about("Runs one elevator car and serves the requests given on the command line")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .takes_value(true)
                .default_value("config.toml")
                .help("Path to the configuration file"),
        )
        .arg(
            Arg::new("up")
                .long("up")
                .takes_value(true)
                .multiple_occurrences(true)
                .value_name("FROM:TO")
                .help("Button request served by the up queue"),
        )
        .arg(
            Arg::new("down")
                .long("down")
                .takes_value(true)
                .multiple_occurrences(true)
                .value_name("FROM:TO")
                .help("Button request served by the down queue"),
        )
        .arg(
            Arg::new("call")
                .long("call")
                .takes_value(true)
                .multiple_occurrences(true)
                .value_name("FLOOR[:TO]")
                .help("Hall call; the car is summoned to FLOOR first"),
        )
        .arg(
            Arg::new("emergency-after")
                .long("emergency-after")
                .takes_value(true)
                .value_name("MS")
                .help("Raise the emergency signal this many milliseconds after start"),
        )
}

/// Parses `FROM[:TO]` into a request for a car of the given category.
fn parse_trip(
    origin: RequestOrigin,
    category: ElevatorCategory,
    trip: &str,
) -> Result<Request, ValidationError> {
    let request = match trip.split_once(':') {
        Some((from, to)) => Request::parse(origin, from, Some(to)),
        None => Request::parse(origin, trip, None),
    }?;
    Ok(request.with_category(category))
}

fn admit(
    handle: &CarHandle,
    category: ElevatorCategory,
    origin: RequestOrigin,
    trips: Option<clap::Values<'_>>,
    up: bool,
) {
    for trip in trips.into_iter().flatten() {
        let request = unwrap_or_exit!(parse_trip(origin, category, trip));
        let result = if up {
            handle.add_up_request(request)
        } else {
            handle.add_down_request(request)
        };
        if let Err(e) = result {
            warn!("Request {} refused: {}", trip, e);
        }
    }
}

fn log_events(event_rx: cbc::Receiver<CarEvent>) {
    for event in event_rx.iter() {
        match serde_json::to_string(&event) {
            Ok(line) => info!(target: "car_events", "{}", line),
            Err(e) => warn!("Failed to serialize event: {}", e),
        }
    }
}

/* Main */
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = cli().get_matches();

    // Load the configuration
    let config_path = matches.value_of("config").unwrap_or("config.toml");
    let config = unwrap_or_exit!(config::load_config(config_path));

    // Start the event logger and the car
    let (event_tx, event_rx) = cbc::unbounded::<CarEvent>();
    let logger_thread = unwrap_or_exit!(Builder::new()
        .name("event_logger".into())
        .spawn(move || log_events(event_rx)));
    let (handle, car_thread) = unwrap_or_exit!(CarFSM::spawn(&config, Box::new(event_tx)));

    // Admit requests
    let category = config.car.category;
    admit(&handle, category, RequestOrigin::Button, matches.values_of("up"), true);
    admit(&handle, category, RequestOrigin::Button, matches.values_of("down"), false);
    admit(&handle, category, RequestOrigin::Call, matches.values_of("call"), true);

    let emergency_thread = match matches.value_of("emergency-after") {
        Some(ms) => {
            let delay = Duration::from_millis(unwrap_or_exit!(ms.parse::<u64>()));
            let emergency_handle = handle.clone();
            Some(unwrap_or_exit!(Builder::new()
                .name("emergency".into())
                .spawn(move || {
                    sleep(delay);
                    warn!("Raising emergency signal");
                    emergency_handle.set_emergency(true);
                })))
        }
        None => None,
    };

    if let Some(status) = handle.operate() {
        info!("Car {} finished service at floor {} ({})", status.id, status.floor, status.motion);
    }

    if let Some(thread) = emergency_thread {
        let _ = thread.join();
    }
    if let Some(status) = handle.status() {
        if let Ok(line) = serde_json::to_string(&status) {
            info!("Final status: {}", line);
        }
    }

    // Shut down; the logger ends once the car has dropped its event sender
    handle.terminate();
    let _ = car_thread.join();
    let _ = logger_thread.join();
}
