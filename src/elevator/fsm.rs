use crate::config::Config;
use crate::shared::{CarStatus, InvalidRequestError};
use crossbeam_channel as cbc;
use log::{debug, info, warn};
use std::io;
use std::thread::{Builder, JoinHandle};

use super::controller::CarController;
use super::events::EventSink;
use super::request::Request;
use super::timer::EmergencyLatch;

/// Per-command reply channel.
pub type Reply<T> = cbc::Sender<T>;

pub enum Command {
    AddUpRequest(Request, Reply<Result<(), InvalidRequestError>>),
    AddDownRequest(Request, Reply<Result<(), InvalidRequestError>>),
    Operate(Reply<CarStatus>),
    /// The latch was set to this level; run the emergency drill for it.
    Emergency(bool),
    OpenDoor,
    CloseDoor,
    JamDoor,
    ClearDoorJam,
    Status(Reply<CarStatus>),
}

enum Event {
    CommandReceived(Command),
    MailboxClosed,
    Terminate,
}

/**
 * Runs one car as a sequential worker.
 *
 * The `CarFSM` owns the `CarController` and is the only thing that touches it. Callers talk to
 * it through a `CarHandle`, whose commands arrive on the mailbox and are handled one at a time,
 * so admission and service never interleave. The emergency latch is the exception: the handle
 * raises it directly so an emergency reaches a hop that is already in progress.
 *
 * # Fields
 * - `controller`:      The car being driven.
 * - `command_rx`:      Mailbox for commands from handles.
 * - `terminate_rx`:    Stops the worker loop.
 */
pub struct CarFSM {
    controller: CarController,
    command_rx: cbc::Receiver<Command>,
    terminate_rx: cbc::Receiver<()>,
}

impl CarFSM {
    pub fn new(
        controller: CarController,
        command_rx: cbc::Receiver<Command>,
        terminate_rx: cbc::Receiver<()>,
    ) -> CarFSM {
        CarFSM {
            controller,
            command_rx,
            terminate_rx,
        }
    }

    /// Builds the car from `config` and starts its worker thread.
    pub fn spawn(
        config: &Config,
        sink: Box<dyn EventSink>,
    ) -> io::Result<(CarHandle, JoinHandle<()>)> {
        let controller = CarController::new(config, sink);
        let latch = controller.emergency_latch();
        let (command_tx, command_rx) = cbc::unbounded::<Command>();
        let (terminate_tx, terminate_rx) = cbc::unbounded::<()>();

        let fsm = CarFSM::new(controller, command_rx, terminate_rx);
        let thread = Builder::new()
            .name(format!("car_{}", config.car.id))
            .spawn(move || fsm.run())?;

        Ok((
            CarHandle {
                command_tx,
                terminate_tx,
                latch,
            },
            thread,
        ))
    }

    pub fn run(mut self) {
        info!("Car {} worker started at floor {}", self.controller.id(), self.controller.current_floor());

        loop {
            match self.wait_for_event() {
                Event::CommandReceived(command) => self.handle_command(command),
                Event::MailboxClosed => {
                    info!("Car {} has no handles left, stopping", self.controller.id());
                    break;
                }
                Event::Terminate => {
                    info!("Car {} terminated", self.controller.id());
                    break;
                }
            }
        }
    }

    fn wait_for_event(&self) -> Event {
        cbc::select! {
            recv(self.terminate_rx) -> _ => Event::Terminate,
            recv(self.command_rx) -> command => {
                match command {
                    Ok(c) => Event::CommandReceived(c),
                    Err(_) => Event::MailboxClosed,
                }
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        let id = self.controller.id();
        match command {
            Command::AddUpRequest(request, reply) => {
                let result = self.controller.add_up_request(request);
                if let Err(e) = &result {
                    debug!("Car {id} refused up request: {e}");
                }
                if reply.send(result).is_err() {
                    warn!("Car {id}: caller left before admission reply");
                }
            }
            Command::AddDownRequest(request, reply) => {
                let result = self.controller.add_down_request(request);
                if let Err(e) = &result {
                    debug!("Car {id} refused down request: {e}");
                }
                if reply.send(result).is_err() {
                    warn!("Car {id}: caller left before admission reply");
                }
            }
            Command::Operate(reply) => {
                debug!(
                    "Car {id} operating, {} up and {} down pending",
                    self.controller.pending_up(),
                    self.controller.pending_down()
                );
                self.controller.operate();
                if reply.send(self.controller.status()).is_err() {
                    warn!("Car {id}: caller left before operate finished");
                }
            }
            Command::Emergency(active) => {
                self.controller.apply_emergency(active);
                if self.controller.is_emergency_active() {
                    warn!("Car {id} in emergency mode at floor {}", self.controller.current_floor());
                } else {
                    info!("Car {id} back to normal operation");
                }
            }
            Command::OpenDoor => self.controller.open_door(),
            Command::CloseDoor => self.controller.close_door(),
            Command::JamDoor => {
                warn!("Car {id} door jammed");
                self.controller.jam_door();
            }
            Command::ClearDoorJam => self.controller.clear_door_jam(),
            Command::Status(reply) => {
                if reply.send(self.controller.status()).is_err() {
                    warn!("Car {id}: caller left before status reply");
                }
            }
        }
    }
}

/// Cloneable front end to a running `CarFSM`.
#[derive(Clone)]
pub struct CarHandle {
    command_tx: cbc::Sender<Command>,
    terminate_tx: cbc::Sender<()>,
    latch: EmergencyLatch,
}

impl CarHandle {
    pub fn add_up_request(&self, request: Request) -> Result<(), InvalidRequestError> {
        self.admit(|reply| Command::AddUpRequest(request, reply))
    }

    pub fn add_down_request(&self, request: Request) -> Result<(), InvalidRequestError> {
        self.admit(|reply| Command::AddDownRequest(request, reply))
    }

    fn admit<F>(&self, command: F) -> Result<(), InvalidRequestError>
    where
        F: FnOnce(Reply<Result<(), InvalidRequestError>>) -> Command,
    {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.command_tx
            .send(command(reply_tx))
            .map_err(|_| InvalidRequestError::CarUnavailable)?;
        reply_rx
            .recv()
            .map_err(|_| InvalidRequestError::CarUnavailable)?
    }

    /// Blocks until the car has drained its queues, or an emergency halted it.
    /// `None` if the worker is gone.
    pub fn operate(&self) -> Option<CarStatus> {
        self.request(Command::Operate)
    }

    pub fn status(&self) -> Option<CarStatus> {
        self.request(Command::Status)
    }

    fn request<F>(&self, command: F) -> Option<CarStatus>
    where
        F: FnOnce(Reply<CarStatus>) -> Command,
    {
        let (reply_tx, reply_rx) = cbc::bounded(1);
        self.command_tx.send(command(reply_tx)).ok()?;
        reply_rx.recv().ok()
    }

    /// Latches the emergency signal. Interrupts a hop or dwell in progress at once; the
    /// emergency drill for `active` runs when the worker next reads its mailbox, even if the
    /// level has changed again by then.
    pub fn set_emergency(&self, active: bool) {
        self.latch.set(active);
        let _ = self.command_tx.send(Command::Emergency(active));
    }

    pub fn open_door(&self) {
        let _ = self.command_tx.send(Command::OpenDoor);
    }

    pub fn close_door(&self) {
        let _ = self.command_tx.send(Command::CloseDoor);
    }

    pub fn jam_door(&self) {
        let _ = self.command_tx.send(Command::JamDoor);
    }

    pub fn clear_door_jam(&self) {
        let _ = self.command_tx.send(Command::ClearDoorJam);
    }

    pub fn terminate(&self) {
        let _ = self.terminate_tx.send(());
    }
}
