/*
 * Unit tests for the car worker
 *
 * The unit tests follows the Arrange, Act, Assert pattern.
 * Each test spawns a real worker thread and talks to it only through its CarHandle.
 *
 * Tests:
 * - test_fsm_admission_and_operate
 * - test_fsm_rejection_reaches_caller
 * - test_fsm_emergency_preempts_operate
 * - test_fsm_emergency_clear_restores_service
 * - test_fsm_emergency_raise_then_lower_is_not_lost
 * - test_fsm_door_commands
 * - test_fsm_survives_status_caller_leaving
 * - test_fsm_stops_when_handles_dropped
 * - test_fsm_terminated_car_is_unavailable
 */

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod fsm_tests {
    use std::thread::{sleep, spawn, JoinHandle};
    use std::time::Duration;

    use crate::config::{CarConfig, Config, TimingConfig};
    use crate::elevator::{
        CarController, CarEvent, CarFSM, CarHandle, Command, EventKind, EventValue, Request,
    };
    use crate::shared::{CarStatus, DoorState, InvalidRequestError, MotionState, RequestOrigin};
    use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError};

    fn setup_fsm(initial_floor: i32, hop_time: u64) -> (CarHandle, JoinHandle<()>, Receiver<CarEvent>) {
        let (event_tx, event_rx) = unbounded::<CarEvent>();

        // Default configuration
        let config = Config {
            car: CarConfig {
                id: 2,
                initial_floor,
                min_floor: 0,
                max_floor: 9,
                ..CarConfig::default()
            },
            timing: TimingConfig {
                hop_time,
                door_dwell_time: 5,
            },
        };

        let (handle, thread) = CarFSM::spawn(&config, Box::new(event_tx)).unwrap();
        (handle, thread, event_rx)
    }

    fn wait_for_kind(event_rx: &Receiver<CarEvent>, kind: EventKind) -> CarEvent {
        loop {
            match event_rx.recv_timeout(Duration::from_secs(3)) {
                Ok(event) if event.kind == kind => return event,
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {
                    panic!("Timed out waiting for {:?}", kind);
                }
                Err(e) => {
                    panic!("Error receiving from event_rx: {:?}", e);
                }
            }
        }
    }

    #[test]
    fn test_fsm_admission_and_operate() {
        // Purpose: Requests admitted through the handle are served by the worker

        // Arrange
        let (handle, thread, event_rx) = setup_fsm(0, 5);

        // Act
        handle
            .add_up_request(Request::new(RequestOrigin::Button, 0, Some(5)))
            .unwrap();
        let status = handle.operate().expect("worker should be running");

        // Assert
        assert_eq!(status.floor, 5);
        assert_eq!(status.motion, MotionState::Idle);
        assert_eq!(status.door, DoorState::Closed);
        assert_eq!(status.pending_up + status.pending_down, 0);
        let serviced = wait_for_kind(&event_rx, EventKind::RequestServiced);
        assert_eq!(serviced.car_id, 2);

        // Cleanup
        handle.terminate();
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_rejection_reaches_caller() {
        let (handle, thread, _event_rx) = setup_fsm(0, 5);

        let result = handle.add_down_request(Request::new(RequestOrigin::Button, 12, Some(3)));

        assert_eq!(
            result,
            Err(InvalidRequestError::FloorOutOfRange { floor: 12, min: 0, max: 9 })
        );
        assert_eq!(handle.status().unwrap().pending_down, 0);

        handle.terminate();
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_emergency_preempts_operate() {
        // Purpose: An emergency raised from another thread stops a hop in progress, then the
        // drill homes the car

        // Arrange
        let (handle, thread, event_rx) = setup_fsm(3, 5000);
        handle
            .add_down_request(Request::new(RequestOrigin::Button, 3, Some(1)))
            .unwrap();
        let operator = handle.clone();
        let operate_thread = spawn(move || operator.operate());

        // Act
        sleep(Duration::from_millis(100));
        handle.set_emergency(true);
        let halted = operate_thread.join().unwrap().expect("worker should be running");

        // Assert
        assert_eq!(halted.floor, 3);
        assert_eq!(halted.motion, MotionState::Emergency);
        assert_eq!(halted.pending_up + halted.pending_down, 0);
        wait_for_kind(&event_rx, EventKind::TravelInterrupted);

        let homed = handle.status().unwrap();
        assert_eq!(homed.floor, 0);
        assert_eq!(homed.motion, MotionState::Emergency);
        assert_eq!(homed.door, DoorState::Closed);
        assert!(homed.emergency_active);

        // Cleanup
        handle.terminate();
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_emergency_clear_restores_service() {
        // Arrange
        let (handle, thread, _event_rx) = setup_fsm(4, 5);
        handle.set_emergency(true);
        assert_eq!(
            handle.add_up_request(Request::new(RequestOrigin::Button, 0, Some(2))),
            Err(InvalidRequestError::EmergencyActive)
        );

        // Act
        handle.set_emergency(false);
        let cleared = handle.status().unwrap();
        handle
            .add_up_request(Request::new(RequestOrigin::Button, 0, Some(2)))
            .unwrap();
        let served = handle.operate().unwrap();

        // Assert
        assert_eq!(cleared.motion, MotionState::Idle);
        assert!(!cleared.emergency_active);
        assert_eq!(served.floor, 2);

        // Cleanup
        handle.terminate();
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_emergency_raise_then_lower_is_not_lost() {
        // Purpose: An emergency raised and lowered before the worker reads its mailbox still
        // drops the pending requests and is reported

        // Arrange
        let (handle, thread, event_rx) = setup_fsm(0, 5);
        handle
            .add_up_request(Request::new(RequestOrigin::Button, 0, Some(5)))
            .unwrap();

        // Act
        handle.set_emergency(true);
        handle.set_emergency(false);
        let status = handle.status().unwrap();

        // Assert
        assert_eq!(status.pending_up + status.pending_down, 0);
        assert_eq!(status.motion, MotionState::Idle);
        assert!(!status.emergency_active);
        let cleared = wait_for_kind(&event_rx, EventKind::QueuesCleared);
        assert_eq!(cleared.new_value, Some(EventValue::Dropped(1)));
        wait_for_kind(&event_rx, EventKind::EmergencyEntered);
        wait_for_kind(&event_rx, EventKind::EmergencyCleared);

        // Cleanup
        handle.terminate();
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_door_commands() {
        let (handle, thread, _event_rx) = setup_fsm(0, 5);

        handle.open_door();
        assert_eq!(handle.status().unwrap().door, DoorState::Open);
        handle.jam_door();
        handle.close_door();
        assert_eq!(handle.status().unwrap().door, DoorState::Jammed);
        handle.clear_door_jam();
        assert_eq!(handle.status().unwrap().door, DoorState::Closed);

        handle.terminate();
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_survives_status_caller_leaving() {
        // Purpose: A status request whose caller is gone does not stop the worker

        // Arrange
        let (command_tx, command_rx) = unbounded::<Command>();
        let (_terminate_tx, terminate_rx) = unbounded::<()>();
        let fsm = CarFSM::new(CarController::new_car(3, 4), command_rx, terminate_rx);
        let thread = spawn(move || fsm.run());

        // Act
        let (gone_tx, gone_rx) = unbounded::<CarStatus>();
        drop(gone_rx);
        command_tx.send(Command::Status(gone_tx)).unwrap();
        let (reply_tx, reply_rx) = unbounded::<CarStatus>();
        command_tx.send(Command::Status(reply_tx)).unwrap();

        // Assert
        match reply_rx.recv_timeout(Duration::from_secs(3)) {
            Ok(status) => assert_eq!(status.floor, 4),
            Err(e) => panic!("Worker stopped answering: {:?}", e),
        }

        // Cleanup
        drop(command_tx);
        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_stops_when_handles_dropped() {
        let (handle, thread, _event_rx) = setup_fsm(0, 5);

        drop(handle);

        thread.join().unwrap();
    }

    #[test]
    fn test_fsm_terminated_car_is_unavailable() {
        let (handle, thread, _event_rx) = setup_fsm(0, 5);
        handle.terminate();
        thread.join().unwrap();

        let result = handle.add_up_request(Request::new(RequestOrigin::Button, 0, Some(1)));

        assert_eq!(result, Err(InvalidRequestError::CarUnavailable));
        assert!(handle.operate().is_none());
    }
}
