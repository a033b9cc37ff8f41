//! Dispatcher and session service, end to end against the mock board.

use core::time::Duration;

use boardcheck::app::events::BringupEvent;
use boardcheck::app::session::BringupSession;
use boardcheck::bringup::dispatch::{self, DeviceHandle, DeviceKind};
use boardcheck::diagnostics::DeviceOutcome;
use boardcheck::error::ConfigError;
use boardcheck::pins::{GPS_UART_CHANNEL, XBEE_UART_CHANNEL};

use crate::mock_hw::{BENCH_CONFIG, MockBoard, RecordingSink, SimClock, bench_config, rig};

fn session() -> BringupSession<MockBoard, SimClock, RecordingSink> {
    let (clock, board, sink) = rig();
    BringupSession::new(bench_config(), board, clock, sink)
}

#[test]
fn unknown_name_dispatches_to_nothing() {
    let (mut clock, mut board, mut sink) = rig();

    let result = dispatch::dispatch("lidar", &mut board, &bench_config(), &mut clock, &mut sink);

    assert!(result.is_none());
    assert!(board.opens.is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn names_route_to_their_routines() {
    let (mut clock, mut board, mut sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, 0, b"OK\r");
    board.script_rx(GPS_UART_CHANNEL, 0, b"$GPGLL\r\n");

    for kind in DeviceKind::ALL {
        let handle = dispatch::dispatch(kind.name(), &mut board, &bench_config(), &mut clock, &mut sink)
            .expect("known name")
            .expect("device up");
        assert_eq!(handle.kind(), kind);
    }
    assert!(matches!(
        dispatch::bring_up(DeviceKind::Mpu, &mut board, &bench_config(), &mut clock, &mut sink),
        Ok(DeviceHandle::Mpu(_))
    ));
}

#[test]
fn session_records_each_outcome() {
    let mut s = session();
    let mpu = s.mpu();
    let xbee = s.xbee(); // never answers
    assert!(mpu.is_ok());
    assert!(xbee.is_err());

    assert_eq!(s.board().opens.len(), 2);
    assert_eq!(s.sink().terminal_for(DeviceKind::Xbee).len(), 1);
    assert_eq!(s.sink().timeouts(), 1);

    let report = s.report();
    assert_eq!(report.outcome(DeviceKind::Mpu), Some(DeviceOutcome::Ready));
    assert_eq!(report.outcome(DeviceKind::Xbee), Some(DeviceOutcome::Timeout));
    assert_eq!(report.outcome(DeviceKind::Gps), None);
    assert!(!report.all_ready());
}

#[test]
fn session_device_by_name_updates_report() {
    let mut s = session();
    assert!(s.device("nope").is_none());
    assert_eq!(s.report().summary_lines().len(), 0);

    assert!(s.device("gps").unwrap().is_err());
    assert_eq!(s.report().outcome(DeviceKind::Gps), Some(DeviceOutcome::Timeout));
}

#[test]
fn devices_are_brought_up_one_after_another() {
    let (clock, mut board, sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, 40, b"OK\r");
    board.script_rx(GPS_UART_CHANNEL, 1_000, b"$GPVTG\r\n");
    let mut s = BringupSession::new(bench_config(), board, clock, sink);

    s.mpu().unwrap();
    s.xbee().unwrap();
    s.gps().unwrap();
    let sweep = s.pwm(Duration::from_millis(250));

    assert!(sweep.all_ok());
    assert!(s.report().all_ready());

    let (_board, _clock, sink, report) = s.into_parts();
    let ready: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            BringupEvent::DeviceReady(d) => Some(*d),
            _ => None,
        })
        .collect();
    assert_eq!(ready, vec![DeviceKind::Mpu, DeviceKind::Xbee, DeviceKind::Gps]);
    assert_eq!(
        report.summary_lines(),
        vec!["xbee  OK", "gps   OK", "mpu   OK", "pwm   8/8 channels ok"]
    );
}

#[test]
fn session_loads_pin_map_from_disk() {
    let path = std::env::temp_dir().join(format!("boardcheck-{}.json", std::process::id()));
    std::fs::write(&path, BENCH_CONFIG).unwrap();

    let (clock, board, sink) = rig();
    let s = BringupSession::load(&path, board, clock, sink).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(s.config().section("pins_pwm").is_some());
}

#[test]
fn unreadable_pin_map_is_fatal() {
    let (clock, board, sink) = rig();
    let err = BringupSession::load("/nonexistent/boardcheck.json", board, clock, sink)
        .err()
        .unwrap();

    assert!(err.is_fatal());
    assert!(matches!(err, ConfigError::Load { .. }));
}
