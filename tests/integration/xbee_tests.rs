//! XBee command-mode handshake on UART 1.

use boardcheck::app::events::BringupEvent;
use boardcheck::app::ports::{ClockPort, UartPins};
use boardcheck::bringup::DeviceKind;
use boardcheck::bringup::deadline::{BRINGUP_DEADLINE_MS, POLL_INTERVAL_MS};
use boardcheck::config::BoardConfig;
use boardcheck::devices::xbee;
use boardcheck::error::{BringupError, BusFault, ConfigError};
use boardcheck::pins::{PINS_DEVICES, XBEE_UART_CHANNEL, XBEE_UART_TX};

use crate::mock_hw::{Open, bench_config, rig};

#[test]
fn exact_ok_returns_the_port() {
    let (mut clock, mut board, mut sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, 250, b"OK\r");

    let result = xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink);

    assert!(result.is_ok());
    assert!(clock.now_ms() < 250 + u64::from(POLL_INTERVAL_MS));
    assert_eq!(sink.events, vec![BringupEvent::DeviceReady(DeviceKind::Xbee)]);
}

#[test]
fn line_is_opened_fast_then_slowed_and_escape_sent() {
    let (mut clock, mut board, mut sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, 0, b"OK\r");

    xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).unwrap();

    assert_eq!(
        board.opens,
        vec![Open::Uart {
            channel: 1,
            pins: UartPins { tx: Some(17), rx: 16 },
            baud: 115_200,
        }]
    );
    let line = board.line(XBEE_UART_CHANNEL);
    let line = line.borrow();
    assert_eq!(line.bauds(), vec![115_200, 9_600]);
    assert!(line.settings.iter().all(|s| s.data_bits == 8 && s.stop_bits == 1));
    assert_eq!(line.tx, b"+++");
}

#[test]
fn padded_ack_is_rejected() {
    let (mut clock, mut board, mut sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, 100, b"OK\r\n");

    let err = xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).unwrap_err();

    assert!(matches!(err, BringupError::ProtocolTimeout { .. }));
}

#[test]
fn ack_after_noise_is_still_accepted() {
    let (mut clock, mut board, mut sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, 100, b"\x00\xff");
    board.script_rx(XBEE_UART_CHANNEL, 900, b"OK\r");

    assert!(xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).is_ok());
}

#[test]
fn silent_modem_times_out_once() {
    let (mut clock, mut board, mut sink) = rig();

    let err = xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).unwrap_err();

    let BringupError::ProtocolTimeout { waited_ms } = err else {
        panic!("expected timeout, got {err:?}");
    };
    assert!(waited_ms >= BRINGUP_DEADLINE_MS);
    assert!(clock.now_ms() <= BRINGUP_DEADLINE_MS + u64::from(POLL_INTERVAL_MS));
    assert_eq!(sink.timeouts(), 1);
    assert_eq!(sink.events.len(), 1);
}

#[test]
fn late_ack_after_deadline_is_ignored() {
    let (mut clock, mut board, mut sink) = rig();
    board.script_rx(XBEE_UART_CHANNEL, BRINGUP_DEADLINE_MS + 100, b"OK\r");

    let err = xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).unwrap_err();

    assert!(matches!(err, BringupError::ProtocolTimeout { .. }));
    assert_eq!(board.line(XBEE_UART_CHANNEL).borrow().rx.len(), 1);
}

#[test]
fn missing_tx_key_opens_nothing() {
    let (mut clock, mut board, mut sink) = rig();
    let cfg = BoardConfig::from_json(r#"{ "pins_devices": { "xbee_uart_rx": 16 } }"#).unwrap();

    let err = xbee::bring_up(&mut board, &cfg, &mut clock, &mut sink).unwrap_err();

    assert_eq!(
        err,
        BringupError::Config(ConfigError::missing(PINS_DEVICES, XBEE_UART_TX))
    );
    assert!(board.opens.is_empty());
    assert_eq!(clock.now_ms(), 0);
}

#[test]
fn open_failure_is_a_distinct_fault() {
    let (mut clock, mut board, mut sink) = rig();
    board.fail_uart_open.push(XBEE_UART_CHANNEL);

    let err = xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).unwrap_err();

    assert!(matches!(err, BringupError::BusFault(BusFault::Open(_))));
    assert_eq!(sink.timeouts(), 0);
    assert!(matches!(
        sink.events.as_slice(),
        [BringupEvent::DeviceFault { device: DeviceKind::Xbee, .. }]
    ));
}

#[test]
fn read_fault_mid_poll_is_reported() {
    let (mut clock, mut board, mut sink) = rig();
    board.line(XBEE_UART_CHANNEL).borrow_mut().read_fault = Some(BusFault::Io("framing".into()));

    let err = xbee::bring_up(&mut board, &bench_config(), &mut clock, &mut sink).unwrap_err();

    assert_eq!(err, BringupError::BusFault(BusFault::Io("framing".into())));
}
