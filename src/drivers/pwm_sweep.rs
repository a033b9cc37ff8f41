//! PWM test-signal sweep across the `pins_pwm` bank.
//!
//! Each slot `s_1` .. `s_8` is driven at 50 Hz / duty 100 for the dwell
//! time, then released.  A slot that cannot be configured is reported and
//! skipped; the sweep itself never fails.

use core::time::Duration;

use log::debug;

use crate::app::events::BringupEvent;
use crate::app::ports::{BoardPort, ClockPort, ConfigPort, EventSink, PwmOutput};
use crate::config::PinId;
use crate::error::{BusFault, ChannelFault, ChannelFaultCause};
use crate::pins::{PINS_PWM, PWM_SLOTS, PWM_TEST_DUTY, PWM_TEST_FREQ_HZ, pwm_slot_key};

/// Outcome of one sweep.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PwmSweepReport {
    pub attempted: u8,
    pub faults: heapless::Vec<ChannelFault, { PWM_SLOTS as usize }>,
}

impl PwmSweepReport {
    pub fn faulted(&self) -> u8 {
        self.faults.len() as u8
    }

    pub fn all_ok(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Drive every slot in order, holding each for `dwell`.
pub fn run<B, C, S>(
    board: &mut B,
    config: &impl ConfigPort,
    clock: &mut C,
    sink: &mut S,
    dwell: Duration,
) -> PwmSweepReport
where
    B: BoardPort,
    C: ClockPort,
    S: EventSink,
{
    let mut report = PwmSweepReport::default();

    for channel in 1..=PWM_SLOTS {
        report.attempted += 1;
        if let Err(cause) = exercise(channel, board, config, clock, sink, dwell) {
            let fault = ChannelFault { channel, cause };
            sink.emit(&BringupEvent::PwmChannelFault(fault.clone()));
            let _ = report.faults.push(fault);
        }
    }

    sink.emit(&BringupEvent::PwmSweepDone {
        attempted: report.attempted,
        faulted: report.faulted(),
    });
    report
}

fn exercise<B, C, S>(
    channel: u8,
    board: &mut B,
    config: &impl ConfigPort,
    clock: &mut C,
    sink: &mut S,
    dwell: Duration,
) -> Result<(), ChannelFaultCause>
where
    B: BoardPort,
    C: ClockPort,
    S: EventSink,
{
    let pin: PinId = config
        .pin(PINS_PWM, &pwm_slot_key(channel))
        .map_err(ChannelFaultCause::Config)?;

    let mut out = board.open_pwm(pin).map_err(ChannelFaultCause::Bus)?;
    if let Err(e) = drive(&mut out) {
        out.release();
        return Err(ChannelFaultCause::Bus(e));
    }

    sink.emit(&BringupEvent::PwmChannelOk {
        channel,
        pin,
        frequency_hz: PWM_TEST_FREQ_HZ,
        duty: PWM_TEST_DUTY,
        dwell,
    });
    hold(clock, dwell);
    out.release();
    debug!("pwm: s_{channel} released");
    Ok(())
}

fn drive(out: &mut impl PwmOutput) -> Result<(), BusFault> {
    out.set_frequency_hz(PWM_TEST_FREQ_HZ)?;
    out.set_duty(PWM_TEST_DUTY)
}

/// `DelayNs` takes `u32` milliseconds; longer dwells are split.
fn hold(clock: &mut impl ClockPort, dwell: Duration) {
    let mut remaining = dwell.as_millis();
    while remaining > 0 {
        let step = remaining.min(u128::from(u32::MAX)) as u32;
        clock.delay_ms(step);
        remaining -= u128::from(step);
    }
}
