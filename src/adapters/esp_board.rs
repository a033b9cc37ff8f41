//! ESP-IDF board adapter.
//!
//! Implements [`BoardPort`] for the ESP32: I²C through `esp-idf-hal`'s
//! [`I2cDriver`] (which already speaks embedded-hal 1.0), UART and LEDC
//! through raw ESP-IDF sys calls on whatever pins the config names.
//!
//! Only one PWM output is live at a time (the sweep is strictly serial),
//! so every output shares LEDC timer 0 / channel 0.

use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{I2C0, I2cConfig, I2cDriver};
use esp_idf_hal::units::Hertz;
use esp_idf_svc::sys::*;
use log::{debug, info};

use crate::app::ports::{BoardPort, Parity, PwmOutput, SerialPort, UartPins, UartSettings};
use crate::config::PinId;
use crate::error::BusFault;
use crate::pins::{PWM_TEST_FREQ_HZ, XBEE_UART_CHANNEL, GPS_UART_CHANNEL};

/// Leave a UART signal unrouted.
const UART_PIN_UNUSED: i32 = -1;
const UART_RX_BUFFER: i32 = 1024;

/// Mount point of the SPIFFS partition holding `config.json`.
pub const CONFIG_FS_BASE: &str = "/spiffs";

fn open_err(what: &str, e: EspError) -> BusFault {
    BusFault::Open(format!("{what}: {e}"))
}

fn io_err(what: &str, e: EspError) -> BusFault {
    BusFault::Io(format!("{what}: {e}"))
}

/// Register the SPIFFS partition at [`CONFIG_FS_BASE`].
pub fn mount_config_fs() -> Result<(), EspError> {
    let conf = esp_vfs_spiffs_conf_t {
        base_path: c"/spiffs".as_ptr(),
        partition_label: core::ptr::null(),
        max_files: 4,
        format_if_mount_failed: false,
    };
    // SAFETY: `conf` outlives the call; the VFS copies the base path.
    esp!(unsafe { esp_vfs_spiffs_register(&conf) })?;
    info!("[fs] spiffs mounted at {}", CONFIG_FS_BASE);
    Ok(())
}

// ── Board ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct EspBoard;

impl EspBoard {
    pub fn new() -> Self {
        Self
    }
}

impl BoardPort for EspBoard {
    type I2c = I2cDriver<'static>;
    type Uart = EspUart;
    type Pwm = LedcOutput;

    fn open_i2c(&mut self, scl: PinId, sda: PinId, frequency_hz: u32) -> Result<Self::I2c, BusFault> {
        let config = I2cConfig::new().baudrate(Hertz(frequency_hz));
        // SAFETY: the bus and both pins are owned by this driver until it is
        // dropped; nothing else in the firmware touches I2C0.
        let (i2c, sda, scl) = unsafe { (I2C0::new(), AnyIOPin::new(sda), AnyIOPin::new(scl)) };
        I2cDriver::new(i2c, sda, scl, &config).map_err(|e| open_err("i2c0", e))
    }

    fn open_uart(&mut self, channel: u8, pins: UartPins, settings: &UartSettings) -> Result<Self::Uart, BusFault> {
        let port = match channel {
            XBEE_UART_CHANNEL => uart_port_t_UART_NUM_1,
            GPS_UART_CHANNEL => uart_port_t_UART_NUM_2,
            other => return Err(BusFault::Open(format!("no UART channel {other}"))),
        };

        // SAFETY: the port is installed once per handle and deleted in Drop.
        esp!(unsafe {
            uart_driver_install(port, UART_RX_BUFFER, 0, 0, core::ptr::null_mut(), 0)
        })
        .map_err(|e| open_err("uart install", e))?;
        let uart = EspUart { port };

        let tx = pins.tx.unwrap_or(UART_PIN_UNUSED);
        esp!(unsafe { uart_set_pin(port, tx, pins.rx, UART_PIN_UNUSED, UART_PIN_UNUSED) })
            .map_err(|e| open_err("uart pins", e))?;

        uart.apply(settings).map_err(|e| open_err("uart config", e))?;
        debug!("uart{}: tx={:?} rx={} @ {}", channel, pins.tx, pins.rx, settings.baud);
        Ok(uart)
    }

    fn open_pwm(&mut self, pin: PinId) -> Result<Self::Pwm, BusFault> {
        let timer = ledc_timer_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            timer_num: ledc_timer_t_LEDC_TIMER_0,
            duty_resolution: ledc_timer_bit_t_LEDC_TIMER_10_BIT,
            freq_hz: PWM_TEST_FREQ_HZ,
            clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
            ..Default::default()
        };
        // SAFETY: timer 0 / channel 0 are reserved for the sweep, which holds
        // at most one output at a time.
        esp!(unsafe { ledc_timer_config(&timer) }).map_err(|e| open_err("ledc timer", e))?;

        let channel = ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pin,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        };
        esp!(unsafe { ledc_channel_config(&channel) }).map_err(|e| open_err("ledc channel", e))?;

        Ok(LedcOutput { pin })
    }
}

// ── UART ──────────────────────────────────────────────────────

/// An installed UART driver; uninstalled on drop.
#[derive(Debug)]
pub struct EspUart {
    port: uart_port_t,
}

impl EspUart {
    fn apply(&self, s: &UartSettings) -> Result<(), EspError> {
        let config = uart_config_t {
            baud_rate: s.baud as i32,
            data_bits: match s.data_bits {
                5 => uart_word_length_t_UART_DATA_5_BITS,
                6 => uart_word_length_t_UART_DATA_6_BITS,
                7 => uart_word_length_t_UART_DATA_7_BITS,
                _ => uart_word_length_t_UART_DATA_8_BITS,
            },
            parity: match s.parity {
                Parity::None => uart_parity_t_UART_PARITY_DISABLE,
                Parity::Even => uart_parity_t_UART_PARITY_EVEN,
                Parity::Odd => uart_parity_t_UART_PARITY_ODD,
            },
            stop_bits: if s.stop_bits == 2 {
                uart_stop_bits_t_UART_STOP_BITS_2
            } else {
                uart_stop_bits_t_UART_STOP_BITS_1
            },
            flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
            ..Default::default()
        };
        // SAFETY: the driver for `self.port` is installed for our lifetime.
        esp!(unsafe { uart_param_config(self.port, &config) })
    }
}

impl SerialPort for EspUart {
    fn configure(&mut self, settings: &UartSettings) -> Result<(), BusFault> {
        self.apply(settings).map_err(|e| open_err("uart reconfigure", e))
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), BusFault> {
        // SAFETY: `bytes` is valid for `len` bytes for the whole call.
        let n = unsafe { uart_write_bytes(self.port, bytes.as_ptr().cast(), bytes.len()) };
        if n < 0 || n as usize != bytes.len() {
            return Err(BusFault::Io(format!("uart write returned {n}")));
        }
        Ok(())
    }

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, BusFault> {
        let mut buffered: usize = 0;
        // SAFETY: out-pointer to a local.
        esp!(unsafe { uart_get_buffered_data_len(self.port, &mut buffered) })
            .map_err(|e| io_err("uart buffered len", e))?;
        if buffered == 0 {
            return Ok(0);
        }

        let want = buffered.min(buf.len()) as u32;
        // SAFETY: `buf` has room for `want` bytes; zero ticks never blocks.
        let n = unsafe { uart_read_bytes(self.port, buf.as_mut_ptr().cast(), want, 0) };
        if n < 0 {
            return Err(BusFault::Io(format!("uart read returned {n}")));
        }
        Ok(n as usize)
    }
}

impl Drop for EspUart {
    fn drop(&mut self) {
        // SAFETY: installed in `open_uart`, deleted exactly once here.
        unsafe {
            uart_driver_delete(self.port);
        }
    }
}

// ── LEDC ──────────────────────────────────────────────────────

/// LEDC channel 0 routed to one GPIO.
#[derive(Debug)]
pub struct LedcOutput {
    pin: PinId,
}

impl PwmOutput for LedcOutput {
    fn set_frequency_hz(&mut self, hz: u32) -> Result<(), BusFault> {
        // SAFETY: timer 0 configured in `open_pwm`.
        esp!(unsafe { ledc_set_freq(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_timer_t_LEDC_TIMER_0, hz) })
            .map_err(|e| io_err("ledc freq", e))
    }

    fn set_duty(&mut self, duty: u16) -> Result<(), BusFault> {
        // SAFETY: channel 0 configured in `open_pwm`.
        unsafe {
            esp!(ledc_set_duty(
                ledc_mode_t_LEDC_LOW_SPEED_MODE,
                ledc_channel_t_LEDC_CHANNEL_0,
                u32::from(duty),
            ))
            .map_err(|e| io_err("ledc duty", e))?;
            esp!(ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0))
                .map_err(|e| io_err("ledc update", e))
        }
    }

    fn release(self) {
        // SAFETY: stops channel 0 (output held low) and hands the pin back
        // to the GPIO matrix.
        unsafe {
            ledc_stop(ledc_mode_t_LEDC_LOW_SPEED_MODE, ledc_channel_t_LEDC_CHANNEL_0, 0);
            gpio_reset_pin(self.pin);
        }
    }
}
