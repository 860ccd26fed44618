//! Raspberry Pi Pico board bindings
//!
//! Wiring:
//! - GPIO26 (ADC0): thermistor divider
//! - GPIO6 (PWM3 A): H-bridge enable
//! - GPIO7 / GPIO8: H-bridge INA / INB
//! - GPIO0 / GPIO1: UART0 TX / RX, terminal
//!
//! Pin ids in the profile must match this wiring; any other id is
//! reported as `PortError::UnknownPin`.

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::BufferedUart;
use embassy_time::Instant;
use embedded_io::{Read, ReadReady, Write};

use thermion_hal::{
    AnalogInput, Clock, DigitalOutput, Level, NvStorage, PinId, PinMode, PortError, PwmOutput,
    SerialPort, StorageError,
};

use crate::flash::FlashRegion;

pub const ADC_PIN: PinId = 26;
pub const PWM_PIN: PinId = 6;
pub const DIR_A_PIN: PinId = 7;
pub const DIR_B_PIN: PinId = 8;

/// PWM counter wrap; one count per duty step
const PWM_TOP: u16 = 255;

/// The RP2040 ADC is 12-bit; the profile works in 10-bit counts
const ADC_SHIFT: u16 = 2;

/// Peripherals the board owns
pub struct PicoBoard {
    pub adc: Adc<'static, Blocking>,
    pub thermistor: Channel<'static>,
    pub pwm: Pwm<'static>,
    pub pwm_config: PwmConfig,
    pub dir_a: Output<'static>,
    pub dir_b: Output<'static>,
    pub uart: BufferedUart,
    pub flash: FlashRegion<'static>,
}

/// PWM configuration for a given duty
pub fn pwm_config(duty: u8) -> PwmConfig {
    let mut config = PwmConfig::default();
    config.top = PWM_TOP;
    config.compare_a = u16::from(duty);
    config
}

impl AnalogInput for PicoBoard {
    fn analog_read(&mut self, pin: PinId) -> Result<u16, PortError> {
        if pin != ADC_PIN {
            return Err(PortError::UnknownPin(pin));
        }
        self.adc
            .blocking_read(&mut self.thermistor)
            .map(|raw| raw >> ADC_SHIFT)
            .map_err(|_| PortError::Hardware)
    }
}

impl DigitalOutput for PicoBoard {
    fn pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), PortError> {
        // Every bound pin is created as an output
        match (pin, mode) {
            (PWM_PIN | DIR_A_PIN | DIR_B_PIN, PinMode::Output) => Ok(()),
            (PWM_PIN | DIR_A_PIN | DIR_B_PIN, PinMode::Input) => Err(PortError::Unsupported(pin)),
            _ => Err(PortError::UnknownPin(pin)),
        }
    }

    fn digital_write(&mut self, pin: PinId, level: Level) -> Result<(), PortError> {
        let output = match pin {
            DIR_A_PIN => &mut self.dir_a,
            DIR_B_PIN => &mut self.dir_b,
            PWM_PIN => return Err(PortError::Unsupported(pin)),
            _ => return Err(PortError::UnknownPin(pin)),
        };
        match level {
            Level::High => output.set_high(),
            Level::Low => output.set_low(),
        }
        Ok(())
    }
}

impl PwmOutput for PicoBoard {
    fn pwm_write(&mut self, pin: PinId, duty: u8) -> Result<(), PortError> {
        if pin != PWM_PIN {
            return Err(PortError::UnknownPin(pin));
        }
        self.pwm_config.compare_a = u16::from(duty);
        self.pwm.set_config(&self.pwm_config);
        Ok(())
    }
}

impl SerialPort for PicoBoard {
    type Error = embassy_rp::uart::Error;

    fn available(&mut self) -> usize {
        match self.uart.read_ready() {
            Ok(true) => 1,
            _ => 0,
        }
    }

    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.uart.write_all(data)
    }
}

impl NvStorage for PicoBoard {
    fn capacity(&self) -> usize {
        self.flash.capacity()
    }

    fn get(&mut self, offset: u32, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.flash.get(offset, buffer)
    }

    fn put(&mut self, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        self.flash.put(offset, data)
    }
}

impl Clock for PicoBoard {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
