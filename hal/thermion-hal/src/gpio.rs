//! GPIO pin abstractions
//!
//! Digital outputs addressed by pin id. The H-bridge direction pins and
//! the PWM pin are configured through this port.

use crate::{PinId, PortError};

/// Logic level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    Output,
}

/// Digital output port
///
/// Implementations map pin ids onto the board's actual GPIO drivers.
pub trait DigitalOutput {
    /// Configure the direction of a pin
    fn pin_mode(&mut self, pin: PinId, mode: PinMode) -> Result<(), PortError>;

    /// Drive a pin to the given level
    fn digital_write(&mut self, pin: PinId, level: Level) -> Result<(), PortError>;

    /// Drive a pin high
    fn set_high(&mut self, pin: PinId) -> Result<(), PortError> {
        self.digital_write(pin, Level::High)
    }

    /// Drive a pin low
    fn set_low(&mut self, pin: PinId) -> Result<(), PortError> {
        self.digital_write(pin, Level::Low)
    }
}
