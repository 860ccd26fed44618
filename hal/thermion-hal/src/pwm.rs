//! PWM output abstraction

use crate::{PinId, PortError};

/// PWM output port
pub trait PwmOutput {
    /// Set the duty cycle of a PWM pin
    ///
    /// `duty` is in `0..=255`, where 255 is fully on.
    fn pwm_write(&mut self, pin: PinId, duty: u8) -> Result<(), PortError>;
}
