//! Analog input abstraction

use crate::{PinId, PortError};

/// Analog-to-digital converter port
pub trait AnalogInput {
    /// Read the raw conversion result for a pin
    ///
    /// The value is scaled to the range the profile's `adc_max` describes;
    /// boards with a wider converter shift the result down.
    fn analog_read(&mut self, pin: PinId) -> Result<u16, PortError>;
}
