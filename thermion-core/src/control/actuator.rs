//! H-bridge actuator driver
//!
//! Drives the heater through one half of an H-bridge: direction input A
//! high, B low, and the enable pin PWM'd. Reverse is never engaged.

use thermion_hal::{DigitalOutput, PinId, PinMode, PortError, PwmOutput};

use crate::config::Profile;

/// Full-on PWM duty
pub const PWM_MAX: u8 = 255;

/// Actuator errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Mapped duty fell outside `0..=pwm_max`
    OutOfRange { duty: i32 },
    /// Pin write failed
    Port(PortError),
}

impl From<PortError> for ActuatorError {
    fn from(e: PortError) -> Self {
        ActuatorError::Port(e)
    }
}

/// Pins the actuator drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorPins {
    pub pwm: PinId,
    pub dir_a: PinId,
    pub dir_b: PinId,
}

impl From<&Profile> for ActuatorPins {
    fn from(profile: &Profile) -> Self {
        Self {
            pwm: profile.pwm_pin,
            dir_a: profile.dir_a_pin,
            dir_b: profile.dir_b_pin,
        }
    }
}

/// PWM actuator driver
#[derive(Debug, Clone)]
pub struct ActuatorDriver {
    pins: ActuatorPins,
    pwm_max: u8,
    /// Last duty written
    duty: u8,
}

impl ActuatorDriver {
    /// Create a driver; call [`ActuatorDriver::init`] before use
    pub const fn new(pins: ActuatorPins) -> Self {
        Self {
            pins,
            pwm_max: PWM_MAX,
            duty: 0,
        }
    }

    /// Pins in use
    pub fn pins(&self) -> ActuatorPins {
        self.pins
    }

    /// Last duty written to the PWM pin
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// Configure pins, select forward direction, output off
    pub fn init<P: DigitalOutput + PwmOutput + ?Sized>(
        &mut self,
        port: &mut P,
    ) -> Result<(), ActuatorError> {
        port.pin_mode(self.pins.pwm, PinMode::Output)?;
        port.pin_mode(self.pins.dir_a, PinMode::Output)?;
        port.pin_mode(self.pins.dir_b, PinMode::Output)?;

        port.set_high(self.pins.dir_a)?;
        port.set_low(self.pins.dir_b)?;
        port.pwm_write(self.pins.pwm, 0)?;
        self.duty = 0;
        Ok(())
    }

    /// Map a percentage to a duty cycle
    ///
    /// The percentage is clamped to `0..=100` (non-finite counts as 0),
    /// then truncated: `duty = pwm_max * pct / 100`.
    pub fn duty_for(&self, percentage: f64) -> i32 {
        let pct = if percentage.is_finite() {
            percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        (f64::from(self.pwm_max) * (pct / 100.0)) as i32
    }

    /// Drive the output at `percentage` and return the duty written
    pub fn apply<P: PwmOutput + ?Sized>(
        &mut self,
        port: &mut P,
        percentage: f64,
    ) -> Result<u8, ActuatorError> {
        let duty = self.duty_for(percentage);
        if !(0..=i32::from(self.pwm_max)).contains(&duty) {
            return Err(ActuatorError::OutOfRange { duty });
        }

        let duty = duty as u8;
        port.pwm_write(self.pins.pwm, duty)?;
        self.duty = duty;
        Ok(duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBoard;
    use thermion_hal::Level;

    fn driver() -> ActuatorDriver {
        ActuatorDriver::new(ActuatorPins::from(&Profile::default()))
    }

    #[test]
    fn test_init_selects_forward() {
        let mut board = MockBoard::new();
        board.pwm = Some(200);
        let mut act = driver();

        act.init(&mut board).unwrap();
        assert_eq!(board.level(7), Some(Level::High));
        assert_eq!(board.level(8), Some(Level::Low));
        assert_eq!(board.pwm, Some(0));
        assert!(board.is_output(6));
    }

    #[test]
    fn test_percentage_mapping() {
        let act = driver();
        assert_eq!(act.duty_for(0.0), 0);
        assert_eq!(act.duty_for(50.0), 127);
        assert_eq!(act.duty_for(100.0), 255);
    }

    #[test]
    fn test_clamps_out_of_range_percentages() {
        let act = driver();
        assert_eq!(act.duty_for(-20.0), 0);
        assert_eq!(act.duty_for(20_000.0), 255);
        assert_eq!(act.duty_for(f64::NAN), 0);
        assert_eq!(act.duty_for(f64::INFINITY), 0);
    }

    #[test]
    fn test_apply_writes_duty() {
        let mut board = MockBoard::new();
        let mut act = driver();

        assert_eq!(act.apply(&mut board, 100.0), Ok(255));
        assert_eq!(board.pwm, Some(255));
        assert_eq!(act.duty(), 255);

        assert_eq!(act.apply(&mut board, 0.0), Ok(0));
        assert_eq!(board.pwm, Some(0));
    }

    #[test]
    fn test_unknown_pin_reported() {
        let mut board = MockBoard::new();
        let mut act = ActuatorDriver::new(ActuatorPins {
            pwm: 99,
            dir_a: 7,
            dir_b: 8,
        });

        assert_eq!(
            act.apply(&mut board, 10.0),
            Err(ActuatorError::Port(PortError::UnknownPin(99)))
        );
        assert_eq!(act.duty(), 0);
    }
}
