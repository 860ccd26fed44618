//! PID controller
//!
//! Floating-point PID producing an unclamped output in percent. Clamping
//! happens in the actuator path.
//!
//! Two properties are kept as the deployed firmware behaves:
//! - the step time is measured from the start to the end of the same
//!   invocation, so it is near zero and the integral grows very slowly;
//! - `previous_temp` is set to 25 °C on reset and never updated, so the
//!   derivative term is taken against that constant rather than the last
//!   sample.

use thermion_hal::Clock;

use crate::config::Profile;

/// Temperature `previous_temp` is reset to (°C)
pub const PID_INITIAL_TEMP_C: f64 = 25.0;

/// PID gains
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidGains {
    /// Proportional gain (Kp)
    pub kp: f64,
    /// Integral gain (Ki)
    pub ki: f64,
    /// Derivative gain (Kd)
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }
}

impl From<&Profile> for PidGains {
    fn from(profile: &Profile) -> Self {
        Self::new(profile.kp, profile.ki, profile.kd)
    }
}

/// PID controller state and last computed terms
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PidController {
    /// Last error (setpoint - current)
    pub error: f64,
    /// Proportional term
    pub p: f64,
    /// Integral accumulator
    pub i: f64,
    /// Derivative term
    pub d: f64,
    /// P + I + D
    pub output: f64,
    /// Derivative reference temperature
    pub previous_temp: f64,
    /// Measured step time of the last invocation (s)
    pub elapsed_s: f64,
}

impl Default for PidController {
    fn default() -> Self {
        Self::new()
    }
}

impl PidController {
    pub const fn new() -> Self {
        Self {
            error: 0.0,
            p: 0.0,
            i: 0.0,
            d: 0.0,
            output: 0.0,
            previous_temp: PID_INITIAL_TEMP_C,
            elapsed_s: 0.0,
        }
    }

    /// Reset every term, as on a Stopped -> Running transition
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Run one step, timing it with `clock`
    pub fn step<C: Clock + ?Sized>(
        &mut self,
        gains: PidGains,
        setpoint: f64,
        current: f64,
        clock: &C,
    ) -> f64 {
        let started_ms = clock.now_ms();
        let error = setpoint - current;
        let elapsed_ms = clock.now_ms().saturating_sub(started_ms);

        self.update(gains, error, current, elapsed_ms as f64 / 1000.0)
    }

    /// Run one step with an explicit step time in seconds
    pub fn step_with_delta(
        &mut self,
        gains: PidGains,
        setpoint: f64,
        current: f64,
        delta_s: f64,
    ) -> f64 {
        self.update(gains, setpoint - current, current, delta_s)
    }

    fn update(&mut self, gains: PidGains, error: f64, current: f64, delta_s: f64) -> f64 {
        self.error = error;
        self.elapsed_s = delta_s;

        self.p = self.error * gains.kp;
        self.i += self.error * gains.ki * delta_s;
        self.d = (self.previous_temp - current) * gains.kd;

        self.output = self.p + self.i + self.d;
        self.output
    }
}
