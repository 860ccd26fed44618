//! Transient control state

use crate::sensor::{Reading, SensorError};

use super::pid::PidController;

/// Whether the control loop drives the heater
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Stopped => "Stopped",
            RunState::Running => "Running",
        }
    }
}

/// Everything the control tasks produce and share
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    pub run_state: RunState,
    /// Last raw ADC count
    pub adc: u16,
    /// Last good thermistor resistance (ohms)
    pub resistance: f64,
    /// Last good unfiltered temperature (°C)
    pub noisy_temp: f64,
    /// Denoiser output (°C)
    pub denoised_temp: f64,
    /// Temperature the PID loop regulates (= denoised)
    pub current_temp: f64,
    /// Fault from the most recent sample, if any
    pub sensor_fault: Option<SensorError>,
    /// At least one good sample has been recorded
    pub has_reading: bool,
    pub pid: PidController,
    /// Last duty written to the actuator
    pub duty: u8,
}

impl ControlState {
    /// Record a good sample and its denoised value
    pub fn record_reading(&mut self, reading: Reading, denoised: f64) {
        self.adc = reading.adc;
        self.resistance = reading.resistance;
        self.noisy_temp = reading.celsius;
        self.denoised_temp = denoised;
        self.current_temp = denoised;
        self.sensor_fault = None;
        self.has_reading = true;
    }

    /// Temperature the loop may regulate on, `None` before the first good sample
    pub fn regulated_temp(&self) -> Option<f64> {
        self.has_reading.then_some(self.current_temp)
    }

    /// Record a faulted sample; temperatures keep their last good values
    pub fn record_fault(&mut self, adc: u16, fault: SensorError) {
        self.adc = adc;
        self.sensor_fault = Some(fault);
    }

    /// Enter Running with fresh PID state
    ///
    /// Only the PID terms are reset. Readings and the sensor fault are
    /// kept, and the denoiser is not touched.
    pub fn start(&mut self) {
        self.pid.reset();
        self.run_state = RunState::Running;
    }

    /// Enter Stopped; the caller forces the actuator off
    pub fn stop(&mut self) {
        self.run_state = RunState::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::pid::PidGains;

    #[test]
    fn test_start_resets_pid() {
        let mut state = ControlState::default();
        state
            .pid
            .step_with_delta(PidGains::new(1.0, 1.0, 1.0), 60.0, 30.0, 2.0);
        assert!(state.pid.i != 0.0);

        state.start();
        assert!(state.run_state.is_running());
        assert_eq!(state.pid.i, 0.0);
        assert_eq!(state.pid.previous_temp, 25.0);
    }

    #[test]
    fn test_start_keeps_readings() {
        let mut state = ControlState::default();
        let reading = Reading {
            adc: 512,
            resistance: 9940.5,
            celsius: 25.2,
        };
        state.record_reading(reading, 25.1);

        state.start();
        assert_eq!(state.adc, 512);
        assert_eq!(state.current_temp, 25.1);
        assert_eq!(state.regulated_temp(), Some(25.1));
    }

    #[test]
    fn test_fault_keeps_last_good_temperature() {
        let mut state = ControlState::default();
        let reading = Reading {
            adc: 512,
            resistance: 9940.5,
            celsius: 25.2,
        };
        state.record_reading(reading, 25.1);
        state.record_fault(1023, SensorError::NonFiniteResistance);

        assert_eq!(state.current_temp, 25.1);
        assert_eq!(state.noisy_temp, 25.2);
        assert_eq!(state.adc, 1023);
        assert_eq!(state.sensor_fault, Some(SensorError::NonFiniteResistance));
        assert_eq!(state.regulated_temp(), Some(25.1));
    }

    #[test]
    fn test_no_regulated_temp_before_first_reading() {
        let mut state = ControlState::default();
        state.record_fault(1023, SensorError::NonFiniteResistance);
        assert_eq!(state.regulated_temp(), None);
        assert!(!state.has_reading);
    }
}
