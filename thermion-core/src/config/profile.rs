//! Control profile
//!
//! Every user-tunable constant and flag. Stored in flash as one
//! postcard-encoded block (see [`super::persist`]).

use serde::{Deserialize, Serialize};

use thermion_hal::PinId;

/// Complete controller profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Profile {
    /// Thermistor ADC input
    pub adc_pin: PinId,
    /// H-bridge PWM (enable) pin
    pub pwm_pin: PinId,
    /// H-bridge direction input A (held high)
    pub dir_a_pin: PinId,
    /// H-bridge direction input B (held low)
    pub dir_b_pin: PinId,
    /// ADC full-scale count
    pub adc_max: u16,

    /// Divider reference resistor (ohms)
    pub ref_resistor: f64,
    /// Thermistor resistance at the nominal temperature (ohms)
    pub nominal_resistance: f64,
    /// Nominal temperature (°C)
    pub nominal_temp_c: f64,
    /// Beta coefficient (K)
    pub beta: f64,

    /// Trailing-average weight, 1 = no smoothing
    pub denoise_order: u8,
    /// Maximum admitted change per temperature tick (°C)
    pub slew_limit_c: f64,

    pub kp: f64,
    pub ki: f64,
    pub kd: f64,

    /// Target temperature (°C)
    pub setpoint_c: f64,

    /// Start the control loop at boot
    pub autorun: bool,
    /// Stream samples for a serial plotter while running
    pub plot: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            adc_pin: 26,
            pwm_pin: 6,
            dir_a_pin: 7,
            dir_b_pin: 8,
            adc_max: 1023,
            ref_resistor: 9960.0,
            nominal_resistance: 10_000.0,
            nominal_temp_c: 25.0,
            // beta_from_points(62.0, 3324.33, 5.5, 20274.66)
            beta: 2988.64,
            denoise_order: 8,
            slew_limit_c: 1.0,
            kp: 500.0,
            ki: 10.0,
            kd: 100.0,
            setpoint_c: 60.0,
            autorun: false,
            plot: false,
        }
    }
}

impl Profile {
    /// Replace every field with its default
    pub fn restore_defaults(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_defaults_replaces_everything() {
        let mut profile = Profile {
            adc_pin: 1,
            kp: 1.0,
            setpoint_c: 99.0,
            denoise_order: 1,
            autorun: true,
            plot: true,
            ..Default::default()
        };

        profile.restore_defaults();
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn test_default_matches_board() {
        let profile = Profile::default();
        assert_eq!(profile.adc_max, 1023);
        assert_eq!(profile.kp, 500.0);
        assert!(profile.denoise_order >= 1);
        assert!(!profile.autorun);
    }
}
