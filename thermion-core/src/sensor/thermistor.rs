//! NTC thermistor conversion
//!
//! Circuit: VCC -- NTC -- ADC_PIN -- R_ref -- GND (reversed divider).
//! Temperature uses the Beta form of the Steinhart-Hart equation, computed
//! in `f64` so a reading at the nominal resistance maps back to the
//! nominal temperature exactly.

use crate::config::Profile;

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

/// Errors that can occur while converting a thermistor reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Resistance was non-finite or not positive
    NonFiniteResistance,
    /// Temperature came out non-finite
    NonFiniteTemperature,
    /// ADC port reported an error
    AdcRead,
}

/// One converted thermistor sample, before denoising
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Raw ADC count after clamping to >= 1
    pub adc: u16,
    /// Thermistor resistance in ohms
    pub resistance: f64,
    /// Temperature in °C
    pub celsius: f64,
}

/// Convert an ADC count to thermistor resistance
///
/// `R = R_ref * (adc_max / adc - 1)`. Returns infinity for `adc == 0`;
/// callers clamp the raw count to at least 1.
pub fn resistance_from_adc(ref_resistor: f64, adc_value: u16, adc_max: u16) -> f64 {
    ref_resistor * (f64::from(adc_max) / f64::from(adc_value) - 1.0)
}

/// Convert thermistor resistance to °C with the Beta method
///
/// `T = 1 / (ln(R/R0)/B + 1/T0) - 273.15`
pub fn celsius_from_resistance(
    resistance: f64,
    nominal_resistance: f64,
    nominal_temp_c: f64,
    beta: f64,
) -> f64 {
    let mut value = resistance / nominal_resistance; // R/R0
    value = libm::log(value); // ln(R/R0)
    value /= beta; // 1/B * ln(R/R0)
    value += 1.0 / (nominal_temp_c + KELVIN_OFFSET); // + 1/T0
    value = 1.0 / value;
    value - KELVIN_OFFSET
}

/// Derive a Beta coefficient from two calibration points
///
/// Temperatures in °C, resistances in ohms.
pub fn beta_from_points(t1_c: f64, r1: f64, t2_c: f64, r2: f64) -> f64 {
    let t1 = t1_c + KELVIN_OFFSET;
    let t2 = t2_c + KELVIN_OFFSET;
    libm::log(r1 / r2) / ((1.0 / t1) - (1.0 / t2))
}

/// Convert a raw ADC count into a checked reading using the profile's model
pub fn sample_temperature(adc_value: u16, profile: &Profile) -> Result<Reading, SensorError> {
    let adc = adc_value.max(1);
    let resistance = resistance_from_adc(profile.ref_resistor, adc, profile.adc_max);
    if !resistance.is_finite() || resistance <= 0.0 {
        return Err(SensorError::NonFiniteResistance);
    }

    let celsius = celsius_from_resistance(
        resistance,
        profile.nominal_resistance,
        profile.nominal_temp_c,
        profile.beta,
    );
    if !celsius.is_finite() {
        return Err(SensorError::NonFiniteTemperature);
    }

    Ok(Reading {
        adc,
        resistance,
        celsius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_nominal_resistance_is_fixed_point() {
        let t = celsius_from_resistance(10_000.0, 10_000.0, 25.0, 2988.64);
        assert_eq!(t, 25.0);
    }

    #[test]
    fn test_reference_scenario() {
        let r = resistance_from_adc(9960.0, 512, 1023);
        assert!((r - 9940.546875).abs() < 1e-6);

        let t = celsius_from_resistance(r, 10_000.0, 25.0, 2988.64);
        assert!((t - 25.18).abs() < 0.01);
    }

    #[test]
    fn test_beta_from_calibration_points() {
        let beta = beta_from_points(62.0, 3324.33, 5.5, 20274.66);
        assert!((beta - 2988.64).abs() < 0.01);
    }

    #[test]
    fn test_zero_adc_is_clamped() {
        let reading = sample_temperature(0, &Profile::default()).unwrap();
        assert_eq!(reading.adc, 1);
        assert!(reading.resistance.is_finite());
    }

    #[test]
    fn test_full_scale_is_sensor_fault() {
        // R = 0 at full scale: shorted thermistor
        let profile = Profile::default();
        let result = sample_temperature(profile.adc_max, &profile);
        assert_eq!(result, Err(SensorError::NonFiniteResistance));
    }

    #[test]
    fn test_above_full_scale_is_sensor_fault() {
        let profile = Profile::default();
        let result = sample_temperature(profile.adc_max + 200, &profile);
        assert_eq!(result, Err(SensorError::NonFiniteResistance));
    }

    #[test]
    fn test_hotter_means_lower_resistance() {
        let cold = celsius_from_resistance(20_000.0, 10_000.0, 25.0, 2988.64);
        let hot = celsius_from_resistance(5_000.0, 10_000.0, 25.0, 2988.64);
        assert!(cold < 25.0);
        assert!(hot > 25.0);
    }

    proptest! {
        #[test]
        fn prop_resistance_decreases_with_adc(adc in 1u16..1023) {
            let lower = resistance_from_adc(9960.0, adc, 1023);
            let higher = resistance_from_adc(9960.0, adc + 1, 1023);
            prop_assert!(higher < lower);
        }

        #[test]
        fn prop_nominal_point_any_model(
            r0 in 100.0f64..1_000_000.0,
            t0 in -40.0f64..150.0,
            beta in 1000.0f64..5000.0,
        ) {
            let t = celsius_from_resistance(r0, r0, t0, beta);
            prop_assert!((t - t0).abs() < 1e-9);
        }
    }
}
