//! Temperature acquisition
//!
//! ADC counts to resistance to °C, then denoising.

pub mod denoise;
pub mod thermistor;

pub use denoise::Denoiser;
pub use thermistor::{
    beta_from_points, celsius_from_resistance, resistance_from_adc, sample_temperature, Reading,
    SensorError, KELVIN_OFFSET,
};
