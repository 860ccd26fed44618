//! Board-agnostic core logic for the Thermion heater controller
//!
//! Everything except the board bindings lives here:
//!
//! - Cooperative task scheduler
//! - Thermistor conversion and denoising
//! - PID law and PWM actuator driver
//! - Control profile and its persisted form
//! - Serial command terminal
//! - The [`app::Thermostat`] tying it together over a [`thermion_hal::Board`]

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod scheduler;
pub mod sensor;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;

pub use app::Thermostat;
pub use error::Fault;
