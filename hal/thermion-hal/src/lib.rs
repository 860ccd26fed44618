//! Thermion Hardware Abstraction Layer
//!
//! This crate defines the hardware ports the controller core is written
//! against. Pins are addressed by numeric id, the same way the profile
//! stores them, so the core never sees chip-specific pin types.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  thermion-core (scheduler, tasks, CLI)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermion-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  thermion-firmware (RP2040 board impl)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`adc::AnalogInput`] - ADC reads
//! - [`gpio::DigitalOutput`] - Pin direction and level
//! - [`pwm::PwmOutput`] - PWM duty output
//! - [`serial::SerialPort`] - Non-blocking byte stream
//! - [`storage::NvStorage`] - Fixed-offset persistent storage
//! - [`clock::Clock`] - Monotonic millisecond counter
//! - [`Board`] - All of the above

#![no_std]
#![deny(unsafe_code)]

pub mod adc;
pub mod clock;
pub mod gpio;
pub mod pwm;
pub mod serial;
pub mod storage;

pub use adc::AnalogInput;
pub use clock::Clock;
pub use gpio::{DigitalOutput, Level, PinMode};
pub use pwm::PwmOutput;
pub use serial::SerialPort;
pub use storage::{NvStorage, StorageError};

/// Pin identifier as stored in the profile
pub type PinId = u8;

/// Errors reported by pin-addressed ports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PortError {
    /// The board has no peripheral wired to this pin id
    UnknownPin(PinId),
    /// The pin exists but does not support the requested function
    Unsupported(PinId),
    /// The peripheral reported a conversion or bus error
    Hardware,
}

/// Every capability the controller needs from a board
pub trait Board: AnalogInput + DigitalOutput + PwmOutput + SerialPort + NvStorage + Clock {}

// Blanket implementation
impl<T: AnalogInput + DigitalOutput + PwmOutput + SerialPort + NvStorage + Clock> Board for T {}
