//! Serial byte-stream abstraction
//!
//! The terminal is polled from the cooperative scheduler, so reads never
//! wait: callers check [`SerialPort::available`] first and drain only what
//! is already buffered.

/// Non-blocking serial port
pub trait SerialPort {
    /// Error type for transmit operations
    type Error;

    /// Number of received bytes ready to be read without waiting
    fn available(&mut self) -> usize;

    /// Take one received byte, if any
    fn read_byte(&mut self) -> Option<u8>;

    /// Write data to the port
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write a string to the port
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write(s.as_bytes())
    }
}

/// Serial line configuration
#[derive(Debug, Clone, Copy)]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baudrate: 115200 }
    }
}
