//! Formatted text output over a serial port

use core::fmt;

use thermion_hal::SerialPort;

/// Line terminator for terminal output
pub const EOL: &str = "\r\n";

/// `core::fmt::Write` adapter over a [`SerialPort`]
///
/// Write failures are dropped: the terminal has nowhere to report them.
pub struct Console<'a, S: SerialPort + ?Sized> {
    port: &'a mut S,
}

impl<'a, S: SerialPort + ?Sized> Console<'a, S> {
    pub fn new(port: &'a mut S) -> Self {
        Self { port }
    }

    /// Write formatted text followed by [`EOL`]
    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::Write::write_fmt(self, args);
        let _ = self.port.write_str(EOL);
    }

    /// Write a literal line
    pub fn text(&mut self, s: &str) {
        let _ = self.port.write_str(s);
        let _ = self.port.write_str(EOL);
    }
}

impl<S: SerialPort + ?Sized> fmt::Write for Console<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.port.write_str(s).map_err(|_| fmt::Error)
    }
}
