//! Line editor over a serial byte stream
//!
//! Polled once per terminal tick. Bytes are drained only while no
//! completed line is waiting for dispatch, so a fast sender cannot
//! overwrite a command before it runs; the UART buffer absorbs the rest.

use heapless::Vec;

use thermion_hal::SerialPort;

/// Input line capacity in bytes
pub const LINE_CAPACITY: usize = 64;

/// Prompt printed before each command
pub const PROMPT: &str = ">> ";

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Terminal protocol errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Line exceeded [`LINE_CAPACITY`]; the command was discarded
    Overflow,
    /// No command matches the first word
    UnknownCommand,
}

/// A completed input line
pub type Line = Vec<u8, LINE_CAPACITY>;

/// Line editor state
#[derive(Debug, Clone)]
pub struct LineEditor {
    /// Bytes of the line being typed
    input: Line,
    /// Bytes were dropped from the line being typed
    overflowed: bool,
    /// Completed line awaiting dispatch
    command: Line,
    /// The completed line had overflowed
    command_overflowed: bool,
    /// A completed line is waiting for dispatch
    pending: bool,
    /// Prompt must be printed on the next poll
    needs_prompt: bool,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LineEditor {
    /// Create an editor that prompts on its first poll
    pub const fn new() -> Self {
        Self {
            input: Vec::new(),
            overflowed: false,
            command: Vec::new(),
            command_overflowed: false,
            pending: false,
            needs_prompt: true,
        }
    }

    /// Bytes typed so far on the current line
    pub fn input(&self) -> &[u8] {
        &self.input
    }

    /// Whether a completed line awaits dispatch
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Print the prompt if armed, then drain available input
    pub fn poll<S: SerialPort + ?Sized>(&mut self, port: &mut S) {
        if self.needs_prompt {
            let _ = port.write_str(PROMPT);
            self.needs_prompt = false;
        }

        while !self.pending && port.available() > 0 {
            match port.read_byte() {
                Some(byte) => self.feed(byte, port),
                None => break,
            }
        }
    }

    /// Process one input byte, echoing to `port`
    pub fn feed<S: SerialPort + ?Sized>(&mut self, byte: u8, port: &mut S) {
        match byte {
            b'\n' | b'\r' => {
                if !self.input.is_empty() {
                    let _ = port.write(b"\r\n");
                    self.complete_line();
                }
            }
            BACKSPACE | DELETE => {
                self.input.pop();
            }
            b' ' => {
                if self.input.last().is_some_and(|&last| last != b' ') {
                    self.append(byte, port);
                }
            }
            _ => self.append(byte, port),
        }
    }

    fn append<S: SerialPort + ?Sized>(&mut self, byte: u8, port: &mut S) {
        if self.input.push(byte).is_ok() {
            let _ = port.write(&[byte]);
        } else {
            self.overflowed = true;
        }
    }

    fn complete_line(&mut self) {
        self.command.clear();
        // Same capacity, cannot fail
        let _ = self.command.extend_from_slice(&self.input);
        self.command_overflowed = self.overflowed;
        self.input.clear();
        self.overflowed = false;
        self.pending = true;
    }

    /// The completed line, if one is pending
    ///
    /// Stays pending until [`LineEditor::finish`] is called.
    pub fn take_command(&self) -> Option<Result<Line, ProtocolError>> {
        if !self.pending {
            return None;
        }
        if self.command_overflowed {
            Some(Err(ProtocolError::Overflow))
        } else {
            Some(Ok(self.command.clone()))
        }
    }

    /// Close out a dispatched command: blank line, release input, re-arm prompt
    pub fn finish<S: SerialPort + ?Sized>(&mut self, port: &mut S) {
        let _ = port.write(b"\r\n");
        self.command.clear();
        self.command_overflowed = false;
        self.pending = false;
        self.needs_prompt = true;
    }
}
