//! Serial command terminal
//!
//! Line editing with echo, a prefix-matched command table, and a
//! formatting adapter for replies.

pub mod commands;
pub mod console;
pub mod editor;

pub use commands::{parse, Command, COMMANDS};
pub use console::{Console, EOL};
pub use editor::{Line, LineEditor, ProtocolError, LINE_CAPACITY, PROMPT};
