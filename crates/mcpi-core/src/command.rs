//! Wire encoding for commands
//!
//! Every request is one ASCII line: `name(arg1,arg2,...)\n`.

use crate::value::{Value, flatten};

/// Line terminator for requests and responses
pub const LINE_TERMINATOR: char = '\n';

/// Namespace of high-frequency polling commands that are not traced on send
pub const QUIET_PREFIX: &str = "events.";

/// Build the request line for a command, terminator included
pub fn encode_command(command: &str, args: &[Value]) -> String {
    format!("{}({}){}", command, flatten(args), LINE_TERMINATOR)
}

/// Encode text one byte per character, replacing non-ASCII characters with `?`
pub fn to_ascii_bytes(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

/// Whether sends of this command should stay out of the trace log
pub fn is_quiet(command: &str) -> bool {
    command.starts_with(QUIET_PREFIX)
}
