//! Line-oriented battle protocol.
//!
//! A client drives a battle by writing one command per line to stdin; the
//! session answers with `log`, roster, `turn`, `ignored`, and `outcome`
//! lines on stdout.

pub mod format;
pub mod parser;
pub mod session;

pub use format::{log_line, roster_line, LineWriter};
pub use parser::{parse_command, Command, CommandError};
pub use session::Session;
