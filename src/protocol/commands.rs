//! Module `commands`
//!
//! Defines the FTP commands the client sends on the control channel and
//! their wire representation.

use std::fmt;

use crate::transfer::TransferMode;

/// Represents an FTP command issued by the client.
///
/// Commands that carry an argument store it as a `String` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    User(String),
    Pass(String),
    Type(TransferMode),
    Pasv,
    List,
    Retr(String),
    Stor(String),
    Dele(String),
    Mkd(String),
    Rmd(String),
    Pwd,
    Cwd(String),
    Help,
    Stat,
    Quit,
}

impl Command {
    /// The command verb as sent on the wire.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::User(_) => "USER",
            Command::Pass(_) => "PASS",
            Command::Type(_) => "TYPE",
            Command::Pasv => "PASV",
            Command::List => "LIST",
            Command::Retr(_) => "RETR",
            Command::Stor(_) => "STOR",
            Command::Dele(_) => "DELE",
            Command::Mkd(_) => "MKD",
            Command::Rmd(_) => "RMD",
            Command::Pwd => "PWD",
            Command::Cwd(_) => "CWD",
            Command::Help => "HELP",
            Command::Stat => "STAT",
            Command::Quit => "QUIT",
        }
    }

    fn argument(&self) -> Option<&str> {
        match self {
            Command::User(arg)
            | Command::Pass(arg)
            | Command::Retr(arg)
            | Command::Stor(arg)
            | Command::Dele(arg)
            | Command::Mkd(arg)
            | Command::Rmd(arg)
            | Command::Cwd(arg) => Some(arg),
            Command::Type(mode) => Some(mode.type_code()),
            _ => None,
        }
    }

    /// Line suitable for logs; the password is masked.
    pub fn redacted(&self) -> String {
        match self {
            Command::Pass(_) => "PASS ****".to_string(),
            other => other.to_string(),
        }
    }
}

/// Formats the command line without its terminator.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument() {
            Some(arg) => write!(f, "{} {}", self.verb(), arg),
            None => f.write_str(self.verb()),
        }
    }
}
