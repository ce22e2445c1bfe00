//! Error types
//!
//! Defines the error taxonomy shared by the control channel, the data
//! channel coordinator and the session operations.

use std::fmt;
use std::io;

use crate::client::SessionState;

/// Data channel errors
///
/// Raised by the background task that owns the secondary connection and
/// delivered to the session over the transfer exchange.
#[derive(Debug)]
pub enum DataChannelError {
    Dial { endpoint: String, source: io::Error },
    Read(io::Error),
    Write(io::Error),
    Aborted(String),
    Disconnected,
}

impl fmt::Display for DataChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataChannelError::Dial { endpoint, source } => {
                write!(f, "Failed to connect to {}: {}", endpoint, source)
            }
            DataChannelError::Read(e) => write!(f, "Read failed: {}", e),
            DataChannelError::Write(e) => write!(f, "Write failed: {}", e),
            DataChannelError::Aborted(reason) => write!(f, "Transfer aborted: {}", reason),
            DataChannelError::Disconnected => {
                write!(f, "Data task ended without reporting a result")
            }
        }
    }
}

impl std::error::Error for DataChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataChannelError::Dial { source, .. } => Some(source),
            DataChannelError::Read(e) | DataChannelError::Write(e) => Some(e),
            _ => None,
        }
    }
}

/// General FTP client error
#[derive(Debug)]
pub enum FtpError {
    /// The control connection could not be opened.
    Connect { address: String, source: io::Error },
    Write(io::Error),
    Read(io::Error),
    /// The server closed the control connection in the middle of a reply.
    ConnectionClosed,
    MalformedReply(String),
    AddressParse(String),
    /// The server answered with a code the operation does not accept.
    UnexpectedStatus { code: u16, message: String },
    DataChannel(DataChannelError),
    /// A command was issued while another one still awaits its reply.
    CommandInFlight(String),
    Protocol(String),
    NotReady(SessionState),
    NotConnected,
}

impl fmt::Display for FtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FtpError::Connect { address, source } => {
                write!(f, "Failed to connect to {}: {}", address, source)
            }
            FtpError::Write(e) => write!(f, "Control channel write failed: {}", e),
            FtpError::Read(e) => write!(f, "Control channel read failed: {}", e),
            FtpError::ConnectionClosed => write!(f, "Connection closed by server"),
            FtpError::MalformedReply(line) => write!(f, "Malformed reply: {:?}", line),
            FtpError::AddressParse(text) => {
                write!(f, "No passive address found in reply: {:?}", text)
            }
            FtpError::UnexpectedStatus { code, message } => write!(f, "{} {}", code, message),
            FtpError::DataChannel(e) => write!(f, "Data channel error: {}", e),
            FtpError::CommandInFlight(verb) => {
                write!(f, "Command {} is still awaiting its reply", verb)
            }
            FtpError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
            FtpError::NotReady(state) => write!(f, "Session not ready: {}", state),
            FtpError::NotConnected => write!(f, "Not connected"),
        }
    }
}

impl std::error::Error for FtpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FtpError::Connect { source, .. } => Some(source),
            FtpError::Write(e) | FtpError::Read(e) => Some(e),
            FtpError::DataChannel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DataChannelError> for FtpError {
    fn from(error: DataChannelError) -> Self {
        FtpError::DataChannel(error)
    }
}

/// Result type for FTP client operations
pub type FtpResult<T> = Result<T, FtpError>;
