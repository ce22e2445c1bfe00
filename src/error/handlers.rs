//! Error handlers
//!
//! Provides error reporting and classification for callers of the session.

use crate::error::types::FtpError;
use log::{error, warn};

/// Log an FTP client error
pub fn handle_error(err: &FtpError) {
    match err {
        FtpError::UnexpectedStatus { .. } | FtpError::NotReady(_) => {
            warn!("FTP command rejected: {}", err)
        }
        _ => error!("FTP Client Error: {}", err),
    }
}

/// Whether the error leaves the control connection unusable.
///
/// Server rejections and data channel failures keep the session alive;
/// control channel I/O failures do not.
pub fn closes_session(err: &FtpError) -> bool {
    match err {
        FtpError::Connect { .. }
        | FtpError::Write(_)
        | FtpError::Read(_)
        | FtpError::ConnectionClosed
        | FtpError::NotConnected => true,
        _ => false,
    }
}
