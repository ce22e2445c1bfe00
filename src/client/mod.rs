//! FTP session management
//!
//! The public operation surface built on the control channel and the
//! data channel coordinator.

pub mod session;
pub mod state;

pub use session::FtpSession;
pub use state::{ClientState, SessionState};
