pub mod client;
pub mod config;
pub mod control;
pub mod error;
pub mod protocol;
pub mod shell;
pub mod storage;
pub mod transfer;
pub mod utils;

pub use client::{FtpSession, SessionState};
pub use config::ClientConfig;
pub use control::ControlChannel;
pub use error::{DataChannelError, FtpError, FtpResult};
pub use protocol::Reply;
pub use transfer::TransferMode;
