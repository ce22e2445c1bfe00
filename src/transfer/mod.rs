//! Transfer module for the FTP client
//!
//! Handles passive-mode data connections: the background data task, the
//! ordered exchange between it and the session, and transfer modes.

pub mod data_channel;
pub mod exchange;
pub mod modes;
pub mod results;

// Re-export key types and functions
pub use data_channel::{Direction, start_transfer};
pub use exchange::{ConnectedTransfer, PendingTransfer, RunningTransfer};
pub use modes::TransferMode;
pub use results::{DataEvent, Signal, TransferOutput};
