//! Transfer result types
//!
//! Defines the values exchanged between a session and its data task.

use crate::error::DataChannelError;

/// Values reported by the data task, in order: `Connected` or `Failed`
/// for the dial, then one final value after the go signal.
#[derive(Debug)]
pub enum DataEvent {
    Connected,
    Received(Vec<u8>),
    Sent(usize),
    Failed(DataChannelError),
}

impl DataEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            DataEvent::Connected => "connected",
            DataEvent::Received(_) => "received",
            DataEvent::Sent(_) => "sent",
            DataEvent::Failed(_) => "failed",
        }
    }
}

/// Go/no-go decision sent to the data task once the triggering command
/// has been answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    Go,
    Abort(String),
}

/// Product of a completed transfer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferOutput {
    Received(Vec<u8>),
    Sent(usize),
}
