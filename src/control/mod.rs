//! Control channel
//!
//! The persistent connection carrying commands and numeric replies.

pub mod channel;

pub use channel::{CommandHandle, ControlChannel};
