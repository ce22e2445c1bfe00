//! FTP Protocol implementation
//!
//! Handles command formatting, reply decoding and passive address parsing.

pub mod commands;
pub mod passive;
pub mod reply;
pub mod responses;

pub use commands::Command;
pub use passive::PassiveEndpoint;
pub use reply::{Reply, ReplyReader};
