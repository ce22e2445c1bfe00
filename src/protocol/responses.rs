//! FTP Response codes
//!
//! Defines the reply codes the client accepts for each command.

/// Standard FTP response codes
pub const DATA_CONNECTION_ALREADY_OPEN: u16 = 125;
pub const FILE_STATUS_OK: u16 = 150;
pub const OK: u16 = 200;
pub const NOT_IMPLEMENTED_SUPERFLUOUS: u16 = 202;
pub const SYSTEM_STATUS: u16 = 211;
pub const DIRECTORY_STATUS: u16 = 212;
pub const FILE_STATUS: u16 = 213;
pub const HELP_MESSAGE: u16 = 214;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const TRANSFER_COMPLETE: u16 = 226;
pub const ENTERING_PASSIVE_MODE: u16 = 227;
pub const LOGIN_SUCCESS: u16 = 230;
pub const FILE_ACTION_OK: u16 = 250;
pub const PATH_CREATED: u16 = 257;
pub const PASSWORD_REQUIRED: u16 = 331;

/// Codes announcing that the server is opening the data transfer.
pub const TRANSFER_STARTING: &[u16] = &[DATA_CONNECTION_ALREADY_OPEN, FILE_STATUS_OK];

/// Codes confirming that a data transfer finished.
pub const TRANSFER_FINISHED: &[u16] = &[TRANSFER_COMPLETE, FILE_ACTION_OK];

/// Whether a reply is preliminary (1xx): the command is still in progress.
pub fn is_preliminary(code: u16) -> bool {
    (100..200).contains(&code)
}
