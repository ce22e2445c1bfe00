//! FTP Transfer modes
//!
//! Representation types negotiated with `TYPE`.

use serde::Deserialize;
use std::fmt;

/// FTP transfer modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferMode {
    /// Newline-normalizing text transfer (`TYPE A`).
    Ascii,
    /// Byte-exact transfer (`TYPE I`).
    #[default]
    Binary,
}

impl TransferMode {
    /// Argument of the `TYPE` command.
    pub fn type_code(&self) -> &'static str {
        match self {
            TransferMode::Ascii => "A",
            TransferMode::Binary => "I",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferMode::Ascii => f.write_str("ascii"),
            TransferMode::Binary => f.write_str("binary"),
        }
    }
}
