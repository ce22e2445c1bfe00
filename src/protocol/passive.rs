//! Passive mode address decoding
//!
//! Extracts the data endpoint from a `227` reply such as
//! `Entering Passive Mode (192,168,1,6,82,110).`

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{FtpError, FtpResult};

static PASV_ADDR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3}),(\d{1,3})(?:\D|$)")
        .expect("invalid passive address regex")
});

/// Server-advertised data endpoint for one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassiveEndpoint {
    pub host: String,
    pub port: u16,
}

impl PassiveEndpoint {
    /// Parses the six comma-separated numbers out of a reply message.
    pub fn parse(message: &str) -> FtpResult<PassiveEndpoint> {
        let captures = PASV_ADDR_RE
            .captures(message)
            .ok_or_else(|| FtpError::AddressParse(message.to_string()))?;

        let mut numbers = [0u8; 6];
        for (slot, group) in numbers.iter_mut().zip(captures.iter().skip(1)) {
            let text = group.map(|m| m.as_str()).unwrap_or_default();
            *slot = text
                .parse::<u8>()
                .map_err(|_| FtpError::AddressParse(message.to_string()))?;
        }

        let host = numbers[..4]
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".");
        let port = u16::from(numbers[4]) << 8 | u16::from(numbers[5]);

        Ok(PassiveEndpoint { host, port })
    }
}

impl fmt::Display for PassiveEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
