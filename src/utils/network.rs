//! Network utilities
//!
//! Provides network-related utility functions.

use std::net::IpAddr;

/// Builds a `host:port` address, bracketing IPv6 literals.
pub fn join_host_port(host: &str, port: u16) -> String {
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V6(_)) => format!("[{}]:{}", host, port),
        _ => format!("{}:{}", host, port),
    }
}

/// Parses a port typed by the user.
pub fn parse_port(input: &str) -> Option<u16> {
    input.trim().parse::<u16>().ok().filter(|port| *port != 0)
}
