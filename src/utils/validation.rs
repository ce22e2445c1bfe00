//! Input validation utilities
//!
//! Checks applied to text before it is written to the control channel.

/// Whether `input` can be sent as (part of) a command line.
///
/// Line breaks would end the command early and smuggle a second one onto
/// the control channel.
pub fn is_valid_argument(input: &str) -> bool {
    !input.contains(['\r', '\n', '\0'])
}
