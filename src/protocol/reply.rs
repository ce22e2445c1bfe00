//! Reply parsing
//!
//! Decodes numeric-coded server replies, including multi-line replies of
//! the form:
//!
//! ```text
//! 214-The following commands are recognized:
//!  USER PASS LIST RETR
//! 214 Help OK.
//! ```

use std::fmt;

use crate::error::{FtpError, FtpResult};

/// A complete server reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    code: u16,
    message: String,
}

impl Reply {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }

    /// Parses a complete reply, single- or multi-line.
    pub fn parse(text: &str) -> FtpResult<Reply> {
        let mut reader = ReplyReader::default();
        let mut lines = text.lines();

        while let Some(line) = lines.next() {
            if let Some(reply) = reader.push_line(line)? {
                if lines.any(|rest| !rest.trim().is_empty()) {
                    return Err(FtpError::MalformedReply(text.to_string()));
                }
                return Ok(reply);
            }
        }

        Err(FtpError::MalformedReply(text.to_string()))
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Separator {
    Final,
    Continued,
}

/// Splits `ddd text` / `ddd-text` into its parts.
fn parse_code_line(line: &str) -> FtpResult<(u16, Separator, &str)> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(FtpError::MalformedReply(line.to_string()));
    }

    let code = bytes[..3]
        .iter()
        .fold(0u16, |acc, digit| acc * 10 + u16::from(digit - b'0'));

    let separator = match bytes.get(3) {
        None | Some(b' ') => Separator::Final,
        Some(b'-') => Separator::Continued,
        Some(_) => return Err(FtpError::MalformedReply(line.to_string())),
    };

    let text = line.get(4..).unwrap_or("");
    Ok((code, separator, text))
}

/// Incrementally assembles replies from control-channel lines.
#[derive(Debug, Default)]
pub struct ReplyReader {
    pending: Option<(u16, String)>,
}

impl ReplyReader {
    /// Feeds one line (its terminator may still be attached).
    ///
    /// Returns `Some(reply)` once the line completing a reply is seen.
    pub fn push_line(&mut self, line: &str) -> FtpResult<Option<Reply>> {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some((code, mut message)) = self.pending.take() else {
            let (code, separator, text) = parse_code_line(line)?;
            return Ok(match separator {
                Separator::Final => Some(Reply::new(code, text)),
                Separator::Continued => {
                    self.pending = Some((code, text.to_string()));
                    None
                }
            });
        };

        message.push('\n');
        match parse_code_line(line) {
            Ok((line_code, separator, text)) if line_code == code => {
                message.push_str(text);
                if separator == Separator::Final {
                    return Ok(Some(Reply::new(code, message)));
                }
            }
            // Free-form intermediate lines are kept verbatim.
            _ => message.push_str(line),
        }

        self.pending = Some((code, message));
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_reply() {
        let reply = Reply::parse("220 Service ready\r\n").unwrap();
        assert_eq!(reply.code(), 220);
        assert_eq!(reply.message(), "Service ready");
    }

    #[test]
    fn test_bare_code_reply() {
        let reply = Reply::parse("200\r\n").unwrap();
        assert_eq!(reply.code(), 200);
        assert_eq!(reply.message(), "");
    }

    #[test]
    fn test_malformed_leading_digits() {
        assert!(matches!(
            Reply::parse("2x0 nope\r\n"),
            Err(FtpError::MalformedReply(_))
        ));
        assert!(matches!(Reply::parse("hello"), Err(FtpError::MalformedReply(_))));
        assert!(matches!(Reply::parse("22"), Err(FtpError::MalformedReply(_))));
        assert!(matches!(Reply::parse("220xready"), Err(FtpError::MalformedReply(_))));
        assert!(matches!(Reply::parse(""), Err(FtpError::MalformedReply(_))));
    }

    #[test]
    fn test_multi_line_concatenates_all_lines() {
        for n in 1..5 {
            let mut text = String::new();
            let mut expected = Vec::new();
            text.push_str("211-Status follows\r\n");
            expected.push("Status follows".to_string());
            for i in 0..n {
                text.push_str(&format!("211-line {}\r\n", i));
                expected.push(format!("line {}", i));
            }
            text.push_str("211 End of status\r\n");
            expected.push("End of status".to_string());

            let reply = Reply::parse(&text).unwrap();
            assert_eq!(reply.code(), 211);
            assert_eq!(reply.message(), expected.join("\n"));
        }
    }

    #[test]
    fn test_multi_line_keeps_free_form_lines() {
        let text =
            "214-The following commands are recognized:\r\n USER PASS LIST\r\n214 Help OK.\r\n";
        let reply = Reply::parse(text).unwrap();
        assert_eq!(reply.code(), 214);
        assert_eq!(
            reply.message(),
            "The following commands are recognized:\n USER PASS LIST\nHelp OK."
        );
    }

    #[test]
    fn test_other_code_does_not_terminate() {
        let text = "211-Start\r\n200 not the end\r\n211 End\r\n";
        let reply = Reply::parse(text).unwrap();
        assert_eq!(reply.message(), "Start\n200 not the end\nEnd");
    }

    #[test]
    fn test_unterminated_multi_line_is_malformed() {
        assert!(matches!(
            Reply::parse("211-Start\r\n211-more\r\n"),
            Err(FtpError::MalformedReply(_))
        ));
    }

    #[test]
    fn test_reader_completes_on_final_line() {
        let mut reader = ReplyReader::default();
        assert!(reader.push_line("214-Help\r\n").unwrap().is_none());
        let reply = reader.push_line("214 Done\n").unwrap().unwrap();
        assert_eq!(reply, Reply::new(214, "Help\nDone"));

        // The next line starts a fresh reply.
        let reply = reader.push_line("200 OK\r\n").unwrap().unwrap();
        assert_eq!(reply, Reply::new(200, "OK"));
    }

    #[test]
    fn test_display_round_trips_code_and_text() {
        assert_eq!(Reply::new(550, "No such file").to_string(), "550 No such file");
    }
}
