//! Module `channel`
//!
//! Owns the control connection and serializes the command/reply exchange:
//! a command is written, then its reply (or replies, while they are
//! preliminary) must be read before the next command can be sent.

use log::{debug, info, trace, warn};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::error::{FtpError, FtpResult};
use crate::protocol::responses::is_preliminary;
use crate::protocol::{Command, Reply, ReplyReader};
use crate::utils::validation::is_valid_argument;

/// Longest reply line accepted, terminator included.
pub const MAX_REPLY_LINE_LENGTH: usize = 8192;

/// Ticket for the command currently awaiting its reply.
#[must_use = "the reply of a sent command has to be read"]
#[derive(Debug)]
pub struct CommandHandle {
    id: u64,
    verb: &'static str,
}

impl CommandHandle {
    pub fn verb(&self) -> &'static str {
        self.verb
    }
}

#[derive(Debug)]
struct InFlight {
    id: u64,
    verb: &'static str,
}

/// A single control connection to an FTP server.
pub struct ControlChannel<S = TcpStream> {
    stream: Option<BufReader<S>>,
    in_flight: Option<InFlight>,
    next_id: u64,
    peer: String,
}

impl ControlChannel<TcpStream> {
    /// Dials the server and reads its greeting.
    ///
    /// The greeting is returned as-is; judging it is up to the caller.
    pub async fn connect(address: &str) -> FtpResult<(Self, Reply)> {
        info!("Connecting to {}", address);
        let stream = TcpStream::connect(address)
            .await
            .map_err(|source| FtpError::Connect {
                address: address.to_string(),
                source,
            })?;

        let mut channel = ControlChannel::from_stream(stream, address);
        let greeting = channel.read_greeting().await?;
        debug!("Greeting from {}: {}", address, greeting);
        Ok((channel, greeting))
    }
}

impl<S> ControlChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already established stream.
    pub fn from_stream(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream: Some(BufReader::new(stream)),
            in_flight: None,
            next_id: 0,
            peer: peer.into(),
        }
    }

    /// Reads the unsolicited reply the server sends after connecting.
    pub async fn read_greeting(&mut self) -> FtpResult<Reply> {
        if let Some(pending) = &self.in_flight {
            return Err(FtpError::CommandInFlight(pending.verb.to_string()));
        }
        self.read_complete_reply().await
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Verb of the command still awaiting a reply, if any.
    pub fn in_flight(&self) -> Option<&'static str> {
        self.in_flight.as_ref().map(|pending| pending.verb)
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Writes one command line.
    pub async fn send_command(&mut self, command: &Command) -> FtpResult<CommandHandle> {
        if let Some(pending) = &self.in_flight {
            return Err(FtpError::CommandInFlight(pending.verb.to_string()));
        }
        let stream = self.stream.as_mut().ok_or(FtpError::NotConnected)?;

        let line = command.to_string();
        if !is_valid_argument(&line) {
            return Err(FtpError::Protocol(format!(
                "{} argument contains a line break",
                command.verb()
            )));
        }

        trace!("CC OUT: {}", command.redacted());
        let line = format!("{}\r\n", line);
        let writer = stream.get_mut();
        let written = match writer.write_all(line.as_bytes()).await {
            Ok(()) => writer.flush().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            warn!("Failed to send {} to {}: {}", command.verb(), self.peer, e);
            self.stream = None;
            return Err(FtpError::Write(e));
        }

        self.next_id += 1;
        let verb = command.verb();
        self.in_flight = Some(InFlight {
            id: self.next_id,
            verb,
        });

        Ok(CommandHandle {
            id: self.next_id,
            verb,
        })
    }

    /// Reads the next reply to `handle`'s command.
    ///
    /// `expected` is advisory: the reply is returned whatever its code.
    /// A preliminary (1xx) reply keeps the command in flight so the same
    /// handle can be used to read the completion reply.
    pub async fn read_reply(
        &mut self,
        handle: &CommandHandle,
        expected: &[u16],
    ) -> FtpResult<Reply> {
        match &self.in_flight {
            Some(pending) if pending.id == handle.id => {}
            _ => {
                return Err(FtpError::Protocol(format!(
                    "no reply pending for {}",
                    handle.verb
                )));
            }
        }

        let reply = match self.read_complete_reply().await {
            Ok(reply) => reply,
            Err(e) => {
                self.in_flight = None;
                return Err(e);
            }
        };

        if !expected.contains(&reply.code()) {
            debug!(
                "{} answered {} (expected one of {:?})",
                handle.verb,
                reply.code(),
                expected
            );
        }
        if !is_preliminary(reply.code()) {
            self.in_flight = None;
        }

        Ok(reply)
    }

    /// Shuts the connection down. Calling it again is a no-op.
    pub async fn close(&mut self) -> FtpResult<()> {
        self.in_flight = None;
        match self.stream.take() {
            Some(mut stream) => {
                info!("Closing control connection to {}", self.peer);
                if let Err(e) = stream.get_mut().shutdown().await {
                    debug!("Shutdown of {} reported: {}", self.peer, e);
                }
            }
            None => debug!("Control connection to {} already closed", self.peer),
        }
        Ok(())
    }

    async fn read_complete_reply(&mut self) -> FtpResult<Reply> {
        let mut reader = ReplyReader::default();
        loop {
            let line = self.next_line().await?;
            trace!("CC IN: {}", line.trim_end());
            if let Some(reply) = reader.push_line(&line)? {
                return Ok(reply);
            }
        }
    }

    async fn next_line(&mut self) -> FtpResult<String> {
        let stream = self.stream.as_mut().ok_or(FtpError::NotConnected)?;
        let mut buf = Vec::new();
        let result = stream
            .take(MAX_REPLY_LINE_LENGTH as u64)
            .read_until(b'\n', &mut buf)
            .await;

        match result {
            Ok(0) => {
                warn!("Connection to {} closed while awaiting a reply", self.peer);
                self.stream = None;
                Err(FtpError::ConnectionClosed)
            }
            Ok(n) if n >= MAX_REPLY_LINE_LENGTH && !buf.ends_with(b"\n") => {
                warn!("Reply line from {} exceeds {} bytes", self.peer, n);
                self.stream = None;
                buf.truncate(64);
                Err(FtpError::MalformedReply(format!(
                    "{}...",
                    String::from_utf8_lossy(&buf)
                )))
            }
            Ok(_) if !buf.ends_with(b"\n") => {
                warn!("Connection to {} closed mid-line", self.peer);
                self.stream = None;
                Err(FtpError::ConnectionClosed)
            }
            Ok(_) => Ok(String::from_utf8_lossy(&buf).into_owned()),
            Err(e) => {
                self.stream = None;
                Err(FtpError::Read(e))
            }
        }
    }
}
