//! FTP session
//!
//! The operations a caller performs against a server. Simple operations
//! are one command/reply round trip; list, retrieve and store negotiate a
//! passive endpoint and run a data task alongside the control exchange.

use log::{debug, info, warn};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use crate::client::state::{ClientState, SessionState};
use crate::control::{CommandHandle, ControlChannel};
use crate::error::{FtpError, FtpResult};
use crate::protocol::responses::{
    CLOSING, DIRECTORY_STATUS, ENTERING_PASSIVE_MODE, FILE_ACTION_OK, FILE_STATUS, HELP_MESSAGE,
    LOGIN_SUCCESS, NOT_IMPLEMENTED_SUPERFLUOUS, OK, PASSWORD_REQUIRED, PATH_CREATED, READY,
    SYSTEM_STATUS, TRANSFER_FINISHED, TRANSFER_STARTING, is_preliminary,
};
use crate::protocol::{Command, PassiveEndpoint, Reply};
use crate::transfer::{Direction, TransferMode, TransferOutput, start_transfer};

/// Turns a reply with an unaccepted code into the error carrying it.
fn accept(reply: Reply, accepted: &[u16]) -> FtpResult<Reply> {
    if accepted.contains(&reply.code()) {
        Ok(reply)
    } else {
        Err(FtpError::UnexpectedStatus {
            code: reply.code(),
            message: reply.into_message(),
        })
    }
}

/// A logged-in (or logging-in) conversation with one FTP server.
pub struct FtpSession<S = TcpStream> {
    control: ControlChannel<S>,
    client: ClientState,
}

impl FtpSession<TcpStream> {
    /// Connects to `address` (`host:port`) and checks the greeting.
    ///
    /// Returns the session and the greeting message.
    pub async fn connect(address: &str) -> FtpResult<(Self, String)> {
        let (control, greeting) = ControlChannel::connect(address).await?;
        Self::from_greeting(control, greeting).await
    }
}

impl<S> FtpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Builds a session on an established control channel whose greeting
    /// has not been read yet.
    pub async fn from_control(mut control: ControlChannel<S>) -> FtpResult<(Self, String)> {
        let greeting = control.read_greeting().await?;
        Self::from_greeting(control, greeting).await
    }

    async fn from_greeting(
        mut control: ControlChannel<S>,
        greeting: Reply,
    ) -> FtpResult<(Self, String)> {
        if greeting.code() != READY {
            warn!("Server {} is not ready: {}", control.peer(), greeting);
            control.close().await?;
            return Err(FtpError::UnexpectedStatus {
                code: greeting.code(),
                message: greeting.into_message(),
            });
        }

        let message = greeting.into_message();
        let session = Self {
            control,
            client: ClientState::new(message.clone()),
        };
        Ok((session, message))
    }

    // --------------------
    // Session information
    // --------------------

    pub fn state(&self) -> SessionState {
        if self.control.is_open() {
            self.client.state()
        } else {
            SessionState::Closed
        }
    }

    pub fn is_connected(&self) -> bool {
        self.control.is_open()
    }

    pub fn username(&self) -> Option<&str> {
        self.client.username()
    }

    pub fn mode(&self) -> Option<TransferMode> {
        self.client.mode()
    }

    pub fn greeting(&self) -> &str {
        self.client.greeting()
    }

    fn ensure_open(&self) -> FtpResult<()> {
        match self.state() {
            SessionState::Closed => Err(FtpError::NotConnected),
            _ => Ok(()),
        }
    }

    fn ensure_ready(&self) -> FtpResult<()> {
        match self.state() {
            SessionState::Ready => Ok(()),
            SessionState::Closed => Err(FtpError::NotConnected),
            other => Err(FtpError::NotReady(other)),
        }
    }

    // --------------------
    // Control exchanges
    // --------------------

    /// Reads on past preliminary replies to the command's final reply.
    async fn read_final(
        &mut self,
        handle: &CommandHandle,
        mut reply: Reply,
        expected: &[u16],
    ) -> FtpResult<Reply> {
        while is_preliminary(reply.code()) {
            debug!("{} in progress: {}", handle.verb(), reply);
            reply = self.control.read_reply(handle, expected).await?;
        }
        Ok(reply)
    }

    /// Sends `command` and returns its final reply, whatever the code.
    async fn exchange(&mut self, command: Command, expected: &[u16]) -> FtpResult<Reply> {
        self.ensure_open()?;
        let handle = self.control.send_command(&command).await?;
        let reply = self.control.read_reply(&handle, expected).await?;
        self.read_final(&handle, reply, expected).await
    }

    /// Sends `command` and requires one of the `accepted` codes.
    async fn command(&mut self, command: Command, accepted: &[u16]) -> FtpResult<Reply> {
        let reply = self.exchange(command, accepted).await?;
        accept(reply, accepted)
    }

    // --------------------
    // Simple operations
    // --------------------

    /// Logs in with `USER`, then `PASS` if the server asks for it.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> FtpResult<String> {
        self.ensure_open()?;
        self.client.set_state(SessionState::Authenticating);
        self.client.set_username(Some(username.to_string()));

        match self.login(username, password).await {
            Ok(reply) => {
                info!("Logged in to {} as {}", self.control.peer(), username);
                self.client.set_state(SessionState::Ready);
                Ok(reply.into_message())
            }
            Err(e) => {
                self.client.logout();
                Err(e)
            }
        }
    }

    async fn login(&mut self, username: &str, password: &str) -> FtpResult<Reply> {
        let reply = self
            .exchange(Command::User(username.to_string()), &[LOGIN_SUCCESS])
            .await?;

        match reply.code() {
            LOGIN_SUCCESS => {
                debug!("{} logged in without a password", username);
                Ok(reply)
            }
            PASSWORD_REQUIRED => {
                self.command(
                    Command::Pass(password.to_string()),
                    &[LOGIN_SUCCESS, NOT_IMPLEMENTED_SUPERFLUOUS],
                )
                .await
            }
            _ => accept(reply, &[LOGIN_SUCCESS, PASSWORD_REQUIRED]),
        }
    }

    /// Sets the representation type with `TYPE`.
    pub async fn set_mode(&mut self, mode: TransferMode) -> FtpResult<String> {
        self.ensure_ready()?;
        let reply = self.command(Command::Type(mode), &[OK]).await?;
        self.client.set_mode(Some(mode));
        Ok(reply.into_message())
    }

    pub async fn delete(&mut self, name: &str) -> FtpResult<String> {
        self.ensure_ready()?;
        let reply = self
            .command(Command::Dele(name.to_string()), &[FILE_ACTION_OK])
            .await?;
        Ok(reply.into_message())
    }

    pub async fn make_dir(&mut self, path: &str) -> FtpResult<String> {
        self.ensure_ready()?;
        let reply = self
            .command(Command::Mkd(path.to_string()), &[PATH_CREATED])
            .await?;
        Ok(reply.into_message())
    }

    /// Removes a remote directory. Servers may require it to be empty.
    pub async fn remove_dir(&mut self, path: &str) -> FtpResult<String> {
        self.ensure_ready()?;
        let reply = self
            .command(Command::Rmd(path.to_string()), &[FILE_ACTION_OK])
            .await?;
        Ok(reply.into_message())
    }

    pub async fn current_dir(&mut self) -> FtpResult<String> {
        self.ensure_ready()?;
        let reply = self.command(Command::Pwd, &[PATH_CREATED]).await?;
        Ok(reply.into_message())
    }

    pub async fn change_dir(&mut self, path: &str) -> FtpResult<String> {
        self.ensure_ready()?;
        let reply = self
            .command(Command::Cwd(path.to_string()), &[FILE_ACTION_OK])
            .await?;
        Ok(reply.into_message())
    }

    /// Retrieves the commands the server understands.
    pub async fn help(&mut self) -> FtpResult<String> {
        let reply = self
            .command(Command::Help, &[HELP_MESSAGE, SYSTEM_STATUS])
            .await?;
        Ok(reply.into_message())
    }

    /// Retrieves the status of the server.
    pub async fn stat(&mut self) -> FtpResult<String> {
        let reply = self
            .command(Command::Stat, &[SYSTEM_STATUS, DIRECTORY_STATUS, FILE_STATUS])
            .await?;
        Ok(reply.into_message())
    }

    // --------------------
    // Data operations
    // --------------------

    /// Lists the current remote directory as raw text.
    pub async fn list(&mut self) -> FtpResult<String> {
        let bytes = received(self.transfer(Command::List, Direction::Receive).await?)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Downloads a remote file.
    pub async fn retrieve(&mut self, name: &str) -> FtpResult<Vec<u8>> {
        received(
            self.transfer(Command::Retr(name.to_string()), Direction::Receive)
                .await?,
        )
    }

    /// Uploads `contents` as `name`; returns the number of bytes sent.
    pub async fn store(&mut self, name: &str, contents: Vec<u8>) -> FtpResult<usize> {
        match self
            .transfer(Command::Stor(name.to_string()), Direction::Send(contents))
            .await?
        {
            TransferOutput::Sent(count) => Ok(count),
            TransferOutput::Received(_) => Err(FtpError::Protocol(
                "upload produced a download result".into(),
            )),
        }
    }

    async fn passive(&mut self) -> FtpResult<PassiveEndpoint> {
        let reply = self
            .command(Command::Pasv, &[ENTERING_PASSIVE_MODE])
            .await?;
        PassiveEndpoint::parse(reply.message())
    }

    async fn transfer(
        &mut self,
        command: Command,
        direction: Direction,
    ) -> FtpResult<TransferOutput> {
        self.ensure_ready()?;

        let endpoint = self.passive().await?;
        let connected = start_transfer(endpoint, direction).connected().await?;
        debug!(
            "{} will use data connection to {}",
            command.verb(),
            connected.endpoint()
        );

        let handle = match self.control.send_command(&command).await {
            Ok(handle) => handle,
            Err(e) => {
                connected.abort(format!("{} was not sent", command.verb())).await;
                return Err(e);
            }
        };

        let reply = match self.control.read_reply(&handle, TRANSFER_STARTING).await {
            Ok(reply) => reply,
            Err(e) => {
                connected.abort(format!("no reply to {}", command.verb())).await;
                return Err(e);
            }
        };

        if !TRANSFER_STARTING.contains(&reply.code()) {
            connected.abort(reply.to_string()).await;
            let reply = self.read_final(&handle, reply, TRANSFER_FINISHED).await?;
            info!("Server refused {}: {}", command.verb(), reply);
            return Err(FtpError::UnexpectedStatus {
                code: reply.code(),
                message: reply.into_message(),
            });
        }

        let data = match connected.go() {
            Ok(running) => running.finish().await,
            Err(e) => Err(e),
        };
        let confirmation = match self.control.read_reply(&handle, TRANSFER_FINISHED).await {
            Ok(reply) => self
                .read_final(&handle, reply, TRANSFER_FINISHED)
                .await
                .and_then(|reply| accept(reply, TRANSFER_FINISHED)),
            Err(e) => Err(e),
        };

        let output = data?;
        let reply = confirmation?;
        info!("{} finished: {}", command.verb(), reply);
        Ok(output)
    }

    // --------------------
    // Teardown
    // --------------------

    /// Says goodbye with `QUIT`, then closes the connection whatever the
    /// server answered.
    pub async fn quit(&mut self) -> FtpResult<String> {
        let result = self.command(Command::Quit, &[CLOSING]).await;
        self.client.logout();
        self.control.close().await?;
        result.map(Reply::into_message)
    }

    /// Closes the control connection. Calling it again does nothing.
    pub async fn disconnect(&mut self) -> FtpResult<()> {
        self.client.logout();
        self.control.close().await
    }
}

fn received(output: TransferOutput) -> FtpResult<Vec<u8>> {
    match output {
        TransferOutput::Received(bytes) => Ok(bytes),
        TransferOutput::Sent(_) => Err(FtpError::Protocol(
            "download produced an upload result".into(),
        )),
    }
}
