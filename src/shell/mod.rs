//! Interactive shell
//!
//! Collects the connection details, logs in, then reads commands until
//! `quit` or end of input.

pub mod commands;
pub mod context;
pub mod handlers;
pub mod input;

use std::io::Write;
use std::path::PathBuf;

use log::{info, warn};

use crate::client::FtpSession;
use crate::config::ClientConfig;
use crate::error::FtpResult;
use crate::error::handlers::handle_error;
use crate::storage::LocalFileStore;
use crate::utils::network::{join_host_port, parse_port};

pub use commands::{CommandResult, CommandStatus, ShellCommand, parse_command};
pub use context::AppContext;
pub use handlers::execute;
pub use input::{LineSource, StdinSource, default_input, input_required};

/// Connection details gathered at startup.
struct Login {
    address: String,
    username: String,
    password: String,
}

/// Prompts for whatever the configuration leaves open.
///
/// The password goes through `LineSource::read_secret`; whether it is
/// echoed depends on the source.
async fn prompt_login<L: LineSource>(
    config: &ClientConfig,
    source: &mut L,
    out: &mut impl Write,
) -> Option<Login> {
    let host = match &config.host {
        Some(host) => default_input(source, "Host", host).await?,
        None => input_required(source, "Host: ").await?,
    };

    let default_port = config.port.to_string();
    let port = loop {
        let input = default_input(source, "Port", &default_port).await?;
        match parse_port(&input) {
            Some(port) => break port,
            None => {
                let _ = writeln!(out, "Invalid port: {}", input);
            }
        }
    };

    let username = match &config.username {
        Some(username) => username.clone(),
        None => input_required(source, "Username: ").await?,
    };
    let password = source.read_secret("Password: ").await.unwrap_or_default();

    Some(Login {
        address: join_host_port(&host, port),
        username,
        password,
    })
}

/// Runs the shell until the user quits or input ends.
///
/// Connection and login failures are returned; failures of individual
/// commands are printed and the loop continues.
pub async fn run<L, F, W>(
    config: &ClientConfig,
    source: &mut L,
    store: F,
    out: &mut W,
) -> FtpResult<()>
where
    L: LineSource,
    F: LocalFileStore,
    W: Write,
{
    let Some(login) = prompt_login(config, source, out).await else {
        info!("Input ended before a connection was made");
        return Ok(());
    };

    let (mut session, greeting) = FtpSession::connect(&login.address).await?;
    let _ = writeln!(out, "{}", greeting);

    match session.authenticate(&login.username, &login.password).await {
        Ok(message) => {
            let _ = writeln!(out, "{}", message);
        }
        Err(e) => {
            handle_error(&e);
            session.disconnect().await?;
            return Err(e);
        }
    }

    if let Err(e) = session.set_mode(config.transfer_mode).await {
        warn!("Could not switch to {} mode: {}", config.transfer_mode, e);
    }

    let local_dir = match &config.local_dir {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    };
    let mut ctx = AppContext::new(session, local_dir, store);

    while let Some(line) = source.read_line(&config.prompt).await {
        let result = execute(&mut ctx, parse_command(&line)).await;
        if let Some(message) = &result.message {
            let _ = writeln!(out, "{}", message);
        }
        if result.status == CommandStatus::CloseConnection {
            break;
        }
    }

    if ctx.session().is_connected() {
        if let Err(e) = ctx.session_mut().quit().await {
            warn!("QUIT at end of input failed: {}", e);
        }
    }
    Ok(())
}
