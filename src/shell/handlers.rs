//! Command handlers for the shell.
//!
//! Each handler runs one shell command against the session or the local
//! file store and turns the outcome into a `CommandResult` for printing.

use log::info;

use crate::error::FtpError;
use crate::error::handlers::{closes_session, handle_error};
use crate::shell::commands::{CommandResult, CommandStatus, ShellCommand, USAGE};
use crate::shell::context::AppContext;
use crate::storage::LocalFileStore;
use crate::transfer::TransferMode;

/// Dispatches a parsed shell command to its handler.
pub async fn execute<F: LocalFileStore>(
    ctx: &mut AppContext<F>,
    command: ShellCommand,
) -> CommandResult {
    match command {
        ShellCommand::Quit => handle_quit(ctx).await,
        ShellCommand::List => reply(ctx.session_mut().list().await),
        ShellCommand::ChangeDir(path) => reply(ctx.session_mut().change_dir(&path).await),
        ShellCommand::CurrentDir => reply(ctx.session_mut().current_dir().await),
        ShellCommand::MakeDir(path) => reply(ctx.session_mut().make_dir(&path).await),
        ShellCommand::RemoveDir(path) => reply(ctx.session_mut().remove_dir(&path).await),
        ShellCommand::Touch(name) => handle_touch(ctx, &name).await,
        ShellCommand::Cat(name) => handle_cat(ctx, &name).await,
        ShellCommand::Delete(name) => reply(ctx.session_mut().delete(&name).await),
        ShellCommand::Get { remote, local } => handle_get(ctx, &remote, &local).await,
        ShellCommand::Send { local, remote } => handle_send(ctx, &local, &remote).await,
        ShellCommand::Mode(mode) => handle_mode(ctx, mode).await,
        ShellCommand::Help => reply(ctx.session_mut().help().await),
        ShellCommand::Stat => reply(ctx.session_mut().stat().await),
        ShellCommand::LocalDir => CommandResult::success(ctx.local_dir().display().to_string()),
        ShellCommand::LocalList => handle_local_list(ctx).await,
        ShellCommand::LocalChangeDir(path) => match ctx.change_local_dir(&path).await {
            Ok(dir) => CommandResult::success(dir.display().to_string()),
            Err(message) => CommandResult::failure(message),
        },
        ShellCommand::Usage => CommandResult::success(USAGE),
        ShellCommand::Empty => CommandResult::silent(),
        ShellCommand::MissingArguments {
            command,
            required,
            given,
        } => CommandResult::failure(format!(
            "{} requires {} argument(s).  Arguments given: {}",
            command, required, given
        )),
        ShellCommand::Unknown(word) => CommandResult::failure(format!("Unknown command: {}", word)),
    }
}

/// Maps a session error to a result, closing the shell if the control
/// connection is gone.
fn from_error(err: FtpError) -> CommandResult {
    handle_error(&err);
    let message = err.to_string();
    if closes_session(&err) {
        CommandResult {
            status: CommandStatus::CloseConnection,
            message: Some(message),
        }
    } else {
        CommandResult::failure(message)
    }
}

fn reply(result: Result<String, FtpError>) -> CommandResult {
    match result {
        Ok(message) => CommandResult::success(message),
        Err(e) => from_error(e),
    }
}

async fn handle_quit<F: LocalFileStore>(ctx: &mut AppContext<F>) -> CommandResult {
    let message = match ctx.session_mut().quit().await {
        Ok(message) => message,
        Err(e) => {
            handle_error(&e);
            e.to_string()
        }
    };
    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(message),
    }
}

async fn handle_touch<F: LocalFileStore>(ctx: &mut AppContext<F>, name: &str) -> CommandResult {
    match ctx.session_mut().store(name, Vec::new()).await {
        Ok(_) => CommandResult::success(format!("Created {}", name)),
        Err(e) => from_error(e),
    }
}

async fn handle_cat<F: LocalFileStore>(ctx: &mut AppContext<F>, name: &str) -> CommandResult {
    match ctx.session_mut().retrieve(name).await {
        Ok(bytes) => CommandResult::success(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => from_error(e),
    }
}

async fn handle_get<F: LocalFileStore>(
    ctx: &mut AppContext<F>,
    remote: &str,
    local: &str,
) -> CommandResult {
    let bytes = match ctx.session_mut().retrieve(remote).await {
        Ok(bytes) => bytes,
        Err(e) => return from_error(e),
    };

    let path = ctx.resolve(local);
    match ctx.store().write_file(&path, &bytes).await {
        Ok(()) => {
            info!("Downloaded {} to {}", remote, path.display());
            CommandResult::success(format!("{} bytes written to {}", bytes.len(), path.display()))
        }
        Err(e) => CommandResult::failure(format!("Failed to write {}: {}", path.display(), e)),
    }
}

async fn handle_send<F: LocalFileStore>(
    ctx: &mut AppContext<F>,
    local: &str,
    remote: &str,
) -> CommandResult {
    let path = ctx.resolve(local);
    let contents = match ctx.store().read_file(&path).await {
        Ok(contents) => contents,
        Err(e) => {
            return CommandResult::failure(format!("Failed to read {}: {}", path.display(), e));
        }
    };

    match ctx.session_mut().store(remote, contents).await {
        Ok(count) => {
            info!("Uploaded {} as {}", path.display(), remote);
            CommandResult::success(format!("Bytes sent: {}", count))
        }
        Err(e) => from_error(e),
    }
}

async fn handle_mode<F: LocalFileStore>(
    ctx: &mut AppContext<F>,
    mode: TransferMode,
) -> CommandResult {
    match ctx.session_mut().set_mode(mode).await {
        Ok(_) => CommandResult::success(format!("Transfer mode set to {}", mode)),
        Err(e) => from_error(e),
    }
}

async fn handle_local_list<F: LocalFileStore>(ctx: &mut AppContext<F>) -> CommandResult {
    let dir = ctx.local_dir().to_path_buf();
    match ctx.store().list_dir(&dir).await {
        Ok(names) => CommandResult::success(names.join("\n")),
        Err(e) => CommandResult::failure(format!("Failed to list {}: {}", dir.display(), e)),
    }
}
