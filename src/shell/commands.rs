//! Module `commands`
//!
//! Parses lines typed at the shell prompt into commands, and defines the
//! result the dispatcher returns for each of them.

use crate::transfer::TransferMode;

/// A command typed at the shell prompt.
#[derive(Debug, PartialEq)]
pub enum ShellCommand {
    Quit,
    List,
    ChangeDir(String),
    CurrentDir,
    MakeDir(String),
    RemoveDir(String),
    Touch(String),
    Cat(String),
    Delete(String),
    Get { remote: String, local: String },
    Send { local: String, remote: String },
    Mode(TransferMode),
    Help,
    Stat,
    LocalDir,
    LocalList,
    LocalChangeDir(String),
    Usage,
    Empty,
    MissingArguments {
        command: String,
        required: usize,
        given: usize,
    },
    Unknown(String),
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl CommandResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message.into()),
        }
    }

    pub fn silent() -> Self {
        Self {
            status: CommandStatus::Success,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: CommandStatus::Failure(message.clone()),
            message: Some(message),
        }
    }
}

pub const USAGE: &str = "\
Remote: ls | dir | list, cd <path>, pwd, mkdir <path>, rmdir <path>,
        cat <file>, touch <file>, rm | delete <file>, get <remote> <local>,
        send <local> <remote>, ascii, binary, help, stat
Local:  lpwd, lls | ldir | llist, lcd <path>
Other:  quit | exit | bye, ?";

fn required_arguments(name: &str) -> usize {
    match name {
        "cd" | "chdir" | "mkdir" | "rmdir" | "touch" | "cat" | "delete" | "rm" | "lcd"
        | "lchdir" => 1,
        "get" | "send" => 2,
        _ => 0,
    }
}

/// Parses a raw shell line into a `ShellCommand`.
///
/// Words are separated by whitespace; extra arguments are ignored.
pub fn parse_command(raw: &str) -> ShellCommand {
    let words: Vec<&str> = raw.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return ShellCommand::Empty;
    };

    let required = required_arguments(name);
    if args.len() < required {
        return ShellCommand::MissingArguments {
            command: name.to_string(),
            required,
            given: args.len(),
        };
    }

    let arg = |i: usize| args[i].to_string();
    match name {
        "quit" | "exit" | "bye" => ShellCommand::Quit,
        "dir" | "ls" | "list" => ShellCommand::List,
        "chdir" | "cd" => ShellCommand::ChangeDir(arg(0)),
        "pwd" => ShellCommand::CurrentDir,
        "mkdir" => ShellCommand::MakeDir(arg(0)),
        "rmdir" => ShellCommand::RemoveDir(arg(0)),
        "touch" => ShellCommand::Touch(arg(0)),
        "cat" => ShellCommand::Cat(arg(0)),
        "delete" | "rm" => ShellCommand::Delete(arg(0)),
        "get" => ShellCommand::Get {
            remote: arg(0),
            local: arg(1),
        },
        "send" => ShellCommand::Send {
            local: arg(0),
            remote: arg(1),
        },
        "ascii" => ShellCommand::Mode(TransferMode::Ascii),
        "binary" => ShellCommand::Mode(TransferMode::Binary),
        "help" => ShellCommand::Help,
        "stat" => ShellCommand::Stat,
        "lpwd" => ShellCommand::LocalDir,
        "ldir" | "llist" | "lls" => ShellCommand::LocalList,
        "lchdir" | "lcd" => ShellCommand::LocalChangeDir(arg(0)),
        "?" => ShellCommand::Usage,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(parse_command("ls"), ShellCommand::List);
        assert_eq!(parse_command("dir"), ShellCommand::List);
        assert_eq!(parse_command("list"), ShellCommand::List);
        assert_eq!(parse_command("bye"), ShellCommand::Quit);
        assert_eq!(parse_command("rm a.txt"), ShellCommand::Delete("a.txt".into()));
        assert_eq!(parse_command("lls"), ShellCommand::LocalList);
    }

    #[test]
    fn test_parse_commands_with_args() {
        assert_eq!(
            parse_command("  cd   /pub  "),
            ShellCommand::ChangeDir("/pub".into())
        );
        assert_eq!(
            parse_command("get remote.bin local.bin"),
            ShellCommand::Get {
                remote: "remote.bin".into(),
                local: "local.bin".into()
            }
        );
        assert_eq!(
            parse_command("send local.bin remote.bin"),
            ShellCommand::Send {
                local: "local.bin".into(),
                remote: "remote.bin".into()
            }
        );
        assert_eq!(parse_command("ascii"), ShellCommand::Mode(TransferMode::Ascii));
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            parse_command("get only-one"),
            ShellCommand::MissingArguments {
                command: "get".into(),
                required: 2,
                given: 1
            }
        );
        assert_eq!(
            parse_command("cd"),
            ShellCommand::MissingArguments {
                command: "cd".into(),
                required: 1,
                given: 0
            }
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(parse_command(""), ShellCommand::Empty);
        assert_eq!(parse_command("   "), ShellCommand::Empty);
        assert_eq!(parse_command("LS"), ShellCommand::Unknown("LS".into()));
    }

    #[test]
    fn test_failure_result_carries_message() {
        let result = CommandResult::failure("550 nope");
        assert_eq!(result.status, CommandStatus::Failure("550 nope".into()));
        assert_eq!(result.message.as_deref(), Some("550 nope"));
    }
}
