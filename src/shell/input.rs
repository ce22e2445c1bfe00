//! Line input
//!
//! Where the shell gets its connection details and commands from.

use log::warn;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

/// A source of trimmed input lines.
#[allow(async_fn_in_trait)]
pub trait LineSource {
    /// Shows `prompt` and returns the next line, trimmed.
    ///
    /// `None` signals end of input.
    async fn read_line(&mut self, prompt: &str) -> Option<String>;

    /// Reads a value that should not be shown, such as a password.
    ///
    /// Sources that cannot turn echo off fall back to `read_line`.
    async fn read_secret(&mut self, prompt: &str) -> Option<String> {
        self.read_line(prompt).await
    }
}

/// Reads lines from standard input, writing prompts to standard output.
///
/// Echo is left to the terminal, so secrets are visible as they are typed.
pub struct StdinSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinSource {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinSource {
    async fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut stdout = tokio::io::stdout();
        if stdout.write_all(prompt.as_bytes()).await.is_ok() {
            let _ = stdout.flush().await;
        }

        match self.lines.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read input: {}", e);
                None
            }
        }
    }
}

/// Prompts for a value that has no default.
///
/// An empty line counts as end of input and aborts the setup.
pub async fn input_required<L: LineSource>(source: &mut L, prompt: &str) -> Option<String> {
    let line = source.read_line(prompt).await?;
    if line.is_empty() {
        warn!("{} is required", prompt.trim_end_matches([':', ' ']));
        return None;
    }
    Some(line)
}

/// Prompts with `default` shown in brackets; an empty line selects it.
pub async fn default_input<L: LineSource>(
    source: &mut L,
    prompt: &str,
    default: &str,
) -> Option<String> {
    let line = source
        .read_line(&format!("{} [{}]: ", prompt, default))
        .await?;
    if line.is_empty() {
        Some(default.to_string())
    } else {
        Some(line)
    }
}
