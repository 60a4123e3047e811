//! Confirmation and alert seam between screens and whatever front-end drives them.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Line reader over standard input shared by everything that reads from the terminal.
pub type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

/// Asks the operator yes/no questions and shows blocking messages.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask for a yes/no decision. `false` means the action must not happen.
    async fn confirm(&self, message: &str) -> bool;

    /// Tell the operator that something failed.
    async fn alert(&self, message: &str);
}

/// Answers every confirmation with yes. Alerts go to the log.
///
/// Used for non-interactive runs (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

#[async_trait]
impl Prompter for AssumeYes {
    async fn confirm(&self, message: &str) -> bool {
        tracing::info!("{message} (assumed yes)");
        true
    }

    async fn alert(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Prompter reading answers from standard input.
///
/// The line reader is shared so an interactive console can read its own commands from the same
/// stream without the two competing for buffered input.
pub struct TerminalPrompter {
    lines: SharedLines,
}

impl TerminalPrompter {
    pub fn new(lines: SharedLines) -> Self {
        Self { lines }
    }

    /// Shared line reader over standard input.
    pub fn stdin_lines() -> SharedLines {
        Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> bool {
        let mut stdout = tokio::io::stdout();
        let question = format!("{message} [y/N] ");
        if stdout.write_all(question.as_bytes()).await.is_err() || stdout.flush().await.is_err() {
            return false;
        }

        let answer = self.lines.lock().await.next_line().await;
        match answer {
            Ok(Some(line)) => is_yes(&line),
            // End of input or a read error never counts as consent.
            _ => false,
        }
    }

    async fn alert(&self, message: &str) {
        let mut stderr = tokio::io::stderr();
        let _ = stderr.write_all(format!("!! {message}\n").as_bytes()).await;
    }
}

/// Whether a typed answer means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "d" | "da"
    )
}
