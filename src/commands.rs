use std::io::BufRead;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::session::{Confirm, DashboardSession};

const INPUT_BUFFER: usize = 16;

pub const HELP: &str = "actions: reset | start | style <n> | refresh | dismiss <id> | help | quit";

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Reset,
    StartBot,
    Style(i64),
    Refresh,
    Dismiss(u64),
    Help,
    Quit,
}

impl UserAction {
    /// Formats: "reset", "start" | "start-bot", "style 3", "refresh",
    /// "dismiss 2", "help", "quit" | "exit". Case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        let line = raw.trim().to_lowercase();
        let mut parts = line.split_whitespace();
        let verb = parts.next()?;
        let arg = parts.next();
        if parts.next().is_some() {
            return None;
        }

        match (verb, arg) {
            ("reset", None) => Some(Self::Reset),
            ("start" | "start-bot" | "start_bot", None) => Some(Self::StartBot),
            ("style", Some(n)) => n.parse().ok().map(Self::Style),
            ("refresh", None) => Some(Self::Refresh),
            ("dismiss", Some(id)) => id.parse().ok().map(Self::Dismiss),
            ("help" | "?", None) => Some(Self::Help),
            ("quit" | "exit", None) => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Reads the confirmation answer from the same line source as the actions.
pub struct LinePrompt<'a> {
    input: &'a mut mpsc::Receiver<String>,
}

impl<'a> LinePrompt<'a> {
    pub fn new(input: &'a mut mpsc::Receiver<String>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl<'a> Confirm for LinePrompt<'a> {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        match self.input.recv().await {
            Some(answer) => is_yes(&answer),
            None => false,
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "o" | "oui"
    )
}

/// Blocking stdin reads live on their own OS thread so the runtime can shut
/// down while a read is pending. The channel closes on EOF or a read error.
pub fn spawn_stdin_reader() -> std::io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(INPUT_BUFFER);
    std::thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "stdin read error");
                        break;
                    }
                }
            }
        })?;
    Ok(rx)
}

/// Reads user actions from stdin, one per line, until "quit" or EOF.
pub async fn run_stdin(session: Arc<DashboardSession>) {
    tracing::info!("input listener started (stdin mode)");

    match spawn_stdin_reader() {
        Ok(input) => run(session, input).await,
        Err(e) => tracing::error!(error = %e, "failed to start stdin reader"),
    }
}

pub async fn run(session: Arc<DashboardSession>, mut input: mpsc::Receiver<String>) {
    while let Some(line) = input.recv().await {
        let raw = line.trim().to_string();
        if raw.is_empty() {
            continue;
        }

        let Some(action) = UserAction::parse(&raw) else {
            tracing::warn!(input = raw, "unknown action, ignoring");
            continue;
        };
        tracing::debug!(?action, "action received");

        match action {
            UserAction::Reset => {
                let mut prompt = LinePrompt::new(&mut input);
                session.reset(&mut prompt).await;
            }
            UserAction::StartBot => {
                session.start_bot().await;
            }
            UserAction::Style(style) => {
                session.change_style(style).await;
            }
            UserAction::Refresh => session.refresh().await,
            UserAction::Dismiss(id) => {
                if !session.dismiss(id) {
                    tracing::debug!(id, "notification already gone");
                }
            }
            UserAction::Help => session.redraw(),
            UserAction::Quit => {
                tracing::info!("quit requested, input listener stopping");
                return;
            }
        }
    }
    tracing::info!("input closed, input listener stopping");
}
