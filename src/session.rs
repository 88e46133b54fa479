use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::activity::{ActivityEntry, ActivityLog};
use crate::api::DashboardApi;
use crate::notify::Notifier;
use crate::types::{Command, StatusSnapshot};
use crate::view::View;

pub const CONNECTION_ERROR: &str = "Erreur de connexion au serveur";
pub const RESET_PROMPT: &str =
    "Êtes-vous sûr de vouloir réinitialiser tous les compteurs et l'historique ?";

/// Asks the user to approve a destructive command.
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, prompt: &str) -> bool;
}

/// How a user command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Server answered `success: true`.
    Accepted,
    /// Server answered `success: false` with this text.
    Rejected(String),
    /// The request or its decoding failed.
    Failed,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

/// One dashboard run: the poll timer, the command dispatcher and the
/// activity feed, all rendering into a single [`View`].
///
/// Poll and command responses are not ordered against each other; whichever
/// resolves last wins for the regions it touches.
pub struct DashboardSession {
    api: Arc<dyn DashboardApi>,
    view: Arc<dyn View>,
    notifier: Notifier,
    activity: Mutex<ActivityLog>,
    poll_interval: Duration,
    timer: Mutex<Option<CancellationToken>>,
}

impl DashboardSession {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        view: Arc<dyn View>,
        poll_interval: Duration,
        notification_ttl: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            notifier: Notifier::new(Arc::clone(&view), notification_ttl),
            api,
            view,
            activity: Mutex::new(ActivityLog::default()),
            poll_interval,
            timer: Mutex::new(None),
        })
    }

    /// Start the poll timer. The first poll fires immediately.
    /// Returns false if a timer is already running.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.is_some() {
            tracing::debug!("poll timer already running");
            return false;
        }
        let cancel = CancellationToken::new();
        *timer = Some(cancel.clone());
        drop(timer);

        self.view.render_activity_log(&self.activity());
        self.view.present();

        let session = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(session.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        tracing::debug!("poll timer stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        // polls run detached from the timer and may overlap
                        let poll = Arc::clone(&session);
                        tokio::spawn(async move { poll.refresh().await });
                    }
                }
            }
        });

        tracing::info!(interval_ms = self.poll_interval.as_millis() as u64, "status polling started");
        true
    }

    /// Release the poll timer. Polls already in flight still complete.
    pub fn stop(&self) -> bool {
        let taken = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match taken {
            Some(cancel) => {
                cancel.cancel();
                tracing::info!("status polling stopped");
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// One status poll, outside the timer's schedule.
    pub async fn refresh(&self) {
        match self.api.status().await {
            Ok(snapshot) => self.render_snapshot(&snapshot),
            Err(e) => {
                tracing::error!(error = %e, "status poll failed");
                self.notifier.error(CONNECTION_ERROR);
            }
        }
    }

    fn render_snapshot(&self, snapshot: &StatusSnapshot) {
        let status = &snapshot.bot_status;
        let last_message = status.last_message.as_deref().filter(|m| !m.is_empty());

        self.view.render_badge(status.running);
        if let Some(msg) = last_message {
            self.view.render_last_activity(msg);
            self.append_activity(msg);
        }
        self.view.render_bot_error(status.error.as_deref());
        self.view.render_counters(&snapshot.counters);
        self.view.render_messages_count(snapshot.messages_processed);

        let available: Vec<i64> = snapshot.styles.keys().copied().collect();
        self.view
            .render_style(snapshot.current_style, &available, snapshot.style_preview());
        self.view.present();
    }

    /// Add a line to the activity feed and redraw it.
    pub fn record(&self, message: &str) {
        self.append_activity(message);
        self.view.present();
    }

    fn append_activity(&self, message: &str) {
        let entries = {
            let mut log = self.activity.lock().unwrap_or_else(PoisonError::into_inner);
            log.record(message);
            log.entries()
        };
        self.view.render_activity_log(&entries);
    }

    pub fn activity(&self) -> Vec<ActivityEntry> {
        self.activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries()
    }

    /// Send `command` and surface the result. Reset goes through [`Self::reset`]
    /// when the user has to confirm it first.
    pub async fn dispatch(&self, command: Command) -> Dispatch {
        let outcome = match self.api.send(command).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(%command, error = %e, "command request failed");
                self.notifier.error(command.failure_text());
                return Dispatch::Failed;
            }
        };

        if !outcome.success {
            let text = outcome
                .error
                .unwrap_or_else(|| command.failure_text().to_string());
            self.notifier.error(&text);
            return Dispatch::Rejected(text);
        }

        let log_line = command.log_line();
        self.notifier
            .success(outcome.message.as_deref().unwrap_or(&log_line));
        self.record(&log_line);

        if command.refreshes_status() {
            self.refresh().await;
        }
        Dispatch::Accepted
    }

    /// Redraw the current frame without touching any region.
    pub fn redraw(&self) {
        self.view.present();
    }

    /// The question stays rendered while `confirm` waits, so redraws from the
    /// poll timer or notification expiry keep it visible.
    pub async fn reset<C: Confirm + ?Sized>(&self, confirm: &mut C) -> Dispatch {
        self.view.render_prompt(Some(RESET_PROMPT));
        self.view.present();
        let confirmed = confirm.confirm(RESET_PROMPT).await;
        self.view.render_prompt(None);
        self.view.present();

        if !confirmed {
            tracing::debug!("reset declined");
            return Dispatch::Declined;
        }
        self.dispatch(Command::Reset).await
    }

    pub async fn start_bot(&self) -> Dispatch {
        self.dispatch(Command::StartBot).await
    }

    pub async fn change_style(&self, style: i64) -> Dispatch {
        self.dispatch(Command::ChangeStyle(style)).await
    }

    pub fn dismiss(&self, id: u64) -> bool {
        self.notifier.dismiss(id)
    }
}
