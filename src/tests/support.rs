/// Test doubles: a scripted backend and a view that records every call.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::activity::ActivityEntry;
use crate::api::DashboardApi;
use crate::error::ClientError;
use crate::session::{Confirm, DashboardSession};
use crate::types::{Command, CommandOutcome, Notification, StatusSnapshot, SuitCounters};
use crate::view::View;

pub const SCENARIO_STATUS: &str = r#"{
    "bot_status": {"running": true, "last_message": "msg1", "error": null},
    "counters": {"❤️": 3},
    "messages_processed": 7,
    "current_style": 1,
    "styles": {"1": "classic"}
}"#;

pub fn snapshot(json: &str) -> StatusSnapshot {
    serde_json::from_str(json).unwrap()
}

pub fn outcome(json: &str) -> CommandOutcome {
    serde_json::from_str(json).unwrap()
}

fn decode_error(path: &str) -> ClientError {
    ClientError::Decode {
        path: path.to_string(),
        status: 500,
        source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
    }
}

/// Backend double. `None` replies fail with a decode error.
#[derive(Default)]
pub struct FakeApi {
    pub status_reply: Mutex<Option<StatusSnapshot>>,
    pub command_reply: Mutex<Option<CommandOutcome>>,
    status_calls: AtomicUsize,
    sent: Mutex<Vec<Command>>,
}

impl FakeApi {
    pub fn with_status(json: &str) -> Arc<Self> {
        let api = Self::default();
        *api.status_reply.lock().unwrap() = Some(snapshot(json));
        Arc::new(api)
    }

    pub fn reply_command(&self, json: &str) {
        *self.command_reply.lock().unwrap() = Some(outcome(json));
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<Command> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn status(&self) -> Result<StatusSnapshot, ClientError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.status_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| decode_error("/api/status"))
    }

    async fn send(&self, command: Command) -> Result<CommandOutcome, ClientError> {
        self.sent.lock().unwrap().push(command);
        self.command_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| decode_error(command.path()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Badge(bool),
    LastActivity(String),
    BotError(Option<String>),
    Counters(SuitCounters),
    Messages(u64),
    Style(i64, Vec<i64>, Option<String>),
    Activity(Vec<ActivityEntry>),
    Show(Notification),
    Remove(u64),
    Prompt(Option<String>),
    Present,
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Show(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn removals(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Remove(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(*e)).count()
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl View for RecordingView {
    fn render_badge(&self, online: bool) {
        self.push(ViewEvent::Badge(online));
    }

    fn render_last_activity(&self, message: &str) {
        self.push(ViewEvent::LastActivity(message.to_string()));
    }

    fn render_bot_error(&self, error: Option<&str>) {
        self.push(ViewEvent::BotError(error.map(str::to_string)));
    }

    fn render_counters(&self, counters: &SuitCounters) {
        self.push(ViewEvent::Counters(*counters));
    }

    fn render_messages_count(&self, count: u64) {
        self.push(ViewEvent::Messages(count));
    }

    fn render_style(&self, current: i64, available: &[i64], preview: Option<&str>) {
        self.push(ViewEvent::Style(
            current,
            available.to_vec(),
            preview.map(str::to_string),
        ));
    }

    fn render_activity_log(&self, entries: &[ActivityEntry]) {
        self.push(ViewEvent::Activity(entries.to_vec()));
    }

    fn show_notification(&self, notification: &Notification) {
        self.push(ViewEvent::Show(notification.clone()));
    }

    fn remove_notification(&self, id: u64) {
        self.push(ViewEvent::Remove(id));
    }

    fn render_prompt(&self, prompt: Option<&str>) {
        self.push(ViewEvent::Prompt(prompt.map(str::to_string)));
    }

    fn present(&self) {
        self.push(ViewEvent::Present);
    }
}

/// Fixed answer to the reset confirmation, counting how often it was asked.
pub struct Answer {
    pub yes: bool,
    pub asked: usize,
}

impl Answer {
    pub fn yes() -> Self {
        Self { yes: true, asked: 0 }
    }

    pub fn no() -> Self {
        Self { yes: false, asked: 0 }
    }
}

#[async_trait]
impl Confirm for Answer {
    async fn confirm(&mut self, _prompt: &str) -> bool {
        self.asked += 1;
        self.yes
    }
}

pub const POLL: Duration = Duration::from_millis(3000);
pub const TTL: Duration = Duration::from_millis(5000);

pub fn session(api: &Arc<FakeApi>, view: &Arc<RecordingView>) -> Arc<DashboardSession> {
    DashboardSession::new(api.clone(), view.clone(), POLL, TTL)
}
