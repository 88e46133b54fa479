use std::fmt::Write as _;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::activity::{ActivityEntry, EMPTY_PLACEHOLDER};
use crate::types::{Notification, NotificationKind, SuitCounters, SuitSymbol};

pub const ONLINE_LABEL: &str = "En ligne";
pub const OFFLINE_LABEL: &str = "Hors ligne";

/// Named rendering operations, one per dashboard region.
///
/// Implementations must tolerate calls from any task: the poll timer,
/// command handlers and notification expiry all render independently.
pub trait View: Send + Sync {
    fn render_badge(&self, online: bool);
    fn render_last_activity(&self, message: &str);
    /// `None` hides the error banner.
    fn render_bot_error(&self, error: Option<&str>);
    fn render_counters(&self, counters: &SuitCounters);
    fn render_messages_count(&self, count: u64);
    fn render_style(&self, current: i64, available: &[i64], preview: Option<&str>);
    fn render_activity_log(&self, entries: &[ActivityEntry]);
    fn show_notification(&self, notification: &Notification);
    fn remove_notification(&self, id: u64);
    /// Pending yes/no question; stays on screen until cleared with `None`.
    fn render_prompt(&self, prompt: Option<&str>);

    /// Called once a batch of region updates is complete.
    fn present(&self) {}
}

#[derive(Debug, Clone, Default)]
struct StyleRegion {
    current: i64,
    available: Vec<i64>,
    preview: String,
}

/// Last rendered value of every region.
#[derive(Debug, Clone, Default)]
struct Panel {
    online: Option<bool>,
    last_activity: Option<String>,
    bot_error: Option<String>,
    counters: SuitCounters,
    messages: u64,
    style: Option<StyleRegion>,
    activity: Vec<ActivityEntry>,
    notifications: Vec<Notification>,
    prompt: Option<String>,
}

impl Panel {
    fn draw(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "── Compteur de Cartes ─────────────────────────");

        let badge = match self.online {
            Some(true) => format!("● {ONLINE_LABEL}"),
            Some(false) => format!("○ {OFFLINE_LABEL}"),
            None => "…".to_string(),
        };
        let _ = writeln!(out, " Statut     {badge}");
        if let Some(last) = &self.last_activity {
            let _ = writeln!(out, " Dernière   {last}");
        }
        if let Some(err) = &self.bot_error {
            let _ = writeln!(out, " Erreur     {err}");
        }

        let suits: Vec<String> = SuitSymbol::ALL
            .iter()
            .map(|s| format!("{s} {}", self.counters.get(*s)))
            .collect();
        let _ = writeln!(out, " {}   Total {}", suits.join("   "), self.counters.total());
        let _ = writeln!(out, " Messages   {}", self.messages);

        if let Some(style) = &self.style {
            let ids: Vec<String> = style.available.iter().map(|id| id.to_string()).collect();
            let _ = writeln!(out, " Style      {}  [{}]", style.current, ids.join(" "));
            let _ = writeln!(out, " Aperçu     {}", style.preview.replace('\n', " | "));
        }

        let _ = writeln!(out, " Activité récente");
        if self.activity.is_empty() {
            let _ = writeln!(out, "   {EMPTY_PLACEHOLDER}");
        }
        for entry in &self.activity {
            let _ = writeln!(out, "   {}  {}", entry.time, entry.message);
        }

        for n in &self.notifications {
            let tag = match n.kind {
                NotificationKind::Success => "ok",
                NotificationKind::Error => "erreur",
            };
            let _ = writeln!(out, " [#{} {tag}] {}", n.id, n.message);
        }
        if let Some(prompt) = &self.prompt {
            let _ = writeln!(out, " ? {prompt} [o/N]");
        }
        out
    }
}

/// Renders the dashboard as a text frame on any writer (stdout in the binary).
pub struct TerminalView<W: Write + Send> {
    panel: Mutex<Panel>,
    out: Mutex<W>,
    clear_screen: bool,
    footer: Option<String>,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W, clear_screen: bool) -> Self {
        Self {
            panel: Mutex::new(Panel::default()),
            out: Mutex::new(out),
            clear_screen,
            footer: None,
        }
    }

    /// Fixed line drawn under every frame.
    pub fn with_footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_string());
        self
    }

    /// Current frame as text.
    pub fn frame(&self) -> String {
        let mut frame = self.panel().draw();
        if let Some(footer) = &self.footer {
            let _ = writeln!(frame, " {footer}");
        }
        frame
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn panel(&self) -> std::sync::MutexGuard<'_, Panel> {
        self.panel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> View for TerminalView<W> {
    fn render_badge(&self, online: bool) {
        self.panel().online = Some(online);
    }

    fn render_last_activity(&self, message: &str) {
        self.panel().last_activity = Some(message.to_string());
    }

    fn render_bot_error(&self, error: Option<&str>) {
        self.panel().bot_error = error.map(str::to_string);
    }

    fn render_counters(&self, counters: &SuitCounters) {
        self.panel().counters = *counters;
    }

    fn render_messages_count(&self, count: u64) {
        self.panel().messages = count;
    }

    fn render_style(&self, current: i64, available: &[i64], preview: Option<&str>) {
        self.panel().style = Some(StyleRegion {
            current,
            available: available.to_vec(),
            preview: preview.unwrap_or_default().to_string(),
        });
    }

    fn render_activity_log(&self, entries: &[ActivityEntry]) {
        self.panel().activity = entries.to_vec();
    }

    fn show_notification(&self, notification: &Notification) {
        self.panel().notifications.push(notification.clone());
    }

    fn remove_notification(&self, id: u64) {
        self.panel().notifications.retain(|n| n.id != id);
    }

    fn render_prompt(&self, prompt: Option<&str>) {
        self.panel().prompt = prompt.map(str::to_string);
    }

    fn present(&self) {
        let frame = self.frame();
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let prefix = if self.clear_screen { "\x1b[2J\x1b[H" } else { "" };
        if let Err(e) = write!(out, "{prefix}{frame}").and_then(|_| out.flush()) {
            tracing::warn!(error = %e, "failed to draw dashboard");
        }
    }
}
