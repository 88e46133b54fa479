use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One of the four card suits counted by the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuitSymbol {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl SuitSymbol {
    pub const ALL: [SuitSymbol; 4] = [
        SuitSymbol::Hearts,
        SuitSymbol::Diamonds,
        SuitSymbol::Clubs,
        SuitSymbol::Spades,
    ];

    /// Canonical glyph used as the counter key by the backend.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Hearts => "❤️",
            Self::Diamonds => "♦️",
            Self::Clubs => "♣️",
            Self::Spades => "♠️",
        }
    }

    /// Parse a counter key. Accepts both heart glyphs, with or without the
    /// U+FE0F variation selector.
    pub fn from_glyph(raw: &str) -> Option<Self> {
        let base = raw.trim().trim_end_matches('\u{FE0F}');
        match base {
            "❤" | "♥" => Some(Self::Hearts),
            "♦" => Some(Self::Diamonds),
            "♣" => Some(Self::Clubs),
            "♠" => Some(Self::Spades),
            _ => None,
        }
    }
}

impl std::fmt::Display for SuitSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Per-suit counts. Missing suits count zero; unknown keys are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, u64>")]
pub struct SuitCounters {
    hearts: u64,
    diamonds: u64,
    clubs: u64,
    spades: u64,
}

impl SuitCounters {
    pub fn get(&self, suit: SuitSymbol) -> u64 {
        match suit {
            SuitSymbol::Hearts => self.hearts,
            SuitSymbol::Diamonds => self.diamonds,
            SuitSymbol::Clubs => self.clubs,
            SuitSymbol::Spades => self.spades,
        }
    }

    pub fn total(&self) -> u64 {
        self.hearts
            .saturating_add(self.diamonds)
            .saturating_add(self.clubs)
            .saturating_add(self.spades)
    }

    fn slot(&mut self, suit: SuitSymbol) -> &mut u64 {
        match suit {
            SuitSymbol::Hearts => &mut self.hearts,
            SuitSymbol::Diamonds => &mut self.diamonds,
            SuitSymbol::Clubs => &mut self.clubs,
            SuitSymbol::Spades => &mut self.spades,
        }
    }
}

impl From<HashMap<String, u64>> for SuitCounters {
    fn from(raw: HashMap<String, u64>) -> Self {
        let mut counters = Self::default();
        for (key, count) in raw {
            match SuitSymbol::from_glyph(&key) {
                Some(suit) => {
                    let slot = counters.slot(suit);
                    *slot = slot.saturating_add(count);
                }
                None => tracing::debug!(key, count, "ignoring unknown counter key"),
            }
        }
        counters
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BotStatus {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One `/api/status` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusSnapshot {
    pub bot_status: BotStatus,
    pub counters: SuitCounters,
    pub messages_processed: u64,
    pub current_style: i64,
    pub styles: BTreeMap<i64, String>,
}

impl StatusSnapshot {
    pub fn style_preview(&self) -> Option<&str> {
        self.styles.get(&self.current_style).map(String::as_str)
    }
}

/// Structured reply of every command endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandOutcome {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct StyleRequest {
    style: i64,
}

/// A side-effecting request the user can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    StartBot,
    ChangeStyle(i64),
}

impl Command {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Reset => "/api/reset",
            Self::StartBot => "/api/start_bot",
            Self::ChangeStyle(_) => "/api/style",
        }
    }

    pub fn body(&self) -> Option<serde_json::Value> {
        match self {
            Self::ChangeStyle(style) => {
                serde_json::to_value(StyleRequest { style: *style }).ok()
            }
            Self::Reset | Self::StartBot => None,
        }
    }

    /// Activity log line recorded when the server accepts the command.
    pub fn log_line(&self) -> String {
        match self {
            Self::Reset => "Compteurs et historique réinitialisés".to_string(),
            Self::StartBot => "Bot démarré".to_string(),
            Self::ChangeStyle(style) => format!("Style changé vers {style}"),
        }
    }

    /// Generic message shown when the request itself fails.
    pub fn failure_text(&self) -> &'static str {
        match self {
            Self::Reset => "Erreur lors de la réinitialisation",
            Self::StartBot => "Erreur lors du démarrage du bot",
            Self::ChangeStyle(_) => "Erreur lors du changement de style",
        }
    }

    /// Whether a successful command is followed by an immediate status poll.
    pub fn refreshes_status(&self) -> bool {
        matches!(self, Self::Reset | Self::ChangeStyle(_))
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reset => write!(f, "reset"),
            Self::StartBot => write!(f, "start_bot"),
            Self::ChangeStyle(style) => write!(f, "style({style})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}
