use std::collections::VecDeque;

pub const ACTIVITY_CAPACITY: usize = 10;
pub const EMPTY_PLACEHOLDER: &str = "Aucune activité récente";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub time: String,
    pub message: String,
}

/// Most-recent-first feed of client-observed events.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(ACTIVITY_CAPACITY)
    }
}

impl ActivityLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Stamp `message` with the local wall-clock time and push it to the front.
    pub fn record(&mut self, message: &str) {
        let time = chrono::Local::now().format("%H:%M:%S").to_string();
        self.push(time, message);
    }

    pub fn push(&mut self, time: String, message: &str) {
        self.entries.push_front(ActivityEntry {
            time,
            message: message.to_string(),
        });
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
