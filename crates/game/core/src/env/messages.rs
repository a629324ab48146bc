//! Message sink for combat narration.
//!
//! The core emits human-readable log lines and never depends on what the
//! sink does with them. The sink is injected through the environment bundle
//! instead of living in a process-wide singleton.

/// Category tag attached to every emitted line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum MessageCategory {
    Combat,
    Movement,
    Equipment,
    System,
}

/// Fire-and-forget consumer of narration lines.
///
/// Implementations must not influence game state; the core calls `publish`
/// and moves on without inspecting any result.
pub trait MessageSink: Send + Sync {
    fn publish(&self, category: MessageCategory, text: &str);
}

/// Sink that discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MessageSink for NullSink {
    fn publish(&self, _category: MessageCategory, _text: &str) {}
}

/// Sink that records messages in memory, mainly for tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: std::sync::Mutex<Vec<(MessageCategory, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything published so far.
    pub fn lines(&self) -> Vec<(MessageCategory, String)> {
        self.lines.lock().expect("message sink poisoned").clone()
    }

    /// Returns true if any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines
            .lock()
            .expect("message sink poisoned")
            .iter()
            .any(|(_, line)| line.contains(needle))
    }
}

impl MessageSink for MemorySink {
    fn publish(&self, category: MessageCategory, text: &str) {
        self.lines
            .lock()
            .expect("message sink poisoned")
            .push((category, text.to_string()));
    }
}
