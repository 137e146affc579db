pub mod srt;

pub use srt::{format_timestamp, parse, parse_timestamp};

use std::time::Duration;

/// One timed caption block, as authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    /// Sequence label from the file, kept verbatim.
    pub index: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl SubtitleEntry {
    pub fn start(&self) -> Duration {
        Duration::from_millis(self.start_ms)
    }

    pub fn end(&self) -> Duration {
        Duration::from_millis(self.end_ms)
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ms: u64) -> bool {
        self.start_ms <= ms && ms <= self.end_ms
    }
}

/// Parsed subtitle file for one pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub language: String,
    pub label: String,
    pub path: String,
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleTrack {
    pub fn from_srt(
        language: impl Into<String>,
        label: impl Into<String>,
        path: impl Into<String>,
        raw: &str,
    ) -> Self {
        Self {
            language: language.into(),
            label: label.into(),
            path: path.into(),
            entries: parse(raw),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_label(&self) -> String {
        format!("{} entries", self.entries.len())
    }
}
