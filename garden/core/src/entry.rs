//! Journal Entries
//!
//! An entry is written once, by a successful save, and never changes after.
//! The serialized field names match the export files the journal has always
//! produced (`id`, `date`, `mode`, `content`, `prompt`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Writing path that produced an entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritingMode {
    /// Cycling prompt catalog
    Guided,
    /// No prompt at all
    Free,
    /// Prompt picked by a penny flip
    Penny,
}

impl WritingMode {
    /// Every mode, in menu order
    pub const ALL: [WritingMode; 3] = [Self::Guided, Self::Free, Self::Penny];

    /// Lowercase identifier used on disk
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guided => "guided",
            Self::Free => "free",
            Self::Penny => "penny",
        }
    }

    /// Title shown above the writing area
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Guided => "Guided Journey",
            Self::Free => "Free Writing",
            Self::Penny => "Penny for Thoughts",
        }
    }

    /// Storage key holding this mode's autosaved draft
    #[must_use]
    pub fn draft_key(self) -> String {
        format!("draft-{}-textarea", self.as_str())
    }
}

impl fmt::Display for WritingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WritingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "guided" => Ok(Self::Guided),
            "free" => Ok(Self::Free),
            "penny" => Ok(Self::Penny),
            other => Err(format!("unknown writing mode: {other}")),
        }
    }
}

/// Entry identifier in milliseconds since the Unix epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

/// Issues time-derived ids that never repeat within a process
#[derive(Clone, Debug, Default)]
pub struct EntryIdGenerator {
    last: u64,
}

impl EntryIdGenerator {
    /// Create a generator that continues after `last`
    #[must_use]
    pub fn after(last: u64) -> Self {
        Self { last }
    }

    /// Make sure every later id is greater than `id`
    pub fn advance_past(&mut self, id: u64) {
        self.last = self.last.max(id);
    }

    /// Id for an entry created at `now_ms`, bumped past the last one issued
    pub fn next_at(&mut self, now_ms: u64) -> EntryId {
        let id = if now_ms > self.last {
            now_ms
        } else {
            self.last + 1
        };
        self.last = id;
        EntryId(id)
    }
}

/// A saved journal entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique id
    pub id: EntryId,
    /// When the entry was saved
    #[serde(rename = "date", alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Writing mode that produced it
    pub mode: WritingMode,
    /// Trimmed, non-empty text
    pub content: String,
    /// Guided prompt active at save time; `None` for other modes
    #[serde(default)]
    pub prompt: Option<String>,
}

impl JournalEntry {
    /// Local date and hour:minute of creation, for listings
    #[must_use]
    pub fn format_date(&self) -> String {
        format_date(&self.created_at)
    }

    /// First line of the content, shortened to `max_chars`
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        let first_line = self.content.lines().next().unwrap_or_default();
        if first_line.chars().count() <= max_chars {
            first_line.to_string()
        } else {
            let cut: String = first_line.chars().take(max_chars.saturating_sub(3)).collect();
            format!("{cut}...")
        }
    }
}

/// Format a timestamp as local `YYYY-MM-DD HH:MM`
#[must_use]
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
