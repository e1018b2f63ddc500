use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Number of input characters kept in a history preview
pub const PREVIEW_CHARS: usize = 50;

/// A generated script recorded in history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Unique identifier (ULID)
    pub id: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Title of the template the script was generated with
    pub template_title: String,
    /// Truncated copy of the raw input
    pub input_preview: String,
    /// The generated script
    pub content: String,
}

impl HistoryItem {
    /// Create a history item stamped with a fresh id and the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use reelscript::storage::HistoryItem;
    ///
    /// let item = HistoryItem::new("Storytelling", "coffee", "Once upon a time...");
    /// assert_eq!(item.input_preview, "coffee");
    /// assert_eq!(item.id.len(), 26);
    /// ```
    pub fn new(
        template_title: impl Into<String>,
        raw_input: &str,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            timestamp: Utc::now().timestamp_millis(),
            template_title: template_title.into(),
            input_preview: input_preview(raw_input),
            content: content.into(),
        }
    }

    /// Creation time as a UTC datetime
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    /// First eight characters of the id, as shown in listings
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// First [`PREVIEW_CHARS`] characters of `raw_input`, with "..." appended
/// when anything was cut
pub fn input_preview(raw_input: &str) -> String {
    let mut chars = raw_input.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
