//! Log records, the tag rule table, and the raw-text parser.
//!
//! Parsing is a pure function: the same raw text always yields the same
//! tagged records. The accepted shapes are a single JSON object, a JSON
//! array of objects, or newline-delimited JSON objects; malformed lines are
//! dropped, never fatal.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Closed vocabulary of anomaly tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    /// Failed password / authentication failure messages.
    AuthFailure,
    /// `sudo` attempts by users outside the sudoers file.
    PrivilegeEscalationAttempt,
    /// Connections from blacklisted addresses.
    ConnectionFromBlacklistedIp,
}

impl Tag {
    /// Stable snake_case name, matching the serialized form.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthFailure => "auth_failure",
            Self::PrivilegeEscalationAttempt => "privilege_escalation_attempt",
            Self::ConnectionFromBlacklistedIp => "connection_from_blacklisted_ip",
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed log record: its source fields plus the derived tags.
///
/// `tags` is always present after extraction, possibly empty. A record with
/// a non-empty tag list is "flagged".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Source-specific fields, passed through untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Derived anomaly tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Record {
    /// Whether this record carries at least one tag.
    #[inline]
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        !self.tags.is_empty()
    }

    /// The record's message field, coerced to text.
    #[must_use]
    pub fn message(&self) -> String {
        match self.fields.get("message") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Address-like key used for enrichment: the first non-empty of
    /// `src_ip`, `ip`, `source_ip`.
    #[must_use]
    pub fn enrichment_key(&self) -> Option<&str> {
        ["src_ip", "ip", "source_ip"]
            .iter()
            .filter_map(|field| self.fields.get(*field))
            .filter_map(Value::as_str)
            .find(|s| !s.is_empty())
    }

    fn from_fields(mut fields: Map<String, Value>) -> Self {
        // Derived field: any source-provided `tags` value is replaced.
        fields.remove("tags");
        let mut record = Self {
            fields,
            tags: Vec::new(),
        };
        record.tags = tags_for_message(&record.message());
        record
    }
}

/// Apply the fixed tag rule table to one message, case-insensitively.
#[must_use]
pub fn tags_for_message(message: &str) -> Vec<Tag> {
    let message = message.to_lowercase();
    let mut tags = Vec::new();

    if message.contains("failed password") || message.contains("authentication failure") {
        tags.push(Tag::AuthFailure);
    }
    if message.contains("sudo") && message.contains("not in sudoers") {
        tags.push(Tag::PrivilegeEscalationAttempt);
    }
    if message.contains("connection from") && message.contains("blacklisted") {
        tags.push(Tag::ConnectionFromBlacklistedIp);
    }

    tags
}

/// Parse raw log text into tagged records.
///
/// Whole-text parse first (object or array); on failure, line-by-line with
/// malformed lines silently dropped. Zero records is a valid outcome, not an
/// error.
#[must_use]
pub fn parse_records(raw: &str) -> Vec<Record> {
    let objects = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => vec![object],
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(object) => Some(object),
                _ => None,
            })
            .collect(),
        Ok(_) => Vec::new(),
        Err(_) => raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str::<Map<String, Value>>(line).ok())
            .collect(),
    };

    objects.into_iter().map(Record::from_fields).collect()
}
