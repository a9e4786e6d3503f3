//! Core types for extracted email features

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Normalized body content of one message
///
/// Holds the decoded HTML/plain bodies, their reduced forms, and the
/// per-content-type bookkeeping gathered while walking the MIME structure.
/// Constructed once per message and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentBundle {
    /// Newline-joined decoded HTML part payloads, `None` if no HTML part
    pub html: Option<String>,

    /// Newline-joined decoded plain-text part payloads
    pub plain: Option<String>,

    /// Visible text of `html`, whitespace-collapsed
    pub html_text: Option<String>,

    /// `plain` with whitespace runs collapsed
    pub plain_stripped: Option<String>,

    /// Occurrence count for every part content type seen, ignored ones included
    pub content_types: BTreeMap<String, u32>,

    /// Whether the message had child parts
    pub multipart: bool,

    /// Parts that were neither HTML nor plain text
    pub non_main_count: u32,
}

impl ContentBundle {
    /// Build a bundle from the raw extracted bodies, deriving the reduced forms
    #[must_use]
    pub fn new(
        html: Option<String>,
        plain: Option<String>,
        content_types: BTreeMap<String, u32>,
        multipart: bool,
        non_main_count: u32,
    ) -> Self {
        let html_text = html.as_deref().map(crate::content::html_to_text);
        let plain_stripped = plain.as_deref().map(crate::content::collapse_spaces);

        Self {
            html,
            plain,
            html_text,
            plain_stripped,
            content_types,
            multipart,
            non_main_count,
        }
    }

    /// Whether both an HTML and a plain-text body were found
    #[must_use]
    pub const fn has_both(&self) -> bool {
        self.html.is_some() && self.plain.is_some()
    }

    /// Classify the bundle; absence of both bodies counts as `Plain`
    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match (&self.html, &self.plain) {
            (Some(_), Some(_)) => ContentKind::Both,
            (Some(_), None) => ContentKind::Html,
            (None, _) => ContentKind::Plain,
        }
    }

    /// Character count of the raw HTML and plain bodies combined
    #[must_use]
    pub fn total_length(&self) -> usize {
        let html = self.html.as_deref().map_or(0, |t| t.chars().count());
        let plain = self.plain.as_deref().map_or(0, |t| t.chars().count());
        html + plain
    }

    /// Word count over the collapsed HTML text and collapsed plain text
    ///
    /// Splits on single spaces, so an empty body still contributes one
    /// (empty) segment.
    #[must_use]
    pub fn word_count(&self) -> usize {
        let mut count = 0;

        if let Some(html_text) = &self.html_text {
            count += html_text.split(' ').count();
        }

        if let Some(plain_stripped) = &self.plain_stripped {
            count += plain_stripped.split(' ').count();
        }

        count
    }

    /// Ratio of uppercase characters over the HTML text and raw plain body
    ///
    /// A character is "upper" when uppercasing it yields itself, which
    /// also captures digits, symbols, and whitespace; "lower" when it is
    /// neither upper-equal nor whitespace. Always in `0.0..=1.0`, and 0.0
    /// for empty text.
    #[must_use]
    pub fn uppercase_ratio(&self) -> f64 {
        let mut total_upper: usize = 0;
        let mut total_lower: usize = 0;

        let texts = self.html_text.iter().chain(self.plain.iter());

        for text in texts {
            for c in text.chars() {
                if uppercases_to_self(c) {
                    total_upper += 1;
                } else if !c.is_whitespace() {
                    total_lower += 1;
                }
            }
        }

        let divisor = (total_upper + total_lower).max(1);

        #[allow(clippy::cast_precision_loss)]
        let ratio = total_upper as f64 / divisor as f64;
        ratio
    }

    /// Literal `!` occurrences in the HTML text and raw plain body
    #[must_use]
    pub fn exclamation_count(&self) -> usize {
        let html = self.html_text.as_deref().map_or(0, |t| t.matches('!').count());
        let plain = self.plain.as_deref().map_or(0, |t| t.matches('!').count());
        html + plain
    }
}

/// True when uppercasing `c` yields exactly `c` back
fn uppercases_to_self(c: char) -> bool {
    let mut upper = c.to_uppercase();
    upper.next() == Some(c) && upper.next().is_none()
}

/// Which body kinds a message carried
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Html,
    Plain,
    Both,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Plain => "plain",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One flat feature row per input message
///
/// The fixed 28-column schema consumed by downstream tabular analysis.
/// Absent headers serialize as explicit nulls, never missing columns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRecord {
    /// Raw Subject header
    pub subject: Option<String>,

    /// Raw From header
    pub from_raw: String,

    /// Display name of the first From address, empty if none given
    pub from_name: String,

    /// Address of the first From address
    pub from_email: String,

    /// Whether the sender domain ends with a known freemail provider
    pub from_uses_freemail: bool,

    /// Raw To header
    pub to_raw: Option<String>,

    /// Comma-joined non-empty To display names
    pub to_names: String,

    /// Comma-joined non-empty To addresses
    pub to_emails: String,

    /// Number of parsed To addresses
    pub to_emails_count: usize,

    /// Raw Reply-To header
    pub reply_to_raw: Option<String>,

    /// Display name of the first Reply-To address
    pub reply_to_name: Option<String>,

    /// Address of the first Reply-To address
    pub reply_to_email: Option<String>,

    /// Raw To header equals raw Reply-To header exactly
    pub to_is_reply_to: bool,

    /// Raw Cc header
    pub cc: Option<String>,

    /// List-Unsubscribe header present
    pub has_list_unsub: bool,

    /// Raw top-level Content-Type header
    pub content_type_raw: Option<String>,

    /// Raw Date header
    pub date: Option<String>,

    /// Raw Message-ID header
    pub message_id: Option<String>,

    /// Body classification
    #[serde(rename = "type")]
    pub kind: ContentKind,

    /// Decoded HTML body
    pub html_body: Option<String>,

    /// Decoded plain-text body
    pub plain_body: Option<String>,

    /// Content-type counts as a canonical JSON object string
    pub content_types: String,

    /// Count of parts that were neither HTML nor plain text
    pub non_main_content: u32,

    /// Message had child parts
    pub multipart: bool,

    /// Combined character count of both bodies
    pub char_count: usize,

    /// Combined word count of both bodies
    pub word_count: usize,

    /// Uppercase-character ratio
    pub shoutiness: f64,

    /// Literal `!` count across both bodies
    pub exclamations: usize,
}

impl FeatureRecord {
    /// Column names in schema order
    pub const COLUMNS: [&'static str; 28] = [
        "subject",
        "from_raw",
        "from_name",
        "from_email",
        "from_uses_freemail",
        "to_raw",
        "to_names",
        "to_emails",
        "to_emails_count",
        "reply_to_raw",
        "reply_to_name",
        "reply_to_email",
        "to_is_reply_to",
        "cc",
        "has_list_unsub",
        "content_type_raw",
        "date",
        "message_id",
        "type",
        "html_body",
        "plain_body",
        "content_types",
        "non_main_content",
        "multipart",
        "char_count",
        "word_count",
        "shoutiness",
        "exclamations",
    ];
}

/// Ordered collection of feature records with a fixed column schema
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureTable {
    records: Vec<FeatureRecord>,
}

impl FeatureTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Append one row, preserving input order
    pub fn push(&mut self, record: FeatureRecord) {
        self.records.push(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<FeatureRecord> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureRecord> {
        self.records.iter()
    }

    /// Column names shared by every row
    #[must_use]
    pub const fn columns() -> [&'static str; 28] {
        FeatureRecord::COLUMNS
    }

    #[must_use]
    pub const fn column_count() -> usize {
        FeatureRecord::COLUMNS.len()
    }
}

impl IntoIterator for FeatureTable {
    type Item = FeatureRecord;
    type IntoIter = std::vec::IntoIter<FeatureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureTable {
    type Item = &'a FeatureRecord;
    type IntoIter = std::slice::Iter<'a, FeatureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<FeatureRecord> for FeatureTable {
    fn from_iter<I: IntoIterator<Item = FeatureRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
