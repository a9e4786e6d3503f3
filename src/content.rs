//! Message body extraction and decoding
//!
//! Walks a parsed message's MIME structure and produces a [`ContentBundle`]:
//! decoded HTML/plain bodies, per-content-type counts, and the count of
//! ignored parts. Decoding never fails; charset problems fall back to
//! Latin-1 with replacement. Only structural faults (payload retrieval,
//! traversal) surface as errors.

use crate::error::{ExtractError, Result};
use crate::types::ContentBundle;
use encoding_rs::Encoding;
use mailparse::ParsedMail;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, error, warn};

pub(crate) const CONTENT_TYPE_HTML: &str = "text/html";
pub(crate) const CONTENT_TYPE_PLAIN: &str = "text/plain";

/// Charset labels that name no real encoding; treated as absent
const CHARSET_PLACEHOLDERS: [&str; 2] = ["default_charset", "unknown-8bit"];

/// Last-resort encoding; maps every byte, so decoding cannot fail
static FALLBACK_ENCODING: &Encoding = &encoding_rs::WINDOWS_1252_INIT;

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Extract the normalized content bundle from a parsed message
///
/// Multipart messages have their direct child parts inspected in document
/// order; nested multiparts are not recursed into, so deeply nested
/// structures keep only what the top traversal level exposes. Non-text
/// parts are counted and skipped with a diagnostic.
pub fn extract_content(message: &ParsedMail) -> Result<ContentBundle> {
    extract_inner(message).inspect_err(|e| error!(error = %e, "could not extract message body"))
}

fn extract_inner(message: &ParsedMail) -> Result<ContentBundle> {
    if message.subparts.is_empty() {
        extract_single(message)
    } else {
        extract_multipart(message)
    }
}

fn extract_multipart(message: &ParsedMail) -> Result<ContentBundle> {
    let mut content_types: BTreeMap<String, u32> = BTreeMap::new();
    let mut html_parts: Vec<String> = Vec::new();
    let mut plain_parts: Vec<String> = Vec::new();
    let mut non_main_count: u32 = 0;

    for part in &message.subparts {
        let content_type = part.ctype.mimetype.to_lowercase();
        *content_types.entry(content_type.clone()).or_insert(0) += 1;

        if content_type == CONTENT_TYPE_HTML {
            html_parts.push(safe_decode(part)?);
        } else if content_type == CONTENT_TYPE_PLAIN {
            plain_parts.push(safe_decode(part)?);
        } else {
            non_main_count += 1;
            debug!(content_type = %content_type, "ignoring non-text part");
        }
    }

    let html = (!html_parts.is_empty()).then(|| html_parts.join("\n"));
    let plain = (!plain_parts.is_empty()).then(|| plain_parts.join("\n"));

    Ok(ContentBundle::new(
        html,
        plain,
        content_types,
        true,
        non_main_count,
    ))
}

fn extract_single(message: &ParsedMail) -> Result<ContentBundle> {
    let content_type = message.ctype.mimetype.to_lowercase();
    let mut content_types: BTreeMap<String, u32> = BTreeMap::new();
    content_types.insert(content_type.clone(), 1);

    let mut html: Option<String> = None;
    let mut plain: Option<String> = None;

    if content_type == CONTENT_TYPE_HTML {
        html = Some(safe_decode(message)?);
    } else if content_type == CONTENT_TYPE_PLAIN {
        plain = Some(safe_decode(message)?);
    } else if content_type.starts_with("multipart/") {
        warn!(content_type = %content_type, "message claims to be multipart but has no parts");
    } else {
        debug!(content_type = %content_type, "unhandled content type");
    }

    Ok(ContentBundle::new(html, plain, content_types, false, 0))
}

/// Decode a part's payload, never failing on charset problems
///
/// Placeholder or missing charset labels resolve to Latin-1; unknown
/// labels fall back to Latin-1; malformed byte sequences decode to the
/// replacement character. Only payload retrieval itself can error.
fn safe_decode(part: &ParsedMail) -> Result<String> {
    let raw = part
        .get_body_raw()
        .map_err(|e| ExtractError::Payload(e.to_string()))?;

    let label = part.ctype.charset.trim();
    let label = if label.is_empty()
        || CHARSET_PLACEHOLDERS
            .iter()
            .any(|p| label.eq_ignore_ascii_case(p))
    {
        "latin1"
    } else {
        label
    };

    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
        debug!(charset = label, "unknown charset label, falling back to latin-1");
        FALLBACK_ENCODING
    });

    let (text, _, had_errors) = encoding.decode(&raw);
    if had_errors {
        debug!(
            charset = encoding.name(),
            "replaced malformed byte sequences during decode"
        );
    }

    Ok(text.into_owned())
}

/// Reduce markup to its visible text, whitespace-collapsed
///
/// Tolerant of arbitrary markup; unparseable input yields whatever text
/// survives reduction, possibly empty, never an error.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    collapse_spaces(&html2text::from_read(html.as_bytes(), 120))
}

/// Collapse every run of two-or-more whitespace characters to one space
pub(crate) fn collapse_spaces(text: &str) -> String {
    RE_SPACES.replace_all(text, " ").into_owned()
}
