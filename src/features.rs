//! Feature record assembly
//!
//! Combines the content bundle with parsed address headers, boolean
//! flags, and derived text statistics into the flat 28-column
//! [`FeatureRecord`].

use crate::content::extract_content;
use crate::error::{ExtractError, Result};
use crate::types::FeatureRecord;
use mailparse::{MailAddr, MailHeaderMap, ParsedMail};
use tracing::warn;

/// Domains treated as freemail providers; matched by case-sensitive suffix
const FREEMAIL_PROVIDERS: [&str; 4] = ["gmail.com", "hotmail.com", "yahoo.com", "msn.com"];

/// Ordered (display-name, address) pairs parsed from one address header
type AddressPairs = Vec<(Option<String>, String)>;

/// Build the full feature record for one parsed message
///
/// Fails when the message has no parseable `From` address or when its
/// MIME structure cannot be traversed; content-type and charset anomalies
/// are recovered internally.
pub fn build_record(message: &ParsedMail) -> Result<FeatureRecord> {
    let content = extract_content(message)?;

    let from_raw = message
        .headers
        .get_first_value("From")
        .ok_or(ExtractError::MissingAddress("From"))?;
    let from_pairs = parse_address_list("From", &from_raw);
    let (from_name, from_email) = from_pairs
        .first()
        .map(|(name, addr)| (name.clone().unwrap_or_default(), addr.clone()))
        .ok_or(ExtractError::MissingAddress("From"))?;
    let from_uses_freemail = from_email
        .split_once('@')
        .is_some_and(|(_, domain)| FREEMAIL_PROVIDERS.iter().any(|p| domain.ends_with(p)));

    let to_raw = message.headers.get_first_value("To");
    let to_pairs = to_raw
        .as_deref()
        .map_or_else(AddressPairs::new, |raw| parse_address_list("To", raw));
    let to_emails_count = to_pairs.len();
    let to_names = join_nonempty(to_pairs.iter().filter_map(|(name, _)| name.as_deref()));
    let to_emails = join_nonempty(to_pairs.iter().map(|(_, addr)| addr.as_str()));

    let reply_to_raw = message.headers.get_first_value("Reply-To");
    let reply_to_pairs = reply_to_raw
        .as_deref()
        .map_or_else(AddressPairs::new, |raw| parse_address_list("Reply-To", raw));
    // An absent Reply-To is common; unlike From it degrades to nulls.
    let (reply_to_name, reply_to_email) = reply_to_pairs.first().map_or((None, None), |(name, addr)| {
        (
            Some(name.clone().unwrap_or_default()),
            Some(addr.clone()),
        )
    });

    let to_is_reply_to = to_raw.is_some() && to_raw == reply_to_raw;
    let has_list_unsub = message.headers.get_first_value("List-Unsubscribe").is_some();

    let char_count = content.total_length();
    let word_count = content.word_count();
    let shoutiness = content.uppercase_ratio();
    let exclamations = content.exclamation_count();

    let content_types = serde_json::to_string(&content.content_types)?;

    Ok(FeatureRecord {
        subject: message.headers.get_first_value("Subject"),
        from_raw,
        from_name,
        from_email,
        from_uses_freemail,
        to_raw,
        to_names,
        to_emails,
        to_emails_count,
        reply_to_raw,
        reply_to_name,
        reply_to_email,
        to_is_reply_to,
        cc: message.headers.get_first_value("Cc"),
        has_list_unsub,
        content_type_raw: message.headers.get_first_value("Content-Type"),
        date: message.headers.get_first_value("Date"),
        message_id: message.headers.get_first_value("Message-ID"),
        kind: content.kind(),
        html_body: content.html,
        plain_body: content.plain,
        content_types,
        non_main_content: content.non_main_count,
        multipart: content.multipart,
        char_count,
        word_count,
        shoutiness,
        exclamations,
    })
}

/// Parse an address-list header into ordered (display-name, address) pairs
///
/// Groups are flattened into their member addresses. An unparseable list
/// yields no pairs with a diagnostic; presence requirements are the
/// caller's concern.
fn parse_address_list(header: &str, raw: &str) -> AddressPairs {
    match mailparse::addrparse(raw) {
        Ok(list) => list
            .iter()
            .flat_map(|addr| match addr {
                MailAddr::Single(single) => {
                    vec![(single.display_name.clone(), single.addr.clone())]
                }
                MailAddr::Group(group) => group
                    .addrs
                    .iter()
                    .map(|single| (single.display_name.clone(), single.addr.clone()))
                    .collect(),
            })
            .collect(),
        Err(e) => {
            warn!(header, error = %e, "could not parse address list");
            AddressPairs::new()
        }
    }
}

/// Comma-join the non-empty entries of an iterator
fn join_nonempty<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.filter(|p| !p.is_empty()).collect::<Vec<_>>().join(",")
}
