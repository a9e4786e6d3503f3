use email_features::{ContentKind, ExtractError, FeatureRecord, build_record};

fn parse(raw: &[u8]) -> mailparse::ParsedMail<'_> {
    mailparse::parse_mail(raw).unwrap()
}

#[test]
fn test_full_record_assembly() {
    let raw = b"From: John Doe <john@gmail.com>\r\n\
                To: Alice <alice@example.com>, bob@example.com\r\n\
                Reply-To: support@example.com\r\n\
                Cc: carol@example.com\r\n\
                Subject: Big News\r\n\
                Date: Thu, 01 Jan 2025 12:00:00 +0000\r\n\
                Message-ID: <test123@example.com>\r\n\
                List-Unsubscribe: <mailto:unsub@example.com>\r\n\
                \r\n\
                Hello world";

    let record = build_record(&parse(raw)).unwrap();

    assert_eq!(record.subject.as_deref(), Some("Big News"));
    assert_eq!(record.from_name, "John Doe");
    assert_eq!(record.from_email, "john@gmail.com");
    assert!(record.from_uses_freemail);

    assert_eq!(record.to_emails_count, 2);
    assert_eq!(record.to_names, "Alice");
    assert_eq!(record.to_emails, "alice@example.com,bob@example.com");

    assert_eq!(record.reply_to_email.as_deref(), Some("support@example.com"));
    assert!(!record.to_is_reply_to);
    assert!(record.has_list_unsub);
    assert_eq!(record.cc.as_deref(), Some("carol@example.com"));
    assert_eq!(record.date.as_deref(), Some("Thu, 01 Jan 2025 12:00:00 +0000"));
    assert_eq!(record.message_id.as_deref(), Some("<test123@example.com>"));

    assert_eq!(record.kind, ContentKind::Plain);
    assert_eq!(record.plain_body.as_deref(), Some("Hello world"));
    assert_eq!(record.html_body, None);
    assert_eq!(record.content_types, "{\"text/plain\":1}");
    assert_eq!(record.non_main_content, 0);
    assert!(!record.multipart);

    assert_eq!(record.char_count, 11);
    assert_eq!(record.word_count, 2);
    assert_eq!(record.exclamations, 0);
}

#[test]
fn test_missing_from_is_fatal() {
    let raw = b"To: alice@example.com\r\n\
                Subject: No sender\r\n\
                \r\n\
                Body";

    let err = build_record(&parse(raw)).unwrap_err();

    assert!(matches!(err, ExtractError::MissingAddress("From")));
}

#[test]
fn test_empty_from_is_fatal() {
    let raw = b"From: \r\n\
                To: alice@example.com\r\n\
                Subject: Blank sender\r\n\
                \r\n\
                Body";

    let err = build_record(&parse(raw)).unwrap_err();

    assert!(matches!(err, ExtractError::MissingAddress("From")));
}

#[test]
fn test_absent_reply_to_degrades_to_null() {
    let raw = b"From: a@example.com\r\n\
                To: b@example.com\r\n\
                Subject: Test\r\n\
                \r\n\
                Body";

    let record = build_record(&parse(raw)).unwrap();

    assert_eq!(record.reply_to_raw, None);
    assert_eq!(record.reply_to_name, None);
    assert_eq!(record.reply_to_email, None);
    assert!(!record.to_is_reply_to);
}

#[test]
fn test_to_is_reply_to_requires_exact_raw_equality() {
    let raw = b"From: a@example.com\r\n\
                To: b@example.com\r\n\
                Reply-To: b@example.com\r\n\
                Subject: Test\r\n\
                \r\n\
                Body";

    let record = build_record(&parse(raw)).unwrap();
    assert!(record.to_is_reply_to);

    let raw = b"From: a@example.com\r\n\
                To: b@example.com\r\n\
                Reply-To: Bee <b@example.com>\r\n\
                Subject: Test\r\n\
                \r\n\
                Body";

    let record = build_record(&parse(raw)).unwrap();
    assert!(!record.to_is_reply_to);
}

#[test]
fn test_freemail_matches_by_suffix() {
    let cases = [
        ("a@gmail.com", true),
        ("a@msn.com", true),
        // Suffix match, not domain equality
        ("a@mail.yahoo.com", true),
        ("a@example.com", false),
        // Case-sensitive on purpose
        ("a@GMAIL.COM", false),
    ];

    for (addr, expected) in cases {
        let raw = format!("From: {addr}\r\nSubject: T\r\n\r\nBody");
        let record = build_record(&parse(raw.as_bytes())).unwrap();
        assert_eq!(
            record.from_uses_freemail, expected,
            "unexpected freemail result for {addr}"
        );
    }
}

#[test]
fn test_absent_to_yields_empty_aggregates() {
    let raw = b"From: a@example.com\r\n\
                Subject: Test\r\n\
                \r\n\
                Body";

    let record = build_record(&parse(raw)).unwrap();

    assert_eq!(record.to_raw, None);
    assert_eq!(record.to_emails_count, 0);
    assert_eq!(record.to_names, "");
    assert_eq!(record.to_emails, "");
}

#[test]
fn test_multipart_record_has_both_bodies() {
    let raw = b"From: a@example.com\r\n\
                To: b@example.com\r\n\
                Subject: Test\r\n\
                MIME-Version: 1.0\r\n\
                Content-Type: multipart/alternative; boundary=\"sep\"\r\n\
                \r\n\
                --sep\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                Hi\r\n\
                --sep\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <p>Hi</p>\r\n\
                --sep--\r\n";

    let record = build_record(&parse(raw)).unwrap();

    assert_eq!(record.kind, ContentKind::Both);
    assert!(record.multipart);
    assert!(record.html_body.is_some());
    assert!(record.plain_body.is_some());
    assert!(record.content_types.contains("\"text/html\":1"));
    assert!(record.content_types.contains("\"text/plain\":1"));
}

#[test]
fn test_record_serializes_to_fixed_schema() {
    let raw = b"From: a@example.com\r\n\
                To: b@example.com\r\n\
                Subject: Test\r\n\
                \r\n\
                Body";

    let record = build_record(&parse(raw)).unwrap();
    let value = serde_json::to_value(&record).unwrap();
    let object = value.as_object().unwrap();

    assert_eq!(object.len(), FeatureRecord::COLUMNS.len());
    assert_eq!(object.len(), 28);
    for column in FeatureRecord::COLUMNS {
        assert!(object.contains_key(column), "missing column {column}");
    }
    assert_eq!(object["type"], "plain");
}
