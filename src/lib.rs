// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Feature Extraction
//!
//! Extracts flat feature rows from raw email messages for downstream
//! tabular analysis, such as spam-classification datasets.
//!
//! # Features
//!
//! - Multipart-aware body extraction with per-content-type bookkeeping
//! - Charset-tolerant decoding that never fails on malformed input
//! - HTML-to-visible-text reduction
//! - Text statistics: word count, uppercase ratio, exclamation count
//! - Fixed 28-column record schema with address parsing and spam flags
//! - Batch reading of message files into an ordered table
//!
//! # Example
//!
//! ```rust
//! use email_features::build_record;
//!
//! let raw = b"From: sender@example.com\r\nTo: rcpt@example.com\r\nSubject: Hello\r\n\r\nBody text";
//! let parsed = mailparse::parse_mail(raw).unwrap();
//! let record = build_record(&parsed).unwrap();
//!
//! assert_eq!(record.from_email, "sender@example.com");
//! assert_eq!(record.word_count, 2);
//! ```

mod content;
mod error;
mod features;
mod reader;
mod types;

pub use content::{extract_content, html_to_text};
pub use error::{ExtractError, Result};
pub use features::build_record;
pub use reader::{read_messages, read_messages_lossy};
pub use types::*;
