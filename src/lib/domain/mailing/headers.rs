//! Message header block

use base64::{engine::general_purpose::STANDARD, Engine as _};
use lettre::message::Mailbox;

/// Encodes non-ASCII text as an RFC 2047 encoded-word
fn encode_word(text: &str) -> String {
    if text.is_ascii() {
        text.to_string()
    } else {
        format!("=?utf-8?b?{}?=", STANDARD.encode(text))
    }
}

/// Replaces control characters, so a value cannot break out of its header line
fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn format_mailbox(mailbox: &Mailbox) -> String {
    match mailbox.name.as_deref().map(single_line) {
        Some(name) if !name.is_ascii() => format!("{} <{}>", encode_word(&name), mailbox.email),
        // lettre refuses to display a name containing CR or LF
        Some(name) => Mailbox::new(Some(name), mailbox.email.clone()).to_string(),
        None => mailbox.email.to_string(),
    }
}

/// Builds the header block: one CRLF-terminated line each for `From`, `To`,
/// `Subject`, `Content-Type` and `charset`, in that order.
pub fn build_headers(from: &Mailbox, to: &Mailbox, subject: &str) -> String {
    let subject = single_line(subject);

    [
        ("From", format_mailbox(from)),
        ("To", format_mailbox(to)),
        ("Subject", encode_word(&subject)),
        ("Content-Type", "text/html".to_string()),
        ("charset", "UTF-8".to_string()),
    ]
    .iter()
    .map(|(name, value)| format!("{name}: {value}\r\n"))
    .collect()
}
