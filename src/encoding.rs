//! Character encoding detection and transcoding for feed payloads.
//!
//! Japanese platforms still serve the occasional Shift_JIS or EUC-JP feed,
//! and relays do not always forward the original `Content-Type`. This
//! module detects the charset and converts the payload to UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::{CONTENT_TYPE_CHARSET, XML_ENCODING};

/// Detect character encoding of a feed payload.
///
/// Looks for a declaration in the following order:
/// 1. Byte order mark
/// 2. `charset=` parameter of the `Content-Type` header
/// 3. `<?xml ... encoding="..."?>` prolog
/// 4. Defaults to UTF-8
///
/// The header outranks the prolog (RFC 7303), so a relay that transcodes a
/// feed but forwards its original prolog is still decoded once.
///
/// Only the first 1024 bytes are examined for the prolog.
#[must_use]
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(body) {
        return encoding;
    }

    if let Some(charset) = content_type.and_then(|ct| capture(&CONTENT_TYPE_CHARSET, ct)) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    let head = &body[..body.len().min(1024)];
    let head_str = String::from_utf8_lossy(head);

    if let Some(charset) = capture(&XML_ENCODING, &head_str) {
        if let Some(encoding) = Encoding::for_label(charset.as_bytes()) {
            return encoding;
        }
    }

    UTF_8
}

fn capture(re: &regex::Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode a feed payload to a UTF-8 string.
///
/// Invalid sequences become U+FFFD rather than errors. A prolog declaring
/// anything other than UTF-8 is rewritten to declare UTF-8 so downstream
/// XML parsers do not decode the text a second time.
#[must_use]
pub fn transcode_to_utf8(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);

    let (decoded, _encoding_used, _had_errors) = encoding.decode(body);
    let decoded = decoded.into_owned();
    match XML_ENCODING.captures(&decoded).and_then(|c| c.get(1)) {
        Some(m) if Encoding::for_label(m.as_str().as_bytes()) != Some(UTF_8) => {
            let mut out = String::with_capacity(decoded.len());
            out.push_str(&decoded[..m.start()]);
            out.push_str("UTF-8");
            out.push_str(&decoded[m.end()..]);
            out
        }
        _ => decoded,
    }
}
