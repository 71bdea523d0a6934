//! Repairs fragments whose Cyrillic text arrived as literal `\xNN` escapes.
//!
//! The escapes are turned back into raw bytes (every other character is taken
//! as a single Latin-1 byte) and the bytes are decoded as UTF-8. Broken
//! sequences are patched one at a time:
//!
//! * a byte that cannot start a sequence is dropped,
//! * a lead byte followed by a bad continuation gets a `0xA0` byte inserted
//!   after the valid part,
//! * a sequence cut off at the end of the fragment is dropped.
//!
//! This is a lossy approximation. A repaired fragment is valid text but may
//! lose or gain a character where the source was corrupted.

use tracing::warn;

/// Byte inserted to complete a sequence with a bad continuation byte
const PADDING_BYTE: u8 = 0xA0;

/// Repair and trim every fragment
pub fn decode_data(fragments: &[String]) -> Vec<String> {
    fragments.iter().map(|f| repair_fragment(f)).collect()
}

/// Repair a single fragment. Fragments without escapes are only trimmed.
pub fn repair_fragment(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.trim().to_string();
    }
    convert_bytes_to_string(unescape_bytes(raw))
}

/// Whether the fragment still carries `\xNN` escapes for non-ASCII bytes
pub fn has_escaped_bytes(fragment: &str) -> bool {
    fragment.contains("\\xd") || fragment.contains("\\xc") || fragment.contains("\\xe")
}

/// Turn the literal escapes of a fragment back into bytes
fn unescape_bytes(raw: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            push_latin1(&mut bytes, c);
            continue;
        }
        match chars.peek().copied() {
            Some('x') => {
                chars.next();
                let hex: String = chars.clone().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => {
                        bytes.push(byte);
                        chars.nth(1);
                    }
                    _ => bytes.extend_from_slice(b"\\x"),
                }
            }
            Some('n') => {
                chars.next();
                bytes.push(b'\n');
            }
            Some('t') => {
                chars.next();
                bytes.push(b'\t');
            }
            Some('r') => {
                chars.next();
                bytes.push(b'\r');
            }
            Some(q @ ('\\' | '\'' | '"')) => {
                chars.next();
                bytes.push(q as u8);
            }
            _ => bytes.push(b'\\'),
        }
    }

    bytes
}

fn push_latin1(bytes: &mut Vec<u8>, c: char) {
    match u8::try_from(u32::from(c)) {
        Ok(byte) => bytes.push(byte),
        // Already decoded text outside Latin-1 passes through as UTF-8
        Err(_) => {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
    }
}

/// A byte that can never begin a UTF-8 sequence
fn is_invalid_start(byte: u8) -> bool {
    matches!(byte, 0x80..=0xBF | 0xC0 | 0xC1 | 0xF5..=0xFF)
}

/// Decode bytes as UTF-8, patching one broken spot per attempt
pub fn convert_bytes_to_string(mut bytes: Vec<u8>) -> String {
    // Each attempt removes or patches one problem, so the input length bounds the work
    let max_attempts = bytes.len() + 1;

    for _ in 0..max_attempts {
        let err = match std::str::from_utf8(&bytes) {
            Ok(text) => return text.trim().to_string(),
            Err(err) => err,
        };

        let at = err.valid_up_to();
        match err.error_len() {
            Some(len) if is_invalid_start(bytes[at]) => {
                warn!(offset = at, "Dropping invalid start byte {:#04x}", bytes[at]);
                bytes.drain(at..at + len);
            }
            Some(len) => {
                warn!(offset = at + len, "Padding invalid continuation byte");
                bytes.insert(at + len, PADDING_BYTE);
            }
            None => {
                warn!(offset = at, "Dropping truncated sequence at end of fragment");
                bytes.truncate(at);
            }
        }
    }

    warn!("Decoding repair did not converge, replacing remaining invalid bytes");
    String::from_utf8_lossy(&bytes).trim().to_string()
}
