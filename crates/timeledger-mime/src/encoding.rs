//! MIME decoding utilities.
//!
//! Supports Base64, Quoted-Printable, RFC 2047 encoded words and the
//! handful of charsets commonly found in mail archives.

use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Standard alphabet that accepts missing padding and stray trailing bits.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes Base64 data leniently.
///
/// Whitespace, padding and any byte outside the alphabet are skipped, and a
/// lone trailing symbol that cannot form a byte is dropped.
///
/// # Errors
///
/// Returns an error only if the cleaned input still fails to decode.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let mut cleaned: String = data
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/'))
        .collect();
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    LENIENT.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable text (RFC 2045) into raw bytes.
///
/// The charset is applied afterwards, see [`decode_charset`]. An `=` that
/// does not start a valid escape or soft line break is kept literally.
#[must_use]
pub fn decode_quoted_printable(text: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(text.len());
    let mut i = 0;

    while i < text.len() {
        let byte = text[i];
        if byte != b'=' {
            result.push(byte);
            i += 1;
            continue;
        }

        // Soft line break
        match text.get(i + 1..) {
            Some([b'\r', b'\n', ..]) => {
                i += 3;
                continue;
            }
            Some([b'\n', ..]) => {
                i += 2;
                continue;
            }
            _ => {}
        }

        match text.get(i + 1..i + 3).and_then(hex_pair) {
            Some(value) => {
                result.push(value);
                i += 3;
            }
            None => {
                result.push(b'=');
                i += 1;
            }
        }
    }

    result
}

fn hex_pair(pair: &[u8]) -> Option<u8> {
    let high = char::from(pair[0]).to_digit(16)?;
    let low = char::from(pair[1]).to_digit(16)?;
    u8::try_from(high * 16 + low).ok()
}

/// Converts bytes in the given charset to a string.
///
/// UTF-8 and ASCII decode lossily; ISO-8859-1 and Windows-1252 map bytes
/// to code points directly. Unknown charsets fall back to lossy UTF-8.
#[must_use]
pub fn decode_charset(bytes: &[u8], charset: Option<&str>) -> String {
    let charset = charset.map(str::to_ascii_lowercase);
    match charset.as_deref() {
        Some("iso-8859-1" | "latin1" | "latin-1" | "windows-1252" | "cp1252") => {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Format: `=?charset?encoding?encoded-text?=`. Whitespace between two
/// adjacent encoded words is dropped; plain text is kept as-is.
///
/// # Errors
///
/// Returns an error if an encoded word uses an unknown encoding or its
/// payload cannot be decoded.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut previous_was_word = false;

    while let Some(start) = rest.find("=?") {
        let Some((word, consumed)) = split_encoded_word(&rest[start..]) else {
            // Not a well-formed word: emit the marker literally and move on
            output.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            previous_was_word = false;
            continue;
        };

        let between = &rest[..start];
        if !(previous_was_word && between.trim().is_empty()) {
            output.push_str(between);
        }
        output.push_str(&decode_encoded_word(word)?);
        rest = &rest[start + consumed..];
        previous_was_word = true;
    }

    output.push_str(rest);
    Ok(output)
}

/// Returns the inner `charset?enc?text` of an encoded word and its total length.
fn split_encoded_word(s: &str) -> Option<(&str, usize)> {
    let inner = s.strip_prefix("=?")?;
    let first = inner.find('?')?;
    let second = first + 1 + inner[first + 1..].find('?')?;
    let end = second + 1 + inner[second + 1..].find("?=")?;
    Some((&inner[..end], end + 4))
}

fn decode_encoded_word(word: &str) -> Result<String> {
    let mut fields = word.splitn(3, '?');
    let (Some(charset), Some(encoding), Some(payload)) = (fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::InvalidEncoding("Invalid RFC 2047 format".to_string()));
    };

    // RFC 2231 language suffix, e.g. "utf-8*en"
    let charset = charset.split('*').next().unwrap_or(charset);

    let bytes = match encoding.to_ascii_uppercase().as_str() {
        "B" => decode_base64(payload)?,
        "Q" => decode_quoted_printable(payload.replace('_', " ").as_bytes()),
        other => {
            return Err(Error::InvalidEncoding(format!("Unknown encoding: {other}")));
        }
    };

    Ok(decode_charset(&bytes, Some(charset)))
}
