use encoding_rs::{Encoding, UTF_8};

use crate::DecodedBody;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown charset {label:?}")]
    UnknownCharset { label: String },
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode a success body using the `charset` parameter of its MIME type.
///
/// Without a charset parameter the body is taken to be UTF-8.
pub fn decode_body(bytes: &[u8], mime: &str) -> Result<DecodedBody, DecodeError> {
    let encoding = match charset_param(mime) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or(DecodeError::UnknownCharset { label })?,
        None => UTF_8,
    };
    decode_with(bytes, encoding)
}

/// Value of the `charset` parameter in a MIME type string, if any.
pub fn charset_param(mime: &str) -> Option<String> {
    mime.split(';')
        .skip(1)
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\''].as_ref()))
        })
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn is_textual(mime: &str) -> bool {
    mime.trim_start()
        .get(..5)
        .is_some_and(|top| top.eq_ignore_ascii_case("text/"))
}

/// A byte order mark is only dropped when it belongs to `enc`; it never
/// switches the body to another encoding.
fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedBody, DecodeError> {
    let (text, had_errors) = enc.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "malformed byte sequence".into(),
        });
    }
    Ok(DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_param_is_case_insensitive_and_unquoted() {
        assert_eq!(
            charset_param("text/gemini; lang=en; Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1".to_string())
        );
        assert_eq!(charset_param("text/gemini"), None);
        assert_eq!(charset_param("text/gemini; charset="), None);
    }

    #[test]
    fn textual_mime_detection() {
        assert!(is_textual("text/gemini; lang=en"));
        assert!(is_textual("TEXT/plain"));
        assert!(!is_textual("image/png"));
        assert!(!is_textual("te"));
    }
}
