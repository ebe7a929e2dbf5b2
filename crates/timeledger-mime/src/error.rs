//! Errors raised while decoding mail.

/// Result type alias for MIME operations.
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong decoding a message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `Content-Type` value without a usable `type/subtype`.
    #[error("Invalid content type: {0}")]
    InvalidContentType(String),

    /// Malformed quoted-printable or encoded-word data.
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Malformed base64 data.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// A multipart body whose `boundary` parameter is absent.
    #[error("Multipart body without boundary")]
    MissingBoundary,

    /// A `Date` header in no recognized layout.
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
