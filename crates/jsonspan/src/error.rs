use thiserror::Error;

/// Diagnostic recorded when the scanner reports an `Invalid` token.
///
/// Malformed payloads never raise an error through the API: the scanner
/// transitions to the sticky [`TokenKind::Invalid`] state and keeps the last
/// diagnostic available through [`Scanner::error`]. Offsets are byte offsets
/// into the payload.
///
/// [`TokenKind::Invalid`]: crate::TokenKind::Invalid
/// [`Scanner::error`]: crate::Scanner::error
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// A value was expected but the byte at the offset cannot start one.
    #[error("unexpected character at offset {0}")]
    UnexpectedCharacter(usize),
    /// The payload ended inside a value or an open container.
    #[error("unexpected end of payload")]
    UnexpectedEndOfPayload,
    /// A `null`, `true`, or `false` literal did not match exactly.
    #[error("malformed literal at offset {0}")]
    MalformedLiteral(usize),
    /// A number was started but violates the number grammar at the offset.
    #[error("malformed number at offset {0}")]
    MalformedNumber(usize),
    /// A string opened at the offset was never closed.
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    /// An object member is not a quoted name followed by `:`.
    #[error("malformed property name at offset {0}")]
    MalformedProperty(usize),
    /// A `,` (or the container's closing delimiter) was required.
    #[error("missing element separator at offset {0}")]
    MissingSeparator(usize),
}
