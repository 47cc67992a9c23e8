//! Token kinds reported by the scanner.
//!
//! `TokenKind` enumerates every state the scanner can surface, including the
//! two terminal end-of-payload states. The grouping predicates mirror how the
//! scanner and emitter reason about tokens: containers (and the open/closed
//! split), scalar values, numbers, and end-of-payload.

/// The kind of the token currently reported by a [`Scanner`].
///
/// `None` is only observable before the first advance. `Complete` and
/// `Invalid` are terminal: once reached, further advances leave the scanner
/// unchanged.
///
/// [`Scanner`]: crate::Scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// No token has been produced yet.
    None,
    /// `[`.
    BeginArray,
    /// `]`; the segment spans the whole array including both delimiters.
    EndArray,
    /// `{`.
    BeginObject,
    /// `}`; the segment spans the whole object including both delimiters.
    EndObject,
    /// A property name and its `:`; the segment covers both.
    BeginProperty,
    /// End of a property; the segment spans the name through its value.
    EndProperty,
    /// The `null` literal.
    Null,
    /// The `true` or `false` literal.
    Boolean,
    /// A number without fraction or exponent, or a `0x` hex integer.
    Integer,
    /// A number with a fraction or exponent part.
    Float,
    /// A quoted string, segment includes the quotes.
    String,
    /// The payload held exactly one well-formed value and it has been
    /// consumed.
    Complete,
    /// The payload is malformed at the segment offset. Terminal.
    Invalid,
}

impl TokenKind {
    /// Begin or end of an array, object, or property.
    #[must_use]
    pub fn is_container(self) -> bool {
        self.is_open_container() || self.is_closed_container()
    }

    /// One of the three `Begin*` container kinds.
    #[must_use]
    pub fn is_open_container(self) -> bool {
        matches!(
            self,
            TokenKind::BeginArray | TokenKind::BeginObject | TokenKind::BeginProperty
        )
    }

    /// One of the three `End*` container kinds.
    #[must_use]
    pub fn is_closed_container(self) -> bool {
        matches!(
            self,
            TokenKind::EndArray | TokenKind::EndObject | TokenKind::EndProperty
        )
    }

    /// A scalar value: `null`, boolean, number, or string.
    #[must_use]
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenKind::Null
                | TokenKind::Boolean
                | TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
        )
    }

    /// `Integer` or `Float`.
    #[must_use]
    pub fn is_number(self) -> bool {
        matches!(self, TokenKind::Integer | TokenKind::Float)
    }

    /// `Complete` or `Invalid`; both are sticky.
    #[must_use]
    pub fn is_end_of_payload(self) -> bool {
        matches!(self, TokenKind::Complete | TokenKind::Invalid)
    }
}
