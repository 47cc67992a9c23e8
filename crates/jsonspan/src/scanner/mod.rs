//! Forward-only JSON tokenizer.
//!
//! The scanner walks an in-memory payload one token at a time, maintaining
//! an explicit container stack instead of recursing, so nesting depth is a
//! sizing hint rather than a function of the host call stack. Tokens are
//! reported as [`Segment`]s — offsets into the payload — and nothing is
//! copied until a caller asks for a decoded value.
//!
//! Two pieces of machinery carry the design:
//!
//! - **Close lookahead.** After each recognized token the scanner peeks past
//!   whitespace. If the enclosing container's closing delimiter is next, a
//!   one-bit `close` flag is set and the End-* token is synthesized on the
//!   following advance. This is what lets an `EndArray`/`EndObject` segment
//!   span the whole container, from `[` through `]`, and it centralizes
//!   element-separator handling in one place.
//! - **Decode on demand.** String scanning only records that a `\` was seen.
//!   The common all-ASCII string is returned as a borrowed slice of the
//!   payload; the decode scratch buffer is touched only when an escape was
//!   actually present.
//!
//! Malformed input is never an `Err`: the scanner parks itself in the sticky
//! [`TokenKind::Invalid`] state (with a [`ScanError`] diagnostic) and every
//! later advance returns `false`. There is no resynchronization.

use alloc::vec::Vec;

use crate::{
    buffer::TextBuffer,
    error::ScanError,
    escape::{
        HexStep, UnicodeEscapeBuffer, combine_surrogates, hex_value, is_high_surrogate,
        is_low_surrogate, single_escape,
    },
    segment::Segment,
    token::TokenKind,
};

/// JSON whitespace: space, horizontal tab, carriage return, line feed.
/// No other Unicode whitespace is recognized.
#[inline]
fn is_json_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

/// Kind of an open container on the scope stack. `Root` is the sentinel
/// frame that is pushed on reset and never popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Root,
    Array,
    Object,
    Property,
}

/// One open container: its kind and the offset of its opening delimiter,
/// kept so the matching End-* token can span the whole container.
#[derive(Debug, Clone, Copy)]
struct ScopeFrame {
    kind: ScopeKind,
    start: usize,
}

impl ScopeFrame {
    const ROOT: Self = Self {
        kind: ScopeKind::Root,
        start: 0,
    };
}

/// A forward-only tokenizing cursor over a JSON payload.
///
/// The scanner is single-threaded and reusable: [`reset`](Self::reset)
/// rebinds it to a new payload while keeping the decode buffer and scope
/// stack allocations, so steady-state scanning allocates nothing.
///
/// ```
/// use jsonspan::{Scanner, TokenKind};
///
/// let mut scanner = Scanner::new(r#"[10, 20]"#, 0, 8);
/// assert!(scanner.next());
/// assert_eq!(scanner.token_kind(), TokenKind::BeginArray);
/// assert!(scanner.next());
/// assert_eq!(scanner.parse_i64(), Some(10));
/// assert!(scanner.next());
/// assert_eq!(scanner.parse_i64(), Some(20));
/// assert!(scanner.next());
/// // The closing token spans the whole array.
/// assert_eq!(scanner.token_segment().as_str(), "[10, 20]");
/// assert!(!scanner.next());
/// assert_eq!(scanner.token_kind(), TokenKind::Complete);
/// ```
#[derive(Debug)]
pub struct Scanner<'src> {
    payload: &'src str,
    /// Next byte to examine. Monotone except for the segment repositioning
    /// done when End-* tokens are reported.
    position: usize,
    segment_offset: usize,
    segment_count: usize,
    kind: TokenKind,
    /// The container on top of the stack emits its End-* token on the next
    /// advance.
    close: bool,
    /// A separator violation was detected while preparing for close; it
    /// surfaces as `Invalid` on the next advance.
    pending_error: Option<ScanError>,
    error: Option<ScanError>,
    /// The current string/property token contains at least one escape.
    decode_needed: bool,
    /// Cached value of the most recent `Boolean` token.
    truth: bool,
    scope: Vec<ScopeFrame>,
    /// Scratch for decoded string bodies; reused across tokens.
    decode: TextBuffer,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner over `payload`.
    ///
    /// The decode buffer is sized at `max(capacity_hint, payload.len())` and
    /// the scope stack at `depth_hint` frames; both grow on demand, the
    /// hints only pre-size the allocations.
    ///
    /// # Panics
    ///
    /// Panics if `depth_hint` is zero.
    #[must_use]
    pub fn new(payload: &'src str, capacity_hint: usize, depth_hint: usize) -> Self {
        assert!(depth_hint > 0, "depth_hint must be positive");
        let mut scanner = Self {
            payload: "",
            position: 0,
            segment_offset: 0,
            segment_count: 0,
            kind: TokenKind::None,
            close: false,
            pending_error: None,
            error: None,
            decode_needed: false,
            truth: false,
            scope: Vec::with_capacity(depth_hint),
            decode: TextBuffer::new(capacity_hint.max(payload.len())),
        };
        scanner.reset(payload);
        scanner
    }

    /// Rebinds the scanner to a new payload, reusing all allocations. The
    /// decode buffer grows to at least `payload.len()` if necessary.
    pub fn reset(&mut self, payload: &'src str) {
        self.payload = payload;
        self.position = 0;
        self.segment_offset = 0;
        self.segment_count = 0;
        self.kind = TokenKind::None;
        self.close = false;
        self.pending_error = None;
        self.error = None;
        self.decode_needed = false;
        self.truth = false;
        self.scope.clear();
        self.scope.push(ScopeFrame::ROOT);
        let _ = self.decode.try_grow(payload.len());
        self.decode.clear();
    }

    /// The payload being scanned.
    #[must_use]
    pub fn payload(&self) -> &'src str {
        self.payload
    }

    /// Kind of the current token.
    #[must_use]
    pub fn token_kind(&self) -> TokenKind {
        self.kind
    }

    /// Position of the current token within the payload.
    #[must_use]
    pub fn token_segment(&self) -> Segment<'src> {
        Segment::new(self.payload, self.segment_offset, self.segment_count)
    }

    /// Diagnostic for the sticky `Invalid` state; `None` while the payload
    /// is still scanning cleanly.
    #[must_use]
    pub fn error(&self) -> Option<ScanError> {
        self.error
    }

    /// Advances to the next token. Returns `false` iff the newly reached
    /// state is `Complete` or `Invalid`; both are sticky, so once this
    /// returns `false` it keeps returning `false`.
    pub fn next(&mut self) -> bool {
        if self.kind.is_end_of_payload() {
            return false;
        }
        if let Some(error) = self.pending_error.take() {
            self.set_invalid(error);
            return false;
        }
        self.decode_needed = false;
        self.skip_whitespace();
        if self.close {
            self.emit_close();
        } else {
            match self.top().kind {
                ScopeKind::Object => self.scan_property(),
                ScopeKind::Root | ScopeKind::Array | ScopeKind::Property => self.scan_value(),
            }
        }
        !self.kind.is_end_of_payload()
    }

    /// Advances until the scope stack is shorter than it was on entry, i.e.
    /// one past the matching End-* of the innermost open container, or until
    /// an end-of-payload state. Returns the last [`next`](Self::next)
    /// result.
    pub fn skip(&mut self) -> bool {
        let depth = self.scope.len();
        loop {
            if !self.next() {
                return false;
            }
            if self.scope.len() < depth {
                return true;
            }
        }
    }

    // ── Typed extraction ────────────────────────────────────────────────

    /// The value of a `Boolean` token.
    #[must_use]
    pub fn parse_bool(&self) -> Option<bool> {
        (self.kind == TokenKind::Boolean).then_some(self.truth)
    }

    /// Parses an `Integer` token as a signed 64-bit decimal.
    ///
    /// Digits accumulate into a negative total when the token is signed, so
    /// `i64::MIN` is representable. Overflow and hex bodies fail.
    #[must_use]
    pub fn parse_i64(&self) -> Option<i64> {
        if self.kind != TokenKind::Integer {
            return None;
        }
        let text = self.token_text().as_bytes();
        let negative = text.first() == Some(&b'-');
        let digits = if negative { &text[1..] } else { text };
        if digits.is_empty() {
            return None;
        }
        let mut total: i64 = 0;
        for &b in digits {
            if !b.is_ascii_digit() {
                return None;
            }
            let digit = i64::from(b - b'0');
            total = total.checked_mul(10)?;
            total = if negative {
                total.checked_sub(digit)?
            } else {
                total.checked_add(digit)?
            };
        }
        Some(total)
    }

    /// Parses an `Integer` token as an unsigned 64-bit value. Bodies
    /// beginning `0x`/`0X` parse as hexadecimal, everything else as
    /// decimal. Overflow fails.
    #[must_use]
    pub fn parse_u64(&self) -> Option<u64> {
        if self.kind != TokenKind::Integer {
            return None;
        }
        let text = self.token_text().as_bytes();
        if text.len() > 2 && text[0] == b'0' && matches!(text[1], b'x' | b'X') {
            let mut total: u64 = 0;
            for &b in &text[2..] {
                let digit = u64::from(hex_value(b)?);
                total = total.checked_mul(16)?.checked_add(digit)?;
            }
            return Some(total);
        }
        if text.is_empty() {
            return None;
        }
        let mut total: u64 = 0;
        for &b in text {
            if !b.is_ascii_digit() {
                return None;
            }
            total = total.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        }
        Some(total)
    }

    /// Parses an `Integer` or `Float` token via the host's canonical
    /// decimal-to-double conversion. Hex bodies fail.
    #[must_use]
    pub fn parse_f64(&self) -> Option<f64> {
        if !self.kind.is_number() {
            return None;
        }
        self.token_text().parse::<f64>().ok()
    }

    /// Decodes a `String` token's body, or a `BeginProperty` token's name.
    ///
    /// When the body contains no escape the returned slice borrows the
    /// payload directly and the decode buffer is untouched. Otherwise the
    /// body is decoded into the scanner's scratch buffer, which the next
    /// advance may reuse; callers that keep the text copy it out.
    ///
    /// Surrogate escapes must form a valid `\uD8xx\uDCxx` pair, which
    /// decodes to the paired scalar; an unpaired half fails.
    pub fn parse_str(&mut self) -> Option<&str> {
        let (start, end) = self.string_body()?;
        if !self.decode_needed {
            return Some(&self.payload[start..end]);
        }
        self.decode_body(start, end)
    }

    /// Like [`parse_bool`](Self::parse_bool), with `Null` yielding
    /// `Some(None)`.
    #[must_use]
    pub fn parse_opt_bool(&self) -> Option<Option<bool>> {
        if self.kind == TokenKind::Null {
            return Some(None);
        }
        self.parse_bool().map(Some)
    }

    /// Like [`parse_i64`](Self::parse_i64), with `Null` yielding
    /// `Some(None)`.
    #[must_use]
    pub fn parse_opt_i64(&self) -> Option<Option<i64>> {
        if self.kind == TokenKind::Null {
            return Some(None);
        }
        self.parse_i64().map(Some)
    }

    /// Like [`parse_u64`](Self::parse_u64), with `Null` yielding
    /// `Some(None)`.
    #[must_use]
    pub fn parse_opt_u64(&self) -> Option<Option<u64>> {
        if self.kind == TokenKind::Null {
            return Some(None);
        }
        self.parse_u64().map(Some)
    }

    /// Like [`parse_f64`](Self::parse_f64), with `Null` yielding
    /// `Some(None)`.
    #[must_use]
    pub fn parse_opt_f64(&self) -> Option<Option<f64>> {
        if self.kind == TokenKind::Null {
            return Some(None);
        }
        self.parse_f64().map(Some)
    }

    /// Like [`parse_str`](Self::parse_str), with `Null` yielding
    /// `Some(None)`.
    pub fn parse_opt_str(&mut self) -> Option<Option<&str>> {
        if self.kind == TokenKind::Null {
            return Some(None);
        }
        self.parse_str().map(Some)
    }

    // ── Recognition ─────────────────────────────────────────────────────

    #[inline]
    fn bytes(&self) -> &'src [u8] {
        self.payload.as_bytes()
    }

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes().get(self.position).copied()
    }

    #[inline]
    fn top(&self) -> ScopeFrame {
        self.scope.last().copied().unwrap_or(ScopeFrame::ROOT)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            if !is_json_whitespace(b) {
                break;
            }
            self.position += 1;
        }
    }

    #[inline]
    fn token_text(&self) -> &'src str {
        &self.payload[self.segment_offset..self.segment_offset + self.segment_count]
    }

    fn set_token(&mut self, kind: TokenKind, offset: usize, count: usize) {
        self.kind = kind;
        self.segment_offset = offset;
        self.segment_count = count;
    }

    fn set_invalid(&mut self, error: ScanError) {
        self.kind = TokenKind::Invalid;
        self.segment_offset = self.position;
        self.segment_count = 0;
        self.error = Some(error);
    }

    fn scan_value(&mut self) {
        match self.peek_byte() {
            None => self.set_invalid(ScanError::UnexpectedEndOfPayload),
            Some(b'n') => self.scan_literal("null", TokenKind::Null, false),
            Some(b't') => self.scan_literal("true", TokenKind::Boolean, true),
            Some(b'f') => self.scan_literal("false", TokenKind::Boolean, false),
            Some(b'[') => self.open_container(ScopeKind::Array, TokenKind::BeginArray),
            Some(b'{') => self.open_container(ScopeKind::Object, TokenKind::BeginObject),
            Some(b'"') => self.scan_string(),
            Some(_) => self.scan_number(),
        }
    }

    /// Literals are matched by exact ordinal comparison; no case folding.
    fn scan_literal(&mut self, literal: &'static str, kind: TokenKind, truth: bool) {
        let start = self.position;
        if self.bytes()[start..].starts_with(literal.as_bytes()) {
            self.position += literal.len();
            self.truth = truth;
            self.set_token(kind, start, literal.len());
            self.prepare_for_close();
        } else {
            self.set_invalid(ScanError::MalformedLiteral(start));
        }
    }

    fn open_container(&mut self, kind: ScopeKind, token: TokenKind) {
        let start = self.position;
        self.position += 1;
        self.scope.push(ScopeFrame { kind, start });
        self.set_token(token, start, 1);
        self.prepare_for_close();
    }

    fn scan_string(&mut self) {
        let start = self.position;
        if self.scan_string_body(start) {
            self.set_token(TokenKind::String, start, self.position - start);
            self.prepare_for_close();
        }
    }

    /// Consumes a quoted string from its opening quote through its closing
    /// quote. Escapes are not decoded here; a `\` only flags the token for
    /// the on-demand decoder.
    fn scan_string_body(&mut self, start: usize) -> bool {
        self.position += 1;
        loop {
            match self.peek_byte() {
                None => {
                    self.set_invalid(ScanError::UnterminatedString(start));
                    return false;
                }
                Some(b'"') => {
                    self.position += 1;
                    return true;
                }
                Some(b'\\') => {
                    self.decode_needed = true;
                    self.position += 2;
                    if self.position > self.payload.len() {
                        self.position = self.payload.len();
                        self.set_invalid(ScanError::UnterminatedString(start));
                        return false;
                    }
                }
                Some(_) => self.position += 1,
            }
        }
    }

    /// Number grammar: optional `-`; `0x`/`0X` plus hex digits as an
    /// integer extension; otherwise decimal digits with optional fraction
    /// and exponent, either of which promotes the token to `Float`. Leading
    /// zeros are tokenized greedily rather than rejected.
    fn scan_number(&mut self) {
        let start = self.position;
        let bytes = self.bytes();
        let mut pos = self.position;
        if bytes.get(pos) == Some(&b'-') {
            pos += 1;
        }
        match bytes.get(pos) {
            Some(b) if b.is_ascii_digit() => {}
            Some(_) => {
                self.position = pos;
                self.set_invalid(ScanError::UnexpectedCharacter(pos));
                return;
            }
            None => {
                self.position = pos;
                self.set_invalid(ScanError::MalformedNumber(pos));
                return;
            }
        }

        if bytes[pos] == b'0' && matches!(bytes.get(pos + 1), Some(&(b'x' | b'X'))) {
            pos += 2;
            let digits = Self::count_while(bytes, pos, |b| hex_value(b).is_some());
            if digits == 0 {
                self.position = pos;
                self.set_invalid(ScanError::MalformedNumber(pos));
                return;
            }
            pos += digits;
            self.position = pos;
            self.set_token(TokenKind::Integer, start, pos - start);
            self.prepare_for_close();
            return;
        }

        pos += Self::count_while(bytes, pos, |b| b.is_ascii_digit());
        let mut float = false;

        if bytes.get(pos) == Some(&b'.') {
            pos += 1;
            let digits = Self::count_while(bytes, pos, |b| b.is_ascii_digit());
            if digits == 0 {
                self.position = pos;
                self.set_invalid(ScanError::MalformedNumber(pos));
                return;
            }
            pos += digits;
            float = true;
        }

        if matches!(bytes.get(pos), Some(&(b'e' | b'E'))) {
            pos += 1;
            if matches!(bytes.get(pos), Some(&(b'+' | b'-'))) {
                pos += 1;
            }
            let digits = Self::count_while(bytes, pos, |b| b.is_ascii_digit());
            if digits == 0 {
                self.position = pos;
                self.set_invalid(ScanError::MalformedNumber(pos));
                return;
            }
            pos += digits;
            float = true;
        }

        self.position = pos;
        let kind = if float {
            TokenKind::Float
        } else {
            TokenKind::Integer
        };
        self.set_token(kind, start, pos - start);
        self.prepare_for_close();
    }

    fn count_while(bytes: &[u8], from: usize, pred: impl Fn(u8) -> bool) -> usize {
        bytes[from..].iter().take_while(|&&b| pred(b)).count()
    }

    /// Recognizes an object member: quoted name, optional whitespace, `:`.
    /// The reported segment covers the name through the colon. Preparation
    /// for close is deferred until the property's value has been scanned.
    fn scan_property(&mut self) {
        let start = self.position;
        match self.peek_byte() {
            None => {
                self.set_invalid(ScanError::UnexpectedEndOfPayload);
                return;
            }
            Some(b'"') => {}
            Some(_) => {
                self.set_invalid(ScanError::MalformedProperty(start));
                return;
            }
        }
        if !self.scan_string_body(start) {
            return;
        }
        self.skip_whitespace();
        if self.peek_byte() == Some(b':') {
            self.position += 1;
            self.scope.push(ScopeFrame {
                kind: ScopeKind::Property,
                start,
            });
            self.set_token(TokenKind::BeginProperty, start, self.position - start);
        } else {
            self.set_invalid(ScanError::MalformedProperty(self.position));
        }
    }

    // ── Close handling ──────────────────────────────────────────────────

    /// Emits the End-* token the `close` flag committed to, then prepares
    /// the now-exposed enclosing container.
    fn emit_close(&mut self) {
        self.close = false;
        let frame = self.top();
        match frame.kind {
            ScopeKind::Root => {
                self.set_token(TokenKind::Complete, self.position, 0);
            }
            ScopeKind::Array => {
                self.scope.pop();
                // position is at the `]`; the span includes it.
                self.set_token(TokenKind::EndArray, frame.start, self.position - frame.start + 1);
                self.position += 1;
                self.prepare_for_close();
            }
            ScopeKind::Object => {
                self.scope.pop();
                self.set_token(TokenKind::EndObject, frame.start, self.position - frame.start + 1);
                self.position += 1;
                self.prepare_for_close();
            }
            ScopeKind::Property => {
                self.scope.pop();
                // A property ends where its value's segment ended.
                let end = self.segment_offset + self.segment_count;
                self.set_token(TokenKind::EndProperty, frame.start, end - frame.start);
                self.prepare_for_close();
            }
        }
    }

    /// Looks ahead past whitespace after a recognized token. Sets `close`
    /// when the enclosing container's terminator is next, consumes exactly
    /// one element separator otherwise, and records a violation when a
    /// required separator is missing. A container that was just opened
    /// expects no separator before its first element.
    fn prepare_for_close(&mut self) {
        match self.top().kind {
            // The root holds exactly one value; a property holds exactly
            // one value. Either way the frame is ready to close.
            ScopeKind::Root | ScopeKind::Property => self.close = true,
            ScopeKind::Array => self.prepare_close_delimited(b']', TokenKind::BeginArray),
            ScopeKind::Object => self.prepare_close_delimited(b'}', TokenKind::BeginObject),
        }
    }

    fn prepare_close_delimited(&mut self, terminator: u8, opener: TokenKind) {
        self.skip_whitespace();
        match self.peek_byte() {
            Some(b) if b == terminator => self.close = true,
            Some(b',') if self.kind != opener => self.position += 1,
            _ if self.kind == opener => {}
            Some(_) => {
                self.pending_error = Some(ScanError::MissingSeparator(self.position));
            }
            None => self.pending_error = Some(ScanError::UnexpectedEndOfPayload),
        }
    }

    // ── String decoding ─────────────────────────────────────────────────

    /// Byte range of the current token's string body: quotes stripped, and
    /// for property names the trailing `:` plus any whitespace before it.
    fn string_body(&self) -> Option<(usize, usize)> {
        match self.kind {
            TokenKind::String => Some((
                self.segment_offset + 1,
                self.segment_offset + self.segment_count - 1,
            )),
            TokenKind::BeginProperty => {
                let bytes = self.bytes();
                // Segment ends one past the colon; walk back to the name's
                // closing quote.
                let mut end = self.segment_offset + self.segment_count - 1;
                loop {
                    end -= 1;
                    if !is_json_whitespace(bytes[end]) {
                        break;
                    }
                }
                debug_assert_eq!(bytes[end], b'"');
                Some((self.segment_offset + 1, end))
            }
            _ => None,
        }
    }

    /// Re-scans `payload[start..end]` with the escape decoder into the
    /// scratch buffer. Decoded output never exceeds the raw body, so the
    /// buffer (sized at least `payload.len()`) always fits it.
    fn decode_body(&mut self, start: usize, end: usize) -> Option<&str> {
        self.decode.clear();
        let bytes = self.bytes();
        let mut at = start;
        while at < end {
            if bytes[at] != b'\\' {
                let run = at;
                while at < end && bytes[at] != b'\\' {
                    at += 1;
                }
                if !self.decode.append_str(&self.payload[run..at], 0) {
                    return None;
                }
                continue;
            }
            at += 1;
            if at >= end {
                return None;
            }
            let follower = bytes[at];
            let decoded = if follower == b'u' {
                at += 1;
                let high = Self::hex4(bytes, at, end)?;
                at += 4;
                if is_high_surrogate(high) {
                    // A high half must be immediately followed by an
                    // escaped low half; the pair combines to one scalar.
                    if bytes.get(at) != Some(&b'\\') || bytes.get(at + 1) != Some(&b'u') {
                        return None;
                    }
                    let low = Self::hex4(bytes, at + 2, end)?;
                    if !is_low_surrogate(low) {
                        return None;
                    }
                    at += 6;
                    combine_surrogates(high, low)?
                } else if is_low_surrogate(high) {
                    return None;
                } else {
                    char::from_u32(u32::from(high))?
                }
            } else {
                at += 1;
                single_escape(follower)?
            };
            if !self.decode.append_char(decoded, 0) {
                return None;
            }
        }
        Some(self.decode.as_str())
    }

    /// Exactly four hex digits starting at `at`, all inside the body.
    fn hex4(bytes: &[u8], at: usize, end: usize) -> Option<u16> {
        if at + 4 > end {
            return None;
        }
        let mut acc = UnicodeEscapeBuffer::new();
        for i in 0..4 {
            match acc.feed(bytes[at + i]) {
                HexStep::NeedMore => {}
                HexStep::Done(unit) => return Some(unit),
                HexStep::Reject => return None,
            }
        }
        None
    }
}
