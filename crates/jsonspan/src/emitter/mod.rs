//! Fixed-capacity incremental JSON writer.
//!
//! The emitter builds a document directly into a [`TextBuffer`] and never
//! lets it outgrow the configured capacity. The trick is the *reserve
//! budget*: before every write it computes how many bytes must stay free so
//! that, whatever happens next, every open container can still be closed and
//! the truncated marker can still be placed. Each append hands that reserve
//! to the buffer, so a write either succeeds with closure guaranteed or
//! fails atomically.
//!
//! On the first capacity failure the emitter rolls the partial write back,
//! emits the truncated form for the current container, and enters the
//! sticky `truncated` state: further `open_*`/`write_*` calls return
//! `false`, while [`close_token`](Emitter::close_token) and
//! [`finish`](Emitter::finish) keep working so the output is always a
//! syntactically complete document.
//!
//! Grammar violations (a value directly inside an object, a second root
//! value, a property outside an object) are rejected with `false` and do
//! not truncate; truncation records that output was cut short by space, not
//! that the caller slipped.

use alloc::vec::Vec;

use crate::buffer::TextBuffer;

/// Marker emitted where a whole value (or the root) had to be cut:
/// bit-exact, part of the public contract.
pub const TRUNCATED_OBJECT: &str = "{\"(truncated)\":true}";

/// Marker emitted as a final member inside an object that had to be cut:
/// bit-exact, part of the public contract.
pub const TRUNCATED_PROPERTY: &str = "\"(truncated)\":true";

/// Kind of an open emitter frame. `Root` is the sentinel and is never
/// popped; its slot in the scope stack funds the sentinel separator byte in
/// the reserve budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmitScope {
    Root,
    Array,
    Object,
    Property,
}

/// Outcome of a preparation dispatch.
enum Prep {
    /// Any required separator has been written; the write may proceed.
    Ready,
    /// The write is ungrammatical in the current frame.
    Reject,
    /// The separator did not fit.
    Full,
}

/// An incremental JSON writer with a hard output-size bound.
///
/// ```
/// use jsonspan::Emitter;
///
/// let mut emitter = Emitter::new(50, 2);
/// emitter.open_array();
/// let mut n = 0;
/// while emitter.write_i64(n) {
///     n += 1;
/// }
/// assert_eq!(
///     emitter.finish(),
///     r#"[0,1,2,3,4,5,6,7,8,9,10,11,{"(truncated)":true}]"#,
/// );
/// ```
#[derive(Debug)]
pub struct Emitter {
    buffer: TextBuffer,
    scope: Vec<EmitScope>,
    truncated: bool,
}

impl Emitter {
    /// Creates an emitter with the given output capacity in bytes. The
    /// effective capacity is raised to the truncated-object marker length
    /// so truncation always fits. `depth` pre-sizes the container stack;
    /// deeper nesting still works.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is zero.
    #[must_use]
    pub fn new(capacity: usize, depth: usize) -> Self {
        assert!(depth > 0, "depth must be positive");
        let mut scope = Vec::with_capacity(depth);
        scope.push(EmitScope::Root);
        Self {
            buffer: TextBuffer::new(capacity.max(TRUNCATED_OBJECT.len())),
            scope,
            truncated: false,
        }
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The capacity the output is bounded by.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Whether the output has been cut short. Sticky.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Resets to an empty document. Allocations are retained.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scope.clear();
        self.scope.push(EmitScope::Root);
        self.truncated = false;
    }

    /// Adopts a new capacity iff the content written so far plus the
    /// current reserve still fits.
    pub fn try_resize(&mut self, new_capacity: usize) -> bool {
        let reserve = self.reserve();
        self.buffer.try_resize(new_capacity, reserve)
    }

    /// Opens an array and pushes its frame.
    pub fn open_array(&mut self) -> bool {
        self.open_container('[', EmitScope::Array)
    }

    /// Opens an object and pushes its frame.
    pub fn open_object(&mut self) -> bool {
        self.open_container('{', EmitScope::Object)
    }

    /// Writes `"name":` and pushes a property frame. Only valid directly
    /// inside an object. The name is escaped like any string value.
    pub fn open_property(&mut self, name: &str) -> bool {
        if self.truncated {
            return false;
        }
        let mark = self.buffer.mark();
        match self.prepare_property() {
            Prep::Reject => return false,
            Prep::Full => return self.overflow(mark),
            Prep::Ready => {}
        }
        if !self.append_quoted(name) || !self.buffer.append_char(':', self.reserve()) {
            return self.overflow(mark);
        }
        self.scope.push(EmitScope::Property);
        true
    }

    /// Pops the topmost frame, emitting `]`, `}`, or — for a property whose
    /// value was never written — the literal `null`, so every property in
    /// the output carries a value. No-op at the root (returns `false`).
    /// Works after truncation.
    pub fn close_token(&mut self) -> bool {
        match self.top() {
            EmitScope::Root => false,
            EmitScope::Array => {
                self.scope.pop();
                let ok = self.buffer.append_char(']', 0);
                debug_assert!(ok);
                ok
            }
            EmitScope::Object => {
                self.scope.pop();
                let ok = self.buffer.append_char('}', 0);
                debug_assert!(ok);
                ok
            }
            EmitScope::Property => {
                self.scope.pop();
                if self.buffer.last() == Some(b':') {
                    let ok = self.buffer.append_str("null", 0);
                    debug_assert!(ok);
                    ok
                } else {
                    true
                }
            }
        }
    }

    /// Closes every open container and returns the document.
    pub fn finish(&mut self) -> &str {
        while self.close_token() {}
        self.buffer.as_str()
    }

    /// Writes `true` or `false`.
    pub fn write_bool(&mut self, value: bool) -> bool {
        self.write_scalar(if value { "true" } else { "false" })
    }

    /// Writes the `null` literal as a value.
    pub fn write_null(&mut self) -> bool {
        self.write_scalar("null")
    }

    /// Writes a signed integer in invariant decimal form.
    pub fn write_i64(&mut self, value: i64) -> bool {
        let mut digits = itoa::Buffer::new();
        self.write_scalar(digits.format(value))
    }

    /// Writes an unsigned integer in invariant decimal form.
    pub fn write_u64(&mut self, value: u64) -> bool {
        let mut digits = itoa::Buffer::new();
        self.write_scalar(digits.format(value))
    }

    /// Writes the shortest decimal form that round-trips to `value`.
    /// Non-finite values have no JSON form and emit `null`.
    pub fn write_f64(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return self.write_null();
        }
        let mut digits = ryu::Buffer::new();
        self.write_scalar(digits.format_finite(value))
    }

    /// Single-precision form of [`write_f64`](Self::write_f64).
    pub fn write_f32(&mut self, value: f32) -> bool {
        if !value.is_finite() {
            return self.write_null();
        }
        let mut digits = ryu::Buffer::new();
        self.write_scalar(digits.format_finite(value))
    }

    /// Writes a quoted, escaped string value. Atomic: on overflow nothing
    /// of the string remains in the buffer.
    pub fn write_str(&mut self, value: &str) -> bool {
        if self.truncated {
            return false;
        }
        let mark = self.buffer.mark();
        match self.prepare_value() {
            Prep::Reject => return false,
            Prep::Full => return self.overflow(mark),
            Prep::Ready => {}
        }
        if !self.append_quoted(value) {
            return self.overflow(mark);
        }
        true
    }

    /// Writes a string value, with `None` emitting `null`.
    pub fn write_opt_str(&mut self, value: Option<&str>) -> bool {
        match value {
            Some(text) => self.write_str(text),
            None => self.write_null(),
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    #[inline]
    fn top(&self) -> EmitScope {
        self.scope.last().copied().unwrap_or(EmitScope::Root)
    }

    /// Bytes that must stay free before any write: one per open frame (a
    /// closing delimiter each, plus the sentinel's separator slot) and the
    /// truncated-object marker.
    #[inline]
    fn reserve(&self) -> usize {
        self.scope.len() + TRUNCATED_OBJECT.len()
    }

    fn overflow(&mut self, mark: usize) -> bool {
        self.buffer.rollback(mark);
        self.truncate();
        false
    }

    fn open_container(&mut self, open: char, kind: EmitScope) -> bool {
        if self.truncated {
            return false;
        }
        let mark = self.buffer.mark();
        match self.prepare_container() {
            Prep::Reject => return false,
            Prep::Full => return self.overflow(mark),
            Prep::Ready => {}
        }
        if !self.buffer.append_char(open, self.reserve()) {
            return self.overflow(mark);
        }
        self.scope.push(kind);
        true
    }

    fn write_scalar(&mut self, text: &str) -> bool {
        if self.truncated {
            return false;
        }
        let mark = self.buffer.mark();
        match self.prepare_value() {
            Prep::Reject => return false,
            Prep::Full => return self.overflow(mark),
            Prep::Ready => {}
        }
        if !self.buffer.append_str(text, self.reserve()) {
            return self.overflow(mark);
        }
        true
    }

    /// Emits the leading `,` for a second and later element. "First" is
    /// detected by the container's opening delimiter still being the last
    /// byte written.
    fn lead_separator(&mut self, open: u8) -> Prep {
        if self.buffer.last() == Some(open) {
            Prep::Ready
        } else if self.buffer.append_char(',', self.reserve()) {
            Prep::Ready
        } else {
            Prep::Full
        }
    }

    fn prepare_value(&mut self) -> Prep {
        match self.top() {
            EmitScope::Root => {
                if self.buffer.is_empty() {
                    Prep::Ready
                } else {
                    Prep::Reject
                }
            }
            EmitScope::Array => self.lead_separator(b'['),
            EmitScope::Object => Prep::Reject,
            EmitScope::Property => {
                // A property takes exactly one direct value.
                if self.buffer.last() == Some(b':') {
                    Prep::Ready
                } else {
                    Prep::Reject
                }
            }
        }
    }

    fn prepare_container(&mut self) -> Prep {
        match self.top() {
            EmitScope::Root => {
                if self.buffer.is_empty() {
                    Prep::Ready
                } else {
                    Prep::Reject
                }
            }
            EmitScope::Array => self.lead_separator(b'['),
            EmitScope::Object => Prep::Reject,
            EmitScope::Property => Prep::Ready,
        }
    }

    fn prepare_property(&mut self) -> Prep {
        match self.top() {
            EmitScope::Object => self.lead_separator(b'{'),
            EmitScope::Root | EmitScope::Array | EmitScope::Property => Prep::Reject,
        }
    }

    /// Emits the truncated form for the current frame and enters the sticky
    /// truncated state. The reserve budget of every prior append guarantees
    /// these appends cannot fail.
    fn truncate(&mut self) {
        debug_assert!(!self.truncated);
        let ok = match self.top() {
            EmitScope::Root => self.buffer.append_str(TRUNCATED_OBJECT, 0),
            EmitScope::Array => {
                (self.buffer.last() == Some(b'[') || self.buffer.append_char(',', 0))
                    && self.buffer.append_str(TRUNCATED_OBJECT, 0)
            }
            EmitScope::Object => {
                (self.buffer.last() == Some(b'{') || self.buffer.append_char(',', 0))
                    && self.buffer.append_str(TRUNCATED_PROPERTY, 0)
            }
            EmitScope::Property => {
                if self.buffer.last() == Some(b':') {
                    // The marker object becomes the property's value.
                    self.buffer.append_str(TRUNCATED_OBJECT, 0)
                } else {
                    // The property already carries its value; the marker
                    // becomes a final member of the enclosing object.
                    self.buffer.append_char(',', 0)
                        && self.buffer.append_str(TRUNCATED_PROPERTY, 0)
                }
            }
        };
        debug_assert!(ok);
        self.truncated = true;
    }

    /// Appends `value` quoted and escaped. Control characters, `"` and `\`
    /// use the short escapes where JSON defines them; the rest of
    /// `U+0000..=U+001F` and `U+007F..=U+009F` use uppercase `\uXXXX`.
    /// Forward slash is not escaped.
    fn append_quoted(&mut self, value: &str) -> bool {
        let reserve = self.reserve();
        if !self.buffer.append_char('"', reserve) {
            return false;
        }
        for ch in value.chars() {
            let ok = match ch {
                '"' => self.buffer.append_str("\\\"", reserve),
                '\\' => self.buffer.append_str("\\\\", reserve),
                '\u{0008}' => self.buffer.append_str("\\b", reserve),
                '\u{000C}' => self.buffer.append_str("\\f", reserve),
                '\n' => self.buffer.append_str("\\n", reserve),
                '\r' => self.buffer.append_str("\\r", reserve),
                '\t' => self.buffer.append_str("\\t", reserve),
                _ if needs_unicode_escape(ch) => self.append_unicode_escape(ch, reserve),
                _ => self.buffer.append_char(ch, reserve),
            };
            if !ok {
                return false;
            }
        }
        self.buffer.append_char('"', reserve)
    }

    fn append_unicode_escape(&mut self, ch: char, reserve: usize) -> bool {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        let unit = ch as u32;
        debug_assert!(unit <= 0xFFFF);
        let escape = [
            b'\\',
            b'u',
            HEX[(unit >> 12) as usize & 0xF],
            HEX[(unit >> 8) as usize & 0xF],
            HEX[(unit >> 4) as usize & 0xF],
            HEX[unit as usize & 0xF],
        ];
        let Ok(text) = core::str::from_utf8(&escape) else {
            return false;
        };
        self.buffer.append_str(text, reserve)
    }
}

/// Code points with no short escape that must still be escaped:
/// `U+0000..=U+001F` and `U+007F..=U+009F`.
#[inline]
fn needs_unicode_escape(ch: char) -> bool {
    let unit = u32::from(ch);
    unit < 0x20 || (0x7F..=0x9F).contains(&unit)
}
