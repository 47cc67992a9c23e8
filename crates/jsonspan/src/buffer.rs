//! Bounded append accumulator shared by the scanner and the emitter.
//!
//! A `TextBuffer` owns a `String` whose allocation is made once, up front,
//! and a *logical* capacity that appends are checked against. The logical
//! capacity is what callers size against; the allocation simply backs it so
//! steady-state appends never reallocate.
//!
//! Every append takes a `reserve`: the number of bytes that must still be
//! free *after* the append succeeds. The emitter uses this to guarantee it
//! can always close every open container and, if needed, place its truncated
//! marker; the scanner's decode scratch passes zero.

use alloc::string::String;

/// A fixed-capacity character accumulator with reservation-checked appends.
#[derive(Debug)]
pub struct TextBuffer {
    data: String,
    capacity: usize,
}

impl TextBuffer {
    /// Creates a buffer with the given logical capacity in bytes. The
    /// backing allocation is made immediately.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            data: String::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends one character iff at least `reserve` bytes remain free after
    /// it. Returns whether the append happened.
    pub fn append_char(&mut self, ch: char, reserve: usize) -> bool {
        if self.data.len() + ch.len_utf8() + reserve > self.capacity {
            return false;
        }
        self.data.push(ch);
        true
    }

    /// Appends an entire string iff it fits with `reserve` bytes to spare.
    /// Atomic: either every byte of `text` is appended or none are.
    pub fn append_str(&mut self, text: &str, reserve: usize) -> bool {
        if self.data.len() + text.len() + reserve > self.capacity {
            return false;
        }
        self.data.push_str(text);
        true
    }

    /// Current length, usable as a rollback mark for composite writes.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.data.len()
    }

    /// Restores the length saved by [`mark`](Self::mark), discarding
    /// everything appended since.
    pub fn rollback(&mut self, mark: usize) {
        self.data.truncate(mark);
    }

    /// The last code unit written, or `None` when empty.
    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.data.as_bytes().last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The logical capacity appends are checked against.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the buffer. The allocation is retained.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Accumulated contents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Expands the logical capacity iff `new_capacity` is strictly larger,
    /// growing the allocation to match.
    pub fn try_grow(&mut self, new_capacity: usize) -> bool {
        if new_capacity <= self.capacity {
            return false;
        }
        self.data.reserve(new_capacity - self.data.len());
        self.capacity = new_capacity;
        true
    }

    /// Adopts `new_capacity` iff the current contents plus `reserve` still
    /// fit. Shrinking keeps the allocation; growing extends it.
    pub fn try_resize(&mut self, new_capacity: usize, reserve: usize) -> bool {
        let Some(available) = new_capacity.checked_sub(reserve) else {
            return false;
        };
        if available < self.data.len() {
            return false;
        }
        if new_capacity > self.capacity {
            self.data.reserve(new_capacity - self.data.len());
        }
        self.capacity = new_capacity;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::TextBuffer;

    #[test]
    fn append_char_honors_reserve() {
        let mut buf = TextBuffer::new(4);
        assert!(buf.append_char('a', 3));
        // 1 used + 1 appended + 3 reserved exceeds 4.
        assert!(!buf.append_char('b', 3));
        assert_eq!(buf.as_str(), "a");
        assert!(buf.append_char('b', 2));
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn append_str_is_atomic() {
        let mut buf = TextBuffer::new(8);
        assert!(buf.append_str("abcd", 4));
        assert!(!buf.append_str("efghi", 0));
        assert_eq!(buf.as_str(), "abcd");
        assert!(buf.append_str("efgh", 0));
        assert_eq!(buf.as_str(), "abcdefgh");
    }

    #[test]
    fn multibyte_chars_count_in_bytes() {
        let mut buf = TextBuffer::new(3);
        assert!(!buf.append_char('\u{1F600}', 0)); // 4 UTF-8 bytes
        assert!(buf.append_char('\u{00E5}', 1)); // 2 bytes + 1 reserved
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn mark_and_rollback() {
        let mut buf = TextBuffer::new(16);
        buf.append_str("head", 0);
        let mark = buf.mark();
        buf.append_str(",tail", 0);
        buf.rollback(mark);
        assert_eq!(buf.as_str(), "head");
        assert_eq!(buf.last(), Some(b'd'));
    }

    #[test]
    fn last_of_empty_is_none() {
        let buf = TextBuffer::new(4);
        assert_eq!(buf.last(), None);
    }

    #[test]
    fn grow_only_expands() {
        let mut buf = TextBuffer::new(4);
        assert!(!buf.try_grow(4));
        assert!(!buf.try_grow(2));
        assert!(buf.try_grow(8));
        assert_eq!(buf.capacity(), 8);
    }

    #[test]
    fn resize_requires_room_for_content_and_reserve() {
        let mut buf = TextBuffer::new(16);
        buf.append_str("12345678", 0);
        assert!(!buf.try_resize(9, 2));
        assert!(buf.try_resize(10, 2));
        assert_eq!(buf.capacity(), 10);
        // Underflowing reserve never panics.
        assert!(!buf.try_resize(1, 5));
    }

    #[test]
    fn clear_retains_capacity() {
        let mut buf = TextBuffer::new(8);
        buf.append_str("payload", 0);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 8);
        assert!(buf.append_str("again", 0));
    }
}
