//! Borrowed views into a scanned payload.

use core::fmt;

/// A non-owning slice of a payload: `(source, offset, count)` in bytes.
///
/// Segments are how the scanner reports token positions without copying.
/// Materializing an owned copy is an explicit step:
///
/// ```
/// use jsonspan::Segment;
///
/// let payload = "[1,2]";
/// let segment = Segment::new(payload, 1, 1);
/// assert_eq!(segment.as_str(), "1");
/// let owned = segment.as_str().to_string();
/// # assert_eq!(owned, "1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'src> {
    source: &'src str,
    offset: usize,
    count: usize,
}

impl<'src> Segment<'src> {
    /// Creates a segment over `source`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + count` lies outside `source` or splits a UTF-8
    /// scalar (same contract as slicing `&source[offset..offset + count]`).
    #[must_use]
    pub fn new(source: &'src str, offset: usize, count: usize) -> Self {
        debug_assert!(offset + count <= source.len());
        Self {
            source,
            offset,
            count,
        }
    }

    /// The payload this segment points into.
    #[must_use]
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Byte offset of the segment start within the source.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the segment in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// One past the last byte of the segment.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Borrows the identified slice of the source.
    #[must_use]
    pub fn as_str(&self) -> &'src str {
        &self.source[self.offset..self.offset + self.count]
    }
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
