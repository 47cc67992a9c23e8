//! Zero-copy JSON scanning and fixed-capacity emission for telemetry hot
//! paths.
//!
//! The crate provides two tightly coupled primitives:
//!
//! - [`Scanner`], a forward-only tokenizer over an in-memory payload. Tokens
//!   are reported as [`Segment`]s (offset/length views into the payload) and
//!   string bodies are only decoded on demand, into a scratch buffer that is
//!   reused across tokens.
//! - [`Emitter`], an incremental writer into a pre-sized [`TextBuffer`]. The
//!   output never exceeds the configured capacity: when space runs out the
//!   emitter folds the document into a well-formed truncated form (see
//!   [`TRUNCATED_OBJECT`]) instead of failing mid-token.
//!
//! Both types are single-threaded and reusable: after the initial sizing,
//! steady-state scanning and emission perform no heap allocation.
//!
//! ```
//! use jsonspan::{Emitter, Scanner, TokenKind};
//!
//! let mut emitter = Emitter::new(64, 4);
//! emitter.open_object();
//! emitter.open_property("series");
//! emitter.open_array();
//! emitter.write_i64(1);
//! emitter.write_i64(2);
//! let document = emitter.finish().to_string();
//! assert_eq!(document, r#"{"series":[1,2]}"#);
//!
//! let mut scanner = Scanner::new(&document, 0, 4);
//! assert!(scanner.next());
//! assert_eq!(scanner.token_kind(), TokenKind::BeginObject);
//! assert!(scanner.next());
//! assert_eq!(scanner.token_kind(), TokenKind::BeginProperty);
//! assert_eq!(scanner.parse_str(), Some("series"));
//! ```

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod buffer;
mod emitter;
mod error;
mod escape;
mod scanner;
mod segment;
mod token;

#[cfg(test)]
mod tests;

pub use buffer::TextBuffer;
pub use emitter::{Emitter, TRUNCATED_OBJECT, TRUNCATED_PROPERTY};
pub use error::ScanError;
pub use scanner::Scanner;
pub use segment::Segment;
pub use token::TokenKind;
