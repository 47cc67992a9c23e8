use std::string::{String, ToString};
use std::vec::Vec;

use crate::{Emitter, Scanner, TokenKind};

/// Every Unicode scalar in `[U+0000, U+FFFF]` (surrogates are not
/// representable in `&str`), written as a single string value, emitted,
/// rescanned, and decoded back code point by code point.
#[test]
fn unicode_rainbow_round_trip() {
    let rainbow: String = (0u32..=0xFFFF).filter_map(char::from_u32).collect();

    let mut emitter = Emitter::new(512 * 1024, 2);
    assert!(emitter.write_str(&rainbow));
    let document = emitter.finish();

    let mut scanner = Scanner::new(document, 0, 2);
    assert!(scanner.next());
    assert_eq!(scanner.token_kind(), TokenKind::String);
    let decoded = scanner.parse_str().expect("rainbow decodes");
    assert_eq!(decoded.chars().count(), rainbow.chars().count());
    assert_eq!(decoded, rainbow);
    assert!(!scanner.next());
    assert_eq!(scanner.token_kind(), TokenKind::Complete);
}

/// Round-trip closure: a document built from writes that all succeeded
/// rescans to the same ordered token sequence with the same values.
#[test]
fn emitted_documents_rescan_to_the_same_tokens() {
    let mut emitter = Emitter::new(256, 8);
    assert!(emitter.open_object());
    assert!(emitter.open_property("null"));
    assert!(emitter.write_null());
    assert!(emitter.close_token());
    assert!(emitter.open_property("bool"));
    assert!(emitter.write_bool(false));
    assert!(emitter.close_token());
    assert!(emitter.open_property("int"));
    assert!(emitter.write_i64(-7));
    assert!(emitter.close_token());
    assert!(emitter.open_property("uint"));
    assert!(emitter.write_u64(u64::MAX));
    assert!(emitter.close_token());
    assert!(emitter.open_property("float"));
    assert!(emitter.write_f64(0.25));
    assert!(emitter.close_token());
    assert!(emitter.open_property("text"));
    assert!(emitter.write_str("line\nbreak"));
    assert!(emitter.close_token());
    assert!(emitter.open_property("list"));
    assert!(emitter.open_array());
    assert!(emitter.write_i64(1));
    assert!(emitter.write_i64(2));
    assert!(emitter.close_token());
    assert!(emitter.close_token());
    let document = emitter.finish();

    let mut scanner = Scanner::new(document, 0, 8);

    let mut expect = |kind: TokenKind| {
        assert!(scanner.next(), "expected {kind:?}");
        assert_eq!(scanner.token_kind(), kind);
    };
    expect(TokenKind::BeginObject);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::Null);
    expect(TokenKind::EndProperty);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::Boolean);
    expect(TokenKind::EndProperty);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::Integer);
    expect(TokenKind::EndProperty);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::Integer);
    expect(TokenKind::EndProperty);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::Float);
    expect(TokenKind::EndProperty);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::String);
    expect(TokenKind::EndProperty);
    expect(TokenKind::BeginProperty);
    expect(TokenKind::BeginArray);
    expect(TokenKind::Integer);
    expect(TokenKind::Integer);
    expect(TokenKind::EndArray);
    expect(TokenKind::EndProperty);
    expect(TokenKind::EndObject);
}

#[test]
fn typed_values_survive_the_round_trip() {
    let mut emitter = Emitter::new(256, 4);
    emitter.open_array();
    emitter.write_bool(true);
    emitter.write_i64(i64::MIN);
    emitter.write_u64(u64::MAX);
    emitter.write_f64(6.25e-3);
    emitter.write_str("åβ\u{1F600}");
    emitter.write_null();
    let document = emitter.finish();

    let mut s = Scanner::new(document, 0, 4);
    assert!(s.next()); // [
    assert!(s.next());
    assert_eq!(s.parse_bool(), Some(true));
    assert!(s.next());
    assert_eq!(s.parse_i64(), Some(i64::MIN));
    assert!(s.next());
    assert_eq!(s.parse_u64(), Some(u64::MAX));
    assert!(s.next());
    assert_eq!(s.parse_f64(), Some(6.25e-3));
    assert!(s.next());
    assert_eq!(s.parse_str(), Some("åβ\u{1F600}"));
    assert!(s.next());
    assert_eq!(s.parse_opt_i64(), Some(None));
    assert!(s.next()); // ]
    assert!(!s.next());
    assert_eq!(s.token_kind(), TokenKind::Complete);
}

/// Truncated output is still a syntactically complete document.
#[test]
fn truncated_documents_are_well_formed() {
    // Array truncation.
    let mut emitter = Emitter::new(50, 2);
    emitter.open_array();
    let mut n = 0;
    while emitter.write_i64(n) {
        n += 1;
    }
    let document = emitter.finish().to_string();
    let mut scanner = Scanner::new(&document, 0, 4);
    while scanner.next() {}
    assert_eq!(scanner.token_kind(), TokenKind::Complete);

    // Object truncation, across a range of capacities.
    for capacity in 20..120 {
        let mut emitter = Emitter::new(capacity, 4);
        emitter.open_object();
        let mut n = 0;
        loop {
            if !emitter.open_property(&n.to_string()) {
                break;
            }
            emitter.write_i64(n);
            emitter.close_token();
            n += 1;
        }
        let document = emitter.finish().to_string();
        assert!(document.len() <= capacity.max(20));
        let mut scanner = Scanner::new(&document, 0, 4);
        while scanner.next() {}
        assert_eq!(
            scanner.token_kind(),
            TokenKind::Complete,
            "capacity {capacity}: {document}"
        );
    }
}

/// The scanner's reported spans tile the payload: begin/value tokens appear
/// in source order and End-* spans close over their children exactly.
#[test]
fn spans_nest_and_cover() {
    let payload = r#"{"a":[1,{"b":null}],"c":true}"#;
    let mut scanner = Scanner::new(payload, 0, 8);
    let mut spans: Vec<(TokenKind, usize, usize)> = Vec::new();
    while scanner.next() {
        let seg = scanner.token_segment();
        spans.push((scanner.token_kind(), seg.offset(), seg.end()));
    }
    assert_eq!(scanner.token_kind(), TokenKind::Complete);

    // Any two spans are either disjoint or properly nested.
    for &(_, s1, e1) in &spans {
        for &(_, s2, e2) in &spans {
            let disjoint = e1 <= s2 || e2 <= s1;
            let nested = (s1 <= s2 && e2 <= e1) || (s2 <= s1 && e1 <= e2);
            assert!(disjoint || nested, "partially overlapping spans");
        }
    }
    // The outermost span covers the whole payload.
    assert_eq!(spans.last().map(|&(k, s, e)| (k, s, e)), Some((TokenKind::EndObject, 0, payload.len())));
}

/// A scanner and an emitter can be reused across payloads without
/// reallocation, and repeated reuse is stable.
#[test]
fn instances_are_reusable() {
    let payloads = ["[1,2,3]", r#"{"k":"v"}"#, "true"];
    let mut scanner = Scanner::new(payloads[0], 32, 4);
    let mut emitter = Emitter::new(64, 4);

    for _ in 0..3 {
        for payload in payloads {
            scanner.reset(payload);
            let mut kinds = Vec::new();
            while scanner.next() {
                kinds.push(scanner.token_kind());
            }
            assert_eq!(scanner.token_kind(), TokenKind::Complete);
            assert!(!kinds.is_empty());

            emitter.clear();
            emitter.open_array();
            emitter.write_i64(kinds.len() as i64);
            assert!(emitter.finish().starts_with('['));
        }
    }
}
