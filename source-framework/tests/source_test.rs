use proptest::prelude::*;
use regex::Regex;
use source_framework::{ParseSource, Position, StrSource};

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?s:{})", pattern)).unwrap()
}

#[test]
fn test_source_new() {
    let source = StrSource::new("foo");
    assert_eq!(source.pos(), Position::new());
    assert_eq!(source.bytepos(), 0);
    assert_eq!(source.chars_left(), 3);
    assert!(!source.is_eof());
}

#[test]
fn test_consume_returns_slices() {
    let mut source = StrSource::new("a".repeat(100) + &"b".repeat(100));

    let a = source.consume(10);
    assert_eq!(a, "a".repeat(10).as_str());
    assert_eq!(a.offset(), 0);

    let b = source.consume(1);
    assert_eq!(b, "a");
    assert_eq!(b.offset(), 10);
    assert_eq!(source.bytepos(), 11);
    assert_eq!(source.chars_left(), 189);
}

#[test]
fn test_consume_clamps_at_eof() {
    let mut source = StrSource::new("abc");
    assert_eq!(source.consume(10), "abc");
    assert!(source.is_eof());
    assert_eq!(source.consume(1), "");
    assert_eq!(source.chars_left(), 0);
}

#[test]
fn test_peek_does_not_advance() {
    let source = StrSource::new("hello");
    assert_eq!(source.peek(3), "hel");
    assert_eq!(source.bytepos(), 0);
    assert_eq!(source.chars_left(), 5);
}

#[test]
fn test_restore_rewinds() {
    let mut source = StrSource::new("hello world");
    let start = source.pos();
    source.consume(6);
    assert_eq!(source.peek(5), "world");

    source.restore(start);
    assert_eq!(source.peek(5), "hello");
    assert_eq!(source.chars_left(), 11);
}

#[test]
fn test_set_bytepos_recomputes_chars() {
    let mut source = StrSource::new("öäüö");
    source.set_bytepos(4);
    assert_eq!(source.pos().charpos, 2);
    assert_eq!(source.chars_left(), 2);
    assert_eq!(source.consume(1), "ü");
}

#[test]
fn test_lookahead_is_anchored() {
    let mut source = StrSource::new("foo bar");
    assert!(source.lookahead(&anchored("[f]")));
    assert!(!source.lookahead(&anchored("[b]")));

    source.consume(4);
    assert!(source.matches(&anchored("[b]")));
    assert!(!source.lookahead(&anchored("[f]")));
}

#[test]
fn test_starts_with() {
    let mut source = StrSource::new("foobar");
    assert!(source.starts_with("foo"));
    assert!(!source.starts_with("bar"));
    source.consume(3);
    assert!(source.starts_with("bar"));
    assert!(source.starts_with(""));
}

#[test]
fn test_line_and_column_counts_newlines() {
    let mut source = StrSource::new("foo\nbar\nbaz");
    assert_eq!(source.line_and_column(None), (1, 1));

    source.consume(3);
    // the newline belongs to the line it terminates
    assert_eq!(source.line_and_column(None), (1, 4));
    source.consume(1);
    assert_eq!(source.line_and_column(None), (2, 1));

    assert_eq!(source.line_and_column(Some(9)), (3, 2));
}

#[test]
fn test_line_and_column_unicode() {
    let mut source = StrSource::new("öäü\nöä");
    source.consume(2);
    assert_eq!(source.line_and_column(None), (1, 3));

    source.consume(3);
    assert_eq!(source.line_and_column(None), (2, 2));
}

#[test]
fn test_line_and_column_past_end() {
    let source = StrSource::new("ab\n");
    assert_eq!(source.line_and_column(Some(100)), (2, 1));
}

#[test]
fn test_slices_know_their_line() {
    let mut source = StrSource::new("a\nbc");
    source.consume(2);
    let bc = source.consume(2);
    assert_eq!(bc.line_and_column(), Some((2, 1)));
}

#[test]
fn test_adjacent_consumes_concat() {
    let mut source = StrSource::new("foobar");
    let foo = source.consume(3);
    let bar = source.consume(3);
    let joined = foo + bar;
    assert_eq!(joined, "foobar");
    assert_eq!(joined.offset(), 0);
}

proptest! {
    #[test]
    fn prop_chars_left_tracks_consumption(input in "\\PC{0,40}", steps in prop::collection::vec(0usize..5, 0..10)) {
        let total = input.chars().count();
        let mut source = StrSource::new(input.clone());
        let mut consumed = 0;
        for n in steps {
            let slice = source.consume(n);
            consumed += slice.chars().count();
            prop_assert_eq!(source.chars_left(), total - consumed);
            prop_assert_eq!(source.pos().charpos, consumed);
        }
    }

    #[test]
    fn prop_restore_is_exact(input in "[a-zö\n]{0,30}", n in 0usize..40) {
        let mut source = StrSource::new(input);
        let start = source.pos();
        let before = source.peek(n);
        source.consume(n);
        source.restore(start);
        prop_assert_eq!(source.peek(n), before);
        prop_assert_eq!(source.pos(), start);
    }
}
