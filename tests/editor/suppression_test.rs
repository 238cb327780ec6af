// tests/editor/suppression_test.rs
//
// No completion is offered while the cursor sits inside a string literal.

mod common;

use common::complete;
use kexpr::{Position, TextModel};

fn assert_suppressed(text: &str, column: u32) {
    assert!(
        complete(text, column).is_none(),
        "expected no completions for {text:?} at column {column}"
    );
}

#[test]
fn test_string_start() {
    assert_suppressed(r#"10 + ""#, 7);
    assert_suppressed("10 + '", 7);
}

#[test]
fn test_inside_string() {
    assert_suppressed(r#"10 + "Hello""#, 12);
    assert_suppressed("10 + 'foo'", 10);
}

#[test]
fn test_unrelated_string_before() {
    assert_suppressed(r#""foo" + ""#, 10);
    assert_suppressed("'bar' + '", 10);
    assert_suppressed(r#""foo" + "bar" + ""#, 18);
    assert_suppressed("'bar' + 'foo' + '", 18);
}

#[test]
fn test_escaped_quote_before() {
    assert_suppressed(r#""a\"" + "a"#, 11);
    assert_suppressed(r"'a\'s' + 'b", 12);
}

#[test]
fn test_escaped_backslash_before() {
    assert_suppressed(r#""a\\" + "a"#, 11);
    assert_suppressed(r"'a\\' + 'b", 11);
}

#[test]
fn test_accessor_trigger_inside_string() {
    assert_suppressed(r#"1 + "$["#, 8);
    assert_suppressed(r#"1 + "$[""#, 9);
    assert_suppressed(r#"1 + "$$[""#, 10);
    assert_suppressed("2 + '$[", 8);
    assert_suppressed("2 + '$['", 9);
    assert_suppressed("2 + '$$['", 10);
}

#[test]
fn test_string_opened_on_earlier_line() {
    let model = TextModel::new("\"first\nsecond");
    assert!(common::provider().provide(&model, Position::new(2, 7)).is_none());

    let closed = TextModel::new("\"first\"\nsecond");
    assert!(common::provider().provide(&closed, Position::new(2, 7)).is_some());
}

#[test]
fn test_closed_strings_do_not_suppress() {
    assert!(complete(r#""it's" + "#, 10).is_some());
    assert!(complete("'a' + 'b' + ", 13).is_some());
}

#[test]
fn test_quotes_in_comments_do_not_suppress() {
    let model = TextModel::new("# it's the price\n$");
    assert!(common::provider().provide(&model, Position::new(2, 2)).is_some());

    let opened_after = TextModel::new("# it's\n'abc");
    assert!(common::provider().provide(&opened_after, Position::new(2, 5)).is_none());
}
