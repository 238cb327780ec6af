// tests/editor/hover_test.rs
//
// Catalog documentation on hover, and the tokens hover stays silent on.

mod common;

use std::sync::Arc;

use kexpr::lsp::capabilities::hover::to_lsp_hover;
use kexpr::{HoverContent, HoverProvider, Position, TextModel, TextRange};
use tower_lsp::lsp_types::{HoverContents, MarkupKind};

fn hover_at(text: &str, line: u32, column: u32) -> Option<HoverContent> {
    HoverProvider::new(Arc::new(common::catalog()))
        .provide(&TextModel::new(text), Position::new(line, column))
}

fn hover(text: &str, column: u32) -> Option<HoverContent> {
    hover_at(text, 1, column)
}

#[test]
fn test_function_documentation() {
    let content = hover("foo(1)", 2).expect("hover over foo");
    assert_eq!(content.range, TextRange::on_line(1, 1, 4));
    assert_eq!(
        content.markdown,
        "\n\n###### Arguments \n- **arg1**: the input\n\n###### Return value \n\
         ***STRING***\n\n###### Description \n\nReturns foo."
    );
}

#[test]
fn test_constant_documentation() {
    let content = hover("PI * 2", 1).expect("hover over PI");
    assert_eq!(content.range, TextRange::on_line(1, 1, 3));
    assert_eq!(
        content.markdown,
        "Type: ***FLOAT***\n\n###### Description\n\nThe ratio of a circle's circumference to its diameter."
    );
}

#[test]
fn test_examples_section() {
    let content = hover_at("1 +\nabcd(2, 3)", 2, 3).expect("hover over abcd");
    assert_eq!(content.range, TextRange::on_line(2, 1, 5));
    assert!(content.markdown.contains("***STRING***  \na and b, combined"));
    assert!(content
        .markdown
        .ends_with("###### Examples\n\n`abcd(\"x\", 1)` returns `x1`"));
}

#[test]
fn test_cursor_right_after_word() {
    assert!(hover("foo", 4).is_some());
}

#[test]
fn test_no_documentation_outside_identifiers() {
    // column name
    assert!(hover("$foo", 3).is_none());
    // string literal
    assert!(hover("\"foo\"", 3).is_none());
    // comment
    assert!(hover("# foo", 4).is_none());
    // delimiter
    assert!(hover("foo(1)", 4).is_none());
}

#[test]
fn test_unknown_names() {
    assert!(hover("bar(1)", 2).is_none());
    assert!(hover("TRUE", 2).is_none());
    // lookup is case sensitive
    assert!(hover("pi", 1).is_none());
}

#[test]
fn test_lsp_hover_uses_zero_based_range() {
    let content = hover("1 + foo(2)", 6).expect("hover over foo");
    let lsp = to_lsp_hover(content);
    let range = lsp.range.expect("hover range");
    assert_eq!(range.start.line, 0);
    assert_eq!(range.start.character, 4);
    assert_eq!(range.end.character, 7);
    match lsp.contents {
        HoverContents::Markup(markup) => {
            assert_eq!(markup.kind, MarkupKind::Markdown);
            assert!(markup.value.contains("**arg1**"));
        }
        other => panic!("unexpected hover contents: {other:?}"),
    }
}
