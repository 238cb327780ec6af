// tests/editor/highlighting_test.rs
//
// Token streams for whole documents, including state carried across lines.

use kexpr::lsp::capabilities::semantic_tokens::semantic_tokens_full;
use kexpr::syntax::{tokenize, tokenize_line, State, Theme, TokenKind};

/// One token per line: scope, then the token text.
fn render(text: &str) -> String {
    text.split('\n')
        .zip(tokenize(text))
        .flat_map(|(line, tokens)| {
            tokens
                .tokens
                .into_iter()
                .map(move |t| format!("{} {:?}", t.kind, t.text(line)))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_column_access_with_row_offset() {
    insta::assert_snapshot!(render(r#"$["a", 2] + 1"#), @r###"
    string.colname.escape "$[\""
    string.colname "a"
    string.colname.escape "\""
    plain ", "
    number.coloffset "2"
    string.colname.escape "]"
    white " "
    plain "+"
    white " "
    number.int "1"
    "###);
}

#[test]
fn test_row_information_and_comment() {
    insta::assert_snapshot!(render(r#"$[ROW_ID] # comment "x"#), @r###"
    string.rowinfo.escape "$["
    string.rowinfo "ROW_ID"
    string.rowinfo.escape "]"
    white " "
    comment "# comment \"x"
    "###);
}

#[test]
fn test_functions_and_literals() {
    insta::assert_snapshot!(render("round(1.5) and TRUE"), @r###"
    identifier "round"
    delimiter.parenthesis "("
    number.float "1.5"
    delimiter.parenthesis ")"
    white " "
    identifier "and"
    white " "
    keyword.true "TRUE"
    "###);
}

#[test]
fn test_string_continues_on_next_line() {
    let lines = tokenize("'abc\n def' + $$var");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].end_state, State::StringBody);
    assert_eq!(lines[1].end_state, State::Root);

    let second: Vec<_> = lines[1].tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        second,
        vec![
            TokenKind::String,
            TokenKind::StringEscape,
            TokenKind::White,
            TokenKind::Plain,
            TokenKind::White,
            TokenKind::ColumnNameEscape,
            TokenKind::ColumnName,
        ]
    );
}

#[test]
fn test_quoted_accessor_spans_lines() {
    let lines = tokenize("$['multi\nline']");
    assert_eq!(lines[0].end_state, State::ColumnAccessBodySingleQuotes);

    let line = "line']";
    let tokens = tokenize_line(line, lines[0].end_state);
    assert_eq!(tokens, lines[1]);
    let texts: Vec<_> = tokens
        .tokens
        .iter()
        .map(|t| (t.kind, t.text(line)))
        .collect();
    assert_eq!(
        texts,
        vec![
            (TokenKind::ColumnName, "line"),
            (TokenKind::ColumnNameEscape, "']"),
        ]
    );
}

#[test]
fn test_utf16_offsets() {
    let line = "\"\u{e9}\u{1F600}\" + x";
    let tokens = tokenize_line(line, State::Root).tokens;
    let offsets: Vec<_> = tokens.iter().map(|t| (t.kind, t.start, t.len)).collect();
    assert_eq!(
        offsets,
        vec![
            (TokenKind::StringEscape, 0, 1),
            (TokenKind::String, 1, 3),
            (TokenKind::StringEscape, 4, 1),
            (TokenKind::White, 5, 1),
            (TokenKind::Plain, 6, 1),
            (TokenKind::White, 7, 1),
            (TokenKind::Identifier, 8, 1),
        ]
    );
}

#[test]
fn test_crlf_line_endings() {
    let lines = tokenize("1\r\n2");
    assert_eq!(lines[0].tokens.len(), 1);
    assert_eq!(lines[0].tokens[0].kind, TokenKind::Int);
    assert_eq!(lines[0].tokens[0].span, 0..1);
}

#[test]
fn test_theme_colors_follow_scopes() {
    let theme = Theme::new("knime-expression");
    let line = "$$[\"v\"]";
    let colors: Vec<_> = tokenize_line(line, State::Root)
        .tokens
        .iter()
        .map(|t| theme.foreground_for(t.kind))
        .collect();
    assert_eq!(colors, vec![Some("3289ac"), Some("af01db"), Some("3289ac")]);
}

#[test]
fn test_semantic_tokens_cover_document() {
    let tokens = semantic_tokens_full("# note\n$col + 2");
    // comment, `$`, `col`, `2`; whitespace and `+` carry no semantic type
    assert_eq!(tokens.data.len(), 4);
    assert_eq!(tokens.data[0].delta_line, 0);
    assert_eq!(tokens.data[0].length, 6);
    assert_eq!(tokens.data[1].delta_line, 1);
    assert_eq!(tokens.data[1].delta_start, 0);
    assert_eq!(tokens.data[3].delta_start, 6);
}
