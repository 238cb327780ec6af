// tests/editor/completion_test.rs
//
// Replaced ranges and offered forms for the accessor and word contexts.

mod common;

use common::*;
use kexpr::lsp::analysis::context::{AccessorScope, CompletionTrigger};
use kexpr::syntax::rules::Quote;
use kexpr::TextModel;

struct Case<'a> {
    text: &'a str,
    column: u32,
    range_text: &'a str,
    expected: Vec<&'a str>,
    forbidden: Vec<&'a str>,
}

fn concat<'a>(groups: &[&[&'a str]]) -> Vec<&'a str> {
    groups.iter().flat_map(|g| g.iter().copied()).collect()
}

fn single_quote_forms() -> Vec<&'static str> {
    concat(&[&SINGLE_QUOTE_COLUMNS, &SINGLE_QUOTE_FLOW_VARIABLES])
}

fn double_quote_forms() -> Vec<&'static str> {
    concat(&[&DOUBLE_QUOTE_COLUMNS, &DOUBLE_QUOTE_FLOW_VARIABLES])
}

fn everything_double_quoted() -> Vec<&'static str> {
    concat(&[
        &FUNCTIONS,
        &SPECIAL_COLUMNS,
        &SHORTHAND_COLUMNS,
        &DOUBLE_QUOTE_COLUMNS,
        &SHORTHAND_FLOW_VARIABLES,
        &DOUBLE_QUOTE_FLOW_VARIABLES,
    ])
}

fn check(case: &Case<'_>) {
    let list = complete(case.text, case.column)
        .unwrap_or_else(|| panic!("no completions for {:?}@{}", case.text, case.column));
    let model = TextModel::new(case.text);
    assert_eq!(
        model.value_in_range(list.range),
        case.range_text,
        "range text for {:?}@{}",
        case.text,
        case.column
    );

    let texts = insert_texts(&list);
    for expected in &case.expected {
        assert!(
            texts.contains(expected),
            "{:?}@{} should offer {}",
            case.text,
            case.column,
            expected
        );
    }
    for forbidden in &case.forbidden {
        assert!(
            !texts.contains(forbidden),
            "{:?}@{} should not offer {}",
            case.text,
            case.column,
            forbidden
        );
    }
    for text in &texts {
        for name in UNSUPPORTED_NAMES {
            assert!(!text.contains(name), "unsupported {} offered as {}", name, text);
        }
    }
}

#[test]
fn test_empty_document() {
    check(&Case {
        text: "",
        column: 1,
        range_text: "",
        expected: everything_double_quoted(),
        forbidden: single_quote_forms(),
    });
}

#[test]
fn test_started_word() {
    check(&Case {
        text: "a",
        column: 2,
        range_text: "a",
        expected: FUNCTIONS.to_vec(),
        forbidden: single_quote_forms(),
    });
}

#[test]
fn test_strings_before_have_no_effect() {
    check(&Case {
        text: r#""\"a\"\\" + '\'b\'\\' + "#,
        column: 25,
        range_text: "",
        expected: everything_double_quoted(),
        forbidden: single_quote_forms(),
    });
}

#[test]
fn test_dollar_after_closed_string() {
    check(&Case {
        text: r#""foo" + $"#,
        column: 10,
        range_text: "$",
        expected: concat(&[&SHORTHAND_COLUMNS, &DOUBLE_QUOTE_COLUMNS]),
        forbidden: single_quote_forms(),
    });
}

#[test]
fn test_lone_dollar() {
    check(&Case {
        text: "$",
        column: 2,
        range_text: "$",
        expected: double_quote_forms(),
        forbidden: single_quote_forms(),
    });
}

#[test]
fn test_flow_variable_brackets() {
    let cases = [
        Case {
            text: r#"foo$$[""#,
            column: 8,
            range_text: r#"$$[""#,
            expected: DOUBLE_QUOTE_FLOW_VARIABLES.to_vec(),
            forbidden: single_quote_forms(),
        },
        Case {
            text: r#"foo$$[""]"#,
            column: 8,
            range_text: r#"$$[""]"#,
            expected: DOUBLE_QUOTE_FLOW_VARIABLES.to_vec(),
            forbidden: single_quote_forms(),
        },
        Case {
            text: "foo$$['",
            column: 8,
            range_text: "$$['",
            expected: SINGLE_QUOTE_FLOW_VARIABLES.to_vec(),
            forbidden: double_quote_forms(),
        },
        Case {
            text: "foo$$['']",
            column: 8,
            range_text: "$$['']",
            expected: SINGLE_QUOTE_FLOW_VARIABLES.to_vec(),
            forbidden: double_quote_forms(),
        },
        Case {
            text: "$$[",
            column: 4,
            range_text: "$$[",
            expected: DOUBLE_QUOTE_FLOW_VARIABLES.to_vec(),
            forbidden: single_quote_forms(),
        },
        Case {
            text: "o$$[]",
            column: 5,
            range_text: "$$[]",
            expected: DOUBLE_QUOTE_FLOW_VARIABLES.to_vec(),
            forbidden: single_quote_forms(),
        },
    ];
    for case in &cases {
        check(case);
    }
}

#[test]
fn test_column_brackets() {
    let cases = [
        Case {
            text: r#"10 + $[""#,
            column: 9,
            range_text: r#"$[""#,
            expected: DOUBLE_QUOTE_COLUMNS.to_vec(),
            forbidden: single_quote_forms(),
        },
        Case {
            text: r#"  $[""]"#,
            column: 6,
            range_text: r#"$[""]"#,
            expected: DOUBLE_QUOTE_COLUMNS.to_vec(),
            forbidden: single_quote_forms(),
        },
        Case {
            text: "$['",
            column: 4,
            range_text: "$['",
            expected: SINGLE_QUOTE_COLUMNS.to_vec(),
            forbidden: double_quote_forms(),
        },
        Case {
            text: "20 + $['']",
            column: 9,
            range_text: "$['']",
            expected: SINGLE_QUOTE_COLUMNS.to_vec(),
            forbidden: double_quote_forms(),
        },
        Case {
            text: "$[",
            column: 3,
            range_text: "$[",
            expected: DOUBLE_QUOTE_COLUMNS.to_vec(),
            forbidden: single_quote_forms(),
        },
        Case {
            text: "o$[]",
            column: 4,
            range_text: "$[]",
            expected: DOUBLE_QUOTE_COLUMNS.to_vec(),
            forbidden: single_quote_forms(),
        },
    ];
    for case in &cases {
        check(case);
    }
}

#[test]
fn test_bracket_scope_limits_kind() {
    let flow = complete("$$[\"", 5).unwrap();
    let texts = insert_texts(&flow);
    for column in DOUBLE_QUOTE_COLUMNS {
        assert!(!texts.contains(&column), "{} offered after $$[", column);
    }
    assert_eq!(
        flow.trigger,
        CompletionTrigger::Accessor {
            scope: AccessorScope::FlowVariables,
            bracket: true
        }
    );

    let columns = complete("$[\"", 4).unwrap();
    let texts = insert_texts(&columns);
    for variable in DOUBLE_QUOTE_FLOW_VARIABLES {
        assert!(!texts.contains(&variable), "{} offered after $[", variable);
    }
    // Quote-independent forms stay available for the editor to filter.
    assert!(texts.contains(&"$[ROW_ID]"));
    assert!(texts.contains(&"$input1"));
}

#[test]
fn test_quote_of_context() {
    assert_eq!(complete("$['", 4).unwrap().quote, Quote::Single);
    assert_eq!(complete("$[", 3).unwrap().quote, Quote::Double);
    assert_eq!(complete("x", 2).unwrap().quote, Quote::Double);
}

#[test]
fn test_logical_operator_range() {
    let list = complete("a &&", 5).unwrap();
    assert_eq!(list.trigger, CompletionTrigger::LogicalOperator);
    assert_eq!(TextModel::new("a &&").value_in_range(list.range), "&&");
    let texts = insert_texts(&list);
    assert!(texts.contains(&"and"));
    assert!(texts.contains(&"or"));
    assert!(texts.contains(&"not"));
}

#[test]
fn test_keywords_are_offered() {
    let list = complete("", 1).unwrap();
    let texts = insert_texts(&list);
    for keyword in ["TRUE", "FALSE", "MISSING"] {
        assert!(texts.contains(&keyword));
    }
}

#[test]
fn test_offset_tail_is_left_alone() {
    let list = complete(r#"$["", 2]"#, 4).unwrap();
    assert_eq!(
        TextModel::new(r#"$["", 2]"#).value_in_range(list.range),
        r#"$[""#
    );
}

#[test]
fn test_utf16_columns() {
    // The emoji takes two UTF-16 code units.
    let text = "\u{1F600} + $[\"";
    let list = complete(text, 9).unwrap();
    assert_eq!(list.range.start_column, 6);
    assert_eq!(TextModel::new(text).value_in_range(list.range), "$[\"");
}

#[test]
fn test_inputs_are_read_per_request() {
    use std::sync::{Arc, Mutex};

    let names = Arc::new(Mutex::new(vec!["before".to_string()]));
    let source = names.clone();
    let provider = kexpr::CompletionProvider::new(
        &catalog(),
        Arc::new(move || {
            source
                .lock()
                .unwrap()
                .iter()
                .map(|n| kexpr::InputItem::new(n, "STRING"))
                .collect::<Vec<_>>()
        }),
        Arc::new(Vec::<kexpr::InputItem>::new),
    );
    let model = TextModel::new("$");
    let position = kexpr::Position::new(1, 2);

    let first = provider.provide(&model, position).unwrap();
    assert!(insert_texts(&first).contains(&"$before"));

    *names.lock().unwrap() = vec!["after".to_string()];
    let second = provider.provide(&model, position).unwrap();
    let texts = insert_texts(&second);
    assert!(texts.contains(&"$after"));
    assert!(!texts.contains(&"$before"));
}
