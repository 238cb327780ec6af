//! Shared fixtures for the editor scenario tests.
#![allow(dead_code)]

use std::sync::Arc;

use kexpr::{CompletionList, CompletionProvider, FunctionCatalog, InputItem, Position, TextModel};

pub fn catalog() -> FunctionCatalog {
    FunctionCatalog::from_json_str(
        r#"{
          "categories": [
            { "name": "String", "fullName": "String -- Manipulation", "metaCategory": "String" },
            { "name": "Constants", "fullName": "Math -- Constants", "metaCategory": "Math" }
          ],
          "functions": [
            { "entryType": "function", "name": "foo", "category": "String -- Manipulation",
              "keywords": [], "description": "Returns foo.", "returnType": "STRING",
              "arguments": [{ "name": "arg1", "type": "STRING", "description": "the input" }] },
            { "entryType": "function", "name": "abcd", "category": "String -- Manipulation",
              "keywords": [], "description": "Combines a and b.", "returnType": "STRING",
              "returnDescription": "a and b, combined",
              "arguments": [
                { "name": "a", "type": "STRING", "description": "first" },
                { "name": "b", "type": "NUMBER", "description": "second" }
              ],
              "examples": "`abcd(\"x\", 1)` returns `x1`" },
            { "entryType": "constant", "name": "PI", "category": "Math -- Constants",
              "keywords": ["circle"], "description": "The ratio of a circle's circumference to its diameter.",
              "returnType": "FLOAT" },
            { "entryType": "constant", "name": "MAX_INT", "category": "Math -- Constants",
              "keywords": [], "description": "The largest integer.", "returnType": "INTEGER" }
          ]
        }"#,
    )
    .expect("fixture catalog parses")
}

pub const FUNCTIONS: [&str; 4] = ["foo(${1:arg1})", "abcd(${1:a}, ${2:b})", "PI", "MAX_INT"];

pub const SPECIAL_COLUMNS: [&str; 2] = ["$[ROW_ID]", "$[ROW_NUMBER]"];
pub const SHORTHAND_COLUMNS: [&str; 2] = ["$input1", "$_input3"];
pub const DOUBLE_QUOTE_COLUMNS: [&str; 5] = [
    r#"$["input1"]"#,
    r#"$["_input3"]"#,
    r#"$["input 4"]"#,
    r#"$["input'5'"]"#,
    r#"$["input\"6\""]"#,
];
pub const SINGLE_QUOTE_COLUMNS: [&str; 5] = [
    "$['input1']",
    "$['_input3']",
    "$['input 4']",
    r"$['input\'5\'']",
    r#"$['input"6"']"#,
];

pub const SHORTHAND_FLOW_VARIABLES: [&str; 2] = ["$$flowVar1", "$$_flowVar3"];
pub const DOUBLE_QUOTE_FLOW_VARIABLES: [&str; 5] = [
    r#"$$["flowVar1"]"#,
    r#"$$["_flowVar3"]"#,
    r#"$$["flowVar 4"]"#,
    r#"$$["flowVar'5'"]"#,
    r#"$$["flowVar\"6\""]"#,
];
pub const SINGLE_QUOTE_FLOW_VARIABLES: [&str; 5] = [
    "$$['flowVar1']",
    "$$['_flowVar3']",
    "$$['flowVar 4']",
    r"$$['flowVar\'5\'']",
    r#"$$['flowVar"6"']"#,
];

/// Names of unsupported inputs; they must never show up in completion text.
pub const UNSUPPORTED_NAMES: [&str; 2] = ["input2", "flowVar2"];

pub fn columns() -> Vec<InputItem> {
    vec![
        InputItem::new("ROW_ID", "STRING").with_insertion_text("$[ROW_ID]"),
        InputItem::new("ROW_NUMBER", "LONG").with_insertion_text("$[ROW_NUMBER]"),
        InputItem::new("input1", "STRING"),
        InputItem::new("input2", "UNKNOWN").unsupported(),
        InputItem::new("_input3", "STRING"),
        InputItem::new("input 4", "STRING"),
        InputItem::new("input'5'", "STRING"),
        InputItem::new("input\"6\"", "STRING"),
    ]
}

pub fn flow_variables() -> Vec<InputItem> {
    vec![
        InputItem::new("flowVar1", "STRING"),
        InputItem::new("flowVar2", "UNKNOWN").unsupported(),
        InputItem::new("_flowVar3", "STRING"),
        InputItem::new("flowVar 4", "STRING"),
        InputItem::new("flowVar'5'", "STRING"),
        InputItem::new("flowVar\"6\"", "STRING"),
    ]
}

pub fn provider() -> CompletionProvider {
    CompletionProvider::new(&catalog(), Arc::new(columns), Arc::new(flow_variables))
}

/// Completions for a single-line expression at a 1-based column.
pub fn complete(text: &str, column: u32) -> Option<CompletionList> {
    provider().provide(&TextModel::new(text), Position::new(1, column))
}

pub fn insert_texts(list: &CompletionList) -> Vec<&str> {
    list.items.iter().map(|c| c.insert_text.as_str()).collect()
}
