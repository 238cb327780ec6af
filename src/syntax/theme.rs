//! Highlighting palette.
//!
//! Rules match token scopes on dot boundaries: a rule for `string.colname`
//! colors `string.colname` and `string.colname.escape` unless a longer rule
//! matches first.

use serde::{Deserialize, Serialize};

use super::lexer::TokenKind;

/// One theme rule, a scope and a hex color without the leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeRule {
    pub token: String,
    pub foreground: String,
}

impl ThemeRule {
    pub fn new(token: &str, foreground: &str) -> Self {
        Self {
            token: token.to_string(),
            foreground: foreground.to_string(),
        }
    }
}

/// A named theme layered over the editor's base theme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub base: String,
    pub inherit: bool,
    pub rules: Vec<ThemeRule>,
}

impl Theme {
    /// The default palette, named after the language.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: "vs".to_string(),
            inherit: true,
            rules: vec![
                ThemeRule::new("string.colname.escape", "3289ac"),
                ThemeRule::new("string.colname", "af01db"),
                ThemeRule::new("number.coloffset", "af01db"),
                ThemeRule::new("string.rowinfo.escape", "3289ac"),
                ThemeRule::new("string.rowinfo", "af01db"),
                ThemeRule::new("comment", "eb34cf"),
            ],
        }
    }

    /// Replace or add rules. A rule for an existing scope replaces it.
    pub fn with_overrides(mut self, overrides: &[ThemeRule]) -> Self {
        for rule in overrides {
            match self.rules.iter_mut().find(|r| r.token == rule.token) {
                Some(existing) => existing.foreground = rule.foreground.clone(),
                None => self.rules.push(rule.clone()),
            }
        }
        self
    }

    /// The color of the most specific rule matching `scope`.
    pub fn foreground_for_scope(&self, scope: &str) -> Option<&str> {
        self.rules
            .iter()
            .filter(|rule| scope_matches(&rule.token, scope))
            .max_by_key(|rule| rule.token.len())
            .map(|rule| rule.foreground.as_str())
    }

    pub fn foreground_for(&self, kind: TokenKind) -> Option<&str> {
        self.foreground_for_scope(kind.scope())
    }
}

fn scope_matches(rule: &str, scope: &str) -> bool {
    !rule.is_empty()
        && scope
            .strip_prefix(rule)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}
