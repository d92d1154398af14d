//! Match strategies for filters.
//!
//! A filter decides whether an annotation matches by handing its current
//! input and the annotation's field value to a [`Predicate`]. The engine
//! treats predicates as opaque.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Predicate {
    fn is_filtered(&self, input: &str, field: Option<&Value>) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&str, Option<&Value>) -> bool,
{
    fn is_filtered(&self, input: &str, field: Option<&Value>) -> bool {
        self(input, field)
    }
}

/// Every whitespace-separated keyword of the input must be present in the
/// field. Strings match by substring, lists by element equality.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordPredicate;

impl Predicate for KeywordPredicate {
    fn is_filtered(&self, input: &str, field: Option<&Value>) -> bool {
        let Some(field) = field else {
            return false;
        };
        let mut keywords = input.split_whitespace().peekable();
        if keywords.peek().is_none() {
            return false;
        }
        keywords.all(|keyword| field_contains(field, keyword))
    }
}

/// The whole trimmed input must equal the field, or one element of a list.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactPredicate;

impl Predicate for ExactPredicate {
    fn is_filtered(&self, input: &str, field: Option<&Value>) -> bool {
        let input = input.trim();
        if input.is_empty() {
            return false;
        }
        match field {
            Some(Value::Array(items)) => items.iter().any(|item| scalar_eq(item, input)),
            Some(value) => scalar_eq(value, input),
            None => false,
        }
    }
}

fn field_contains(field: &Value, keyword: &str) -> bool {
    match field {
        Value::String(text) => text.contains(keyword),
        Value::Array(items) => items.iter().any(|item| scalar_eq(item, keyword)),
        Value::Number(number) => number.to_string().contains(keyword),
        Value::Bool(flag) => flag.to_string().contains(keyword),
        Value::Null | Value::Object(_) => false,
    }
}

fn scalar_eq(value: &Value, text: &str) -> bool {
    match value {
        Value::String(s) => s == text,
        Value::Number(n) => n.to_string() == text,
        Value::Bool(b) => b.to_string() == text,
        _ => false,
    }
}

/// Built-in predicates selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Keywords,
    Exact,
}

impl MatchMode {
    pub fn predicate(self) -> Box<dyn Predicate> {
        match self {
            MatchMode::Keywords => Box::new(KeywordPredicate),
            MatchMode::Exact => Box::new(ExactPredicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("ca", json!("cat"), true)]
    #[case("ca", json!("dog"), false)]
    #[case("big cat", json!("a big fat cat"), true)]
    #[case("big dog", json!("a big fat cat"), false)]
    #[case("Cat", json!("cat"), false)]
    #[case("pet", json!(["pet", "animal"]), true)]
    #[case("pe", json!(["pet", "animal"]), false)]
    #[case("pet animal", json!(["pet", "animal"]), true)]
    #[case("42", json!(1425), true)]
    #[case("true", json!(true), true)]
    #[case("x", json!(null), false)]
    #[case("x", json!({"x": 1}), false)]
    fn keyword_matching(#[case] input: &str, #[case] field: Value, #[case] expected: bool) {
        assert_eq!(KeywordPredicate.is_filtered(input, Some(&field)), expected);
    }

    #[test]
    fn keyword_rejects_blank_input_and_missing_field() {
        assert!(!KeywordPredicate.is_filtered("   ", Some(&json!("cat"))));
        assert!(!KeywordPredicate.is_filtered("cat", None));
    }

    #[rstest]
    #[case(" pet ", json!(["pet"]), true)]
    #[case("pet", json!("pets"), false)]
    #[case("pets", json!("pets"), true)]
    #[case("", json!(""), false)]
    fn exact_matching(#[case] input: &str, #[case] field: Value, #[case] expected: bool) {
        assert_eq!(ExactPredicate.is_filtered(input, Some(&field)), expected);
    }

    #[test]
    fn closures_are_predicates() {
        let starts_with = |input: &str, field: Option<&Value>| {
            field
                .and_then(Value::as_str)
                .is_some_and(|text| text.starts_with(input))
        };
        assert!(starts_with.is_filtered("ca", Some(&json!("car"))));
        assert!(!starts_with.is_filtered("ar", Some(&json!("car"))));
    }

    #[test]
    fn match_mode_deserializes_lowercase() {
        let mode: MatchMode = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(mode, MatchMode::Exact);
        assert!(mode.predicate().is_filtered("a", Some(&json!("a"))));
    }
}
