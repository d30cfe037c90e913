//! Offline checks over a model reply.

use prompt_schemas::{ResponseSchema, strip_code_fence};
use serde::Serialize;
use serde_json::Value;

/// System prompt sent to the critique model.
pub const CRITIQUE_SYSTEM_PROMPT: &str =
    "You are an AI evaluator. Please follow the user's instructions precisely.";

/// Outcome of a single check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    /// Short description of the check.
    pub label: String,
    /// Whether it passed.
    pub passed: bool,
    /// Human-readable explanation.
    pub detail: String,
}

impl CheckResult {
    pub(crate) fn pass(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    pub(crate) fn fail(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Parses a reply as JSON after removing any Markdown code fence.
#[must_use]
pub fn reply_json(reply: &str) -> Option<Value> {
    serde_json::from_str(strip_code_fence(reply)).ok()
}

/// Follows a dotted path (`final_scenario.objectives.0.description`) into
/// `value`. Numeric segments index arrays.
#[must_use]
pub fn field_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        })
}

/// Flattens a JSON value into searchable text. Arrays contribute one line
/// per element.
#[must_use]
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(text_of).collect::<Vec<_>>().join("\n"),
        other => other.to_string(),
    }
}

/// Checks a reply against a named response schema.
#[must_use]
pub fn check_schema(label: &str, reply: &str, schema_name: &str) -> CheckResult {
    let schema = match schema_name.parse::<ResponseSchema>() {
        Ok(schema) => schema,
        Err(err) => return CheckResult::fail(label, err.to_string()),
    };
    match schema.validate_reply(reply) {
        Ok(_) => CheckResult::pass(label, format!("reply validates against {schema}")),
        Err(err) => CheckResult::fail(label, err.to_string()),
    }
}

/// Checks that the field contains every expected substring (`negate =
/// false`) or none of them (`negate = true`). A missing field reads as
/// empty text.
#[must_use]
pub fn check_field(
    label: &str,
    reply: Option<&Value>,
    field: &str,
    expected: &[String],
    negate: bool,
) -> CheckResult {
    let Some(reply) = reply else {
        return CheckResult::fail(label, "reply is not JSON");
    };
    let text = field_at(reply, field).map(text_of).unwrap_or_default();
    let found: Vec<&str> = expected
        .iter()
        .map(String::as_str)
        .filter(|needle| text.contains(needle))
        .collect();

    if negate {
        if found.is_empty() {
            CheckResult::pass(label, format!("`{field}` contains none of {expected:?}"))
        } else {
            CheckResult::fail(label, format!("`{field}` contains {found:?}"))
        }
    } else if found.len() == expected.len() {
        CheckResult::pass(label, format!("`{field}` contains {expected:?}"))
    } else {
        let missing: Vec<&str> = expected
            .iter()
            .map(String::as_str)
            .filter(|needle| !found.contains(needle))
            .collect();
        CheckResult::fail(label, format!("`{field}` is missing {missing:?}"))
    }
}

/// Builds the user prompt sent to the critique model.
#[must_use]
pub fn critique_prompt(instruction: &str, reply: &str) -> String {
    format!("{instruction}\n\nOriginal LLM Response:\n{reply}")
}

/// Judges a critique answer: passes when it contains `expected`, ignoring
/// case.
#[must_use]
pub fn check_critique(label: &str, critique: &str, expected: &str) -> CheckResult {
    if critique.to_lowercase().contains(&expected.to_lowercase()) {
        CheckResult::pass(label, format!("critique contains {expected:?}"))
    } else {
        CheckResult::fail(
            label,
            format!("expected {expected:?}, critique said: {}", critique.trim()),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn reply() -> Value {
        json!({
            "final_scenario": {
                "title": "The Grumpy Pirate",
                "tags": ["pirates", "comedy"],
                "objectives": [{ "id": 1, "description": "Calm the captain" }]
            }
        })
    }

    #[test]
    fn dotted_paths_walk_objects_and_arrays() {
        let value = reply();
        assert_eq!(
            field_at(&value, "final_scenario.objectives.0.description"),
            Some(&json!("Calm the captain"))
        );
        assert_eq!(field_at(&value, "final_scenario.missing"), None);
        assert_eq!(field_at(&value, "final_scenario.tags.7"), None);
    }

    #[test]
    fn field_contains_requires_every_value() {
        let value = reply();
        let labels = ["Pirate".to_owned(), "Grumpy".to_owned()];
        assert!(check_field("t", Some(&value), "final_scenario.title", &labels, false).passed);

        let result = check_field(
            "t",
            Some(&value),
            "final_scenario.title",
            &["Pirate".to_owned(), "Ninja".to_owned()],
            false,
        );
        assert!(!result.passed);
        assert!(result.detail.contains("Ninja"));
    }

    #[test]
    fn field_not_contains_passes_on_missing_field() {
        let value = reply();
        let result = check_field("t", Some(&value), "final_scenario.nope", &["x".to_owned()], true);
        assert!(result.passed);
        let result = check_field("t", Some(&value), "final_scenario.tags", &["comedy".to_owned()], true);
        assert!(!result.passed);
    }

    #[test]
    fn non_json_reply_fails_field_checks() {
        let result = check_field("t", None, "title", &[], false);
        assert!(!result.passed);
        assert_eq!(reply_json("```json\n{\"a\": 1}\n```"), Some(json!({ "a": 1 })));
        assert_eq!(reply_json("Sure! Here it is"), None);
    }

    #[test]
    fn schema_check_reports_unknown_schema() {
        let result = check_schema("s", "{}", "PirateSchema");
        assert!(!result.passed);
        assert!(result.detail.contains("PirateSchema"));
    }

    #[test]
    fn critique_match_ignores_case() {
        assert!(check_critique("c", "yes, it is fun", "YES").passed);
        assert!(!check_critique("c", "No.", "YES").passed);
        assert!(critique_prompt("Rate it", "{}").ends_with("Original LLM Response:\n{}"));
    }
}
