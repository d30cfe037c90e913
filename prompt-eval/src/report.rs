//! Markdown rendering of a run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::Value;
use tera::{Context, Tera};

use crate::error::{EvalError, EvalResult};
use crate::runner::RunReport;

const REPORT_NAME: &str = "report.md";

const REPORT_TEMPLATE: &str = r"# Prompt evaluation report
{% if dry_run %}
_Dry run: prompts were rendered, no model was called._
{% endif %}
| Total | Passed | Failed | Errored | Rendered |
|------:|-------:|-------:|--------:|---------:|
| {{ summary.total }} | {{ summary.passed }} | {{ summary.failed }} | {{ summary.errored }} | {{ summary.rendered }} |
{% for case in cases %}
## {{ case.name }}: {{ case.status }}

- File: `{{ case.path }}`
{%- if case.agent %}
- Agent: `{{ case.agent }}`, task `{{ case.task }}`
{%- endif %}
{%- if case.model %}
- Model: `{{ case.model }}`
{%- endif %}
{% if case.error %}
**Error:** {{ case.error }}
{% endif %}
{%- if case.checks %}
| Check | Result | Detail |
|-------|--------|--------|
{% for check in case.checks -%}
| {{ check.label | cell }} | {% if check.passed %}pass{% else %}FAIL{% endif %} | {{ check.detail | cell }} |
{% endfor %}
{%- endif %}
{%- if case.reasoning %}
<details><summary>Reasoning</summary>

```json
{{ case.reasoning | json_encode(pretty=true) }}
```

</details>
{% endif %}
{%- if case.reply %}
<details><summary>Reply</summary>

{{ case.reply | fenced }}

</details>
{% endif %}
{%- endfor %}
";

/// Renders a run as Markdown.
///
/// # Errors
///
/// Returns [`EvalError::Report`] if the report cannot be serialized or
/// rendered.
pub fn render_markdown(report: &RunReport) -> EvalResult<String> {
    let mut context = Context::from_serialize(report).map_err(|err| EvalError::Report {
        reason: err.to_string(),
    })?;
    context.insert("summary", &report.summary());

    let mut tera = Tera::default();
    tera.register_filter("cell", table_cell);
    tera.register_filter("fenced", fenced);
    tera.add_raw_template(REPORT_NAME, REPORT_TEMPLATE)
        .and_then(|()| tera.render(REPORT_NAME, &context))
        .map_err(|err| EvalError::Report {
            reason: err.to_string(),
        })
}

// Keeps free text inside a single Markdown table cell.
#[allow(clippy::unnecessary_wraps)]
fn table_cell(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let cell = text
        .trim()
        .replace('|', "\\|")
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ");
    Ok(Value::String(cell))
}

// Wraps text in a code fence longer than any backtick run inside it.
#[allow(clippy::unnecessary_wraps)]
fn fenced(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let longest = text
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest.max(2) + 1);
    Ok(Value::String(format!("{fence}\n{}\n{fence}", text.trim_end())))
}

/// Renders a run as Markdown and writes it to `path`.
///
/// # Errors
///
/// Returns [`EvalError::Report`] if rendering fails and [`EvalError::Io`]
/// if the file cannot be written.
pub fn write_markdown(report: &RunReport, path: impl AsRef<Path>) -> EvalResult<()> {
    let path = path.as_ref();
    let text = render_markdown(report)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| EvalError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| EvalError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use prompt_schemas::{Agent, Task};
    use serde_json::json;

    use super::*;
    use crate::assertions::CheckResult;
    use crate::runner::{CaseReport, CaseStatus};

    fn case(name: &str, status: CaseStatus) -> CaseReport {
        CaseReport {
            name: name.to_owned(),
            path: PathBuf::from(format!("cases/{name}.yaml")),
            agent: Some(Agent::ScenarioHelper),
            task: Some(Task::Create),
            model: Some("mistral_large".to_owned()),
            status,
            prompts: None,
            reply: None,
            reasoning: None,
            checks: Vec::new(),
            error: None,
        }
    }

    #[test]
    fn report_lists_summary_and_cases() {
        let mut failed = case("pirate", CaseStatus::Failed);
        failed.checks = vec![
            CheckResult::pass("output matches ChainOfThoughtScenarioSchema", "ok"),
            CheckResult::fail("field_contains `title`", "missing [\"a|b\"]\n  more"),
        ];
        failed.reasoning = Some(json!({"theme": "mutiny"}));
        failed.reply = Some("{}".to_owned());
        let mut errored = case("broken", CaseStatus::Errored);
        errored.error = Some("model call failed: timeout".to_owned());

        let report = RunReport {
            cases: vec![failed, errored],
            dry_run: false,
        };
        let text = render_markdown(&report).expect("report renders");

        assert!(text.contains("| 2 | 0 | 1 | 1 | 0 |"));
        assert!(text.contains("## pirate: failed"));
        assert!(text.contains("| FAIL |"));
        assert!(text.contains("missing [\"a\\|b\"] more |"));
        assert!(text.contains("\"theme\": \"mutiny\""));
        assert!(text.contains("**Error:** model call failed: timeout"));
        assert!(!text.contains("Dry run"));
    }

    #[test]
    fn fenced_replies_stay_inside_their_block() {
        let mut passed = case("pirate", CaseStatus::Passed);
        passed.reply = Some("```json\n{\"title\": \"Arr\"}\n```".to_owned());
        let report = RunReport {
            cases: vec![passed],
            dry_run: false,
        };
        let text = render_markdown(&report).unwrap();

        assert!(text.contains("````\n```json\n{\"title\": \"Arr\"}\n```\n````"));
        let after = text.split("````").last().unwrap();
        assert!(after.contains("</details>"));
    }

    #[test]
    fn plain_replies_use_a_three_backtick_fence() {
        let mut passed = case("pirate", CaseStatus::Passed);
        passed.reply = Some("Arr, no JSON for ye.".to_owned());
        let report = RunReport {
            cases: vec![passed],
            dry_run: false,
        };
        let text = render_markdown(&report).unwrap();
        assert!(text.contains("```\nArr, no JSON for ye.\n```\n"));
        assert!(!text.contains("````"));
    }

    #[test]
    fn dry_run_is_flagged() {
        let report = RunReport {
            cases: vec![case("pirate", CaseStatus::Rendered)],
            dry_run: true,
        };
        let text = render_markdown(&report).unwrap();
        assert!(text.contains("_Dry run"));
        assert!(text.contains("## pirate: rendered"));
    }

    #[test]
    fn report_is_written_to_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.md");
        let report = RunReport {
            cases: Vec::new(),
            dry_run: false,
        };
        write_markdown(&report, &path).expect("written");
        let text = fs::read_to_string(path).unwrap();
        assert!(text.starts_with("# Prompt evaluation report"));
    }
}
