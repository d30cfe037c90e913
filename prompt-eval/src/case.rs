//! Test-case files: what to render, which model to call and what to check.

use std::fs;
use std::path::{Path, PathBuf};

use prompt_schemas::{Agent, Task};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EvalError, EvalResult};

/// One check applied to a model reply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// The reply validates against the named response schema.
    #[serde(alias = "is_valid_pydantic_schema")]
    IsValidSchema {
        /// Response schema name, e.g. `ChainOfThoughtScenarioSchema`.
        schema: String,
    },
    /// The field's text contains every expected substring.
    FieldContains {
        /// Dotted path into the reply, e.g. `final_scenario.title`.
        field: String,
        /// Substrings that must all appear.
        expected: Vec<String>,
    },
    /// The field's text contains none of the listed substrings.
    FieldNotContains {
        /// Dotted path into the reply.
        field: String,
        /// Substrings that must not appear.
        expected: Vec<String>,
    },
    /// A critique model judges the reply; passes when its answer contains
    /// `expected`, ignoring case.
    AiCritique {
        /// Instruction for the critique model.
        prompt: String,
        /// Text the critique must contain.
        expected: String,
    },
}

impl Assertion {
    /// Returns a short label for reports.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::IsValidSchema { schema } => format!("is_valid_schema({schema})"),
            Self::FieldContains { field, .. } => format!("field_contains({field})"),
            Self::FieldNotContains { field, .. } => format!("field_not_contains({field})"),
            Self::AiCritique { expected, .. } => format!("ai_critique(expects {expected:?})"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTestCase {
    #[serde(default)]
    name: Option<String>,
    agent: String,
    #[serde(default)]
    task: Option<String>,
    #[serde(default)]
    factory_method: Option<String>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default = "empty_object")]
    inputs: Value,
    #[serde(default)]
    assertions: Vec<Assertion>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// A parsed test case.
#[derive(Clone, Debug, PartialEq)]
pub struct TestCase {
    /// Display name; defaults to the file stem.
    pub name: String,
    /// File the case was read from.
    pub path: PathBuf,
    /// Agent under test.
    pub agent: Agent,
    /// Task under test.
    pub task: Task,
    /// Model key; `None` uses the agent's default model.
    pub model: Option<String>,
    /// Raw request inputs, validated by the prompt factory.
    pub inputs: Value,
    /// Checks applied to the reply.
    pub assertions: Vec<Assertion>,
}

impl TestCase {
    /// Reads and parses a test-case file.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Io`] if the file cannot be read, otherwise the
    /// errors of [`TestCase::from_yaml_str`].
    pub fn load(path: impl AsRef<Path>) -> EvalResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(path, &text)
    }

    /// Parses a test case. `path` names the case in errors and reports.
    ///
    /// The task may be given as `task: create` or in the older
    /// `factory_method: build_prompt_create` form; if both are present they
    /// must agree.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TestCaseParse`] for malformed YAML and
    /// [`EvalError::InvalidTestCase`] for unknown agents or tasks.
    pub fn from_yaml_str(path: impl AsRef<Path>, text: &str) -> EvalResult<Self> {
        let path = path.as_ref();
        let raw: RawTestCase =
            serde_yaml::from_str(text).map_err(|source| EvalError::TestCaseParse {
                path: path.to_path_buf(),
                source,
            })?;

        let agent = raw
            .agent
            .parse::<Agent>()
            .map_err(|err| EvalError::invalid_case(path, err.to_string()))?;

        let task = match (raw.task.as_deref(), raw.factory_method.as_deref()) {
            (None, None) => {
                return Err(EvalError::invalid_case(
                    path,
                    "either `task` or `factory_method` is required",
                ));
            }
            (Some(task), None) | (None, Some(task)) => parse_task(path, task)?,
            (Some(task), Some(method)) => {
                let task = parse_task(path, task)?;
                if parse_task(path, method)? != task {
                    return Err(EvalError::invalid_case(
                        path,
                        format!("`task: {task}` contradicts `factory_method: {method}`"),
                    ));
                }
                task
            }
        };

        if !raw.inputs.is_object() {
            return Err(EvalError::invalid_case(path, "`inputs` must be a mapping"));
        }

        let name = raw.name.unwrap_or_else(|| {
            path.file_stem()
                .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned())
        });

        Ok(Self {
            name,
            path: path.to_path_buf(),
            agent,
            task,
            model: raw.model,
            inputs: raw.inputs,
            assertions: raw.assertions,
        })
    }
}

fn parse_task(path: &Path, text: &str) -> EvalResult<Task> {
    text.parse::<Task>()
        .map_err(|err| EvalError::invalid_case(path, err.to_string()))
}

/// Lists the `*.yaml`/`*.yml` files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// Returns [`EvalError::Io`] if the directory cannot be read and
/// [`EvalError::NoTestCases`] if it holds no test cases.
pub fn discover(dir: impl AsRef<Path>) -> EvalResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let io_err = |source| EvalError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        if is_yaml && path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(EvalError::NoTestCases {
            dir: dir.to_path_buf(),
        });
    }
    paths.sort();
    Ok(paths)
}
