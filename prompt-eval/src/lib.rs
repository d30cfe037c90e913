//! Evaluation harness for scenario prompts.
//!
//! A test case names an agent, a task, the raw inputs and a list of
//! assertions. The [`Harness`] renders the prompt pair through the factory,
//! sends it to the configured model, validates the reply against the task's
//! output schema and then evaluates each assertion. Failures are recorded
//! per case; a batch never stops early.

#![warn(missing_docs, clippy::pedantic)]

mod assertions;
mod case;
mod cli;
mod clients;
mod env;
mod error;
mod report;
mod runner;

pub use assertions::{
    CRITIQUE_SYSTEM_PROMPT, CheckResult, check_critique, check_field, check_schema,
    critique_prompt, field_at, reply_json, text_of,
};
pub use case::{Assertion, TestCase, discover};
pub use cli::{ALL, Cli, resolve_target};
pub use clients::{ClientFactory, ConfiguredClients, KeyLookup, ModelClient};
pub use env::{load_dotenv, load_dotenv_from};
pub use error::{EvalError, EvalResult};
pub use report::{render_markdown, write_markdown};
pub use runner::{CaseReport, CaseStatus, Harness, RunOptions, RunReport, RunSummary};
