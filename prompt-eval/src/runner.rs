//! Runs test cases end to end: render, call, validate, check.

use std::path::{Path, PathBuf};

use prompt_config::{AgentsConfig, ModelsConfig};
use prompt_factory::{PromptFactory, PromptPair, TemplateStore};
use prompt_schemas::{Agent, Task};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assertions::{
    CRITIQUE_SYSTEM_PROMPT, CheckResult, check_critique, check_field, check_schema,
    critique_prompt, reply_json,
};
use crate::case::{Assertion, TestCase};
use crate::clients::ClientFactory;
use crate::error::EvalResult;

/// Final state of one test case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Every check passed.
    Passed,
    /// At least one check failed.
    Failed,
    /// The case could not run to completion.
    Errored,
    /// Dry run: the prompt was rendered and nothing else.
    Rendered,
}

impl CaseStatus {
    /// Returns `true` for statuses that count as success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Passed | Self::Rendered)
    }
}

/// Everything recorded about one test case.
#[derive(Clone, Debug, Serialize)]
pub struct CaseReport {
    /// Display name.
    pub name: String,
    /// Test case file.
    pub path: PathBuf,
    /// Agent under test, once known.
    pub agent: Option<Agent>,
    /// Task under test, once known.
    pub task: Option<Task>,
    /// Model key used.
    pub model: Option<String>,
    /// Outcome.
    pub status: CaseStatus,
    /// Rendered prompts.
    pub prompts: Option<PromptPair>,
    /// Raw model reply.
    pub reply: Option<String>,
    /// Reasoning block of a chain-of-thought reply, kept for audit.
    pub reasoning: Option<Value>,
    /// Check outcomes, the implicit output-schema check first.
    pub checks: Vec<CheckResult>,
    /// Error that stopped the case.
    pub error: Option<String>,
}

impl CaseReport {
    fn new(path: &Path) -> Self {
        Self {
            name: path.file_stem().map_or_else(
                || path.display().to_string(),
                |stem| stem.to_string_lossy().into_owned(),
            ),
            path: path.to_path_buf(),
            agent: None,
            task: None,
            model: None,
            status: CaseStatus::Errored,
            prompts: None,
            reply: None,
            reasoning: None,
            checks: Vec::new(),
            error: None,
        }
    }
}

/// Counts per status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Number of cases.
    pub total: usize,
    /// Cases that passed.
    pub passed: usize,
    /// Cases with a failed check.
    pub failed: usize,
    /// Cases that could not complete.
    pub errored: usize,
    /// Cases rendered in a dry run.
    pub rendered: usize,
}

/// Results of a batch.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    /// Per-case results, in run order.
    pub cases: Vec<CaseReport>,
    /// Whether the batch was a dry run.
    pub dry_run: bool,
}

impl RunReport {
    /// Counts cases per status.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        self.cases
            .iter()
            .fold(RunSummary::default(), |mut summary, case| {
                summary.total += 1;
                match case.status {
                    CaseStatus::Passed => summary.passed += 1,
                    CaseStatus::Failed => summary.failed += 1,
                    CaseStatus::Errored => summary.errored += 1,
                    CaseStatus::Rendered => summary.rendered += 1,
                }
                summary
            })
    }

    /// Returns `true` if every case passed (or rendered, in a dry run).
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(|case| case.status.is_success())
    }
}

/// Options controlling a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Render prompts without calling any model.
    pub dry_run: bool,
}

/// Runs test cases against configured models.
pub struct Harness<'a> {
    factory: PromptFactory<'a>,
    models: ModelsConfig,
    agents: AgentsConfig,
    clients: Box<dyn ClientFactory + 'a>,
    options: RunOptions,
}

impl<'a> Harness<'a> {
    /// Creates a harness over a template store and loaded configuration.
    #[must_use]
    pub fn new(
        store: &'a TemplateStore,
        models: ModelsConfig,
        agents: AgentsConfig,
        clients: Box<dyn ClientFactory + 'a>,
    ) -> Self {
        Self {
            factory: PromptFactory::new(store),
            models,
            agents,
            clients,
            options: RunOptions::default(),
        }
    }

    /// Sets the run options.
    #[must_use]
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs every case in order. A failing case never stops the batch.
    pub async fn run_all(&self, paths: &[PathBuf]) -> RunReport {
        let mut cases = Vec::with_capacity(paths.len());
        for path in paths {
            cases.push(self.run_path(path).await);
        }
        RunReport {
            cases,
            dry_run: self.options.dry_run,
        }
    }

    /// Loads and runs a single test-case file.
    pub async fn run_path(&self, path: &Path) -> CaseReport {
        match TestCase::load(path) {
            Ok(case) => self.run_case(&case).await,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot load test case");
                let mut report = CaseReport::new(path);
                report.error = Some(err.to_string());
                report
            }
        }
    }

    /// Runs a parsed test case.
    pub async fn run_case(&self, case: &TestCase) -> CaseReport {
        let mut report = CaseReport::new(&case.path);
        report.name.clone_from(&case.name);
        report.agent = Some(case.agent);
        report.task = Some(case.task);

        info!(case = %case.name, agent = %case.agent, task = %case.task, "running test case");
        match self.execute(case, &mut report).await {
            Ok(status) => report.status = status,
            Err(err) => {
                warn!(case = %case.name, error = %err, "test case errored");
                report.status = CaseStatus::Errored;
                report.error = Some(err.to_string());
            }
        }

        match report.status {
            CaseStatus::Failed => {
                for check in report.checks.iter().filter(|check| !check.passed) {
                    warn!(case = %case.name, check = %check.label, detail = %check.detail, "check failed");
                }
            }
            status => info!(case = %case.name, ?status, "test case finished"),
        }
        report
    }

    async fn execute(&self, case: &TestCase, report: &mut CaseReport) -> EvalResult<CaseStatus> {
        let model_key = self
            .agents
            .model_for(case.agent, case.model.as_deref())?
            .to_owned();
        self.models.model(&model_key)?;
        report.model = Some(model_key.clone());

        let pair = self
            .factory
            .build(case.agent, case.task, case.inputs.clone())?;
        report.prompts = Some(pair.clone());

        if self.options.dry_run {
            return Ok(CaseStatus::Rendered);
        }

        let client = self.clients.client(&model_key)?;
        let reply = client.generate(pair.system(), pair.user()).await?;
        report.reply = Some(reply.clone());

        let output_schema = PromptFactory::output_schema(case.agent, case.task)?;
        let label = format!("output matches {output_schema}");
        match output_schema.validate_reply(&reply) {
            Ok(value) => {
                report.reasoning = output_schema.reasoning_of(&value);
                if let Some(reasoning) = &report.reasoning {
                    debug!(case = %case.name, %reasoning, "model reasoning");
                }
                report.checks.push(CheckResult::pass(label, "reply is well-formed"));
            }
            Err(err) => report.checks.push(CheckResult::fail(label, err.to_string())),
        }

        let json = reply_json(&reply);
        for assertion in &case.assertions {
            let check = self.check(assertion, &reply, json.as_ref()).await;
            report.checks.push(check);
        }

        Ok(if report.checks.iter().all(|check| check.passed) {
            CaseStatus::Passed
        } else {
            CaseStatus::Failed
        })
    }

    async fn check(&self, assertion: &Assertion, reply: &str, json: Option<&Value>) -> CheckResult {
        let label = assertion.label();
        match assertion {
            Assertion::IsValidSchema { schema } => check_schema(&label, reply, schema),
            Assertion::FieldContains { field, expected } => {
                check_field(&label, json, field, expected, false)
            }
            Assertion::FieldNotContains { field, expected } => {
                check_field(&label, json, field, expected, true)
            }
            Assertion::AiCritique { prompt, expected } => {
                match self.critique(prompt, reply).await {
                    Ok(critique) => check_critique(&label, &critique, expected),
                    Err(err) => CheckResult::fail(label, format!("critique call failed: {err}")),
                }
            }
        }
    }

    async fn critique(&self, instruction: &str, reply: &str) -> EvalResult<String> {
        let client = self.clients.client(self.models.critique_model())?;
        client
            .generate(CRITIQUE_SYSTEM_PROMPT, &critique_prompt(instruction, reply))
            .await
    }
}
