use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use prompt_config::{load_agents, load_models};
use prompt_eval::{
    Cli, ConfiguredClients, Harness, RunOptions, RunReport, load_dotenv, write_markdown,
};
use prompt_factory::TemplateStore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = load_dotenv();
    let cli = Cli::parse();

    if let Err(err) = prompt_telemetry::init_tracing(cli.verbose) {
        eprintln!("prompt-eval: {err}");
        return ExitCode::from(2);
    }

    match dotenv {
        Ok(Some(path)) => debug!(path = %path.display(), "loaded environment file"),
        Ok(None) => {}
        Err(err) => warn!("{err}; continuing with the process environment"),
    }

    let report = match run(&cli).await {
        Ok(report) => report,
        Err(err) => {
            error!("{err:#}");
            return ExitCode::from(2);
        }
    };

    let summary = report.summary();
    println!(
        "{} cases: {} passed, {} failed, {} errored, {} rendered",
        summary.total, summary.passed, summary.failed, summary.errored, summary.rendered
    );

    if let Some(path) = &cli.report {
        if let Err(err) = write_markdown(&report, path) {
            error!("{err}");
            return ExitCode::from(2);
        }
        info!(path = %path.display(), "report written");
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(cli: &Cli) -> anyhow::Result<RunReport> {
    let models = load_models(&cli.models_config)
        .with_context(|| format!("loading {}", cli.models_config.display()))?;
    let agents = load_agents(&cli.agents_config, &models)
        .with_context(|| format!("loading {}", cli.agents_config.display()))?;
    let store = match &cli.templates {
        Some(dir) => TemplateStore::from_dir(dir)?,
        None => TemplateStore::builtin()?,
    };
    let paths = cli.case_paths()?;
    info!(cases = paths.len(), dry_run = cli.dry_run, "starting evaluation");

    let clients = Box::new(ConfiguredClients::new(models.clone()));
    let harness = Harness::new(&store, models, agents, clients).with_options(RunOptions {
        dry_run: cli.dry_run,
    });
    let report = harness.run_all(&paths).await;

    if cli.show_prompts {
        for case in &report.cases {
            if let Some(prompts) = &case.prompts {
                println!("=== {} ===\n{prompts}", case.name);
            }
        }
    }
    Ok(report)
}
