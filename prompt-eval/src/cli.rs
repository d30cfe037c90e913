//! Command-line arguments for the `prompt-eval` binary.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::case::discover;
use crate::error::{EvalError, EvalResult};

/// Target that selects every test case in the test directory.
pub const ALL: &str = "all";

/// Runs prompt test cases against the configured models.
#[derive(Debug, Clone, Parser)]
#[command(name = "prompt-eval", version, about)]
pub struct Cli {
    /// Test case to run: a file path, a name inside the test directory, or
    /// `all`.
    pub target: String,

    /// Write a Markdown report to this path.
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Model registry.
    #[arg(long, value_name = "PATH", default_value = "config/models.yaml")]
    pub models_config: PathBuf,

    /// Agent defaults.
    #[arg(long, value_name = "PATH", default_value = "config/agents.yaml")]
    pub agents_config: PathBuf,

    /// Directory scanned for test cases.
    #[arg(long, value_name = "DIR", default_value = "evaluations/test_cases")]
    pub test_dir: PathBuf,

    /// Load templates from this directory on top of the built-in set.
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Render prompts without calling any model.
    #[arg(long)]
    pub dry_run: bool,

    /// Print each rendered prompt pair to stdout.
    #[arg(long)]
    pub show_prompts: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Resolves the target into test-case files.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::NoTestCases`] if `all` finds nothing and
    /// [`EvalError::Io`] if a named case does not exist.
    pub fn case_paths(&self) -> EvalResult<Vec<PathBuf>> {
        resolve_target(&self.target, &self.test_dir)
    }
}

/// Maps a target to files: `all` scans `test_dir`, an existing path is used
/// as is, anything else is looked up as `<test_dir>/<target>.yaml` (or
/// `.yml`).
///
/// # Errors
///
/// Returns [`EvalError::NoTestCases`] if `all` finds nothing and
/// [`EvalError::Io`] if a named case does not exist.
pub fn resolve_target(target: &str, test_dir: &Path) -> EvalResult<Vec<PathBuf>> {
    if target == ALL {
        return discover(test_dir);
    }

    let direct = PathBuf::from(target);
    if direct.is_file() {
        return Ok(vec![direct]);
    }

    ["yaml", "yml"]
        .iter()
        .map(|ext| test_dir.join(format!("{target}.{ext}")))
        .find(|candidate| candidate.is_file())
        .map(|found| vec![found])
        .ok_or_else(|| EvalError::Io {
            path: test_dir.join(format!("{target}.yaml")),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "test case not found"),
        })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_point_at_repository_layout() {
        let cli = Cli::try_parse_from(["prompt-eval", "all"]).unwrap();
        assert_eq!(cli.models_config, PathBuf::from("config/models.yaml"));
        assert_eq!(cli.agents_config, PathBuf::from("config/agents.yaml"));
        assert_eq!(cli.test_dir, PathBuf::from("evaluations/test_cases"));
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn flags_are_parsed() {
        let cli = Cli::try_parse_from([
            "prompt-eval",
            "create_grumpy_pirate",
            "--dry-run",
            "--show-prompts",
            "--report",
            "out/report.md",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.target, "create_grumpy_pirate");
        assert!(cli.dry_run && cli.show_prompts);
        assert_eq!(cli.report, Some(PathBuf::from("out/report.md")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn target_is_required() {
        assert!(Cli::try_parse_from(["prompt-eval"]).is_err());
    }

    #[test]
    fn named_target_resolves_inside_test_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pirate.yml"), "agent: moderator\n").unwrap();

        let paths = resolve_target("pirate", dir.path()).unwrap();
        assert_eq!(paths, vec![dir.path().join("pirate.yml")]);

        let err = resolve_target("ghost", dir.path()).expect_err("no such case");
        assert!(matches!(err, EvalError::Io { .. }));
    }

    #[test]
    fn all_scans_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), "").unwrap();
        fs::write(dir.path().join("a.yaml"), "").unwrap();
        let paths = resolve_target(ALL, dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.yaml"));
    }
}
