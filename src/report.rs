use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::batch::{Config, JobResult, RunOutcome, RunSummary};

/// set to a file path to get a json report of the run
pub const REPORT_ENV_VAR: &str = "CLSPV_BATCH_REPORT";

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub directory: &'a Path,
    pub command: &'a str,
    pub summary: &'a RunSummary,
    pub jobs: &'a [JobResult],
}

impl<'a> RunReport<'a> {
    pub fn new(config: &'a Config, outcome: &'a RunOutcome) -> Self {
        Self {
            directory: &config.directory,
            command: &config.command,
            summary: &outcome.summary,
            jobs: &outcome.results,
        }
    }
}

pub fn report_path_from_env() -> Option<PathBuf> {
    report_path(std::env::var_os(REPORT_ENV_VAR).map(PathBuf::from))
}

fn report_path(value: Option<PathBuf>) -> Option<PathBuf> {
    match value {
        None => None,
        Some(path) if path.as_os_str().is_empty() => None,
        Some(path) => Some(path),
    }
}

pub fn write_report(path: &Path, config: &Config, outcome: &RunOutcome) -> anyhow::Result<()> {
    let report = RunReport::new(config, outcome);
    let json = serde_json::to_string_pretty(&report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::batch::CompileJob;

    fn outcome(directory: &Path) -> RunOutcome {
        let failed = CompileJob::new(directory, "b_source.cl", None);
        let passed = CompileJob::new(
            directory,
            "a_source.cl",
            Some(directory.join("a_options.txt")),
        );

        RunOutcome {
            summary: RunSummary {
                found: 2,
                succeeded: 1,
                invocations: 2,
                invocations_succeeded: 1,
            },
            results: vec![
                JobResult {
                    job: passed,
                    exit_code: 0,
                },
                JobResult {
                    job: failed,
                    exit_code: 1,
                },
            ],
        }
    }

    #[test]
    fn empty_env_value_means_no_report() {
        assert_eq!(report_path(None), None);
        assert_eq!(report_path(Some(PathBuf::new())), None);
        assert_eq!(
            report_path(Some(PathBuf::from("out/report.json"))),
            Some(PathBuf::from("out/report.json"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn report_json_shape() {
        let directory = Path::new("kernels");
        let config = Config::new(directory).with_command("clspv -O3");
        let outcome = outcome(directory);

        let json = serde_json::to_value(RunReport::new(&config, &outcome)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "directory": "kernels",
                "command": "clspv -O3",
                "summary": {
                    "found": 2,
                    "succeeded": 1,
                    "invocations": 2,
                    "invocations_succeeded": 1
                },
                "jobs": [
                    {
                        "source_path": "kernels/a_source.cl",
                        "output_path": "kernels/a_source.spv",
                        "log_path": "kernels/a_source.log",
                        "options_path": "kernels/a_options.txt",
                        "exit_code": 0
                    },
                    {
                        "source_path": "kernels/b_source.cl",
                        "output_path": "kernels/b_source.spv",
                        "log_path": "kernels/b_source.log",
                        "options_path": null,
                        "exit_code": 1
                    }
                ]
            })
        );
    }

    #[test]
    fn report_is_written_into_new_directories() {
        let tmp_dir = std::env::temp_dir().join(format!("clspv-report-{}", uuid::Uuid::new_v4()));
        let report_path = tmp_dir.join("nested").join("report.json");

        let config = Config::new("kernels");
        write_report(&report_path, &config, &outcome(Path::new("kernels"))).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(written["summary"]["found"], 2);
        assert_eq!(written["jobs"][1]["exit_code"], 1);

        std::fs::remove_dir_all(&tmp_dir).unwrap();
    }
}
