use std::fmt;
use std::path::{Path, PathBuf};

use log::*;
use serde::Serialize;

use crate::util::sibling_with_suffix;

pub mod invoke;
pub mod options;

#[cfg(test)]
mod testing;

pub use invoke::{Compiler, Invocation, ProcessCompiler, compile_one};

/// the compiler run when no command is given
pub const DEFAULT_COMMAND: &str = "clspv";

pub const SOURCE_SUFFIX: &str = ".cl";
const OUTPUT_SUFFIX: &str = ".spv";
const LOG_SUFFIX: &str = ".log";

#[derive(Debug, Clone)]
pub struct Config {
    /// the directory to read .cl files from, and write .spv & .log files to
    pub directory: PathBuf,
    /// the compiler executable and its leading arguments, split on whitespace
    pub command: String,
}

impl Config {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            command: DEFAULT_COMMAND.to_string(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("failed to list directory {}", path.display())]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read options file {}", path.display())]
    ReadOptions {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid options file pattern {pattern:?}")]
    OptionsPattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("failed to create log file {}", path.display())]
    CreateLog {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("the compiler command is empty")]
    EmptyCommand,
    #[error("failed to run {program}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// one compiler run over one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileJob {
    pub source_path: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub options_path: Option<PathBuf>,
}

impl CompileJob {
    /// `source_file_name` must end in ".cl"
    pub fn new(directory: &Path, source_file_name: &str, options_path: Option<PathBuf>) -> Self {
        let strip = SOURCE_SUFFIX.len();

        Self {
            source_path: directory.join(source_file_name),
            output_path: sibling_with_suffix(directory, source_file_name, strip, OUTPUT_SUFFIX),
            log_path: sibling_with_suffix(directory, source_file_name, strip, LOG_SUFFIX),
            options_path,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    #[serde(flatten)]
    pub job: CompileJob,
    pub exit_code: i32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// source files discovered
    pub found: usize,
    /// source files whose every compiler run exited with 0
    pub succeeded: usize,
    pub invocations: usize,
    pub invocations_succeeded: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Found {} file(s) to compile.", self.found)?;
        write!(f, "Compiled {} file(s) successfully.", self.succeeded)
    }
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub results: Vec<JobResult>,
}

/// compiles every .cl file directly inside the configured directory with real processes
pub fn run_with_process(config: &Config) -> Result<RunOutcome, BatchError> {
    run(config, &mut ProcessCompiler)
}

/// Compiles every .cl file directly inside `config.directory`, one at a time.
///
/// Each source is compiled once per matching options file, or once without
/// options when none match. Non-zero exit codes only affect the tally; any
/// other failure aborts the remaining batch.
pub fn run<C: Compiler + ?Sized>(config: &Config, compiler: &mut C) -> Result<RunOutcome, BatchError> {
    let directory = &config.directory;
    if !directory.exists() {
        return Err(BatchError::DirectoryNotFound(directory.clone()));
    }

    println!(
        "Running \"{}\" to compile all .cl files in: {}:",
        config.command,
        directory.display()
    );

    let mut summary = RunSummary::default();
    let mut results = vec![];

    let source_file_names = list_entry_names(directory)?
        .into_iter()
        .filter(|name| name.ends_with(SOURCE_SUFFIX));

    for source_file_name in source_file_names {
        summary.found += 1;

        let options_files = options::matching_options_files(directory, &source_file_name)?;
        if options_files.len() > 1 {
            warn!(
                "{} options files match {source_file_name}, compiling it once per file",
                options_files.len()
            );
        }

        let jobs: Vec<CompileJob> = if options_files.is_empty() {
            vec![CompileJob::new(directory, &source_file_name, None)]
        } else {
            options_files
                .into_iter()
                .map(|options_path| CompileJob::new(directory, &source_file_name, Some(options_path)))
                .collect()
        };

        let mut all_succeeded = true;
        for job in jobs {
            let exit_code = compile_one(&mut *compiler, &config.command, &job)?;

            summary.invocations += 1;
            if exit_code == 0 {
                summary.invocations_succeeded += 1;
            } else {
                warn!(
                    "{} exited with {exit_code}, see {}",
                    job.source_path.display(),
                    job.log_path.display()
                );
                all_succeeded = false;
            }

            results.push(JobResult { job, exit_code });
        }

        if all_succeeded {
            summary.succeeded += 1;
        }
    }

    Ok(RunOutcome { summary, results })
}

/// the names of the entries directly inside `directory`, sorted
///
/// names that aren't valid utf-8 are skipped
pub(crate) fn list_entry_names(directory: &Path) -> Result<Vec<String>, BatchError> {
    let read_error = |source| BatchError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    };

    let mut names = vec![];
    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => warn!("skipping non utf-8 file name {}", name.to_string_lossy()),
        }
    }

    names.sort();
    Ok(names)
}
