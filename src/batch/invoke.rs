use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus};

use log::*;

use super::options::read_options;
use super::{BatchError, CompileJob};

/// a full compiler command line:
/// command tokens, then options tokens, then `<source> -o <output>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub argv: Vec<OsString>,
}

impl Invocation {
    pub fn new(command: &str, options: &[String], source: &Path, output: &Path) -> Self {
        let tail = [
            source.as_os_str().to_owned(),
            OsString::from("-o"),
            output.as_os_str().to_owned(),
        ];

        let argv = command
            .split_whitespace()
            .map(OsString::from)
            .chain(options.iter().map(OsString::from))
            .chain(tail)
            .collect();

        Self { argv }
    }

    pub fn program(&self) -> Option<&OsStr> {
        self.argv.first().map(OsString::as_os_str)
    }

    pub fn lossy_argv(&self) -> Vec<String> {
        self.argv
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }
}

/// Runs one compiler invocation to completion.
pub trait Compiler {
    /// `log` receives both stdout and stderr of the compiler.
    /// Returns the exit code; a launch failure is an error.
    fn compile(&mut self, invocation: &Invocation, log: File) -> Result<i32, BatchError>;
}

/// spawns the invocation as a child process and blocks until it exits
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessCompiler;

impl Compiler for ProcessCompiler {
    fn compile(&mut self, invocation: &Invocation, log: File) -> Result<i32, BatchError> {
        let (program, args) = invocation
            .argv
            .split_first()
            .ok_or(BatchError::EmptyCommand)?;

        let spawn_error = |source| BatchError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        };

        let stderr = log.try_clone().map_err(spawn_error)?;
        let status = Command::new(program)
            .args(args)
            .stdout(log)
            .stderr(stderr)
            .status()
            .map_err(spawn_error)?;

        Ok(exit_code(status))
    }
}

/// the raw exit code, or the negated signal number when killed by one
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}

/// reads the job's options, then compiles its source with `command`,
/// (re)creating the job's log file
pub fn compile_one<C: Compiler + ?Sized>(
    compiler: &mut C,
    command: &str,
    job: &CompileJob,
) -> Result<i32, BatchError> {
    let options = match &job.options_path {
        Some(options_path) => {
            info!("using options file {}", options_path.display());
            read_options(options_path)?
        }
        None => vec![],
    };

    println!("Compiling {}", job.source_path.display());

    if command.split_whitespace().next().is_none() {
        return Err(BatchError::EmptyCommand);
    }

    let invocation = Invocation::new(command, &options, &job.source_path, &job.output_path);
    debug!("{:?}", invocation.lossy_argv());

    let log = File::create(&job.log_path).map_err(|source| BatchError::CreateLog {
        path: job.log_path.clone(),
        source,
    })?;

    compiler.compile(&invocation, log)
}
