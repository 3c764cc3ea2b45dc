use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::BatchError;
use super::invoke::{Compiler, Invocation};

/// a uniquely named scratch directory, removed on drop
pub struct Fixture {
    dir: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("clspv-batch-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// remembers every invocation instead of running it;
/// answers with queued exit codes, then 0
#[derive(Debug, Default)]
pub struct RecordingCompiler {
    pub invocations: Vec<Invocation>,
    exit_codes: VecDeque<i32>,
}

impl RecordingCompiler {
    pub fn with_exit_codes(exit_codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            invocations: vec![],
            exit_codes: exit_codes.into_iter().collect(),
        }
    }

    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.invocations.iter().map(Invocation::lossy_argv).collect()
    }
}

impl Compiler for RecordingCompiler {
    fn compile(&mut self, invocation: &Invocation, _log: File) -> Result<i32, BatchError> {
        self.invocations.push(invocation.clone());
        Ok(self.exit_codes.pop_front().unwrap_or(0))
    }
}
