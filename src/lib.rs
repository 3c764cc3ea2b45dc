pub mod batch;
pub mod cli;
pub mod report;
pub mod util;

pub use batch::{BatchError, Config, RunOutcome, RunSummary, run, run_with_process};
