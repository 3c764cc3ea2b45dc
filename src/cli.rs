use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::batch::{Config, DEFAULT_COMMAND};

/// Compiles all .cl files in a directory to SPIR-V with an external compiler.
///
/// Each `<name>.cl` is compiled to `<name>.spv`, with the compiler's output
/// written to `<name>.log`. Extra flags are read from the first line of a
/// sibling `*_options.txt` file when one matches.
#[derive(Debug, Clone, Parser)]
#[command(version, disable_help_flag = true, arg_required_else_help = true)]
pub struct Cli {
    /// directory with .cl files
    pub directory: PathBuf,

    /// command to run, split on whitespace
    #[arg(default_value = DEFAULT_COMMAND, allow_hyphen_values = true)]
    pub command: String,

    /// Print help
    #[arg(short = 'h', short_alias = '?', long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config::new(&self.directory).with_command(&self.command)
    }
}
