mod logging;
mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use slug_interpreter::{InterpreterConfig, DEFAULT_MAX_CALL_DEPTH};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Program to run; read from stdin when omitted
    path: Option<PathBuf>,
    /// Start a line-at-a-time session instead of running a program
    #[arg(short, long, conflicts_with = "path")]
    interactive: bool,
    /// Nested function calls allowed before the run fails
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,
    /// Print every token to stderr before parsing
    #[arg(long)]
    dump_tokens: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = InterpreterConfig {
        max_call_depth: cli.max_call_depth,
    };

    if cli.interactive {
        return match repl::start(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("io error: {}", error);
                ExitCode::FAILURE
            }
        };
    }

    match runner::run(cli.path.as_deref(), config, cli.dump_tokens) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}
