use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use std::fs;
use std::process::ExitCode;

use lox::runner::{self, DiagnosticStyle, RunOptions};
use lox::Interpreter;

/// Exit code for a bad command line or an unreadable script.
const EX_USAGE: u8 = 64;

fn cli() -> Command {
    Command::new("lox")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tree-walking interpreter for a small scripting language")
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("print-ast")
                .long("print-ast")
                .help("Print the parsed syntax tree instead of running it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("diagnostics")
                .long("diagnostics")
                .help("How errors are reported")
                .value_name("STYLE")
                .value_parser(["plain", "rich"])
                .default_value("plain"),
        )
}

/// Logs go to stderr and only when `RUST_LOG` is set, so script output is
/// never mixed with them.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(error) => {
            let _ = error.print();
            return match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EX_USAGE),
            };
        }
    };

    let style = match matches.get_one::<String>("diagnostics").map(String::as_str) {
        Some("rich") => DiagnosticStyle::Rich,
        _ => DiagnosticStyle::Plain,
    };

    let mut options = RunOptions {
        style,
        print_ast: matches.get_flag("print-ast"),
        filename: None,
    };

    match matches.get_one::<String>("file") {
        Some(path) if !matches.get_flag("interactive") => {
            options.filename = Some(path.clone());
            run_file(path, &options)
        }
        _ => match lox::start_repl(&options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_file(path: &str, options: &RunOptions) -> ExitCode {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error reading file '{}': {}", path, error);
            return ExitCode::from(EX_USAGE);
        }
    };

    tracing::debug!(path, bytes = source.len(), "running file");

    let mut interpreter = Interpreter::new();
    let status = runner::run_source(&source, &mut interpreter, options);
    ExitCode::from(status.exit_code())
}
