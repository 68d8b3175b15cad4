//! nopctl-cli: command-line surface for the instrumentation client.
//!
//! Four commands: `ui` (default, interactive), `list`, `activate`, and
//! `deactivate`. Commands run against an injected transport and injected
//! output sinks so tests capture everything; the binary wires in the real
//! HTTP transport and the process streams.

use std::env;
use std::io::Write;

use nopctl_client::{
    ClientError, HttpTransport, InstrumentationTransport, RemoteCache,
};
use nopctl_core::{FunctionFilter, FunctionTable};

const DEFAULT_PORT: i64 = 8000;

const USAGE: &str = "\
Usage: nopctl [COMMAND] [OPTIONS] [FUNCTIONS...]

Commands:
  ui           interactive function list (default)
  list         print functions matching a filter
  activate     activate the named functions
  deactivate   nop the named functions

Options:
  -p, --port PORT      server port (default 8000)
  -f, --filter FILTER  list only: filter applied before printing
  -h, --help           show this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CliCommand {
    Ui,
    List,
    Activate,
    Deactivate,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParsedArgs {
    command: CliCommand,
    port: i64,
    filter: String,
    functions: Vec<String>,
}

fn parse_args(args: &[String]) -> Result<ParsedArgs, String> {
    let mut command = None;
    let mut port = DEFAULT_PORT;
    let mut filter = String::new();
    let mut functions = Vec::new();

    let mut index = 0;
    while index < args.len() {
        let arg = args[index].as_str();
        match arg {
            "-p" | "--port" => {
                index += 1;
                let value = args
                    .get(index)
                    .ok_or_else(|| format!("missing value for {arg}"))?;
                port = value
                    .parse::<i64>()
                    .map_err(|_| format!("invalid port {value:?}"))?;
            }
            "-f" | "--filter" => {
                index += 1;
                filter = args
                    .get(index)
                    .ok_or_else(|| format!("missing value for {arg}"))?
                    .clone();
            }
            "-h" | "--help" => command = Some(CliCommand::Help),
            other if other.starts_with('-') => {
                return Err(format!("unrecognized option {other:?}"));
            }
            other => {
                if command.is_none() && functions.is_empty() {
                    command = Some(match other {
                        "ui" => CliCommand::Ui,
                        "list" => CliCommand::List,
                        "activate" => CliCommand::Activate,
                        "deactivate" => CliCommand::Deactivate,
                        _ => return Err(format!("unknown command {other:?}")),
                    });
                } else {
                    functions.push(other.to_owned());
                }
            }
        }
        index += 1;
    }

    Ok(ParsedArgs {
        command: command.unwrap_or(CliCommand::Ui),
        port,
        filter,
        functions,
    })
}

/// Entry point for the `nopctl` binary.
pub fn run_from_env() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    run_with_transport(
        &args,
        Box::new(HttpTransport::new()),
        &mut stdout,
        &mut stderr,
    )
}

/// Run one command against the given transport and output sinks.
pub fn run_with_transport(
    args: &[String],
    transport: Box<dyn InstrumentationTransport>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(message) => {
            let _ = writeln!(stderr, "{message}");
            let _ = writeln!(stderr, "{USAGE}");
            return 2;
        }
    };

    match parsed.command {
        CliCommand::Help => {
            let _ = writeln!(stdout, "{USAGE}");
            0
        }
        CliCommand::Ui => run_ui(&parsed, transport, stderr),
        CliCommand::List => run_list(&parsed, transport, stdout, stderr),
        CliCommand::Activate => run_set(&parsed, true, transport, stderr),
        CliCommand::Deactivate => run_set(&parsed, false, transport, stderr),
    }
}

/// Captured output of one command run, for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

pub fn run_for_test(
    args: &[&str],
    transport: Box<dyn InstrumentationTransport>,
) -> CommandOutput {
    let owned_args: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let exit_code = run_with_transport(&owned_args, transport, &mut stdout, &mut stderr);
    CommandOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code,
    }
}

fn connect(
    parsed: &ParsedArgs,
    transport: Box<dyn InstrumentationTransport>,
    stderr: &mut dyn Write,
) -> Option<RemoteCache> {
    let mut cache = RemoteCache::with_transport(transport);
    match cache.connect(parsed.port) {
        Ok(()) => Some(cache),
        Err(ClientError::Connection(_)) => {
            let _ = writeln!(
                stderr,
                "Could not connect, is the instrumentation server started on port {}?",
                parsed.port
            );
            None
        }
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            None
        }
    }
}

fn run_ui(
    parsed: &ParsedArgs,
    transport: Box<dyn InstrumentationTransport>,
    stderr: &mut dyn Write,
) -> i32 {
    let Some(cache) = connect(parsed, transport, stderr) else {
        return 1;
    };
    match nopctl_tui::runtime::run_loop(cache) {
        Ok(()) => 0,
        Err(message) => {
            let _ = writeln!(stderr, "{message}");
            1
        }
    }
}

fn run_list(
    parsed: &ParsedArgs,
    transport: Box<dyn InstrumentationTransport>,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    let filter = match parsed.filter.parse::<FunctionFilter>() {
        Ok(filter) => filter,
        Err(_) => {
            let _ = writeln!(stderr, "Invalid filter");
            return 1;
        }
    };
    let Some(cache) = connect(parsed, transport, stderr) else {
        return 1;
    };
    let Ok(table) = cache.read() else {
        return 1;
    };
    for (name, active) in table {
        // Selection has no meaning outside the UI; that axis stays
        // unevaluated here.
        if filter.matches(name, Some(*active), None) {
            let label = if *active { "(active)" } else { "(nopped)" };
            let _ = writeln!(stdout, "{name} {label}");
        }
    }
    0
}

fn run_set(
    parsed: &ParsedArgs,
    active: bool,
    transport: Box<dyn InstrumentationTransport>,
    stderr: &mut dyn Write,
) -> i32 {
    let Some(mut cache) = connect(parsed, transport, stderr) else {
        return 1;
    };
    let partial: FunctionTable = parsed
        .functions
        .iter()
        .map(|name| (name.clone(), active))
        .collect();
    match cache.write(&partial) {
        Ok(()) => 0,
        Err(err @ ClientError::UnknownFunction(_)) => {
            let _ = writeln!(stderr, "Function not in list: {err}");
            1
        }
        Err(err) => {
            let _ = writeln!(stderr, "{err}");
            1
        }
    }
}

/// Stable crate label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "nopctl-cli"
}
