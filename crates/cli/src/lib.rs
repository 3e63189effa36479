#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the thin command-line front-end behind the `oc-facl` binary. It
//! parses the command line with [`clap`](https://docs.rs/clap/), decodes JSON
//! requests, drives an [`engine::AclEngine`] backed by the platform tools, and
//! turns the outcome into output and an exit status.
//!
//! ```text
//! oc-facl [-v]... [--config FILE] get <PATH> [-R]
//! oc-facl [-v]... [--config FILE] set|modify|remove [--request FILE|-]
//! ```
//!
//! # Design
//!
//! [`run`] accepts the argument list together with handles for standard output
//! and error so that tests can drive the whole front-end in memory. `get`
//! prints the listing as pretty JSON; the mutating subcommands print nothing on
//! success. Requests are read from `--request FILE`, or from standard input
//! when the option is absent or `-`.
//!
//! # Invariants
//!
//! - `run` never panics; every failure becomes a diagnostic on standard error
//!   and a non-zero exit status.
//! - Diagnostics are prefixed with `oc-facl: error:`.
//! - Exit statuses are stable per [`engine::AclErrorKind`]; see
//!   [`exit_code_for`].
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let status = cli::run(["oc-facl", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(status, 0);
//! assert!(String::from_utf8_lossy(&stdout).starts_with("oc-facl "));
//! assert!(stderr.is_empty());
//! ```

use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use engine::{
    AclEngine, AclError, AclErrorKind, ConfigError, EngineConfig, ExecContext, ProcessExecutor,
};
use logging::VerbosityConfig;
use protocol::{AclConfig, AclListConfig, AclRemoveConfig};

/// Name used in usage text and diagnostics.
pub const PROGRAM_NAME: &str = "oc-facl";

/// Maximum exit code representable by a Unix process.
const MAX_EXIT_CODE: i32 = u8::MAX as i32;

/// Exit status for a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status for I/O failures and errors without a more specific code.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for bad arguments, configuration or request documents.
pub const EXIT_USAGE: i32 = 2;

/// Returns the exit status reported for an engine error of `kind`.
#[must_use]
pub const fn exit_code_for(kind: AclErrorKind) -> i32 {
    match kind {
        AclErrorKind::InvalidInput => 3,
        AclErrorKind::PathNotFound => 4,
        AclErrorKind::UnsupportedFs => 5,
        AclErrorKind::InvalidPrincipal => 6,
        AclErrorKind::Parse => 7,
        AclErrorKind::Read => 8,
        AclErrorKind::Write => 9,
        AclErrorKind::Io => EXIT_FAILURE,
    }
}

/// Converts a numeric status into an [`ExitCode`], clamping to `0..=255`.
#[must_use]
pub fn exit_code_from(status: i32) -> ExitCode {
    let clamped = status.clamp(0, MAX_EXIT_CODE);
    ExitCode::from(clamped as u8)
}

#[derive(Debug, thiserror::Error)]
enum Failure {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to read request from {origin}: {source}")]
    RequestRead {
        origin: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid request from {origin}: {source}")]
    RequestDecode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Acl(#[from] AclError),
    #[error("failed to encode listing: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl Failure {
    fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::RequestDecode { .. } => EXIT_USAGE,
            Self::Acl(error) => exit_code_for(error.kind()),
            Self::RequestRead { .. } | Self::Encode(_) | Self::Output(_) => EXIT_FAILURE,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum RequestSource {
    Stdin,
    File(PathBuf),
}

impl RequestSource {
    fn from_arg(value: Option<&PathBuf>) -> Self {
        match value {
            Some(path) if path.as_path() != Path::new("-") => Self::File(path.clone()),
            _ => Self::Stdin,
        }
    }

    fn origin(&self) -> String {
        match self {
            Self::Stdin => "standard input".to_owned(),
            Self::File(path) => format!("'{}'", path.display()),
        }
    }

    fn read(&self, stdin: &mut dyn Read) -> Result<String, Failure> {
        let result = match self {
            Self::Stdin => {
                let mut text = String::new();
                stdin.read_to_string(&mut text).map(|_| text)
            }
            Self::File(path) => fs::read_to_string(path),
        };
        result.map_err(|source| Failure::RequestRead {
            origin: self.origin(),
            source,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Operation {
    Get { path: PathBuf, recursive: bool },
    Set(RequestSource),
    Modify(RequestSource),
    Remove(RequestSource),
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct ParsedArgs {
    verbose: u8,
    config: Option<PathBuf>,
    operation: Operation,
}

fn request_arg() -> Arg {
    Arg::new("request")
        .long("request")
        .value_name("FILE")
        .help("Read the JSON request from FILE ('-' for standard input).")
        .value_parser(value_parser!(PathBuf))
        .action(ArgAction::Set)
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage POSIX and NFSv4 ACLs through the platform ACL tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (repeat for more detail).")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Load engine settings from a JSON file.")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set)
                .global(true),
        )
        .subcommand(
            Command::new("get")
                .about("Print the ACL of PATH as JSON.")
                .arg(
                    Arg::new("path")
                        .value_name("PATH")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("recursive")
                        .long("recursive")
                        .short('R')
                        .help("Include the ACLs of every descendant.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("set")
                .about("Replace an ACL from a JSON request.")
                .arg(request_arg()),
        )
        .subcommand(
            Command::new("modify")
                .about("Add or update ACL entries from a JSON request.")
                .arg(request_arg()),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove ACL entries from a JSON request.")
                .arg(request_arg()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let matches = clap_command().try_get_matches_from(args)?;
    let verbose = matches.get_count("verbose");
    let config = matches.get_one::<PathBuf>("config").cloned();

    let operation = match matches.subcommand() {
        Some(("get", sub)) => Operation::Get {
            path: sub.get_one::<PathBuf>("path").cloned().unwrap_or_default(),
            recursive: sub.get_flag("recursive"),
        },
        Some(("set", sub)) => Operation::Set(request_source(sub)),
        Some(("modify", sub)) => Operation::Modify(request_source(sub)),
        Some(("remove", sub)) => Operation::Remove(request_source(sub)),
        _ => {
            return Err(clap_command().error(
                ErrorKind::MissingSubcommand,
                "a subcommand is required",
            ));
        }
    };

    Ok(ParsedArgs {
        verbose,
        config,
        operation,
    })
}

fn request_source(matches: &ArgMatches) -> RequestSource {
    RequestSource::from_arg(matches.get_one::<PathBuf>("request"))
}

/// Runs the front-end with the process's standard input.
///
/// Returns the exit status; see [`exit_code_for`] for the codes used by
/// engine failures.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let stdin = io::stdin();
    let mut input = stdin.lock();
    run_with_input(arguments, &mut input, stdout, stderr)
}

/// Runs the front-end and converts the status into an [`ExitCode`].
#[must_use]
pub fn run_with<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    exit_code_from(run(arguments, stdout, stderr))
}

fn run_with_input<I, S, In, Out, Err>(
    arguments: I,
    stdin: &mut In,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    In: Read,
    Out: Write,
    Err: Write,
{
    let parsed = match parse_args(arguments) {
        Ok(parsed) => parsed,
        Err(error) => return report_clap_error(&error, stdout, stderr),
    };

    let verbosity = VerbosityConfig::from_verbose_level(parsed.verbose);
    // A subscriber installed by an embedding process takes precedence.
    let _ = logging::init_tracing(&verbosity);

    match execute(parsed, stdin, stdout) {
        Ok(()) => EXIT_SUCCESS,
        Err(failure) => {
            tracing::debug!(error = ?failure, "command failed");
            let _ = writeln!(stderr, "{PROGRAM_NAME}: error: {failure}");
            failure.exit_code()
        }
    }
}

fn report_clap_error<Out: Write, Err: Write>(
    error: &clap::Error,
    stdout: &mut Out,
    stderr: &mut Err,
) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = write!(stdout, "{}", error.render());
            EXIT_SUCCESS
        }
        _ => {
            let _ = write!(stderr, "{}", error.render());
            EXIT_USAGE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, Failure> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    source: &RequestSource,
    stdin: &mut dyn Read,
) -> Result<T, Failure> {
    let text = source.read(stdin)?;
    serde_json::from_str(&text).map_err(|error| Failure::RequestDecode {
        origin: source.origin(),
        source: error,
    })
}

fn execute<In: Read, Out: Write>(
    parsed: ParsedArgs,
    stdin: &mut In,
    stdout: &mut Out,
) -> Result<(), Failure> {
    let config = load_config(parsed.config.as_deref())?;
    let engine = AclEngine::builder(ProcessExecutor::new())
        .config(config)
        .build();
    tracing::debug!(tools = ?engine.config().tools, "engine configured");
    let ctx = ExecContext::new();

    match parsed.operation {
        Operation::Get { path, recursive } => {
            let listing = engine.get_acl(&AclListConfig::new(path, recursive), &ctx)?;
            let json = serde_json::to_string_pretty(&listing).map_err(Failure::Encode)?;
            writeln!(stdout, "{json}").map_err(Failure::Output)?;
            stdout.flush().map_err(Failure::Output)
        }
        Operation::Set(source) => {
            let request: AclConfig = decode(&source, stdin)?;
            Ok(engine.set_acl(&request, &ctx)?)
        }
        Operation::Modify(source) => {
            let request: AclConfig = decode(&source, stdin)?;
            Ok(engine.modify_acl(&request, &ctx)?)
        }
        Operation::Remove(source) => {
            let request: AclRemoveConfig = decode(&source, stdin)?;
            Ok(engine.remove_acl(&request, &ctx)?)
        }
    }
}
