//! Command-line front end: `hash-speed-test <ALGORITHM> <RUNS> <PHRASE> <OUTPUT>`.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::csv::persist_table;
use crate::error::BenchError;
use crate::harness::{benchmark, Invocation};
use crate::provider::{BuiltinProvider, HashProvider};
use crate::table::ResultTable;
use crate::Algorithm;

pub const USAGE: &str = "Usage: hash-speed-test <ALGORITHM> <RUNS> <PHRASE> <OUTPUT>";

/// Exit status when arguments are rejected.
pub const EXIT_USAGE: u8 = 2;
/// Exit status when a run or the final write fails.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "hash-speed-test")]
#[command(about = "Time a hash function over a phrase and write per-run timings to CSV")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Hash algorithm (case-sensitive).
    #[arg(value_enum, value_name = "ALGORITHM")]
    pub algorithm: Algorithm,

    /// Number of timed runs; the first is discarded before averaging.
    #[arg(value_name = "RUNS", value_parser = clap::value_parser!(u32).range(1..))]
    pub runs: u32,

    /// Text to hash, encoded as UTF-8.
    #[arg(value_name = "PHRASE")]
    pub phrase: String,

    /// CSV file to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

impl Args {
    pub fn invocation(&self) -> Result<Invocation, BenchError> {
        Invocation::new(self.algorithm, self.runs as usize, self.phrase.clone())
    }
}

/// Second usage line: every accepted algorithm name.
pub fn supported_algorithms_line() -> String {
    let names: Vec<&str> = Algorithm::ALL.iter().map(Algorithm::name).collect();
    format!("Supported algorithms: {}", names.join(", "))
}

pub fn print_usage() {
    println!("{USAGE}");
    println!("{}", supported_algorithms_line());
}

/// Prepends `--` so every user token is a positional value, flags included.
fn positional_only<I, T>(argv: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut argv = argv.into_iter().map(Into::into);
    let mut out: Vec<OsString> = argv.next().into_iter().collect();
    out.push(OsString::from("--"));
    out.extend(argv);
    out
}

/// Parses the four positionals; tokens such as `-h` or `--` are taken literally.
pub fn parse_args<I, T>(argv: I) -> Result<Args, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Args::try_parse_from(positional_only(argv))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hash_speed_test=info"));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Benchmarks one invocation into a fresh table and writes it to `args.output`.
pub fn execute<P: HashProvider + ?Sized>(
    provider: &P,
    args: &Args,
) -> Result<ResultTable, BenchError> {
    let invocation = args.invocation()?;
    let row = benchmark(provider, &invocation)?;

    let mut table = ResultTable::new();
    table.append_row(row)?;
    persist_table(&table, &args.output)?;

    info!(path = %args.output.display(), "results written");
    Ok(table)
}

/// Parses `argv`, runs the benchmark and maps the outcome to an exit status.
pub fn main_with<I, T>(argv: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args = match parse_args(argv) {
        Ok(args) => args,
        Err(_) => {
            print_usage();
            return ExitCode::from(EXIT_USAGE);
        }
    };

    init_tracing();

    match execute(&BuiltinProvider, &args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) if e.is_usage() => {
            print_usage();
            ExitCode::from(EXIT_USAGE)
        }
        Err(e) => {
            error!(error = %e, cause = ?std::error::Error::source(&e), "benchmark failed");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

pub fn main() -> ExitCode {
    main_with(std::env::args_os())
}
