mod environment;
mod fragments;
mod preferences;
mod runtime;
mod statusline;
mod types;
mod vcs;

use anyhow::{Context, Result};
use clap::Parser;
use environment::EnvironmentFacts;
use preferences::Preferences;
use runtime::CommandProbe;
use statusline::StatusInputs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use types::SessionContext;

/// Print a one-line session summary for a Claude Code status line.
///
/// Reads the session JSON from stdin.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Preferences file (default: <config dir>/statusliner/statusliner.toml)
    #[arg(long, env = "STATUSLINER_CONFIG")]
    config: Option<PathBuf>,
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("STATUSLINER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn run(args: &Args) -> Result<String> {
    let input = read_stdin().context("reading stdin")?;
    let session = SessionContext::parse(&input).context("parsing status line input")?;

    let prefs = Preferences::discover(args.config.as_deref())?;
    let template = prefs.session_template()?;
    let env = EnvironmentFacts::from_process()?;

    let vcs = vcs::open(prefs.vcs, &env.current_dir);
    let probe = CommandProbe::new(&prefs.runtime_command);
    let now = chrono::Local::now().time();

    let inputs = StatusInputs::gather(&session, &env, &prefs, vcs, &probe, now);
    statusline::render(&inputs, &template)
}

fn main() {
    let args = Args::parse();
    init_logging();

    match run(&args) {
        Ok(line) => println!("{line}"),
        Err(err) => {
            eprintln!("statusliner: {err:#}");
            process::exit(2);
        }
    }
}
