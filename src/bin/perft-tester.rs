use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use perft_tester::config::{
    AliasConfig, DepthOneForm, InvokerSettings, RunnerSettings, DEFAULT_CONFIG_PATH,
    DEFAULT_DIRTEST, DEFAULT_SUBCOMMAND, DEFAULT_TIMEOUT_MS,
};
use perft_tester::{FixtureCatalog, ProcessEngine, SuiteReport, SuiteRunner};

#[derive(Parser, Debug)]
#[command(
    name = "perft-tester",
    about = "Checks an engine's perft replies against a directory of fixtures"
)]
struct Cli {
    /// Engine executable, or an engine alias from the config file
    engine: String,
    /// Path to the alias configuration file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Test directory to use, or a test directory alias
    #[arg(short = 'd', long, default_value = DEFAULT_DIRTEST)]
    dirtest: String,
    /// Run a single fixture file from the test directory
    #[arg(short = 't', long)]
    testfile: Option<String>,
    /// Itemize depth-1 mismatches
    #[arg(short = 'v', long, default_value_t = false)]
    verbose: bool,
    /// Kill an engine request after this many milliseconds (0 waits forever)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,
    /// First argument of every engine request
    #[arg(long, default_value = DEFAULT_SUBCOMMAND)]
    subcommand: String,
    /// Request depth 1 without the trailing depth argument
    #[arg(long, default_value_t = false)]
    implicit_depth_one: bool,
    /// Also check the position and depth echoed back by the engine
    #[arg(long, default_value_t = false)]
    strict_echo: bool,
    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Diagnostic log level on stderr
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    perft_tester::init_logging(cli.log_level.into());
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("perft-tester error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let aliases = AliasConfig::load_from_file(&cli.config);
    let engine_path = aliases.resolve_engine(&cli.engine);
    let dirtest = aliases.resolve_dirtest(&cli.dirtest);

    let catalog = FixtureCatalog::new(dirtest);

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Engine path    : {}", engine_path.display())?;
    writeln!(stdout, "Tests directory: {}", catalog.root().display())?;

    let entries = match &cli.testfile {
        Some(name) => vec![catalog.entry(name)?],
        None => catalog.discover()?,
    };

    let settings = InvokerSettings {
        subcommand: cli.subcommand,
        timeout: InvokerSettings::timeout_from_millis(cli.timeout_ms),
        depth_one: if cli.implicit_depth_one {
            DepthOneForm::Implicit
        } else {
            DepthOneForm::Explicit
        },
    };
    let mut engine =
        ProcessEngine::new(engine_path, settings).context("starting engine supervisor")?;

    let runner_settings = RunnerSettings {
        verbose: cli.verbose,
        strict_echo: cli.strict_echo,
    };
    let report = SuiteRunner::new(&mut engine, stdout, runner_settings).run(&entries);

    if let Some(path) = cli.report {
        write_report(&report, &path)?;
    }

    Ok(report.passed())
}

fn write_report(report: &SuiteReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("creating report directory")?;
    }
    let json = serde_json::to_string_pretty(&report.to_json()).context("serializing report")?;
    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}
