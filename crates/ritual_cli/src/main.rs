//! `commit-ritual` entry point.
//!
//! # Responsibility
//! - Sequence preflight, identity lookup, name confirmation and enrollment.
//! - Turn every failure into one user-facing line and an exit code.
//!
//! # Invariants
//! - No error path panics or prints a backtrace.
//! - The ledger is written at most once per run, by the core service.

mod preflight;
mod prompt;
mod render;

use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{error, info};
use prompt::{PromptError, Prompter};
use ritual_core::config::{DEFAULT_API_BASE_URL, DEFAULT_LEDGER_PATH};
use ritual_core::{
    init_logging, is_acceptable, parse_join_date, EnrollError, EnrollOutcome, EnrollmentService,
    EntryValidationError, ErrorKind, FileLedgerRepository, GitHubDirectory, Handle,
    IdentityProvider, RitualConfig,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "commit-ritual",
    version,
    about = "Verify your GitHub identity and sign the BuffTeks Hall of Fame"
)]
struct Cli {
    /// Ledger document containing the Hall of Fame section
    #[arg(long, env = "RITUAL_LEDGER", default_value = DEFAULT_LEDGER_PATH)]
    ledger: PathBuf,
    /// GitHub username; prompted for when absent
    #[arg(long)]
    handle: Option<String>,
    /// Display name; skips name confirmation when given
    #[arg(long)]
    name: Option<String>,
    /// Join date as YYYY-MM-DD; defaults to today
    #[arg(long, value_parser = parse_date_arg)]
    date: Option<NaiveDate>,
    /// Base URL of the user directory API
    #[arg(long, env = "RITUAL_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,
    /// Skip the directory lookup (requires --name)
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Skip environment checks
    #[arg(long, default_value_t = false)]
    skip_checks: bool,
    /// Do not print the roster after enrolling
    #[arg(long, default_value_t = false)]
    no_roster: bool,
    /// trace|debug|info|warn|error
    #[arg(long, env = "RITUAL_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files
    #[arg(long, env = "RITUAL_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn config(&self) -> RitualConfig {
        let mut config = RitualConfig {
            ledger_path: self.ledger.clone(),
            ..RitualConfig::default()
        };
        config.directory.api_base_url = self.api_base_url.clone();
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        config
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    parse_join_date(raw).map_err(|err| err.to_string())
}

/// Handled run failures.
#[derive(Debug)]
enum Failure {
    Preflight,
    Aborted,
    Usage(String),
    Terminal(io::Error),
    Enroll(EnrollError),
}

impl Failure {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Preflight => 2,
            Self::Enroll(err) if err.kind() == ErrorKind::IoWriteFailure => 3,
            _ => 1,
        }
    }

    /// Log-safe category; never carries names or paths.
    fn error_code(&self) -> String {
        match self {
            Self::Preflight => "preflight_failed".to_string(),
            Self::Aborted => "aborted".to_string(),
            Self::Usage(_) => "usage".to_string(),
            Self::Terminal(err) => format!("terminal_{:?}", err.kind()),
            Self::Enroll(err) => format!("{:?}", err.kind()),
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Preflight => write!(
                f,
                "❌ System validation failed. Please fix the issues above and retry."
            ),
            Self::Aborted => write!(f, "⚠️  Ritual aborted by user."),
            Self::Usage(message) => write!(f, "❌ {message}"),
            Self::Terminal(err) => write!(f, "❌ terminal error: {err}"),
            Self::Enroll(err) => match err.kind() {
                ErrorKind::UpstreamRateLimited | ErrorKind::UpstreamTransient => {
                    write!(f, "⚠️  {err}. Please try again later.")
                }
                ErrorKind::SectionNotFound | ErrorKind::TableNotFound => {
                    write!(f, "❌ Could not locate the Hall of Fame table: {err}")
                }
                _ => write!(f, "❌ {err}"),
            },
        }
    }
}

impl Error for Failure {}

impl From<EnrollError> for Failure {
    fn from(value: EnrollError) -> Self {
        Self::Enroll(value)
    }
}

impl From<io::Error> for Failure {
    fn from(value: io::Error) -> Self {
        Self::Terminal(value)
    }
}

impl From<PromptError> for Failure {
    fn from(value: PromptError) -> Self {
        match value {
            PromptError::Aborted => Self::Aborted,
            PromptError::NameUnacceptable(name) => Self::Enroll(EnrollError::Validation(
                EntryValidationError::NameUnacceptable(name),
            )),
            PromptError::Io(err) => Self::Terminal(err),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    match run(&cli, &config) {
        Ok(()) => {
            info!("event=run_end module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            error!(
                "event=run_end module=cli status=error exit_code={} error_code={}",
                failure.exit_code(),
                failure.error_code()
            );
            eprintln!("{failure}");
            ExitCode::from(failure.exit_code())
        }
    }
}

fn run(cli: &Cli, config: &RitualConfig) -> Result<(), Failure> {
    println!("{}", render::BANNER);

    if cli.offline && cli.name.is_none() {
        return Err(Failure::Usage("--offline requires --name".to_string()));
    }
    let directory = if cli.offline {
        None
    } else {
        Some(GitHubDirectory::new(&config.directory).map_err(EnrollError::from)?)
    };

    if !cli.skip_checks {
        let checks = preflight::run_checks(config, directory.as_ref());
        print!("{}", render::checks(&checks)?);
        if !preflight::all_passed(&checks) {
            return Err(Failure::Preflight);
        }
        println!("All systems operational!\n");
    }

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let raw_handle = match &cli.handle {
        Some(handle) => handle.clone(),
        None => prompter.ask_handle()?,
    };
    let handle = Handle::parse(&raw_handle).map_err(EnrollError::from)?;
    let service =
        EnrollmentService::from_config(FileLedgerRepository::new(&config.ledger_path), config);
    if service.is_enrolled(&handle)? {
        print_already_enrolled(&handle);
        return Ok(());
    }

    let provider = directory.as_ref().map(|d| d as &dyn IdentityProvider);
    let display_name = resolve_display_name(cli.name.as_deref(), provider, &handle, &mut prompter)?;
    let joined_on = cli.date.unwrap_or_else(|| Local::now().date_naive());

    match service.enroll(&handle, &display_name, joined_on)? {
        EnrollOutcome::Enrolled { entry, .. } => {
            println!(
                "🔥 {} has been successfully added to the BuffTeks Hall of Fame! 🎉\n",
                entry.display_name
            );
            if !cli.no_roster {
                match service.roster() {
                    Ok(table) => print!("{}", render::roster(&table)?),
                    Err(err) => eprintln!("warning: could not display the roster: {err}"),
                }
            }
            println!("✅ You can now proceed to push your contribution!");
            println!("{}", render::PUSH_REMINDER);
        }
        EnrollOutcome::AlreadyEnrolled { handle, .. } => print_already_enrolled(&handle),
    }
    Ok(())
}

fn print_already_enrolled(handle: &Handle) {
    info!("event=run_duplicate module=cli status=ok handle={}", handle);
    println!(
        "🫸  A BuffTeks contributor with the GitHub username {handle} is already in the Hall of Fame!"
    );
    println!("   - Please confirm and proceed to pushing your contribution!");
}

/// Picks the display name: explicit flag, confirmed directory name, or typed.
///
/// The lookup runs even when a name is given so the handle is verified.
fn resolve_display_name<R: BufRead, W: Write>(
    explicit: Option<&str>,
    provider: Option<&dyn IdentityProvider>,
    handle: &Handle,
    prompter: &mut Prompter<R, W>,
) -> Result<String, Failure> {
    let identity = match provider {
        Some(provider) => Some(provider.lookup(handle).map_err(EnrollError::from)?),
        None => None,
    };
    if let Some(name) = explicit {
        return Ok(name.to_string());
    }

    let suggested = identity
        .as_ref()
        .and_then(|identity| identity.display_name())
        .filter(|name| is_acceptable(name));
    match suggested {
        Some(name) => {
            if prompter.confirm_name(name)? {
                Ok(name.to_string())
            } else {
                Ok(prompter.ask_name()?)
            }
        }
        None => {
            prompter.say("GitHub name could not be verified.")?;
            Ok(prompter.ask_name()?)
        }
    }
}
