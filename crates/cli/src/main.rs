// multas - traffic citation lookups against the ANT portal

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use log::error;

use multas_cli::exit_codes::{code_name, EXIT_CONFIG, EXIT_NO_DATA, EXIT_SUCCESS};
use multas_cli::fetch::PortalClient;
use multas_cli::query::run_query;
use multas_cli::{db, CliError};
use multas_config::Settings;
use multas_core::{JobOutcome, QuerySource};
use multas_recon::{unify_directory, UnifyOptions};

#[derive(Parser)]
#[command(name = "multas")]
#[command(about = "Look up traffic citations on the ANT portal and consolidate the reports")]
#[command(version)]
#[command(long_version = long_version())]
struct Cli {
    /// Settings file (default: <config dir>/multas/settings.toml)
    #[arg(long, global = true, env = "MULTAS_CONFIG")]
    config: Option<PathBuf>,

    /// Input workbook (overrides db_path)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Report directory (overrides output_dir)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Print job outcomes as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the portal for every identifier of a source sheet
    #[command(after_help = "\
Examples:
  multas query plate
  multas query national-id --db ~/DB-CONSULTA.xlsx
  multas query all --json")]
    Query {
        /// Which input sheet to run
        source: SourceArg,
    },

    /// Merge all report files of a directory into one deduplicated report
    #[command(after_help = "\
Examples:
  multas unify
  multas unify --dir ~/Desktop/consultas --json")]
    Unify {
        /// Directory to unify (default: output_dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Manage the input workbook
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Inspect or create the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the settings file path in use
    Path,

    /// Write a settings file with the effective values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Replace the input workbook with an .xlsx file
    Import { file: PathBuf },

    /// Copy the input workbook to a destination
    Export { dest: PathBuf },

    /// Show the identifier count of each source sheet
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Plate,
    TaxId,
    NationalId,
    ForeignId,
    /// All four sources in turn
    All,
}

impl SourceArg {
    fn sources(self) -> Vec<QuerySource> {
        match self {
            Self::Plate => vec![QuerySource::Plate],
            Self::TaxId => vec![QuerySource::TaxId],
            Self::NationalId => vec![QuerySource::NationalId],
            Self::ForeignId => vec![QuerySource::ForeignId],
            Self::All => QuerySource::ALL.to_vec(),
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("MULTAS_COMMIT"), ")",
        "\ntarget:  ", env!("MULTAS_TARGET"),
        "\nreports: ", "xlsx (calamine read, rust_xlsxwriter write)",
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let json = cli.json;
    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(CliError { code, message, hint }) => {
            if json {
                print_json(&JobOutcome::failed(code_name(code), message.clone()));
            }
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = format!(
        "warn,multas={level},multas_cli={level},multas_recon={level},multas_io={level},multas_config={level}"
    );
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<u8, CliError> {
    match &cli.command {
        Commands::Query { source } => cmd_query(*source, &load_settings(&cli)?, cli.json),
        Commands::Unify { dir } => cmd_unify(dir.clone(), &load_settings(&cli)?, cli.json),
        Commands::Db { command } => {
            let settings = load_settings(&cli)?;
            match command {
                DbCommands::Import { file } => {
                    let dest = db::import(file, &settings)?;
                    println!("imported {} as {}", file.display(), dest.display());
                    Ok(EXIT_SUCCESS)
                }
                DbCommands::Export { dest } => {
                    db::export(dest, &settings)?;
                    println!("exported {} to {}", settings.db_path.display(), dest.display());
                    Ok(EXIT_SUCCESS)
                }
                DbCommands::Check => cmd_db_check(&settings, cli.json),
            }
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                println!("{}", settings_path(&cli).display());
                Ok(EXIT_SUCCESS)
            }
            ConfigCommands::Init { force } => cmd_config_init(&cli, *force),
        },
    }
}

fn settings_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(Settings::config_path)
}

fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = match &cli.config {
        Some(path) if !path.is_file() => {
            return Err(CliError::new(
                EXIT_CONFIG,
                format!("settings file {} not found", path.display()),
            ));
        }
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };

    if let Some(db) = &cli.db {
        settings.db_path = db.clone();
    }
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    Ok(settings)
}

// ============================================================================
// query
// ============================================================================

fn cmd_query(source: SourceArg, settings: &Settings, json: bool) -> Result<u8, CliError> {
    let client = PortalClient::from_settings(settings)?;
    let sources = source.sources();

    if let [single] = sources.as_slice() {
        let outcome = run_query(*single, settings, &client)?;
        print_outcome(&outcome, json);
        return Ok(outcome_exit_code(&outcome));
    }

    // `all`: one source failing hard does not stop the others
    let mut outcomes = Vec::with_capacity(sources.len());
    let mut first_error: Option<u8> = None;
    for source in sources {
        match run_query(source, settings, &client) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                error!("{}: {}", source, e.message);
                first_error.get_or_insert(e.code);
                outcomes.push(JobOutcome::failed(code_name(e.code), e.message));
            }
        }
    }

    if json {
        print_json(&outcomes);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome, false);
        }
    }

    if outcomes.iter().any(|o| o.success) {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(first_error.unwrap_or(EXIT_NO_DATA))
    }
}

// ============================================================================
// unify
// ============================================================================

fn cmd_unify(dir: Option<PathBuf>, settings: &Settings, json: bool) -> Result<u8, CliError> {
    let dir = dir.unwrap_or_else(|| settings.output_dir.clone());
    let options = UnifyOptions { create_dirs: settings.create_dirs };

    let outcome = match unify_directory(&dir, &options) {
        Ok(report) => {
            let name = report
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let message = format!(
                "{} rows from {} files written to {} ({} duplicates removed)",
                report.rows_written, report.files_scanned, name, report.duplicates_removed
            );
            let download_url = settings.download_url(&name);
            JobOutcome::written(message, report.output, download_url)
        }
        Err(e) if e.is_empty_result() => JobOutcome::failed(e.code(), e.to_string()),
        Err(e) => return Err(e.into()),
    };

    print_outcome(&outcome, json);
    Ok(outcome_exit_code(&outcome))
}

// ============================================================================
// db check
// ============================================================================

fn cmd_db_check(settings: &Settings, json: bool) -> Result<u8, CliError> {
    let statuses = db::check(settings)?;

    if json {
        print_json(&statuses);
    } else {
        println!("{}", settings.db_path.display());
        for s in &statuses {
            match (s.identifiers, &s.error) {
                (Some(n), _) => println!("  {:<10} {:>6} {}", s.sheet, n, s.source),
                (None, Some(err)) => println!("  {:<10} {:>6} {}", s.sheet, "-", err),
                (None, None) => println!("  {:<10} {:>6}", s.sheet, "-"),
            }
        }
    }

    Ok(db::check_exit_code(&statuses).unwrap_or(EXIT_SUCCESS))
}

// ============================================================================
// config init
// ============================================================================

/// Write defaults, with `--db` / `--output-dir` applied, to the settings path.
fn cmd_config_init(cli: &Cli, force: bool) -> Result<u8, CliError> {
    let path = settings_path(cli);
    if path.exists() && !force {
        return Err(CliError::args(format!("{} already exists", path.display()))
            .with_hint("pass --force to overwrite it"));
    }

    let mut settings = Settings::default();
    if let Some(db) = &cli.db {
        settings.db_path = db.clone();
    }
    if let Some(dir) = &cli.output_dir {
        settings.output_dir = dir.clone();
    }
    settings.save_to(&path)?;

    println!("wrote {}", path.display());
    Ok(EXIT_SUCCESS)
}

// ============================================================================
// Output
// ============================================================================

fn outcome_exit_code(outcome: &JobOutcome) -> u8 {
    if outcome.success {
        EXIT_SUCCESS
    } else {
        EXIT_NO_DATA
    }
}

fn print_outcome(outcome: &JobOutcome, json: bool) {
    if json {
        print_json(outcome);
        return;
    }

    if outcome.success {
        println!("{}", outcome.message);
        if let Some(path) = &outcome.path {
            println!("  file: {}", path.display());
        }
        if let Some(url) = &outcome.download_url {
            println!("  url:  {}", url);
        }
    } else {
        println!("{}: {}", outcome.code.unwrap_or("FAILED"), outcome.message);
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("error: cannot serialize output: {}", e),
    }
}
