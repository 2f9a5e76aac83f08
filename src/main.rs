// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Sortscribe: content-aware directory naming and placement

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use sortscribe::attempt_log::AttemptLogger;
use sortscribe::audio::{Transcriber, WhisperClient};
use sortscribe::config::{AppConfig, Provider};
use sortscribe::decision::TerminalPrompter;
use sortscribe::engine::{build_generator, OllamaClient};
use sortscribe::naming::NamingClient;
use sortscribe::organizer::{Disposition, OrganizeOptions, OrganizeReport, Organizer};
use sortscribe::taxonomy::NamingTaxonomy;
use sortscribe::{Result, ScribeError};

/// Sortscribe CLI - name a directory from its contents and file it away
#[derive(Parser, Debug)]
#[command(name = "sortscribe")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version)]
#[command(about = "Content-aware directory naming and placement", long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "sortscribe.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    run: RunArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Directory to analyze, name and place
    directory: Option<PathBuf>,

    /// DATA-HOME root (overrides DATA_HOME and the config file)
    #[arg(long)]
    data_home: Option<PathBuf>,

    /// Attempt log CSV (overrides the config file)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Preview the placement without moving anything
    #[arg(long)]
    dry_run: bool,

    /// Write every analysis payload as JSON into this directory
    #[arg(long, value_name = "DIR")]
    save_analysis: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show generation engine status
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "sortscribe.json")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if !cli.quiet {
        info!("Sortscribe v{}", env!("CARGO_PKG_VERSION"));
    }

    // Load configuration
    let mut config = AppConfig::load(&cli.config)?;
    config.apply_env(|key| std::env::var(key).ok());

    match cli.command {
        Some(Commands::Status) => run_status(config).await,
        Some(Commands::Config { action }) => run_config_command(config, action),
        None => run_organize(config, cli.run).await,
    }
}

/// Analyze, name and place one directory
async fn run_organize(mut config: AppConfig, args: RunArgs) -> Result<()> {
    let directory = args.directory.ok_or_else(|| {
        ScribeError::Config("No directory given. Usage: sortscribe [OPTIONS] <DIRECTORY>".to_string())
    })?;
    if !directory.is_dir() {
        return Err(ScribeError::DirectoryNotFound(directory));
    }
    let directory = std::fs::canonicalize(&directory)?;

    if let Some(home) = args.data_home {
        config.data_home = Some(home.to_string_lossy().to_string());
    }
    if let Some(log) = args.log_file {
        config.attempt_log.path = log.to_string_lossy().to_string();
    }
    if let Some(ref dir) = args.save_analysis {
        std::fs::create_dir_all(dir)?;
    }

    let data_home = match config.data_home {
        Some(ref home) => {
            let active = config.active_data_home();
            if active.is_some() {
                info!("Using DATA-HOME: {}", home);
            }
            active
        }
        None => {
            warn!("DATA_HOME not set; proceeding without DATA-HOME integration");
            None
        }
    };

    let taxonomy = NamingTaxonomy::standard();
    let generator = build_generator(&config.engine)?;
    let proposer = NamingClient::new(&taxonomy, generator, &config.engine);

    let whisper = if config.transcription.enabled {
        Some(WhisperClient::new(
            &config.transcription.url,
            &config.transcription.model,
            Duration::from_secs(config.engine.timeout_secs),
        )?)
    } else {
        None
    };
    let transcriber = whisper.as_ref().map(|w| w as &dyn Transcriber);

    let logger = AttemptLogger::new(PathBuf::from(&config.attempt_log.path));
    let mut prompter = TerminalPrompter::new();
    let options = OrganizeOptions {
        dry_run: args.dry_run,
        save_analysis: args.save_analysis,
    };

    let report = Organizer::new(&config, &taxonomy, &proposer, &logger, &mut prompter)
        .with_data_home(data_home)
        .with_transcriber(transcriber)
        .with_options(options)
        .run(&directory)
        .await?;

    print_report(&report, logger.path());
    Ok(())
}

fn print_report(report: &OrganizeReport, log_path: &Path) {
    match report.disposition {
        Disposition::Skipped => println!("\nDirectory analysis cancelled."),
        Disposition::Unnamed => println!("\nNo name was chosen."),
        Disposition::Declined => println!("\nPlacement cancelled."),
        Disposition::Failed => println!("\nPlacement failed; see the log for details."),
        Disposition::Planned => {
            if let Some(ref planned) = report.planned {
                println!("\nDry run: would place the directory at {}", planned.display());
            }
        }
        Disposition::Moved | Disposition::RenamedLocally => println!("\nProcessing complete!"),
    }

    println!("Final location: {}", report.final_location.display());
    if let Some(ref relative) = report.data_home_relative {
        println!("DATA-HOME relative path: {}", relative.display());
    }

    if let Some(ref session_id) = report.session_id {
        println!("\nSession data logged to: {}", log_path.display());
        println!("   Session ID: {}", session_id);
        if report.attempts > 1 {
            println!("   Total attempts: {}", report.attempts);
            println!("   Feedback provided: {} times", report.feedback_count);
        }
    }
}

/// Run config commands
fn run_config_command(config: AppConfig, action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
    }

    Ok(())
}

/// Run status check
async fn run_status(config: AppConfig) -> Result<()> {
    println!("Sortscribe v{} Status", env!("CARGO_PKG_VERSION"));
    println!("======================");

    match config.engine.provider {
        Provider::Anthropic => {
            let key = if config.engine.api_key.is_some() { "set" } else { "missing (fallback names only)" };
            println!("Anthropic: {} ({})", config.engine.url, config.engine.model);
            println!("  API key: {}", key);
        }
        Provider::Ollama => {
            let client = OllamaClient::new(
                &config.engine.url,
                &config.engine.model,
                Duration::from_secs(config.engine.timeout_secs),
            )?;
            match client.health_check().await {
                Ok(()) => println!("Ollama: Running"),
                Err(e) => println!("Ollama: Error - {}", e),
            }
            match client.list_models().await {
                Ok(models) => {
                    println!("\nAvailable models:");
                    for m in &models {
                        let marker = if m.starts_with(config.engine.model.as_str()) { "→" } else { " " };
                        println!("  {} {}", marker, m);
                    }
                }
                Err(e) => println!("  Error listing models: {}", e),
            }
        }
    }

    println!("\nConfiguration:");
    match config.active_data_home() {
        Some(home) => println!("  DATA-HOME: {}", home.display()),
        None => println!("  DATA-HOME: inactive"),
    }
    println!("  Attempt log: {}", config.attempt_log.path);
    println!("  Retry limit: {}", config.negotiation.retry_limit);
    println!(
        "  Transcription: {}",
        if config.transcription.enabled { config.transcription.url.as_str() } else { "disabled" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["sortscribe"]).unwrap();
        assert!(!cli.verbose);
        assert!(cli.run.directory.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_directory_with_options() {
        let cli = Cli::try_parse_from([
            "sortscribe", "/tmp/inbox", "--dry-run", "--data-home", "/data", "--save-analysis", "/tmp/out",
        ]).unwrap();

        assert_eq!(cli.run.directory, Some(PathBuf::from("/tmp/inbox")));
        assert!(cli.run.dry_run);
        assert_eq!(cli.run.data_home, Some(PathBuf::from("/data")));
        assert_eq!(cli.run.save_analysis, Some(PathBuf::from("/tmp/out")));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_config_generate() {
        let cli = Cli::try_parse_from([
            "sortscribe", "config", "generate", "--output", "/tmp/s.json"
        ]).unwrap();

        match cli.command {
            Some(Commands::Config { action: ConfigCommands::Generate { output } }) => {
                assert_eq!(output, PathBuf::from("/tmp/s.json"));
            }
            _ => panic!("Expected Config Generate command"),
        }
    }

    #[test]
    fn test_cli_status_command() {
        let cli = Cli::try_parse_from(["sortscribe", "--quiet", "status"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[tokio::test]
    async fn test_missing_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = RunArgs {
            directory: Some(dir.path().join("absent")),
            data_home: None,
            log_file: None,
            dry_run: false,
            save_analysis: None,
        };
        let err = run_organize(AppConfig::default(), args).await.unwrap_err();
        assert!(matches!(err, ScribeError::DirectoryNotFound(_)));
    }
}
