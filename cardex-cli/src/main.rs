use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

mod commands;
mod config;

use commands::diff::DiffArgs;
use commands::import::ImportArgs;
use commands::normalize::NormalizeArgs;

#[derive(Parser, Debug)]
#[command(name = "cardex", author, version, about, long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    log_file_path: Option<String>,

    /// Config file (defaults to cardex/cardex.toml in the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import contacts, merging or skipping duplicates
    Import(ImportArgs),
    /// Show contacts sharing a display name and how they differ
    Diff(DiffArgs),
    /// Print the comparison key of a phone, email or name
    Normalize(NormalizeArgs),
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("cardex.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_file_path.as_deref());

    match &cli.command {
        Commands::Import(args) => {
            let (config, config_path) =
                config::CliConfig::load(cli.config.as_deref()).context("Failed to load config")?;
            tracing::debug!("Loaded config from {}", config_path.display());
            commands::import::run(args, &config.import)
        }
        Commands::Diff(args) => commands::diff::run(args),
        Commands::Normalize(args) => commands::normalize::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_import_flags() {
        let cli = Cli::try_parse_from([
            "cardex",
            "import",
            "a.vcf",
            "b.vcf",
            "--no-merge",
            "--output",
            "out.json",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Commands::Import(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.no_merge);
                assert!(!args.keep_duplicates);
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            other => panic!("expected import, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_normalize() {
        let cli = Cli::try_parse_from(["cardex", "normalize", "email", "A@B.com"]).unwrap();
        match cli.command {
            Commands::Normalize(args) => {
                assert_eq!(args.kind, commands::normalize::KeyKind::Email);
                assert_eq!(args.value, "A@B.com");
            }
            other => panic!("expected normalize, got {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_files() {
        assert!(Cli::try_parse_from(["cardex", "import"]).is_err());
    }
}
