use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cvwright_core::AppConfig;

mod commands;

use commands::{generate::GenerateArgs, parse::ParseArgs, polish::PolishArgs, tailor::TailorArgs};

#[derive(Parser)]
#[command(name = "cvwright")]
#[command(author, version, about = "AI-assisted resume parsing, polishing, tailoring and generation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an existing resume (PDF, DOCX, TXT, MD, RST) into resume YAML
    Parse(ParseArgs),
    /// Polish and improve the wording of a resume YAML file
    Polish(PolishArgs),
    /// Tailor a resume YAML file to a job description
    Tailor(TailorArgs),
    /// Generate a new resume from your background information
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Parse(args) => commands::parse::run(&config, args).await,
        Commands::Polish(args) => commands::polish::run(&config, args).await,
        Commands::Tailor(args) => commands::tailor::run(&config, args).await,
        Commands::Generate(args) => commands::generate::run(&config, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_polish_flags() {
        let cli = Cli::try_parse_from([
            "cvwright", "polish", "cv.yaml", "-f", "metrics", "-f", "verbs", "-i", "-p", "openai",
        ])
        .unwrap();

        match cli.command {
            Commands::Polish(args) => {
                assert_eq!(args.focus, ["metrics", "verbs"]);
                assert!(args.in_place);
                assert_eq!(args.ai.provider.as_deref(), Some("openai"));
            }
            _ => panic!("expected polish"),
        }
    }

    #[test]
    fn test_tailor_requires_job() {
        assert!(Cli::try_parse_from(["cvwright", "tailor", "cv.yaml"]).is_err());
        assert!(Cli::try_parse_from(["cvwright", "tailor", "cv.yaml", "-j", "job.txt"]).is_ok());
    }

    #[test]
    fn test_generate_info_conflicts_with_interactive() {
        assert!(Cli::try_parse_from([
            "cvwright", "generate", "-n", "Jane Doe", "--info", "notes.txt", "--interactive"
        ])
        .is_err());
    }
}
