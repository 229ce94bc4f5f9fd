use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cvwright_core::{save_resume, AppConfig};

use super::{build_service, stem_output, ProviderArgs};

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Resume file to parse (PDF, DOCX, TXT, MD or RST)
    pub input: PathBuf,

    /// Output YAML file. Defaults to <input_name>_CV.yaml
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Theme written into the design block
    #[arg(short = 't', long)]
    pub theme: Option<String>,

    /// Locale written into the locale block
    #[arg(short = 'l', long)]
    pub locale: Option<String>,

    #[command(flatten)]
    pub ai: ProviderArgs,
}

pub async fn run(config: &AppConfig, args: ParseArgs) -> Result<()> {
    let output = args
        .output
        .unwrap_or_else(|| stem_output(&args.input, "_CV"));
    let theme = args.theme.as_deref().unwrap_or(&config.output.theme);
    let locale = args.locale.as_deref().unwrap_or(&config.output.locale);

    println!("Parsing resume: {}", args.input.display());
    println!("Extracting and parsing resume with AI...");

    let service = build_service(&args.ai, config)?;
    let resume = service.parse_resume(&args.input).await?;
    save_resume(&resume, &output, theme, locale)?;

    println!();
    println!("Successfully parsed resume to: {}", output.display());
    println!();
    println!("Next steps:");
    println!("  1. Review and edit the YAML file");
    println!("  2. Render it with your resume typesetter");
    println!();
    println!("Optional: polish the wording with:");
    println!("  cvwright polish {}", output.display());

    Ok(())
}
