use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cvwright_core::{load_resume, save_resume, AppConfig};

use super::{build_service, stem_output, ProviderArgs};

#[derive(Args, Debug)]
pub struct PolishArgs {
    /// Resume YAML file
    pub input: PathBuf,

    /// Output YAML file. Defaults to <input>_polished.yaml
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Area to focus improvement on (repeatable)
    #[arg(short = 'f', long)]
    pub focus: Vec<String>,

    /// Overwrite the input file
    #[arg(short = 'i', long, conflicts_with = "output")]
    pub in_place: bool,

    #[command(flatten)]
    pub ai: ProviderArgs,
}

pub async fn run(config: &AppConfig, args: PolishArgs) -> Result<()> {
    let output = if args.in_place {
        args.input.clone()
    } else {
        args.output
            .clone()
            .unwrap_or_else(|| stem_output(&args.input, "_polished"))
    };

    println!("Polishing resume: {}", args.input.display());
    if !args.focus.is_empty() {
        println!("Focus areas: {}", args.focus.join(", "));
    }

    let original = load_resume(&args.input)?;

    println!("Improving resume content with AI...");
    let service = build_service(&args.ai, config)?;
    let mut polished = service.polish_resume(&original, &args.focus).await?;
    polished.carry_over_from(&original);

    save_resume(
        &polished,
        &output,
        &config.output.theme,
        &config.output.locale,
    )?;

    let action = if args.in_place {
        "Updated"
    } else {
        "Created polished resume at"
    };
    println!();
    println!("{}: {}", action, output.display());
    println!();
    println!("The AI has improved:");
    println!("  - Action verbs and impact statements");
    println!("  - Quantifiable metrics where possible");
    println!("  - Professional language and clarity");

    Ok(())
}
