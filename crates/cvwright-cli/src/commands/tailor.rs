use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cvwright_core::{load_resume, read_job_description, save_resume, AppConfig};

use super::{build_service, stem_output, ProviderArgs};

#[derive(Args, Debug)]
pub struct TailorArgs {
    /// Resume YAML file
    pub input: PathBuf,

    /// Job description: a file path or the text itself
    #[arg(short = 'j', long)]
    pub job: String,

    /// Output YAML file. Defaults to <input>_tailored.yaml
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub ai: ProviderArgs,
}

pub async fn run(config: &AppConfig, args: TailorArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| stem_output(&args.input, "_tailored"));

    let job_description = read_job_description(&args.job);

    println!("Tailoring resume: {}", args.input.display());
    println!("Job description: {} characters", job_description.chars().count());

    let original = load_resume(&args.input)?;

    println!("Tailoring resume to job description with AI...");
    let service = build_service(&args.ai, config)?;
    let mut tailored = service.tailor_resume(&original, &job_description).await?;
    tailored.carry_over_from(&original);

    save_resume(
        &tailored,
        &output,
        &config.output.theme,
        &config.output.locale,
    )?;

    println!();
    println!("Created tailored resume: {}", output.display());
    println!();
    println!("The AI has optimized your resume by:");
    println!("  - Aligning keywords with job requirements");
    println!("  - Prioritizing relevant experience");
    println!("  - Emphasizing matching skills");

    Ok(())
}
