use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use cvwright_core::{read_job_description, save_resume, AppConfig};

use super::{build_service, name_output, ProviderArgs};

const SAMPLE_REQUEST: &str =
    "Please generate a sample professional resume for a software engineer with 5 years of experience.";

/// Interactive prompts and the label each answer is filed under
const INTERACTIVE_FIELDS: [(&str, &str); 12] = [
    ("Current or desired job title/headline", "Headline"),
    ("Location (City, State/Country)", "Location"),
    ("Email address", "Email"),
    ("Phone number (with country code)", "Phone"),
    ("LinkedIn username (optional)", "LinkedIn"),
    ("GitHub username (optional)", "GitHub"),
    ("Website URL (optional)", "Website"),
    (
        "Education (include school, degree, field, dates, achievements)",
        "Education",
    ),
    (
        "Work experience (include company, title, dates, responsibilities)",
        "Experience",
    ),
    ("Skills (technical and soft skills)", "Skills"),
    ("Projects (optional)", "Projects"),
    ("Certifications/Awards (optional)", "Certifications"),
];

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Your full name
    #[arg(short = 'n', long)]
    pub name: String,

    /// Background information: a file path or the text itself
    #[arg(short = 'i', long, conflicts_with = "interactive")]
    pub info: Option<String>,

    /// Prompt for each part of your background on stdin
    #[arg(long)]
    pub interactive: bool,

    /// Output YAML file. Defaults to <Name>_CV.yaml
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

pub async fn run(config: &AppConfig, args: GenerateArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| name_output(&args.name));
    let theme = args.theme.as_deref().unwrap_or(&config.output.theme);
    let locale = args.locale.as_deref().unwrap_or(&config.output.locale);

    let body = if args.interactive {
        println!("Interactive resume generation");
        println!("Answer each prompt; press Enter twice to finish a field.");
        let stdin = io::stdin();
        let answers = gather_interactive(stdin.lock(), io::stdout())?;
        format_answers(&answers)
    } else if let Some(info) = &args.info {
        read_job_description(info)
    } else {
        println!("Tip: for better results, provide your background:");
        println!("  - use --info with a file path or text");
        println!("  - or use --interactive for guided input");
        SAMPLE_REQUEST.to_string()
    };

    let user_info = compose_user_info(&args.name, &body);

    println!();
    println!("Generating resume for: {}", args.name);

    let service = build_service(&args.ai, config)?;
    let resume = service.generate_resume(&user_info).await?;
    save_resume(&resume, &output, theme, locale)?;

    println!();
    println!("Generated resume: {}", output.display());
    println!();
    println!("Optional improvements:");
    println!("  - Polish: cvwright polish {}", output.display());
    println!(
        "  - Tailor for a job: cvwright tailor {} --job <description>",
        output.display()
    );

    Ok(())
}

fn compose_user_info(name: &str, body: &str) -> String {
    format!("Name: {name}\n\n{body}")
}

/// Render answers as `\n<Label>:\n<value>\n` blocks
fn format_answers(answers: &[(&str, String)]) -> String {
    answers
        .iter()
        .map(|(label, value)| format!("\n{label}:\n{value}\n"))
        .collect()
}

/// Ask every interactive field in turn. A field ends at two consecutive
/// blank lines or end of input; blank answers are dropped.
fn gather_interactive<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
) -> io::Result<Vec<(&'static str, String)>> {
    let mut answers = Vec::new();

    for (prompt, label) in INTERACTIVE_FIELDS {
        writeln!(out, "\n{prompt}:")?;
        out.flush()?;

        let mut lines: Vec<String> = Vec::new();
        loop {
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']).to_string();
            if line.is_empty() && lines.last().is_some_and(|l| l.is_empty()) {
                break;
            }
            lines.push(line);
        }

        let value = lines.join("\n").trim().to_string();
        if !value.is_empty() {
            answers.push((label, value));
        }
    }

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_compose_user_info() {
        assert_eq!(
            compose_user_info("Jane Doe", "Rust engineer"),
            "Name: Jane Doe\n\nRust engineer"
        );
    }

    #[test]
    fn test_gather_interactive_fields_end_on_double_blank() {
        let mut script = String::new();
        script.push_str("Backend Engineer\n\n\n");
        script.push_str("Berlin, Germany\n\n\n");
        script.push_str("\n\n");
        script.push_str("+49 30 123456\n\n\n");
        script.push_str("\n\n\n\n\n\n");
        script.push_str("TU Berlin, MSc CS\n\n2015-2017\n\n\n");

        let mut prompts = Vec::new();
        let answers = gather_interactive(Cursor::new(script), &mut prompts).unwrap();

        assert_eq!(
            answers,
            vec![
                ("Headline", "Backend Engineer".to_string()),
                ("Location", "Berlin, Germany".to_string()),
                ("Phone", "+49 30 123456".to_string()),
                ("Education", "TU Berlin, MSc CS\n\n2015-2017".to_string()),
            ]
        );

        let prompts = String::from_utf8(prompts).unwrap();
        assert!(prompts.contains("Email address:"));
        assert!(prompts.contains("Certifications/Awards (optional):"));
    }

    #[test]
    fn test_format_answers() {
        let answers = vec![
            ("Headline", "Engineer".to_string()),
            ("Skills", "Rust, SQL".to_string()),
        ];
        assert_eq!(
            format_answers(&answers),
            "\nHeadline:\nEngineer\n\nSkills:\nRust, SQL\n"
        );
    }
}
