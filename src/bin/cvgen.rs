//! `cvgen` command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use cvgen::{load_cv, Error, GeneratorConfig};
use tracing_subscriber::EnvFilter;

/// Validate CV data written in YAML and render it to PDF or HTML.
#[derive(Parser, Debug)]
#[command(name = "cvgen", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a CV document.
    Generate(GenerateArgs),

    /// Check a CV document and list every violation.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Input YAML file.
    input: PathBuf,

    /// Output file; `.html` or `.htm` selects HTML unless `--format` is given.
    #[arg(short, long)]
    output: PathBuf,

    /// Style name.
    #[arg(long)]
    style: Option<String>,

    /// Page size: A4 or letter.
    #[arg(long)]
    page_size: Option<String>,

    /// Output format: pdf or html.
    #[arg(long)]
    format: Option<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Input YAML file.
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("info"),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = load_config(&cli).and_then(|config| match cli.command {
        Commands::Generate(args) => run_generate(args, config),
        Commands::Validate(args) => run_validate(&args, &config),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn load_config(cli: &Cli) -> cvgen::Result<GeneratorConfig> {
    match cli.config {
        Some(ref path) => GeneratorConfig::from_file(path),
        None => Ok(GeneratorConfig::default()),
    }
}

/// Command-line flags win over the config file.
fn apply_overrides(args: &GenerateArgs, mut config: GeneratorConfig) -> GeneratorConfig {
    if let Some(ref style) = args.style {
        config.style = style.clone();
    }
    if let Some(ref page_size) = args.page_size {
        config.page_size = page_size.clone();
    }
    if let Some(ref format) = args.format {
        config.format = Some(format.clone());
    }
    config
}

fn run_generate(args: GenerateArgs, config: GeneratorConfig) -> cvgen::Result<()> {
    let config = apply_overrides(&args, config);
    let written = cvgen::generate(&args.input, &args.output, &config)?;
    println!("CV written to {}", written.display());
    Ok(())
}

fn run_validate(args: &ValidateArgs, config: &GeneratorConfig) -> cvgen::Result<()> {
    match load_cv(&args.input, &config.validation) {
        Ok(cv) => {
            println!("{}: valid CV for {}", args.input.display(), cv.personal_info.name);
            Ok(())
        }
        Err(Error::Validation(err)) => {
            for violation in &err.violations {
                println!("{}", violation);
            }
            Err(Error::Validation(err))
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "cvgen",
            "generate",
            "cv.yaml",
            "-o",
            "out/cv.html",
            "--style",
            "Classic",
            "--page-size",
            "letter",
        ])
        .unwrap();

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.input, PathBuf::from("cv.yaml"));
                assert_eq!(args.output, PathBuf::from("out/cv.html"));

                let config = apply_overrides(&args, GeneratorConfig::default());
                assert_eq!(config.style, "Classic");
                assert_eq!(config.page_size, "letter");
                assert_eq!(config.format, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate_with_config() {
        let cli = Cli::try_parse_from(["cvgen", "validate", "cv.yaml", "--config", "cvgen.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cvgen.toml")));
        assert!(matches!(cli.command, Commands::Validate(_)));
    }

    #[test]
    fn test_generate_requires_output() {
        assert!(Cli::try_parse_from(["cvgen", "generate", "cv.yaml"]).is_err());
    }
}
