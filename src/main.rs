use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use git_authorship::{report, AuthorshipAnalyzer};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Reports per-author commit statistics for a Git repository",
    long_about = None
)]
struct Cli {
    /// Path to Git repository
    repo: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log pipeline progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let analyzer = AuthorshipAnalyzer::new(&cli.repo).context("Failed to open repository")?;

    let summary = analyzer
        .analyze()
        .context("Failed to analyze repository")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => {
            report::write_text(&summary, &mut out).context("Failed to write report")?
        }
        OutputFormat::Json => {
            report::write_json(&summary, &mut out).context("Failed to serialize to JSON")?
        }
        OutputFormat::Csv => {
            report::write_csv(&summary, &mut out).context("Failed to write CSV records")?
        }
    }
    out.flush().context("Failed to flush output")?;

    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // 使い方の誤りは標準出力に表示する
            print!("{}", e);
            return ExitCode::from(2);
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_defaults_to_text() {
        let cli = Cli::try_parse_from(["git-authorship", "repo"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.repo, PathBuf::from("repo"));
    }

    #[test]
    fn test_format_values() {
        let cli = Cli::try_parse_from(["git-authorship", "repo", "--format", "csv"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);

        let cli = Cli::try_parse_from(["git-authorship", "-f", "json", "repo"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);

        let err = Cli::try_parse_from(["git-authorship", "repo", "--format", "xml"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }
}
