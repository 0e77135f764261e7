use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_parser::config::Config;
use cv_parser::matching::MatchInput;
use cv_parser::{CandidateMatcher, CvParser, ParsedCandidateFields, WeightedMatcher};

#[derive(Parser)]
#[command(name = "cv-parser", version, about = "Extract candidate fields from CV documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse PDF/DOCX files and print the inferred fields as JSON
    Parse {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Declared media type, applied to every file
        #[arg(long)]
        mime: Option<String>,
    },
    /// Rank job postings for one candidate, or for a batch of candidates,
    /// described in a JSON request file
    Match {
        #[arg(long)]
        request: PathBuf,

        /// CV whose skills and experience fill gaps in a single candidate's profile
        #[arg(long)]
        cv: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ParseOutcome {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<ParsedCandidateFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the JSON output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting cv-parser v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let parser = CvParser::from_config(&config)?;

    match cli.command {
        Command::Parse { files, mime } => {
            let mut outcomes = Vec::with_capacity(files.len());
            for path in files {
                let file = path.display().to_string();
                // a failed parse is reported, never fatal
                match parser.parse_path(&path, mime.clone()).await {
                    Ok(fields) => outcomes.push(ParseOutcome {
                        file,
                        fields: Some(fields),
                        error: None,
                    }),
                    Err(e) => {
                        warn!("{file}: {e}");
                        outcomes.push(ParseOutcome {
                            file,
                            fields: None,
                            error: Some(e.reason().to_string()),
                        });
                    }
                }
            }
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }
        Command::Match { request, cv } => {
            let raw = tokio::fs::read_to_string(&request)
                .await
                .with_context(|| format!("Failed to read match request {}", request.display()))?;
            let input: MatchInput =
                serde_json::from_str(&raw).context("Match request is not valid JSON")?;
            let matcher: Arc<dyn CandidateMatcher> = Arc::new(WeightedMatcher::new());

            match input {
                MatchInput::Single(request) => {
                    let mut candidate = request.candidate;
                    if let Some(cv) = cv {
                        let fields = parser.parse_path(&cv, None).await?;
                        candidate = candidate.with_parsed_fields(&fields);
                    }

                    let options = request
                        .options
                        .unwrap_or_else(|| config.match_options.clone());
                    let results = matcher.rank(&candidate, &request.jobs, &options).await?;

                    info!("{} match(es) for {} posting(s)", results.len(), request.jobs.len());
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
                MatchInput::Batch(request) => {
                    if cv.is_some() {
                        anyhow::bail!("--cv applies to single-candidate requests only");
                    }

                    let options = request
                        .options
                        .clone()
                        .unwrap_or_else(|| config.match_options.clone());
                    let results = matcher
                        .rank_batch(&request.id_profile_pairs(), &request.jobs, &options)
                        .await?;

                    info!(
                        "Ranked {} posting(s) for {} candidate(s)",
                        request.jobs.len(),
                        results.len()
                    );
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
            }
        }
    }

    Ok(())
}
