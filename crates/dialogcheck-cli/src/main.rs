mod pipeline;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialogcheck_nlp::{DialogueTagger, TaggerConfig, aggregate};
use dialogcheck_store::report_batch;
use tracing_subscriber::EnvFilter;

use pipeline::{Summary, emit, read_tagged, tag_file};

#[derive(Parser)]
#[command(name = "dialogcheck", version)]
#[command(about = "Check call-centre dialogues for greeting, introduction, company and farewell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON tagger config (patterns, known companies, extra names)
    #[arg(long, global = true, env = "DIALOGCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Override the greeting regex
    #[arg(long, global = true, env = "DIALOGCHECK_GREETING_PATTERN")]
    greeting_pattern: Option<String>,

    /// Override the farewell regex
    #[arg(long, global = true, env = "DIALOGCHECK_FAREWELL_PATTERN")]
    farewell_pattern: Option<String>,

    /// Known company name, checked before the company grammar (repeatable).
    /// Names may contain commas, so the env variable holds a single name;
    /// list several companies in the config file instead.
    #[arg(long = "company", global = true, env = "DIALOGCHECK_COMPANY")]
    companies: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Tag every line of a transcript (CSV or Parquet)
    Extract {
        input: PathBuf,

        /// Output table (.csv or .parquet); pretty-prints to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the per-conversation compliance report
    Report {
        input: PathBuf,

        /// Output table (.csv or .parquet); pretty-prints to stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input already carries tag columns; skip extraction
        #[arg(long)]
        tagged: bool,

        /// Print the report as JSON instead of a table
        #[arg(long, conflicts_with = "output")]
        json: bool,
    },

    /// Tag and report in one pass, writing both tables
    Run {
        input: PathBuf,

        /// Line-level tags output
        #[arg(long)]
        tags: PathBuf,

        /// Per-conversation report output
        #[arg(long)]
        report: PathBuf,
    },
}

impl Cli {
    fn tagger_config(&self) -> anyhow::Result<TaggerConfig> {
        let mut config = match &self.config {
            Some(path) => TaggerConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => TaggerConfig::default(),
        };
        if let Some(pattern) = &self.greeting_pattern {
            config.greeting_pattern = pattern.clone();
        }
        if let Some(pattern) = &self.farewell_pattern {
            config.farewell_pattern = pattern.clone();
        }
        config.known_companies.extend(self.companies.iter().cloned());
        Ok(config)
    }

    fn tagger(&self) -> anyhow::Result<DialogueTagger> {
        let config = self.tagger_config()?;
        DialogueTagger::new(&config).context("compiling tagger patterns")
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!("dialogcheck v{}", env!("CARGO_PKG_VERSION"));
    let started = Instant::now();

    match &cli.command {
        Commands::Extract { input, output } => {
            let tagged = tag_file(input, &cli.tagger()?)?;
            emit(&tagged.table, output.as_deref())?;
            Summary::new(tagged.lines.len(), &aggregate(&tagged.lines)).print(started);
        }

        Commands::Report {
            input,
            output,
            tagged,
            json,
        } => {
            let lines = if *tagged {
                read_tagged(input)?
            } else {
                tag_file(input, &cli.tagger()?)?.lines
            };
            let reports = aggregate(&lines);
            if *json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                emit(&report_batch(&reports)?, output.as_deref())?;
            }
            Summary::new(lines.len(), &reports).print(started);
        }

        Commands::Run {
            input,
            tags,
            report,
        } => {
            let tagged = tag_file(input, &cli.tagger()?)?;
            emit(&tagged.table, Some(tags.as_path()))?;
            let reports = aggregate(&tagged.lines);
            emit(&report_batch(&reports)?, Some(report.as_path()))?;
            eprintln!("  Tags:   {}", tags.display());
            eprintln!("  Report: {}", report.display());
            Summary::new(tagged.lines.len(), &reports).print(started);
        }
    }

    Ok(())
}
