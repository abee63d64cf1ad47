use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use basket_miner::{analyze, resolve_dataset, CsvBasketSource, MiningConfig, MiningReport, TransactionSource};

#[derive(Parser)]
#[command(name = "basket-miner", version, about = "Frequent itemsets and association rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mine a basket file and print supports and rules.
    Mine {
        /// Dataset name (resolved as <data-dir>/<name>.csv) or a path.
        dataset: String,

        /// Directory holding named datasets.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Minimum support, whole percent (1-100).
        #[arg(long, default_value = "30")]
        support: u32,

        /// Minimum confidence, whole percent (1-100).
        #[arg(long, default_value = "60")]
        confidence: u32,

        /// JSON config file; replaces --support and --confidence.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Largest itemset size to mine.
        #[arg(long)]
        max_size: Option<usize>,

        /// Count support in parallel.
        #[arg(long)]
        parallel: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mine {
            dataset,
            data_dir,
            support,
            confidence,
            config,
            max_size,
            parallel,
            format,
        } => {
            let mut mining_config = match config {
                Some(path) => MiningConfig::from_file(&path)?,
                None => MiningConfig::from_percentages(support, confidence),
            };
            if let Some(max) = max_size {
                mining_config = mining_config.with_max_itemset_size(max);
            }
            if parallel {
                mining_config = mining_config.with_parallel(true);
            }

            run_mine(&dataset, &data_dir, &mining_config, format)
        }
    }
}

fn run_mine(dataset: &str, data_dir: &std::path::Path, config: &MiningConfig, format: OutputFormat) -> Result<()> {
    // Fail on bad thresholds before touching the file
    config.validate()?;

    let source = CsvBasketSource::new(resolve_dataset(dataset, data_dir));
    let transactions = source
        .load()
        .with_context(|| format!("Failed to load dataset {}", source.path().display()))?;

    let fingerprint = transactions.fingerprint();
    let analysis = analyze(&transactions, config)?;
    let report = MiningReport::new(source.name(), fingerprint, config, analysis);

    match format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            println!("⛏️  Basket Miner - {}", report.source);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!(
                "✓ {} transactions, support ≥ {}, confidence ≥ {}",
                report.total_transactions, report.min_support, report.min_confidence
            );

            println!("\n\nPRINTING ASSOCIATION RULES\n\n");
            print!("{}", report.render_rules());
            println!("\n\nPRINTING SUPPORT VALUES\n\n");
            print!("{}", report.render_supports());

            println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!(
                "✅ {} frequent itemsets, {} rules",
                report.itemsets.len(),
                report.rules.len()
            );
        }
    }

    Ok(())
}
