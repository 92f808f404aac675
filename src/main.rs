use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lotto_extract::{thai_date_to_iso, DrawDate, DrawInput, Engine, EngineConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "lotto_extract", about = "Extract Thai lottery draw results from page text")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one page and print the draw record as JSON
    Parse {
        /// Rendered page text (primary source)
        #[arg(long)]
        text: PathBuf,
        /// Raw page markup (fallback source)
        #[arg(long)]
        markup: Option<PathBuf>,
        /// Page URL, stored as the record endpoint
        #[arg(long)]
        url: String,
        /// Thai date hint, e.g. "16 มีนาคม 2568"
        #[arg(long)]
        date_hint: Option<String>,
        /// Add a scraped_at timestamp next to the record
        #[arg(long)]
        stamp: bool,
        /// Print the per-tier source report instead of the record
        #[arg(long)]
        report: bool,
    },
    /// Extract every page in a JSON manifest (array of inputs) in parallel
    Batch {
        manifest: PathBuf,
    },
    /// Convert a Thai draw date to its YYYYMMDD key
    Date {
        thai: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            text,
            markup,
            url,
            date_hint,
            stamp,
            report,
        } => {
            let engine = load_engine()?;
            let mut input = DrawInput::new(read(&text)?, url);
            if let Some(path) = markup {
                input = input.with_markup(read(&path)?);
            }
            if let Some(hint) = date_hint {
                input = input.with_date_hint(hint);
            }

            let extraction = engine.extract(&input)?;
            if report {
                println!("{:<26} | {:<15} | {:>5}", "Tier", "Source", "Found");
                println!("{}", "-".repeat(52));
                for r in &extraction.report {
                    println!("{:<26} | {:<15} | {:>5}", r.id, format!("{:?}", r.source), r.found);
                }
                println!("\nISO key: {}", extraction.iso_key());
                return Ok(());
            }

            let mut record = serde_json::to_value(extraction.envelope())?;
            if stamp {
                record["scraped_at"] = serde_json::Value::String(chrono::Utc::now().to_rfc3339());
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
            info!(iso = extraction.iso_key(), "record ready");
        }
        Commands::Batch { manifest } => {
            let engine = load_engine()?;
            let inputs: Vec<DrawInput> = serde_json::from_str(&read(&manifest)?)
                .with_context(|| format!("Invalid manifest {}", manifest.display()))?;
            println!("Extracting {} pages...", inputs.len());

            let results = engine.extract_many(&inputs);
            println!("{:>3} | {:<8} | {:<20} | {:<7} | {}", "#", "ISO", "Date", "Missing", "URL");
            println!("{}", "-".repeat(80));
            let mut failed = 0usize;
            for (i, (input, result)) in inputs.iter().zip(&results).enumerate() {
                match result {
                    Ok(ex) => println!(
                        "{:>3} | {:<8} | {:<20} | {:<7} | {}",
                        i + 1,
                        ex.iso_key(),
                        ex.draw.date,
                        ex.missing().count(),
                        input.source_url
                    ),
                    Err(e) => {
                        failed += 1;
                        println!("{:>3} | error: {} | {}", i + 1, e, input.source_url);
                    }
                }
            }
            println!("\n{} extracted, {} failed", results.len() - failed, failed);
        }
        Commands::Date { thai } => match thai_date_to_iso(&thai) {
            Some(iso) => {
                let weekday = DrawDate::resolve(Some(thai.as_str()))
                    .to_naive_date()
                    .map(|d| d.format("%A").to_string())
                    .unwrap_or_else(|| "invalid day".into());
                println!("{} ({})", iso, weekday);
            }
            None => anyhow::bail!("Unparsable Thai date: {}", thai),
        },
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("Done in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn load_engine() -> Result<Engine> {
    let config = EngineConfig::from_env().context("Failed to read LOTTO_* settings")?;
    info!(?config, "engine config");
    Ok(Engine::new(config)?)
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
