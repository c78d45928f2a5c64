mod clean;
mod config;
mod parser;
mod scrape;
mod store;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use config::{Category, ScrapeConfig};

#[derive(Parser)]
#[command(name = "dakar_scraper", about = "Classified-ads listing scraper for dakar-auto.com")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape listing pages into one CSV per category
    Scrape {
        /// Number of pages to walk per category
        #[arg(short = 'n', long, default_value = "1")]
        pages: usize,
        /// Categories to scrape (default: all three)
        #[arg(short, long, value_enum, num_args = 1..)]
        categories: Option<Vec<Category>>,
        /// Output directory for the CSV files
        #[arg(short, long, default_value = "data")]
        out: PathBuf,
    },
    /// Re-derive normalized columns from a previously collected raw CSV
    Clean {
        /// Raw table to clean
        input: PathBuf,
        /// Cleaned output path (default: <input stem>_clean.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print summary statistics for a cleaned CSV
    Summary {
        /// Cleaned table to summarize
        input: PathBuf,
        /// Rows in the top-brand/model tables
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scrape { pages, categories, out } => {
            let config = ScrapeConfig {
                pages,
                categories: categories.unwrap_or_else(|| Category::all().to_vec()),
                out_dir: out,
            };
            run_scrape(config).await
        }
        Commands::Clean { input, output } => run_clean(&input, output),
        Commands::Summary { input, limit } => run_summary(&input, limit),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn run_scrape(config: ScrapeConfig) -> Result<()> {
    if config.pages < 1 {
        bail!("Page count must be at least 1");
    }
    if config.categories.is_empty() {
        bail!("At least one category is required");
    }
    std::fs::create_dir_all(&config.out_dir)?;

    let client = scrape::build_client()?;
    let total_pages = (config.pages * config.categories.len()) as u64;
    let pb = scrape::page_progress(total_pages);

    let mut total_records = 0usize;
    let mut total_rejected = 0usize;
    let mut total_fetch_errors = 0usize;

    // Categories run independently; a bad page in one never touches the
    // others.
    for &category in &config.categories {
        let (records, stats) =
            scrape::scrape_category(&client, category, config.pages, &pb).await;
        total_records += stats.records;
        total_rejected += stats.rejected;
        total_fetch_errors += stats.fetch_errors;

        let path = config.out_dir.join(category.csv_file_name());
        store::write_records(&path, &records)?;
        println!(
            "{}: {} records -> {}",
            category.label(),
            records.len(),
            path.display()
        );
    }
    pb.finish_and_clear();

    println!(
        "Total: {} records ({} fragments rejected, {} pages failed to fetch)",
        total_records, total_rejected, total_fetch_errors
    );
    Ok(())
}

fn run_clean(input: &PathBuf, output: Option<PathBuf>) -> Result<()> {
    let rows = store::read_raw_rows(input)?;
    if rows.is_empty() {
        println!("No rows in {}. Nothing to clean.", input.display());
        return Ok(());
    }

    let cleaned = clean::clean_table(&rows);
    let dropped = rows.len() - cleaned.len();

    let output = output.unwrap_or_else(|| default_clean_path(input));
    store::write_cleaned(&output, &cleaned)?;
    println!(
        "Cleaned {} rows ({} dropped) -> {}",
        cleaned.len(),
        dropped,
        output.display()
    );
    Ok(())
}

fn run_summary(input: &PathBuf, limit: usize) -> Result<()> {
    let rows = store::read_cleaned(input)?;
    if rows.is_empty() {
        println!("No rows in {}.", input.display());
        return Ok(());
    }

    let prices: Vec<i64> = rows.iter().filter_map(|r| r.price).collect();
    let mileages: Vec<i64> = rows.iter().filter_map(|r| r.mileage).collect();

    println!("Listings:     {}", rows.len());
    if !prices.is_empty() {
        println!("Avg price:    {}", prices.iter().sum::<i64>() / prices.len() as i64);
        println!("Min price:    {}", prices.iter().min().unwrap_or(&0));
        println!("Max price:    {}", prices.iter().max().unwrap_or(&0));
    }
    if !mileages.is_empty() {
        println!("Avg mileage:  {}", mileages.iter().sum::<i64>() / mileages.len() as i64);
    }

    println!("\nTop brands");
    for (name, count) in top_counts(rows.iter().map(|r| r.brand.as_str()), limit) {
        println!("  {:<20} {:>5}", truncate(&name, 20), count);
    }

    println!("\nTop models");
    for (name, count) in top_counts(rows.iter().map(|r| r.model.as_str()), limit) {
        println!("  {:<20} {:>5}", truncate(&name, 20), count);
    }

    Ok(())
}

fn default_clean_path(input: &PathBuf) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "table".to_string());
    input.with_file_name(format!("{}_clean.csv", stem))
}

/// Most frequent values first; ties broken alphabetically so the output
/// is stable.
fn top_counts<'a>(values: impl Iterator<Item = &'a str>, limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> =
        counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_counts_ranks_by_frequency_then_name() {
        let values = ["Toyota", "Honda", "Toyota", "Kia", "Honda", "Toyota"];
        let ranked = top_counts(values.into_iter(), 2);
        assert_eq!(ranked, vec![("Toyota".to_string(), 3), ("Honda".to_string(), 2)]);
    }

    #[test]
    fn default_clean_path_appends_suffix() {
        let path = default_clean_path(&PathBuf::from("data/vehicles.csv"));
        assert_eq!(path, PathBuf::from("data/vehicles_clean.csv"));
    }
}
