use std::path::PathBuf;

use anyhow::{Context, Result};
use chunireport::catalog::Catalog;
use chunireport::client::ChunirecClient;
use chunireport::config::AppConfig;
use chunireport::rating::{score_to_rank_rate, MAX_SCORE};
use chunireport::records::{average_rating, MusicResult, RatingRecordSet, RecordSet};
use chunireport::video::VideoLinks;
use chunireport::report;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chunireport", version, about = "CHUNITHM score report generator")]
struct Cli {
    /// Config file (defaults to the XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Defaults to `report` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the markdown report of high-constant results
    Report {
        /// Output markdown file (overwritten)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file mapping "<title> <diff>" to a video URL
        #[arg(long)]
        video_links: Option<PathBuf>,

        /// Player name (defaults to the token owner)
        #[arg(short, long)]
        user: Option<String>,

        /// Lowest chart constant to include
        #[arg(long)]
        min_const: Option<f64>,

        /// Don't fetch the rating breakdown
        #[arg(long)]
        skip_rating_data: bool,
    },

    /// Show the best records with rank and distance to max
    Bests {
        /// Number of results
        #[arg(short = 'n', long, default_value = "30")]
        limit: usize,

        /// Player name (defaults to the token owner)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show the server-side rating breakdown (best, recent, candidates)
    Rating {
        /// Player name (defaults to the token owner)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Show rank and rating bonus for a score
    Rank {
        /// Score, 0 to 1010000
        score: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Explicit --config must load; the default location is optional
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path).context("Failed to load config")?,
        None => AppConfig::load(),
    };

    match cli.command.unwrap_or(Commands::Report {
        output: None,
        video_links: None,
        user: None,
        min_const: None,
        skip_rating_data: false,
    }) {
        Commands::Report {
            output,
            video_links,
            user,
            min_const,
            skip_rating_data,
        } => {
            let client = connect(&config)?;
            let user = user.or(config.user_name.clone());

            let catalog = Catalog::fetch(&client).context("Failed to fetch music catalog")?;
            let record = RecordSet::fetch(&client, user.as_deref())
                .context("Failed to fetch records")?;
            for r in record.records.iter().filter(|r| !catalog.contains(&r.id)) {
                log::warn!("Record {} ({}) is not in the catalog", r.title, r.id);
            }

            if !skip_rating_data {
                let rating = RatingRecordSet::fetch(&client, user.as_deref())
                    .context("Failed to fetch rating data")?;
                for (name, entries) in rating.buckets() {
                    log::info!(
                        "Rating data {}: {} entries, avg {:.4}",
                        name,
                        entries.len(),
                        average_rating(entries)
                    );
                }
            }

            let links_path = video_links.unwrap_or(config.report.video_links.clone());
            let links = VideoLinks::load(&links_path).context("Failed to load video links")?;

            let min_const = min_const.unwrap_or(config.report.min_const);
            let output = output.unwrap_or(config.report.output.clone());
            let rows = report::write_report(&record, &links, &config.report, min_const, &output)
                .context("Failed to write report")?;
            println!(
                "Report written to {}: {} results with const >= {}",
                output.display(),
                rows,
                min_const
            );
        }

        Commands::Bests { limit, user } => {
            let client = connect(&config)?;
            let user = user.or(config.user_name.clone());

            let catalog = Catalog::fetch(&client).context("Failed to fetch music catalog")?;
            let record = RecordSet::fetch(&client, user.as_deref())
                .context("Failed to fetch records")?;

            let bests = record.bests();
            if bests.is_empty() {
                println!("No records found.");
                return Ok(());
            }

            let shown: Vec<&MusicResult> = bests.into_iter().take(limit).collect();
            println!("Best {} records:", shown.len());
            println!();
            print_bests_table(&shown, &catalog);
        }

        Commands::Rating { user } => {
            let client = connect(&config)?;
            let user = user.or(config.user_name.clone());

            let rating = RatingRecordSet::fetch(&client, user.as_deref())
                .context("Failed to fetch rating data")?;

            for (name, entries) in rating.buckets() {
                println!(
                    "{} ({} entries, avg {:.4})",
                    name,
                    entries.len(),
                    average_rating(entries)
                );
                if !entries.is_empty() {
                    print_results_table(entries);
                }
                println!();
            }
        }

        Commands::Rank { score } => {
            let (rank, rate) = score_to_rank_rate(score);
            println!("{score}: {rank} (+{rate:.4})");
            if score > MAX_SCORE {
                println!("(above the max score of {MAX_SCORE})");
            }
        }
    }

    Ok(())
}

/// Build the API client; fails when no token is configured.
fn connect(config: &AppConfig) -> Result<ChunirecClient> {
    let api = config.api().context("Cannot reach chunirec")?;
    Ok(ChunirecClient::new(api))
}

fn truncate_title(title: &str, width: usize) -> String {
    if title.chars().count() > width {
        let head: String = title.chars().take(width - 3).collect();
        format!("{head}...")
    } else {
        title.to_string()
    }
}

/// Print a table of records with computed rank.
fn print_results_table(results: &[MusicResult]) {
    println!(
        "{:<30} {:>4} {:>5} {:>8} {:>5} {:>6}  {:<5}",
        "Title", "Diff", "Const", "Score", "Rank", "Rate", "Lamp"
    );
    println!("{}", "-".repeat(72));

    for r in results {
        println!(
            "{:<30} {:>4} {:>5.1} {:>8} {:>5} {:>6.2}  {:<5}",
            truncate_title(&r.title, 30),
            r.diff,
            r.constant,
            r.score,
            r.rank().label(),
            r.rating,
            r.lamp(),
        );
    }
}

/// Print the best frame, with the number of perfect notes still missing to max.
fn print_bests_table(results: &[&MusicResult], catalog: &Catalog) {
    println!(
        "{:>2} {:<30} {:>4} {:>5} {:>8} {:>5} {:>6} {:>6}  {:<10}",
        "#", "Title", "Diff", "Const", "Score", "Rank", "Rate", "Gap", "Played"
    );
    println!("{}", "-".repeat(88));

    for (i, r) in results.iter().enumerate() {
        let gap = match catalog.chart(&r.id, &r.diff).and_then(|c| c.note_score()) {
            Ok(note) => format!("{:.1}", f64::from(MAX_SCORE.saturating_sub(r.score)) / note),
            Err(e) => {
                log::debug!("No note score for {} {}: {e}", r.title, r.diff);
                "-".to_string()
            }
        };
        let played = r
            .played_at()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        println!(
            "{:>2} {:<30} {:>4} {:>5.1} {:>8} {:>5} {:>6.2} {:>6}  {:<10}",
            i + 1,
            truncate_title(&r.title, 30),
            r.diff,
            r.constant,
            r.score,
            r.rank().label(),
            r.rating,
            gap,
            played,
        );
    }

    println!();
    println!("Gap = perfect notes short of {MAX_SCORE}");
}
