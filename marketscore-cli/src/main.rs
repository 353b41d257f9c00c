//! MarketScore CLI — analysis, reconciliation and scoring commands.
//!
//! Commands:
//! - `score` — score a snapshot JSON under one timeframe (or emit its audit record)
//! - `analyze` — indicators, levels, trend and gap for a CSV bar file
//! - `completeness` — completeness report for a fundamentals JSON
//! - `reconcile` — fill sparse fundamentals from SEC EDGAR filings
//! - `batch` — score every snapshot in a directory in parallel
//! - `screen` — rank pre-market gappers in a directory by screening score
//! - `demo` — score a seeded synthetic symbol under all four timeframes

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand};
use marketscore_core::analysis::analyze;
use marketscore_core::data::{
    load_bars_csv, CachedIdentifierResolver, CircuitBreaker, EdgarClient, RandomWalk,
};
use marketscore_core::domain::{
    FundamentalData, MarketSnapshot, Provenance, QuoteData, ReconciledSnapshot, RecommendationKey,
    SocialSentimentPayload,
};
use marketscore_core::fingerprint::AuditRecord;
use marketscore_core::fundamentals::{CompletenessDetector, DataReconciler};
use marketscore_core::scoring::{score, score_many, Timeframe, TradingScore};
use marketscore_core::screening::{screen, ScreeningResult};
use marketscore_core::AnalyzerConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "marketscore",
    about = "MarketScore CLI — deterministic multi-factor trading signals"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a reconciled (or raw market) snapshot.
    Score {
        /// Snapshot JSON file.
        #[arg(long)]
        snapshot: PathBuf,

        /// day, swing, position or longterm. Defaults to the config value.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Print the audit record instead of the full score.
        #[arg(long, default_value_t = false)]
        audit: bool,

        /// Raw social-sentiment payload (reddit/twitter) to score with.
        #[arg(long)]
        sentiment: Option<PathBuf>,
    },
    /// Compute indicators, levels, trend and gap from a bar CSV.
    Analyze {
        /// CSV with header `date,open,high,low,close,volume`.
        #[arg(long)]
        bars: PathBuf,

        /// Current price. Defaults to the last close.
        #[arg(long)]
        price: Option<f64>,
    },
    /// Report how complete a fundamentals snapshot is.
    Completeness {
        /// Fundamentals JSON file.
        #[arg(long)]
        fundamentals: PathBuf,
    },
    /// Fill sparse fundamentals from SEC EDGAR and write the reconciled snapshot.
    Reconcile {
        /// Market snapshot JSON file.
        #[arg(long)]
        snapshot: PathBuf,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Raw social-sentiment payload to attach before reconciling.
        #[arg(long)]
        sentiment: Option<PathBuf>,
    },
    /// Score every `*.json` snapshot in a directory.
    Batch {
        #[arg(long)]
        dir: PathBuf,

        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Print the full scores as a JSON array instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rank the gap-ups in a directory of snapshots by screening score.
    Screen {
        #[arg(long)]
        dir: PathBuf,

        /// Minimum gap in percent. Defaults to the config value.
        #[arg(long)]
        min_gap: Option<f64>,

        /// Minimum quote volume. Defaults to the config value.
        #[arg(long)]
        min_volume: Option<u64>,

        #[arg(long)]
        max_results: Option<usize>,

        /// Print the results as JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Score a seeded synthetic random walk under every timeframe.
    Demo {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value = "DEMO")]
        symbol: String,

        /// Number of daily bars to generate.
        #[arg(long, default_value_t = 260)]
        days: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    init_logging(&config);

    match cli.command {
        Commands::Score {
            snapshot,
            timeframe,
            audit,
            sentiment,
        } => run_score(&config, &snapshot, timeframe, audit, sentiment.as_deref()),
        Commands::Analyze { bars, price } => run_analyze(&bars, price),
        Commands::Completeness { fundamentals } => run_completeness(&config, &fundamentals),
        Commands::Reconcile {
            snapshot,
            out,
            sentiment,
        } => run_reconcile(&config, &snapshot, out.as_deref(), sentiment.as_deref()).await,
        Commands::Batch {
            dir,
            timeframe,
            json,
        } => run_batch(&config, &dir, timeframe, json),
        Commands::Screen {
            dir,
            min_gap,
            min_volume,
            max_results,
            json,
        } => {
            let mut criteria = config.screening;
            if let Some(min_gap) = min_gap {
                criteria.min_gap_percent = min_gap;
            }
            if let Some(min_volume) = min_volume {
                criteria.min_volume = min_volume;
            }
            if let Some(max_results) = max_results {
                criteria.max_results = max_results;
            }
            run_screen(&config, &dir, &criteria, json)
        }
        Commands::Demo { seed, symbol, days } => run_demo(&symbol, seed, days),
    }
}

/// `RUST_LOG` wins over the config file. Logs go to stderr so stdout stays JSON.
fn init_logging(config: &AnalyzerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Accept either a reconciled snapshot or a raw market snapshot. A raw one is
/// scored on its primary fundamentals only.
fn load_snapshot(path: &Path, detector: &CompletenessDetector) -> Result<ReconciledSnapshot> {
    let value: serde_json::Value = read_json(path)?;
    if value.get("provenance").is_some() {
        return serde_json::from_value(value).with_context(|| format!("parsing {}", path.display()));
    }
    let market: MarketSnapshot =
        serde_json::from_value(value).with_context(|| format!("parsing {}", path.display()))?;
    let completeness = detector.detect(&market.fundamentals).completeness_score;
    let fundamentals = market.fundamentals.clone();
    Ok(ReconciledSnapshot::from_market(
        market,
        fundamentals,
        Provenance::primary(completeness),
    ))
}

fn read_sentiment(path: &Path) -> Result<SocialSentimentPayload> {
    read_json(path)
}

fn run_score(
    config: &AnalyzerConfig,
    path: &Path,
    timeframe: Option<Timeframe>,
    audit: bool,
    sentiment: Option<&Path>,
) -> Result<()> {
    let timeframe = timeframe.unwrap_or(config.scoring.default_timeframe);
    let detector = CompletenessDetector::new(config.completeness);
    let mut snapshot = load_snapshot(path, &detector)?;
    if let Some(sentiment) = sentiment {
        snapshot = snapshot.with_social_payload(read_sentiment(sentiment)?);
    }
    let result = score(&snapshot, timeframe);

    if audit {
        print_json(&AuditRecord::new(&snapshot, timeframe, &result))
    } else {
        print_json(&result)
    }
}

fn run_analyze(path: &Path, price: Option<f64>) -> Result<()> {
    let bars = load_bars_csv(path)?;
    let Some(last) = bars.last() else {
        bail!("{} contains no bars", path.display());
    };
    let price = price.unwrap_or(last.close);
    print_json(&analyze(&bars, price))
}

fn run_completeness(config: &AnalyzerConfig, path: &Path) -> Result<()> {
    let fundamentals: FundamentalData = read_json(path)?;
    let detector = CompletenessDetector::new(config.completeness);
    print_json(&detector.detect(&fundamentals))
}

async fn run_reconcile(
    config: &AnalyzerConfig,
    path: &Path,
    out: Option<&Path>,
    sentiment: Option<&Path>,
) -> Result<()> {
    let mut market: MarketSnapshot = read_json(path)?;
    if let Some(sentiment) = sentiment {
        market = market.with_social_payload(read_sentiment(sentiment)?);
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let client = Arc::new(EdgarClient::new(&config.edgar, breaker)?);
    let resolver = CachedIdentifierResolver::new(Arc::clone(&client), config.identifier_cache.ttl());
    let reconciler = DataReconciler::new(CompletenessDetector::new(config.completeness), resolver, client);

    let reconciled = reconciler.reconcile(market).await;
    let json = serde_json::to_string_pretty(&reconciled)?;
    match out {
        Some(out) => {
            std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
            info!(path = %out.display(), "reconciled snapshot written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Every `*.json` snapshot in `dir`, in file-name order.
fn load_snapshot_dir(config: &AnalyzerConfig, dir: &Path) -> Result<Vec<ReconciledSnapshot>> {
    let detector = CompletenessDetector::new(config.completeness);
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        bail!("no *.json snapshots in {}", dir.display());
    }

    paths.iter().map(|p| load_snapshot(p, &detector)).collect()
}

fn run_batch(config: &AnalyzerConfig, dir: &Path, timeframe: Option<Timeframe>, json: bool) -> Result<()> {
    let timeframe = timeframe.unwrap_or(config.scoring.default_timeframe);
    let snapshots = load_snapshot_dir(config, dir)?;
    info!(count = snapshots.len(), %timeframe, "scoring batch");
    let scores = score_many(&snapshots, timeframe);

    if json {
        print_json(&scores)
    } else {
        print_table(&scores);
        Ok(())
    }
}

fn print_table(scores: &[TradingScore]) {
    println!(
        "{:<8} {:<12} {:>8} {:>6} {:>10} {:>10} {:>8} {:>9}",
        "Symbol", "Rec", "Score", "Conf", "Stop", "Target", "R:R", "Hash"
    );
    println!("{}", "-".repeat(78));
    for s in scores {
        println!(
            "{:<8} {:<12} {:>+8.3} {:>6.2} {:>10.2} {:>10.2} {:>8} {:>9}",
            s.symbol,
            s.recommendation.as_str(),
            s.weighted_score,
            s.confidence,
            s.suggested_stop_loss,
            s.suggested_take_profit,
            s.risk_reward_ratio,
            s.input_hash
        );
    }
}

fn run_screen(
    config: &AnalyzerConfig,
    dir: &Path,
    criteria: &marketscore_core::ScreeningCriteria,
    json: bool,
) -> Result<()> {
    if criteria.max_results == 0 {
        bail!("--max-results must be positive");
    }
    let snapshots = load_snapshot_dir(config, dir)?;
    let results = screen(&snapshots, criteria);
    info!(
        scanned = snapshots.len(),
        returned = results.len(),
        min_gap = criteria.min_gap_percent,
        min_volume = criteria.min_volume,
        "screening complete"
    );

    if json {
        print_json(&results)
    } else {
        print_screen_table(&results);
        Ok(())
    }
}

fn print_screen_table(results: &[ScreeningResult]) {
    println!(
        "{:>4} {:<8} {:>8} {:>12} {:>8} {:>10} {:>7}",
        "Rank", "Symbol", "Gap %", "Volume", "P/E", "Sentiment", "Score"
    );
    println!("{}", "-".repeat(63));
    for r in results {
        let pe = r.pe_ratio.map_or_else(|| "-".to_string(), |pe| format!("{pe:.1}"));
        let sentiment = r.sentiment_score.map_or_else(|| "-".to_string(), |s| format!("{s:+.2}"));
        println!(
            "{:>4} {:<8} {:>+8.2} {:>12} {:>8} {:>10} {:>7.1}",
            r.rank, r.symbol, r.gap.gap_percent, r.volume, pe, sentiment, r.score
        );
    }
}

fn run_demo(symbol: &str, seed: u64, days: usize) -> Result<()> {
    if days == 0 {
        bail!("--days must be positive");
    }
    let start = NaiveDate::from_ymd_opt(2024, 1, 2).context("invalid demo start date")?;
    let bars = RandomWalk::default().generate(symbol, seed, start, days);
    let Some(last) = bars.last() else {
        bail!("random walk produced no bars");
    };
    let price = last.close;
    let timestamp = Utc
        .from_utc_datetime(&last.date.and_hms_opt(21, 0, 0).context("invalid demo timestamp")?);

    let eps = price / 22.0;
    let fundamentals = FundamentalData {
        pe_ratio: Some(22.0),
        forward_pe: Some(19.5),
        eps: Some(eps),
        forward_eps: Some(eps * 1.12),
        market_cap: Some(price * 1.0e9),
        shares_outstanding: Some(1.0e9),
        dividend_yield: Some(0.012),
        beta: Some(1.1),
        target_price: Some(price * 1.08),
        recommendation_key: Some(RecommendationKey::Buy),
        ..Default::default()
    };
    let detector = CompletenessDetector::default();
    let snapshot = ReconciledSnapshot {
        symbol: symbol.to_string(),
        timestamp,
        quote: QuoteData::at_price(price, timestamp),
        bars,
        provenance: Provenance::primary(detector.detect(&fundamentals).completeness_score),
        fundamentals,
        sentiment: None,
    };

    println!("{symbol}: {days} synthetic bars (seed {seed}), last close {price:.2}");
    println!();
    println!(
        "{:<10} {:<12} {:>8} {:>6} {:>10} {:>10} {:>8}",
        "Timeframe", "Rec", "Score", "Conf", "Stop", "Target", "R:R"
    );
    println!("{}", "-".repeat(70));
    for tf in Timeframe::ALL {
        let s = score(&snapshot, tf);
        println!(
            "{:<10} {:<12} {:>+8.3} {:>6.2} {:>10.2} {:>10.2} {:>8}",
            tf.as_str(),
            s.recommendation.as_str(),
            s.weighted_score,
            s.confidence,
            s.suggested_stop_loss,
            s.suggested_take_profit,
            s.risk_reward_ratio
        );
    }
    Ok(())
}
