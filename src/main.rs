use analytics::{align, assign_ranks, AlignmentStatus};
use anyhow::Context;
use api_client::{MarketDataApi, PolygonClient};
use chrono::{Days, Utc};
use clap::{Parser, Subcommand};
use configuration::settings::Settings;
use core_types::{Bar, RsRecord};
use history::{append_with_trim, clean_bars, previous_trading_day, thin_series};
use history::{HistoryStore, StockEntry};
use indicatif::{ProgressBar, ProgressStyle};
use publisher::{IpoRow, IpoSnapshot, RankingsSnapshot, UpdateType};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod pipeline;

/// The main entry point for the relative-strength ranking job.
#[tokio::main]
async fn main() {
    // A .env file is optional; in production the credential comes from the
    // real environment.
    let _ = dotenvy::dotenv();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install the tracing subscriber");

    let cli = Cli::parse();

    // Per-symbol failures are absorbed inside the handlers; anything that
    // escapes to here is a fatal condition and the only way this process
    // exits non-zero.
    if let Err(e) = run(cli).await {
        error!(error = ?e, "run aborted by fatal condition");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// IBD-style relative strength rankings against a benchmark index.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the full history store and rankings from scratch (weekly).
    Rebuild,
    /// Append the latest session to the store and refresh rankings (daily).
    Update,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = configuration::load_settings().context("failed to load config.toml")?;
    // A missing credential is fatal before any symbol is touched.
    let api_key = configuration::api_key()?;
    let client = PolygonClient::new(api_key, &settings.provider);

    match cli.command {
        Commands::Rebuild => handle_rebuild(&client, &settings).await,
        Commands::Update => handle_update(&client, &settings).await,
    }
}

// ==============================================================================
// Full rebuild (weekly)
// ==============================================================================

/// Fetches a long window for every symbol in the universe, scores it, and
/// replaces the history store and rankings wholesale.
async fn handle_rebuild<C: MarketDataApi>(client: &C, settings: &Settings) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let start = today - Days::new(settings.history.rebuild_lookback_days as u64);
    info!(from = %start, to = %today, "starting full rebuild");

    // The benchmark is shared by every symbol's alignment; without it the
    // run cannot proceed at all.
    let benchmark = client
        .fetch_daily_bars(&settings.benchmark.symbol, start, today)
        .await
        .context("failed to fetch the benchmark series")?;
    let benchmark = clean_bars(&settings.benchmark.symbol, benchmark);
    anyhow::ensure!(!benchmark.is_empty(), "benchmark series is empty");
    info!(
        benchmark = %settings.benchmark.symbol,
        bars = benchmark.len(),
        "benchmark series ready"
    );

    let tickers = client
        .list_common_stocks()
        .await
        .context("failed to list the symbol universe")?;
    anyhow::ensure!(!tickers.is_empty(), "symbol universe is empty");
    info!(symbols = tickers.len(), "processing universe");

    let progress = progress_bar(tickers.len() as u64)?;

    let mut records: Vec<RsRecord> = Vec::new();
    let mut entries: Vec<StockEntry> = Vec::new();
    let mut processed = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for ticker in &tickers {
        progress.set_message(ticker.clone());
        progress.inc(1);

        let bars = match client.fetch_daily_bars(ticker, start, today).await {
            Ok(bars) => clean_bars(ticker, bars),
            Err(e) => {
                warn!(symbol = %ticker, error = %e, "bar fetch failed; skipping symbol");
                failed += 1;
                continue;
            }
        };
        if bars.is_empty() {
            failed += 1;
            continue;
        }

        let aligned = align(&bars, &benchmark);
        if aligned.status != AlignmentStatus::Scored {
            // Young listing: not enough history for a 12-month window.
            skipped += 1;
            continue;
        }

        let ipo_date = match client.fetch_list_date(ticker).await {
            Ok(date) => date,
            Err(e) => {
                warn!(symbol = %ticker, error = %e, "listing-date lookup failed");
                None
            }
        };

        records.push(pipeline::build_record(ticker, &aligned, ipo_date));
        entries.push(StockEntry {
            symbol: ticker.clone(),
            series: thin_series(&bars),
            last_update: Utc::now(),
            ipo_date,
        });
        processed += 1;
    }
    progress.finish_with_message("universe processed");
    info!(processed, failed, skipped, "symbol processing complete");

    // The store is written regardless of how the ranking below fares.
    let store = HistoryStore::new(thin_series(&benchmark), entries);
    store.save(Path::new(&settings.output.history_path))?;

    publish_rankings(records, settings, UpdateType::FullRebuild, 20)
}

// ==============================================================================
// Incremental daily update
// ==============================================================================

/// Appends the most recent completed session to every stored series, trims
/// each to the rolling window, and refreshes the rankings from the store.
async fn handle_update<C: MarketDataApi>(client: &C, settings: &Settings) -> anyhow::Result<()> {
    let store_path = Path::new(&settings.output.history_path);
    let mut store = HistoryStore::load(store_path)?;

    let update_date = previous_trading_day(Utc::now().date_naive());
    info!(%update_date, stocks = store.stock_count, "starting daily update");

    let benchmark_bar = client
        .fetch_single_day(&settings.benchmark.symbol, update_date)
        .await
        .context("failed to fetch the benchmark bar for the update date")?;
    // Every symbol scores against this bar; a non-positive close would
    // poison the whole run's relative returns, so it is as fatal as a
    // missing benchmark.
    anyhow::ensure!(
        benchmark_bar.close > 0.0,
        "benchmark bar for {} has non-positive close {}",
        update_date,
        benchmark_bar.close
    );
    if appendable(&store.benchmark, &benchmark_bar) {
        append_with_trim(&mut store.benchmark, benchmark_bar);
    }
    info!(bars = store.benchmark.len(), "benchmark series updated");

    let progress = progress_bar(store.stocks.len() as u64)?;
    let mut updated = 0usize;
    let mut failed_updates = 0usize;

    for entry in &mut store.stocks {
        progress.set_message(entry.symbol.clone());
        progress.inc(1);

        match client.fetch_single_day(&entry.symbol, update_date).await {
            Ok(bar) if bar.close > 0.0 && appendable(&entry.series, &bar) => {
                append_with_trim(&mut entry.series, bar);
                entry.last_update = Utc::now();
                updated += 1;
            }
            Ok(bar) => {
                warn!(
                    symbol = %entry.symbol,
                    close = bar.close,
                    "rejected update bar; keeping stale series"
                );
                failed_updates += 1;
            }
            Err(e) => {
                // Soft failure: the previously stored series is retained.
                warn!(symbol = %entry.symbol, error = %e, "update fetch failed; keeping stale series");
                failed_updates += 1;
            }
        }
    }
    progress.finish_with_message("stocks updated");
    info!(updated, failed = failed_updates, "stock updates complete");

    // The store is valid at this point even if ranking goes on to fail.
    store.refresh_metadata();
    store.save(store_path)?;

    let outcome = pipeline::score_store(&store);
    info!(
        scored = outcome.records.len(),
        skipped = outcome.skipped_unscorable,
        "recalculated RS scores from the store"
    );
    publish_rankings(outcome.records, settings, UpdateType::DailyUpdate, 10)?;

    scan_recent_ipos(client, settings).await;
    Ok(())
}

/// A new bar may only extend a series forward; re-running the update on
/// the same day must not produce duplicate timestamps.
fn appendable(series: &[Bar], bar: &Bar) -> bool {
    series.last().is_none_or(|last| bar.timestamp > last.timestamp)
}

// ==============================================================================
// Publication
// ==============================================================================

/// Ranks the scored universe and writes the rankings snapshot. An empty
/// universe skips publication as a reported (non-fatal) failure; the
/// history store written beforehand remains valid.
fn publish_rankings(
    records: Vec<RsRecord>,
    settings: &Settings,
    update_type: UpdateType,
    top_n: usize,
) -> anyhow::Result<()> {
    if records.is_empty() {
        error!("no symbols were scored; skipping rankings publication for this run");
        return Ok(());
    }

    let ranked = assign_ranks(records);
    let snapshot = RankingsSnapshot::new(
        &ranked,
        settings.benchmark.description.clone(),
        update_type,
    );
    snapshot.save(Path::new(&settings.output.rankings_path))?;

    println!("{}", pipeline::top_table(&ranked, top_n));
    pipeline::log_statistics(&ranked);
    Ok(())
}

/// Scans for recently listed common stocks and publishes the recent-IPO
/// snapshot. Failures here never abort the run; the previous snapshot
/// simply stays in place.
async fn scan_recent_ipos<C: MarketDataApi>(client: &C, settings: &Settings) {
    let today = Utc::now().date_naive();
    let since = today - Days::new(settings.ipo.lookback_days as u64);

    let listings = match client.fetch_recent_listings(since).await {
        Ok(listings) => listings,
        Err(e) => {
            warn!(error = %e, "recent-IPO listing failed; keeping previous snapshot");
            return;
        }
    };
    info!(listings = listings.len(), %since, "scanning recent listings");

    // ~10 calendar days covers enough sessions for a first volume average.
    let window_start = today - Days::new(10);
    let mut rows: Vec<IpoRow> = Vec::new();

    for listing in &listings {
        match client
            .fetch_daily_bars(&listing.ticker, window_start, today)
            .await
        {
            Ok(bars) => {
                let bars = clean_bars(&listing.ticker, bars);
                if let Some(row) = IpoRow::from_bars(listing, &bars, today) {
                    rows.push(row);
                }
            }
            Err(e) => {
                warn!(symbol = %listing.ticker, error = %e, "IPO price fetch failed; skipping listing");
            }
        }
    }

    let snapshot = IpoSnapshot::new(rows, settings.ipo.lookback_days);
    if let Err(e) = snapshot.save(Path::new(&settings.output.recent_ipos_path)) {
        warn!(error = %e, "failed to save the recent-IPO snapshot");
    }
}

/// Sets up the standard progress bar used by both run loops.
fn progress_bar(len: u64) -> anyhow::Result<ProgressBar> {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::error::ApiError;
    use api_client::IpoListing;
    use chrono::NaiveDate;
    use configuration::settings::{Benchmark, History, Ipo, Output, Provider};
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory provider double. Symbols absent from a map fail the way a
    /// delisted ticker would.
    struct MockApi {
        tickers: Vec<String>,
        ranged: HashMap<String, Vec<Bar>>,
        single: HashMap<String, Bar>,
    }

    #[async_trait::async_trait]
    impl MarketDataApi for MockApi {
        async fn list_common_stocks(&self) -> Result<Vec<String>, ApiError> {
            Ok(self.tickers.clone())
        }

        async fn fetch_daily_bars(
            &self,
            symbol: &str,
            _from: NaiveDate,
            _to: NaiveDate,
        ) -> Result<Vec<Bar>, ApiError> {
            self.ranged
                .get(symbol)
                .cloned()
                .ok_or_else(|| ApiError::NoData(symbol.to_string()))
        }

        async fn fetch_single_day(&self, symbol: &str, date: NaiveDate) -> Result<Bar, ApiError> {
            self.single
                .get(symbol)
                .cloned()
                .ok_or_else(|| ApiError::NoData(format!("{} on {}", symbol, date)))
        }

        async fn fetch_list_date(&self, _symbol: &str) -> Result<Option<NaiveDate>, ApiError> {
            Ok(None)
        }

        async fn fetch_recent_listings(
            &self,
            _since: NaiveDate,
        ) -> Result<Vec<IpoListing>, ApiError> {
            Ok(Vec::new())
        }
    }

    fn flat_series(len: usize, close: f64) -> Vec<Bar> {
        (0..len)
            .map(|i| Bar {
                timestamp: i as i64 * 86_400_000,
                close,
                volume: Some(1_000.0),
                open: None,
            })
            .collect()
    }

    fn test_settings(tag: &str) -> (Settings, PathBuf) {
        let dir = std::env::temp_dir().join(format!("rsrank-{}-{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let settings = Settings {
            provider: Provider {
                base_url: "http://localhost".to_string(),
                request_delay_ms: 0,
                page_limit: 1000,
            },
            benchmark: Benchmark {
                symbol: "SPY".to_string(),
                description: "S&P 500 (SPY)".to_string(),
            },
            history: History {
                rebuild_lookback_days: 450,
            },
            ipo: Ipo { lookback_days: 90 },
            output: Output {
                rankings_path: dir.join("rankings.json").display().to_string(),
                history_path: dir.join("historical_data.json").display().to_string(),
                recent_ipos_path: dir.join("recent_ipos.json").display().to_string(),
            },
        };
        (settings, dir)
    }

    #[tokio::test]
    async fn rebuild_writes_both_artifacts() {
        let (settings, _dir) = test_settings("rebuild");

        let len = 260;
        let mut winner = flat_series(len, 110.0);
        winner[len - 64].close = 100.0;

        let mut ranged = HashMap::new();
        ranged.insert("SPY".to_string(), flat_series(len, 400.0));
        ranged.insert("WIN".to_string(), winner);
        ranged.insert("FLAT".to_string(), flat_series(len, 50.0));
        // "GONE" is listed but has no data: counted failed, not fatal.
        let api = MockApi {
            tickers: vec!["WIN".into(), "FLAT".into(), "GONE".into()],
            ranged,
            single: HashMap::new(),
        };

        handle_rebuild(&api, &settings).await.unwrap();

        let store = HistoryStore::load(Path::new(&settings.output.history_path)).unwrap();
        assert_eq!(store.stock_count, 2);
        // Thinned: ceil(230/5) older bars plus 30 recent ones.
        assert_eq!(store.benchmark.len(), 230usize.div_ceil(5) + 30);

        let rankings = std::fs::read_to_string(&settings.output.rankings_path).unwrap();
        assert!(rankings.contains("\"update_type\": \"full_rebuild\""));
        assert!(rankings.contains("\"WIN\""));
    }

    #[tokio::test]
    async fn rebuild_without_benchmark_is_fatal() {
        let (settings, _dir) = test_settings("nobench");
        let api = MockApi {
            tickers: vec!["WIN".into()],
            ranged: HashMap::new(),
            single: HashMap::new(),
        };
        assert!(handle_rebuild(&api, &settings).await.is_err());
        assert!(!Path::new(&settings.output.history_path).exists());
    }

    #[tokio::test]
    async fn update_appends_and_retains_stale_on_failure() {
        let (settings, _dir) = test_settings("update");

        let len = 253;
        let seeded = HistoryStore::new(
            flat_series(len, 400.0),
            vec![
                StockEntry {
                    symbol: "WIN".to_string(),
                    series: flat_series(len, 100.0),
                    last_update: Utc::now(),
                    ipo_date: None,
                },
                StockEntry {
                    symbol: "STALE".to_string(),
                    series: flat_series(len, 20.0),
                    last_update: Utc::now(),
                    ipo_date: None,
                },
            ],
        );
        seeded.save(Path::new(&settings.output.history_path)).unwrap();

        let fresh = |close: f64| Bar {
            timestamp: 1_000 * 86_400_000,
            close,
            volume: Some(5_000.0),
            open: None,
        };
        let mut single = HashMap::new();
        single.insert("SPY".to_string(), fresh(400.0));
        single.insert("WIN".to_string(), fresh(120.0));
        // "STALE" has no bar for the session: its series must survive as-is.
        let api = MockApi {
            tickers: Vec::new(),
            ranged: HashMap::new(),
            single,
        };

        handle_update(&api, &settings).await.unwrap();

        let store = HistoryStore::load(Path::new(&settings.output.history_path)).unwrap();
        assert_eq!(store.benchmark.len(), len + 1);
        let win = store.stocks.iter().find(|s| s.symbol == "WIN").unwrap();
        assert_eq!(win.series.len(), len + 1);
        assert_eq!(win.series.last().unwrap().close, 120.0);
        let stale = store.stocks.iter().find(|s| s.symbol == "STALE").unwrap();
        assert_eq!(stale.series.len(), len);

        let rankings = std::fs::read_to_string(&settings.output.rankings_path).unwrap();
        assert!(rankings.contains("\"update_type\": \"daily_update\""));
        // The empty listing still produces an (empty) IPO snapshot.
        assert!(Path::new(&settings.output.recent_ipos_path).exists());
    }

    #[tokio::test]
    async fn update_rejects_zero_close_benchmark_bar() {
        let (settings, _dir) = test_settings("badbench");

        let len = 253;
        let seeded = HistoryStore::new(
            flat_series(len, 400.0),
            vec![StockEntry {
                symbol: "WIN".to_string(),
                series: flat_series(len, 100.0),
                last_update: Utc::now(),
                ipo_date: None,
            }],
        );
        seeded.save(Path::new(&settings.output.history_path)).unwrap();

        let mut single = HashMap::new();
        single.insert(
            "SPY".to_string(),
            Bar {
                timestamp: 1_000 * 86_400_000,
                close: 0.0,
                volume: None,
                open: None,
            },
        );
        single.insert(
            "WIN".to_string(),
            Bar {
                timestamp: 1_000 * 86_400_000,
                close: 120.0,
                volume: Some(5_000.0),
                open: None,
            },
        );
        let api = MockApi {
            tickers: Vec::new(),
            ranged: HashMap::new(),
            single,
        };

        assert!(handle_update(&api, &settings).await.is_err());

        // The run aborted before any write; the zero close must not have
        // reached the persisted benchmark series.
        let store = HistoryStore::load(Path::new(&settings.output.history_path)).unwrap();
        assert_eq!(store.benchmark.len(), len);
        assert!(store.benchmark.iter().all(|b| b.close > 0.0));
    }

    #[tokio::test]
    async fn update_without_store_is_fatal() {
        let (settings, _dir) = test_settings("nostore");
        let api = MockApi {
            tickers: Vec::new(),
            ranged: HashMap::new(),
            single: HashMap::new(),
        };
        assert!(handle_update(&api, &settings).await.is_err());
    }
}
