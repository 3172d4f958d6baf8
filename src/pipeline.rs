use analytics::{align, rs_score, Aligned, AlignmentStatus};
use chrono::NaiveDate;
use comfy_table::Table;
use core_types::{RankedRecord, RsRecord};
use history::HistoryStore;
use publisher::{format_return, format_volume};
use tracing::info;

/// The scored universe for one run, plus the count of symbols that were
/// stored but too young to score.
pub struct ScoreOutcome {
    pub records: Vec<RsRecord>,
    pub skipped_unscorable: usize,
}

/// Builds one symbol's scored record from its alignment result.
pub fn build_record(symbol: &str, aligned: &Aligned, ipo_date: Option<NaiveDate>) -> RsRecord {
    RsRecord {
        symbol: symbol.to_string(),
        rs_score: rs_score(&aligned.relative),
        avg_volume: aligned.avg_volume,
        relative_returns: aligned.relative,
        stock_return_3m: aligned.stock.m3,
        stock_return_12m: aligned.stock.m12,
        ipo_date,
    }
}

/// Scores every symbol held in the history store against its benchmark
/// series. This is the single scoring path shared by the rebuild and the
/// daily-update commands, so the two can never drift numerically.
pub fn score_store(store: &HistoryStore) -> ScoreOutcome {
    let mut records = Vec::with_capacity(store.stocks.len());
    let mut skipped_unscorable = 0;

    for entry in &store.stocks {
        let aligned = align(&entry.series, &store.benchmark);
        if aligned.status == AlignmentStatus::Scored {
            records.push(build_record(&entry.symbol, &aligned, entry.ipo_date));
        } else {
            skipped_unscorable += 1;
        }
    }

    ScoreOutcome {
        records,
        skipped_unscorable,
    }
}

/// Renders the top of the ranked universe as a console table.
pub fn top_table(ranked: &[RankedRecord], limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(["#", "Symbol", "RS", "3M Rel", "12M Rel", "Volume"]);

    for (i, r) in ranked.iter().take(limit).enumerate() {
        table.add_row([
            (i + 1).to_string(),
            r.record.symbol.clone(),
            r.rs_rank.to_string(),
            format_return(r.record.relative_returns.m3),
            format_return(r.record.relative_returns.m12),
            format_volume(r.record.avg_volume as f64),
        ]);
    }
    table
}

/// Logs summary statistics of a ranked universe.
pub fn log_statistics(ranked: &[RankedRecord]) {
    if ranked.is_empty() {
        return;
    }

    // The ranker hands records back sorted best-first.
    let scores: Vec<f64> = ranked.iter().map(|r| r.record.rs_score).collect();
    let highest = scores[0];
    let lowest = scores[scores.len() - 1];
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let median = if scores.len() % 2 == 0 {
        (scores[scores.len() / 2 - 1] + scores[scores.len() / 2]) / 2.0
    } else {
        scores[scores.len() / 2]
    };
    let high_rs = ranked.iter().filter(|r| r.rs_rank >= 90).count();

    info!(
        highest,
        lowest,
        mean,
        median,
        rank_90_plus = high_rs,
        "RS score statistics"
    );
}
