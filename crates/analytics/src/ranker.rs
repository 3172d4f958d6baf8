use core_types::{RankedRecord, RsRecord};

/// Assigns dense 1-99 percentile ranks to a scored universe.
///
/// Records are sorted descending by score with a stable sort, so ties keep
/// their original provider order and rank assignment is deterministic. For
/// a universe of size `N`, the record at zero-based sorted position `i`
/// receives `min(99, floor(((N - i) / N) * 99) + 1)`. The top scorer
/// approaches 99 and the bottom approaches 1, but small universes are not
/// guaranteed to touch either end exactly; that is a property of the
/// formula, not a defect.
///
/// Ranks are recomputed from scratch every run and never persisted.
pub fn assign_ranks(mut records: Vec<RsRecord>) -> Vec<RankedRecord> {
    // Stable: equal scores stay in input order.
    records.sort_by(|a, b| b.rs_score.total_cmp(&a.rs_score));

    let total = records.len();
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let percentile = ((total - i) * 99 / total) as u32 + 1;
            RankedRecord {
                record,
                rs_rank: percentile.min(99),
            }
        })
        .collect()
}
