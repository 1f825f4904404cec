use std::collections::HashMap;

use tracing::debug;

use crate::editor::{schema, StatGrid};
use crate::error::Result;
use crate::types::{MatchupRow, Side, Stat, StatRow, StatTable, StatValues};

/// Validate both editor grids, then join them on Pitch.
///
/// Any schema problem in either grid fails the whole merge with
/// `AppError::InputSchema`; nothing is partially merged.
pub fn merge_grids(pitcher: &StatGrid, batter: &StatGrid, max_rows: usize) -> Result<Vec<MatchupRow>> {
    let pitcher = schema::validate(pitcher, Side::Pitcher, max_rows)?;
    let batter = schema::validate(batter, Side::Batter, max_rows)?;
    Ok(merge(&pitcher, &batter))
}

/// Inner join on Pitch with per-statistic deltas.
///
/// Output follows pitcher row order; each pitcher row expands to one matchup
/// row per batter row with the same Pitch, in batter order. Rows without a
/// partner on the other side are dropped.
pub fn merge(pitcher: &StatTable, batter: &StatTable) -> Vec<MatchupRow> {
    let mut by_pitch: HashMap<&str, Vec<&StatRow>> = HashMap::new();
    for row in &batter.rows {
        by_pitch.entry(row.pitch.as_str()).or_default().push(row);
    }

    let mut merged = Vec::new();
    let mut orphans = 0usize;
    for p in &pitcher.rows {
        let Some(matches) = by_pitch.get(p.pitch.as_str()) else {
            orphans += 1;
            continue;
        };
        for b in matches {
            merged.push(MatchupRow {
                pitch: p.pitch.clone(),
                pitcher: p.values,
                batter: b.values,
                delta: deltas(p, b),
            });
        }
    }

    debug!(
        pitcher_rows = pitcher.len(),
        batter_rows = batter.len(),
        matched = merged.len(),
        pitcher_orphans = orphans,
        "matchup merge complete"
    );

    merged
}

fn deltas(pitcher: &StatRow, batter: &StatRow) -> StatValues {
    Stat::ALL.map(|stat| match (pitcher.get(stat), batter.get(stat)) {
        (Some(p), Some(b)) => Some(p - b),
        _ => None,
    })
}
