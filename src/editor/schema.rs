//! Validation of editor grids into typed stat tables.
//! Every way a grid can be malformed surfaces here as `AppError::InputSchema`.

use serde_json::Value;

use crate::config::MAX_STAT_MAGNITUDE;
use crate::editor::grid::StatGrid;
use crate::error::{AppError, Result};
use crate::types::{Side, Stat, StatRow, StatTable, StatValues, PITCH_COLUMN};

/// Convert `grid` into a `StatTable` for `side`.
///
/// All-blank rows are skipped. Extra columns are ignored.
pub fn validate(grid: &StatGrid, side: Side, max_rows: usize) -> Result<StatTable> {
    if grid.rows.len() > max_rows {
        return Err(AppError::TableTooLarge {
            side: side.to_string(),
            rows: grid.rows.len(),
            limit: max_rows,
        });
    }

    let pitch_idx = require_column(grid, side, PITCH_COLUMN)?;
    let mut stat_idx = [0usize; 6];
    for stat in Stat::ALL {
        stat_idx[stat.index()] = require_column(grid, side, stat.label())?;
    }

    let mut rows = Vec::with_capacity(grid.rows.len());
    for (i, cells) in grid.rows.iter().enumerate() {
        let row_no = i + 1;
        if cells.iter().all(is_blank) {
            continue;
        }

        let pitch = parse_pitch(cells.get(pitch_idx)).ok_or_else(|| {
            AppError::InputSchema(format!("{side} table row {row_no}: Pitch is empty"))
        })?;

        let mut values: StatValues = [None; 6];
        for stat in Stat::ALL {
            let cell = cells.get(stat_idx[stat.index()]);
            values[stat.index()] = parse_stat(cell).map_err(|raw| {
                AppError::InputSchema(format!(
                    "{side} table row {row_no}: {} value {raw} is not a number",
                    stat.label()
                ))
            })?;
        }

        rows.push(StatRow::new(pitch, values));
    }

    Ok(StatTable::new(rows))
}

fn require_column(grid: &StatGrid, side: Side, name: &str) -> Result<usize> {
    grid.column_index(name).ok_or_else(|| {
        AppError::InputSchema(format!("{side} table is missing the '{name}' column"))
    })
}

fn is_blank(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Pitch labels are trimmed text; numeric labels are kept as their text form.
fn parse_pitch(cell: Option<&Value>) -> Option<String> {
    match cell? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ok(None) for a blank cell, Err(raw text) for anything non-numeric or
/// larger in magnitude than `MAX_STAT_MAGNITUDE`.
fn parse_stat(cell: Option<&Value>) -> std::result::Result<Option<f64>, String> {
    let Some(cell) = cell else {
        return Ok(None);
    };
    match cell {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .filter(|v| in_range(*v))
            .map(Some)
            .ok_or_else(|| n.to_string()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| in_range(*v))
            .map(Some)
            .ok_or_else(|| format!("'{s}'")),
        other => Err(other.to_string()),
    }
}

fn in_range(v: f64) -> bool {
    v.is_finite() && v.abs() <= MAX_STAT_MAGNITUDE
}
