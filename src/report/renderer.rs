use axum::{response::IntoResponse, Json};
use serde::Serialize;
use serde_json::Value;

use crate::config::GENERATE_ERROR_PREFIX;
use crate::editor::StatGrid;
use crate::error::{AppError, ErrorBody};
use crate::matchup::{colorizer, merge_grids};
use crate::types::{matchup_columns, ColorBand, MatchupRow, Side, Stat};

// ---------------------------------------------------------------------------
// Report shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStyle {
    pub band: ColorBand,
    pub background: &'static str,
    pub foreground: Option<&'static str>,
    pub css: String,
}

impl CellStyle {
    fn for_band(band: ColorBand) -> Self {
        Self {
            band,
            background: band.background(),
            foreground: band.foreground(),
            css: band.css(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportCell {
    pub value: Value,
    /// Set on delta cells that carry a value; source cells are never styled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub band: ColorBand,
    pub favors: Side,
    pub background: &'static str,
    pub meaning: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
    pub legend: Vec<LegendEntry>,
}

impl Report {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Lay out merged rows in column order and style the delta cells.
pub fn render(rows: &[MatchupRow]) -> Report {
    let rows = rows.iter().map(render_row).collect();
    Report {
        columns: matchup_columns(),
        rows,
        legend: legend(),
    }
}

fn render_row(row: &MatchupRow) -> Vec<ReportCell> {
    let mut cells = Vec::with_capacity(1 + Stat::ALL.len() * 3);
    cells.push(ReportCell {
        value: Value::from(row.pitch.as_str()),
        style: None,
    });
    for v in row.pitcher.iter().chain(row.batter.iter()) {
        cells.push(ReportCell {
            value: number(*v),
            style: None,
        });
    }
    for v in Stat::ALL.map(|s| row.delta(s)) {
        cells.push(ReportCell {
            value: number(v),
            style: colorizer::classify(v).map(CellStyle::for_band),
        });
    }
    cells
}

fn number(v: Option<f64>) -> Value {
    v.map_or(Value::Null, Value::from)
}

pub fn legend() -> Vec<LegendEntry> {
    ColorBand::ALL
        .iter()
        .map(|&band| LegendEntry {
            band,
            favors: if band.favors_pitcher() {
                Side::Pitcher
            } else {
                Side::Batter
            },
            background: band.background(),
            meaning: band.meaning(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Generate boundary
// ---------------------------------------------------------------------------

/// A failed generate, phrased for the single inline message area.
#[derive(Debug)]
pub struct GenerateFailure(pub AppError);

impl GenerateFailure {
    pub fn message(&self) -> String {
        format!("{GENERATE_ERROR_PREFIX}: {}", self.0)
    }
}

impl IntoResponse for GenerateFailure {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status();
        (status, Json(ErrorBody { error: self.message() })).into_response()
    }
}

/// Full pipeline: validate, merge, colorize, lay out. Inputs are only read.
pub fn generate(
    pitcher: &StatGrid,
    batter: &StatGrid,
    max_rows: usize,
) -> std::result::Result<Report, GenerateFailure> {
    let merged = merge_grids(pitcher, batter, max_rows).map_err(GenerateFailure)?;
    Ok(render(&merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatValues;
    use serde_json::json;

    fn matchup(pitch: &str, pitcher: StatValues, batter: StatValues) -> MatchupRow {
        let mut delta: StatValues = [None; 6];
        for i in 0..6 {
            if let (Some(p), Some(b)) = (pitcher[i], batter[i]) {
                delta[i] = Some(p - b);
            }
        }
        MatchupRow {
            pitch: pitch.to_string(),
            pitcher,
            batter,
            delta,
        }
    }

    #[test]
    fn only_delta_cells_are_styled() {
        let row = matchup("Fastball", [Some(30.0); 6], [Some(10.0); 6]);
        let report = render(&[row]);

        assert_eq!(report.columns.len(), 19);
        let cells = &report.rows[0];
        assert_eq!(cells.len(), 19);
        assert!(cells[..13].iter().all(|c| c.style.is_none()));
        assert!(cells[13..].iter().all(|c| c.style.is_some()));
        assert_eq!(cells[0].value, json!("Fastball"));
    }

    #[test]
    fn fastball_example_bands() {
        let row = matchup(
            "Fastball",
            [Some(30.0), Some(25.0), None, None, None, None],
            [Some(10.0), Some(40.0), None, None, None, None],
        );
        let report = render(&[row]);
        let k_delta = &report.rows[0][13];
        let whiff_delta = &report.rows[0][14];
        let putaway_delta = &report.rows[0][15];

        assert_eq!(k_delta.value, json!(20.0));
        assert_eq!(k_delta.style.as_ref().unwrap().band, ColorBand::LightGreen);
        assert_eq!(whiff_delta.value, json!(-15.0));
        assert_eq!(whiff_delta.style.as_ref().unwrap().band, ColorBand::LightRed);
        assert_eq!(putaway_delta.value, Value::Null);
        assert!(putaway_delta.style.is_none());
    }

    #[test]
    fn legend_covers_every_band() {
        let legend = legend();
        assert_eq!(legend.len(), 6);
        assert_eq!(legend[0].band, ColorBand::DarkRed);
        assert_eq!(legend[2].favors, Side::Pitcher);
        assert_eq!(legend[3].favors, Side::Batter);
        assert_eq!(legend[5].meaning, "strong batter advantage");
    }

    #[test]
    fn generate_failure_is_prefixed_for_the_user() {
        let pitcher = StatGrid::default();
        let batter = StatGrid {
            columns: vec![],
            rows: vec![],
        };
        let failure = generate(&pitcher, &batter, 100).unwrap_err();
        let msg = failure.message();
        assert!(msg.starts_with("Error generating table: Input schema error"), "{msg}");
    }

    #[test]
    fn generate_on_empty_grids_gives_empty_report() {
        let report = generate(&StatGrid::default(), &StatGrid::default(), 100).unwrap();
        assert_eq!(report.row_count(), 0);
        assert_eq!(report.columns.len(), 19);
    }
}
