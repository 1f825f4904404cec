use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// API shapes (mirror routes.rs and report/renderer.rs)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SessionCreated {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridBody {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct CellStyle {
    pub band: String,
    pub background: String,
    pub foreground: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportCell {
    pub value: Value,
    pub style: Option<CellStyle>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct LegendEntry {
    pub band: String,
    pub background: String,
    pub meaning: String,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct ReportResponse {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<ReportCell>>,
    pub legend: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    error: String,
}

pub const CSV_FILE_NAME: &str = "matchup_analysis.csv";
pub const XLSX_FILE_NAME: &str = "matchup_analysis.xlsx";

// ---------------------------------------------------------------------------
// Grid editor
// ---------------------------------------------------------------------------

pub const GRID_COLUMNS: [&str; 7] = ["Pitch", "K%", "Whiff%", "PutAway%", "OBA", "BA", "SLG"];

/// One editable stat grid. Cells are kept as typed text until pushed.
#[derive(Debug, Clone)]
pub struct GridEditor {
    pub rows: Vec<Vec<String>>,
    pub cursor_row: usize,
    pub cursor_col: usize,
}

impl GridEditor {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    pub fn add_row(&mut self) {
        self.rows.push(vec![String::new(); GRID_COLUMNS.len()]);
        self.cursor_row = self.rows.len() - 1;
        self.cursor_col = 0;
    }

    /// Remove the row under the cursor. Returns false if the grid is empty.
    pub fn delete_row(&mut self) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        self.rows.remove(self.cursor_row);
        self.cursor_row = self.cursor_row.min(self.rows.len().saturating_sub(1));
        true
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let max_row = self.rows.len().saturating_sub(1);
        let max_col = GRID_COLUMNS.len() - 1;
        self.cursor_row = self.cursor_row.saturating_add_signed(d_row).min(max_row);
        self.cursor_col = self.cursor_col.saturating_add_signed(d_col).min(max_col);
    }

    pub fn current_cell(&self) -> Option<&str> {
        self.rows
            .get(self.cursor_row)
            .and_then(|r| r.get(self.cursor_col))
            .map(String::as_str)
    }

    /// Overwrite the cell under the cursor. Returns false if there is no row.
    pub fn set_current_cell(&mut self, text: &str) -> bool {
        match self
            .rows
            .get_mut(self.cursor_row)
            .and_then(|r| r.get_mut(self.cursor_col))
        {
            Some(cell) => {
                *cell = text.trim().to_string();
                true
            }
            None => false,
        }
    }

    /// Request body for PUT /sessions/:id/tables/:side. Numeric text becomes a
    /// JSON number and blank text becomes null; anything else is sent as typed
    /// so the server can reject it by name.
    pub fn to_body(&self) -> GridBody {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(col, text)| cell_value(col, text))
                    .collect()
            })
            .collect();
        GridBody {
            columns: GRID_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }
}

impl Default for GridEditor {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_value(col: usize, text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    if col == 0 {
        return Value::from(text);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Value::from(v),
        _ => Value::from(text),
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Pitcher,
    Batter,
    Report,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Pitcher => Pane::Batter,
            Pane::Batter => Pane::Report,
            Pane::Report => Pane::Pitcher,
        }
    }

    /// Path segment of PUT /sessions/:id/tables/:side.
    pub fn side(self) -> Option<&'static str> {
        match self {
            Pane::Pitcher => Some("pitcher"),
            Pane::Batter => Some("batter"),
            Pane::Report => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connected,
    Error(String),
    Connecting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub base_url: String,
    pub session_id: Option<String>,
    pub pitcher: GridEditor,
    pub batter: GridEditor,
    pub focus: Pane,
    /// Text buffer while a cell is being edited.
    pub editing: Option<String>,
    pub report: Option<ReportResponse>,
    pub message: Option<Message>,
}

impl AppState {
    pub fn new(base_url: String) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            base_url,
            session_id: None,
            pitcher: GridEditor::new(),
            batter: GridEditor::new(),
            focus: Pane::Pitcher,
            editing: None,
            report: None,
            message: None,
        }
    }

    pub fn focused_grid(&self) -> Option<&GridEditor> {
        match self.focus {
            Pane::Pitcher => Some(&self.pitcher),
            Pane::Batter => Some(&self.batter),
            Pane::Report => None,
        }
    }

    pub fn focused_grid_mut(&mut self) -> Option<&mut GridEditor> {
        match self.focus {
            Pane::Pitcher => Some(&mut self.pitcher),
            Pane::Batter => Some(&mut self.batter),
            Pane::Report => None,
        }
    }

    /// Start editing the focused cell, seeded with its current text.
    pub fn begin_edit(&mut self) {
        let seed = self
            .focused_grid()
            .and_then(|g| g.current_cell())
            .map(str::to_string);
        if seed.is_some() {
            self.editing = seed;
        }
    }

    /// Write the edit buffer into the focused cell. Returns true if a cell changed.
    pub fn commit_edit(&mut self) -> bool {
        let Some(text) = self.editing.take() else {
            return false;
        };
        self.focused_grid_mut()
            .map(|g| g.set_current_cell(&text))
            .unwrap_or(false)
    }

    fn session_url(&self, suffix: &str) -> Option<String> {
        let id = self.session_id.as_ref()?;
        Some(format!("{}/sessions/{}{}", self.base_url, id, suffix))
    }

    /// POST /sessions. Grids start empty on both sides.
    pub async fn connect(&mut self, client: &reqwest::Client) {
        let url = format!("{}/sessions", self.base_url);
        let result = async {
            let resp = client.post(&url).send().await?.error_for_status()?;
            resp.json::<SessionCreated>().await
        }
        .await;
        match result {
            Ok(created) => {
                self.session_id = Some(created.session_id);
                self.status = ConnectionStatus::Connected;
            }
            Err(e) => self.status = ConnectionStatus::Error(format!("{e}")),
        }
    }

    /// DELETE /sessions/:id. Best effort; the server also expires idle sessions.
    pub async fn disconnect(&mut self, client: &reqwest::Client) {
        if let Some(url) = self.session_url("") {
            let _ = client.delete(&url).send().await;
        }
        self.session_id = None;
    }

    /// Replace the focused side's grid on the server.
    pub async fn push_focused(&mut self, client: &reqwest::Client) {
        let (Some(side), Some(grid)) = (self.focus.side(), self.focused_grid()) else {
            return;
        };
        let body = grid.to_body();
        let Some(url) = self.session_url(&format!("/tables/{side}")) else {
            return;
        };
        match client.put(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => self.message = Some(Message::Error(error_text(resp).await)),
            Err(e) => self.status = ConnectionStatus::Error(format!("{e}")),
        }
    }

    /// "Generate Matchup Table". On failure the previous report is cleared and
    /// the server's message is shown; the grids are not touched.
    pub async fn generate(&mut self, client: &reqwest::Client) {
        let Some(url) = self.session_url("/generate") else {
            return;
        };
        match client.post(&url).send().await {
            Ok(resp) if resp.status().is_success() => match resp.json::<ReportResponse>().await {
                Ok(report) => {
                    self.message = Some(Message::Info(format!(
                        "Generated {} matchup rows",
                        report.rows.len()
                    )));
                    self.report = Some(report);
                    self.focus = Pane::Report;
                }
                Err(e) => self.message = Some(Message::Error(format!("parse error: {e}"))),
            },
            Ok(resp) => {
                self.report = None;
                self.message = Some(Message::Error(error_text(resp).await));
            }
            Err(e) => self.status = ConnectionStatus::Error(format!("{e}")),
        }
    }

    /// Fetch an export and save it under `dir` with its fixed file name.
    pub async fn download(&mut self, client: &reqwest::Client, format: &str, dir: &Path) {
        let file_name = match format {
            "csv" => CSV_FILE_NAME,
            _ => XLSX_FILE_NAME,
        };
        let Some(url) = self.session_url(&format!("/export/{format}")) else {
            return;
        };
        let resp = match client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.status = ConnectionStatus::Error(format!("{e}"));
                return;
            }
        };
        if !resp.status().is_success() {
            self.message = Some(Message::Error(error_text(resp).await));
            return;
        }
        let path = dir.join(file_name);
        let saved = match resp.bytes().await {
            Ok(bytes) => tokio::fs::write(&path, &bytes).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        self.message = Some(match saved {
            Ok(()) => Message::Info(format!("Saved {}", path.display())),
            Err(e) => Message::Error(format!("Download failed: {e}")),
        });
    }
}

async fn error_text(resp: reqwest::Response) -> String {
    let status = resp.status();
    match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("request failed: {status}"),
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Render a report cell value for display.
pub fn format_value(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 => format!("{f:.0}"),
            Some(f) => format!("{f:.3}"),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse `#rrggbb` into an RGB triple.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let h = hex.strip_prefix('#')?;
    if h.len() != 6 || !h.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_and_delete_rows_keep_cursor_in_bounds() {
        let mut g = GridEditor::new();
        assert!(!g.delete_row());
        g.add_row();
        g.add_row();
        assert_eq!(g.cursor_row, 1);
        assert!(g.delete_row());
        assert_eq!(g.cursor_row, 0);
        assert!(g.delete_row());
        assert!(g.rows.is_empty());
        assert_eq!(g.cursor_row, 0);
    }

    #[test]
    fn cursor_is_clamped() {
        let mut g = GridEditor::new();
        g.add_row();
        g.move_cursor(-3, -3);
        assert_eq!((g.cursor_row, g.cursor_col), (0, 0));
        g.move_cursor(5, 20);
        assert_eq!((g.cursor_row, g.cursor_col), (0, 6));
    }

    #[test]
    fn body_types_cells() {
        let mut g = GridEditor::new();
        g.add_row();
        g.set_current_cell("  Fastball ");
        g.move_cursor(0, 1);
        g.set_current_cell("30");
        g.move_cursor(0, 1);
        g.set_current_cell("lots");

        let body = g.to_body();
        assert_eq!(body.columns.len(), 7);
        assert_eq!(
            body.rows[0],
            vec![json!("Fastball"), json!(30.0), json!("lots"), json!(null), json!(null), json!(null), json!(null)]
        );
    }

    #[test]
    fn numeric_pitch_names_stay_text() {
        assert_eq!(cell_value(0, "4"), json!("4"));
        assert_eq!(cell_value(1, "4"), json!(4.0));
    }

    #[test]
    fn edit_commits_into_focused_grid() {
        let mut app = AppState::new("http://localhost:3000".into());
        app.batter.add_row();
        app.focus = Pane::Batter;
        app.begin_edit();
        app.editing.as_mut().unwrap().push_str("Slider");
        assert!(app.commit_edit());
        assert_eq!(app.batter.current_cell(), Some("Slider"));
        assert!(app.pitcher.rows.is_empty());
    }

    #[test]
    fn report_pane_has_no_grid() {
        let mut app = AppState::new("http://localhost:3000".into());
        app.focus = Pane::Report;
        app.begin_edit();
        assert!(app.editing.is_none());
        assert_eq!(Pane::Report.next(), Pane::Pitcher);
    }

    #[test]
    fn formatting_helpers() {
        assert_eq!(format_value(&json!(20.0)), "20");
        assert_eq!(format_value(&json!(-0.05)), "-0.050");
        assert_eq!(format_value(&Value::Null), "-");
        assert_eq!(parse_hex("#990000"), Some((0x99, 0, 0)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#é0000"), None);
        assert_eq!(parse_hex("#0€00"), None);
        assert_eq!(truncate("Knuckle-curve", 8), "Knuckle…");
    }

    #[test]
    fn report_response_parses_server_shape() {
        let raw = json!({
            "columns": ["Pitch", "K% Delta"],
            "rows": [[
                { "value": "Fastball" },
                { "value": 20.0, "style": { "band": "light_green", "background": "#d9ead3", "foreground": null, "css": "background-color:#d9ead3" } }
            ]],
            "legend": [{ "band": "dark_red", "background": "#990000", "meaning": "strong pitcher advantage" }]
        });
        let report: ReportResponse = serde_json::from_value(raw).unwrap();
        assert!(report.rows[0][0].style.is_none());
        assert_eq!(report.rows[0][1].style.as_ref().unwrap().band, "light_green");
    }
}
