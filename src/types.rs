use serde::{Deserialize, Serialize};

use crate::config::band_colors;

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// The six per-pitch statistics, in canonical column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    #[serde(rename = "K%")]
    KPct,
    #[serde(rename = "Whiff%")]
    WhiffPct,
    #[serde(rename = "PutAway%")]
    PutAwayPct,
    #[serde(rename = "OBA")]
    Oba,
    #[serde(rename = "BA")]
    Ba,
    #[serde(rename = "SLG")]
    Slg,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::KPct,
        Stat::WhiffPct,
        Stat::PutAwayPct,
        Stat::Oba,
        Stat::Ba,
        Stat::Slg,
    ];

    /// Column header as it appears in the editor grids.
    pub fn label(self) -> &'static str {
        match self {
            Stat::KPct => "K%",
            Stat::WhiffPct => "Whiff%",
            Stat::PutAwayPct => "PutAway%",
            Stat::Oba => "OBA",
            Stat::Ba => "BA",
            Stat::Slg => "SLG",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn delta_label(self) -> String {
        format!("{} Delta", self.label())
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Header of the join key column.
pub const PITCH_COLUMN: &str = "Pitch";

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Pitcher,
    Batter,
}

impl Side {
    /// Column suffix used in the merged table.
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Pitcher => "_Pitcher",
            Side::Batter => "_Batter",
        }
    }

    pub fn column_label(self, stat: Stat) -> String {
        format!("{}{}", stat.label(), self.suffix())
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Pitcher => write!(f, "pitcher"),
            Side::Batter => write!(f, "batter"),
        }
    }
}

// ---------------------------------------------------------------------------
// Typed tables
// ---------------------------------------------------------------------------

/// Nullable values of the six statistics, indexed by `Stat::index`.
pub type StatValues = [Option<f64>; 6];

/// One validated editor row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub pitch: String,
    pub values: StatValues,
}

impl StatRow {
    pub fn new(pitch: impl Into<String>, values: StatValues) -> Self {
        Self {
            pitch: pitch.into(),
            values,
        }
    }

    pub fn get(&self, stat: Stat) -> Option<f64> {
        self.values[stat.index()]
    }
}

/// Validated rows of one side, in editor order. Pitch values may repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct StatTable {
    pub rows: Vec<StatRow>,
}

impl StatTable {
    pub fn new(rows: Vec<StatRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// Matchup rows
// ---------------------------------------------------------------------------

/// One joined pitcher/batter record for a pitch type.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRow {
    pub pitch: String,
    pub pitcher: StatValues,
    pub batter: StatValues,
    /// `pitcher - batter` per statistic; None when either side is None.
    pub delta: StatValues,
}

impl MatchupRow {
    pub fn delta(&self, stat: Stat) -> Option<f64> {
        self.delta[stat.index()]
    }

    /// Cells in merged column order: pitcher stats, batter stats, deltas.
    pub fn numeric_cells(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.pitcher
            .iter()
            .chain(self.batter.iter())
            .chain(self.delta.iter())
            .copied()
    }
}

/// Merged table header: Pitch, pitcher columns, batter columns, then deltas.
pub fn matchup_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(1 + Stat::ALL.len() * 3);
    columns.push(PITCH_COLUMN.to_string());
    columns.extend(Stat::ALL.iter().map(|&s| Side::Pitcher.column_label(s)));
    columns.extend(Stat::ALL.iter().map(|&s| Side::Batter.column_label(s)));
    columns.extend(Stat::ALL.iter().map(|&s| s.delta_label()));
    columns
}

// ---------------------------------------------------------------------------
// Delta severity bands
// ---------------------------------------------------------------------------

/// Severity of a delta, ordered from strongest pitcher advantage to strongest
/// batter advantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorBand {
    /// d <= -45
    DarkRed,
    /// -45 < d <= -20
    MediumRed,
    /// -20 < d < 0
    LightRed,
    /// 0 <= d <= 20
    LightGreen,
    /// 20 < d <= 45
    MediumGreen,
    /// d > 45
    DarkGreen,
}

impl ColorBand {
    pub const ALL: [ColorBand; 6] = [
        ColorBand::DarkRed,
        ColorBand::MediumRed,
        ColorBand::LightRed,
        ColorBand::LightGreen,
        ColorBand::MediumGreen,
        ColorBand::DarkGreen,
    ];

    fn palette(self) -> (&'static str, Option<&'static str>) {
        match self {
            ColorBand::DarkRed => band_colors::DARK_RED,
            ColorBand::MediumRed => band_colors::MEDIUM_RED,
            ColorBand::LightRed => band_colors::LIGHT_RED,
            ColorBand::LightGreen => band_colors::LIGHT_GREEN,
            ColorBand::MediumGreen => band_colors::MEDIUM_GREEN,
            ColorBand::DarkGreen => band_colors::DARK_GREEN,
        }
    }

    pub fn background(self) -> &'static str {
        self.palette().0
    }

    pub fn foreground(self) -> Option<&'static str> {
        self.palette().1
    }

    /// Inline style directive for HTML-style renderers.
    pub fn css(self) -> String {
        match self.foreground() {
            Some(fg) => format!("background-color:{}; color:{fg}", self.background()),
            None => format!("background-color:{}", self.background()),
        }
    }

    pub fn meaning(self) -> &'static str {
        match self {
            ColorBand::DarkRed => "strong pitcher advantage",
            ColorBand::MediumRed => "moderate pitcher advantage",
            ColorBand::LightRed => "slight pitcher advantage",
            ColorBand::LightGreen => "slight batter advantage",
            ColorBand::MediumGreen => "moderate batter advantage",
            ColorBand::DarkGreen => "strong batter advantage",
        }
    }

    pub fn favors_pitcher(self) -> bool {
        self < ColorBand::LightGreen
    }
}

impl std::fmt::Display for ColorBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColorBand::DarkRed => "dark_red",
            ColorBand::MediumRed => "medium_red",
            ColorBand::LightRed => "light_red",
            ColorBand::LightGreen => "light_green",
            ColorBand::MediumGreen => "medium_green",
            ColorBand::DarkGreen => "dark_green",
        };
        write!(f, "{s}")
    }
}
