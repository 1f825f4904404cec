use crate::error::{AppError, Result};
use crate::types::{matchup_columns, MatchupRow};

/// Serialize merged rows as UTF-8 CSV with a header row.
/// Values only; null cells become empty fields.
pub fn to_csv(rows: &[MatchupRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(matchup_columns())?;

    let mut record: Vec<String> = Vec::with_capacity(19);
    for row in rows {
        record.clear();
        record.push(row.pitch.clone());
        record.extend(row.numeric_cells().map(format_number));
        wtr.write_record(&record)?;
    }

    wtr.into_inner()
        .map_err(|e| AppError::Csv(e.into_error().into()))
}

/// Shortest round-trip form, keeping a trailing `.0` on integral values.
pub fn format_number(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:?}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stat;

    fn sample() -> Vec<MatchupRow> {
        vec![
            MatchupRow {
                pitch: "Fastball".to_string(),
                pitcher: [Some(30.0), Some(25.0), None, Some(0.3), Some(0.25), Some(0.41)],
                batter: [Some(10.0), Some(40.0), Some(5.0), Some(0.3), Some(0.2), None],
                delta: [Some(20.0), Some(-15.0), None, Some(0.0), Some(0.25 - 0.2), None],
            },
            MatchupRow {
                pitch: "Slider, back-foot".to_string(),
                pitcher: [Some(1.5); 6],
                batter: [Some(0.5); 6],
                delta: [Some(1.0); 6],
            },
        ]
    }

    #[test]
    fn empty_merge_is_header_only() {
        let bytes = to_csv(&[]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("Pitch,K%_Pitcher,Whiff%_Pitcher,"));
        assert!(text.trim_end().ends_with("SLG Delta"));
    }

    #[test]
    fn numbers_keep_python_style_decimal_point() {
        assert_eq!(format_number(Some(30.0)), "30.0");
        assert_eq!(format_number(Some(-15.0)), "-15.0");
        assert_eq!(format_number(Some(0.25)), "0.25");
        assert_eq!(format_number(None), "");
    }

    #[test]
    fn first_row_is_written_in_column_order() {
        let text = String::from_utf8(to_csv(&sample()).unwrap()).unwrap();
        let first = text.lines().nth(1).unwrap();
        assert!(
            first.starts_with("Fastball,30.0,25.0,,0.3,0.25,0.41,10.0,40.0,5.0,0.3,0.2,,20.0,-15.0,,0.0,"),
            "{first}"
        );
    }

    #[test]
    fn export_is_byte_identical_on_repeat() {
        let rows = sample();
        assert_eq!(to_csv(&rows).unwrap(), to_csv(&rows).unwrap());
    }

    #[test]
    fn round_trip_reproduces_rows_columns_and_values() {
        let rows = sample();
        let bytes = to_csv(&rows).unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, matchup_columns());

        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), rows.len());

        for (record, row) in records.iter().zip(&rows) {
            assert_eq!(&record[0], row.pitch.as_str());
            let parsed: Vec<Option<f64>> = record
                .iter()
                .skip(1)
                .map(|f| if f.is_empty() { None } else { Some(f.parse().unwrap()) })
                .collect();
            let expected: Vec<Option<f64>> = row.numeric_cells().collect();
            assert_eq!(parsed, expected);
        }

        let k_delta_col = headers.iter().position(|h| h == "K% Delta").unwrap();
        assert_eq!(&records[0][k_delta_col], "20.0");
        assert_eq!(rows[0].delta(Stat::KPct), Some(20.0));
    }
}
