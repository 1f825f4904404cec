use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};

use crate::config::{SHEET_NAME, XLSX_HEADER_FILL};
use crate::error::Result;
use crate::types::{matchup_columns, MatchupRow};

/// Write merged rows into a single "Matchup" worksheet and return the
/// workbook bytes. The header row is bold on a light-gray fill; delta cells
/// are not colored here.
pub fn to_xlsx(rows: &[MatchupRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(XLSX_HEADER_FILL));

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, name) in matchup_columns().iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, name, &header_format)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, &row.pitch)?;
            for (j, value) in row.numeric_cells().enumerate() {
                // Nulls stay as empty cells.
                if let Some(v) = value {
                    sheet.write_number(r, (j + 1) as u16, v)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use std::io::Cursor;

    fn row() -> MatchupRow {
        MatchupRow {
            pitch: "Changeup".to_string(),
            pitcher: [Some(22.0), Some(31.0), None, Some(0.28), Some(0.21), Some(0.33)],
            batter: [Some(18.0), Some(29.0), None, Some(0.31), Some(0.26), Some(0.45)],
            delta: [Some(4.0), Some(2.0), None, Some(0.28 - 0.31), Some(0.21 - 0.26), Some(0.33 - 0.45)],
        }
    }

    #[test]
    fn produces_a_zip_container() {
        let bytes = to_xlsx(&[row()]).unwrap();
        assert!(bytes.len() > 100);
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn empty_merge_still_produces_a_workbook() {
        let bytes = to_xlsx(&[]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn workbook_reads_back_with_header_values_and_blanks() {
        let bytes = to_xlsx(&[row()]).unwrap();
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        assert_eq!(range.get_size(), (2, 19));

        for (col, name) in matchup_columns().iter().enumerate() {
            assert_eq!(range.get((0, col)), Some(&Data::String(name.clone())));
        }
        assert_eq!(range.get((1, 0)), Some(&Data::String("Changeup".to_string())));
        assert_eq!(range.get((1, 1)), Some(&Data::Float(22.0)));
        assert_eq!(range.get((1, 7)), Some(&Data::Float(18.0)));
        assert_eq!(range.get((1, 13)), Some(&Data::Float(4.0)));

        // PutAway% is null on both sides, so its pitcher, batter and delta cells are empty.
        assert_eq!(range.get((1, 3)), Some(&Data::Empty));
        assert_eq!(range.get((1, 15)), Some(&Data::Empty));
    }
}
