//! Workbook writer

use crate::rows::{ExportRow, HEADERS};
use crate::ExportResult;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

pub const SHEET_NAME: &str = "weather_records";

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Write `rows` under a header line into a single-sheet workbook at `path`
///
/// Blocking; run it off the async runtime.
pub fn write_workbook(rows: &[ExportRow], path: &Path) -> ExportResult<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let datetime_format = Format::new().set_num_format(DATETIME_FORMAT);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let line = index as u32 + 1;
        worksheet.write_number(line, 0, row.temperature)?;
        worksheet.write_number(line, 1, row.wind_speed)?;
        worksheet.write_string(line, 2, row.wind_direction.as_str())?;
        worksheet.write_number(line, 3, row.precipitation)?;
        worksheet.write_number(line, 4, row.pressure)?;
        worksheet.write_string(line, 5, row.weather.as_str())?;
        worksheet.write_datetime_with_format(line, 6, &row.created_at, &datetime_format)?;
    }

    worksheet.autofit();
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(temperature: f64) -> ExportRow {
        ExportRow {
            temperature,
            wind_speed: 3.0,
            wind_direction: "East".into(),
            precipitation: 0.4,
            pressure: 751.0,
            weather: "Slight rain".into(),
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(11, 15, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_writes_xlsx_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.xlsx");

        write_workbook(&[row(5.0), row(4.5)], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // xlsx is a zip container
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_empty_export_still_has_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        write_workbook(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("export.xlsx");

        assert!(write_workbook(&[row(1.0)], &path).is_err());
    }
}
