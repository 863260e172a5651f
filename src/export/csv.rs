use super::{ExportError, ScheduleGrid};
use csv::{Terminator, WriterBuilder};

/// Marque d'ordre d'octets, pour que les tableurs lisent l'UTF-8 (hangeul).
pub const UTF8_BOM: &str = "\u{FEFF}";
pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

/// CSV : en-tête `간호사` + dates, une ligne par infirmière.
pub fn to_csv_bytes(grid: &ScheduleGrid<'_>) -> Result<Vec<u8>, ExportError> {
    let mut w = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.as_bytes().to_vec());
    w.write_record(grid.header())?;
    for row in grid.rows() {
        w.write_record(&row)?;
    }
    w.flush()?;
    w.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleResponse;
    use chrono::NaiveDate;

    #[test]
    fn csv_starts_with_bom_and_blank_cells() {
        let response: ScheduleResponse = serde_json::from_str(
            r#"[{"date":"2025-03-01","nurses":{"하나":"evening"}}]"#,
        )
        .unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let grid = ScheduleGrid::new(&response, vec!["하나".into()], start, end);
        let bytes = to_csv_bytes(&grid).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let body = text.strip_prefix(UTF8_BOM).expect("missing BOM");
        insta::assert_snapshot!(body, @r"
        간호사,03월 01일,03월 02일
        하나,E,
        ");
    }
}
