use super::{ExportError, ScheduleGrid};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const SHEET_NAME: &str = "근무표";
pub const NAME_COLUMN_WIDTH: f64 = 15.0;
pub const DATE_COLUMN_WIDTH: f64 = 10.0;

/// Vrai si le support tableur a été compilé (feature `xlsx`).
pub fn spreadsheet_available() -> bool {
    cfg!(feature = "xlsx")
}

#[cfg(feature = "xlsx")]
pub fn to_xlsx_bytes(grid: &ScheduleGrid<'_>) -> Result<Vec<u8>, ExportError> {
    use rust_xlsxwriter::{Workbook, XlsxError};

    fn write_sheet(workbook: &mut Workbook, grid: &ScheduleGrid<'_>) -> Result<(), XlsxError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;
        sheet.set_column_width(0, NAME_COLUMN_WIDTH)?;
        for col in 1..=grid.dates().len() {
            sheet.set_column_width(col as u16, DATE_COLUMN_WIDTH)?;
        }
        for (col, title) in grid.header().into_iter().enumerate() {
            sheet.write_string(0, col as u16, title)?;
        }
        for (row, cells) in grid.rows().into_iter().enumerate() {
            for (col, value) in cells.into_iter().enumerate() {
                sheet.write_string(row as u32 + 1, col as u16, value)?;
            }
        }
        Ok(())
    }

    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, grid).map_err(|e| ExportError::Spreadsheet(e.to_string()))?;
    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Spreadsheet(e.to_string()))
}

#[cfg(not(feature = "xlsx"))]
pub fn to_xlsx_bytes(_grid: &ScheduleGrid<'_>) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::SpreadsheetUnavailable)
}
