//! Rendu et export du planning reçu (texte, PNG, CSV, tableur).

mod csv;
mod grid;
mod raster;
mod sink;
mod xlsx;

pub use self::csv::{to_csv_bytes, CSV_MIME, UTF8_BOM};
pub use grid::{
    table_nurse_names, ScheduleGrid, EMPTY_SCHEDULE_TEXT, MISSING_CELL, NURSE_HEADER,
};
pub use raster::{legend_text, to_png_bytes, ImageStyle, LEGEND_MIME, PNG_MIME};
pub use sink::{Artifact, ArtifactSink, DirectorySink, MemorySink};
pub use xlsx::{spreadsheet_available, to_xlsx_bytes, XLSX_MIME};

use crate::dates::artifact_file_name;
use thiserror::Error;
use tracing::{info, warn};

pub const SPREADSHEET_FALLBACK_NOTICE: &str = "Excel 저장에 실패했습니다. CSV 파일로 저장합니다.";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("no schedule to export")]
    EmptySchedule,
    #[error("csv export failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("spreadsheet support not compiled in")]
    SpreadsheetUnavailable,
    #[error("spreadsheet export failed: {0}")]
    Spreadsheet(String),
    #[error("unusable font: {0}")]
    Font(String),
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("writing {filename}: {source}")]
    Sink {
        filename: String,
        source: anyhow::Error,
    },
}

/// Issue d'un export tableur.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetExport {
    Written { filename: String },
    CsvFallback { filename: String, notice: &'static str },
}

fn ensure_not_empty(grid: &ScheduleGrid<'_>) -> Result<(), ExportError> {
    if grid.is_empty() {
        return Err(ExportError::EmptySchedule);
    }
    Ok(())
}

fn deliver(
    sink: &mut dyn ArtifactSink,
    filename: String,
    bytes: &[u8],
    mime: &str,
) -> Result<String, ExportError> {
    sink.write(&filename, bytes, mime)
        .map_err(|source| ExportError::Sink {
            filename: filename.clone(),
            source,
        })?;
    info!(%filename, size = bytes.len(), mime, "artifact written");
    Ok(filename)
}

pub fn export_csv(grid: &ScheduleGrid<'_>, sink: &mut dyn ArtifactSink) -> Result<String, ExportError> {
    ensure_not_empty(grid)?;
    let bytes = to_csv_bytes(grid)?;
    let filename = artifact_file_name(grid.start(), grid.end(), "csv");
    deliver(sink, filename, &bytes, CSV_MIME)
}

/// Issue d'un export image ; `legend` nomme le fichier des noms si l'image est numérotée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExport {
    pub filename: String,
    pub legend: Option<String>,
}

pub fn export_image(
    grid: &ScheduleGrid<'_>,
    style: &ImageStyle,
    sink: &mut dyn ArtifactSink,
) -> Result<ImageExport, ExportError> {
    ensure_not_empty(grid)?;
    let bytes = to_png_bytes(grid, style)?;
    let filename = artifact_file_name(grid.start(), grid.end(), "png");
    let filename = deliver(sink, filename, &bytes, PNG_MIME)?;
    let legend = if style.has_font() {
        None
    } else {
        let name = artifact_file_name(grid.start(), grid.end(), "legend.txt");
        Some(deliver(sink, name, legend_text(grid).as_bytes(), LEGEND_MIME)?)
    };
    Ok(ImageExport { filename, legend })
}

/// Export tableur ; en cas d'échec (ou sans support), retombe sur le CSV.
pub fn export_spreadsheet(
    grid: &ScheduleGrid<'_>,
    sink: &mut dyn ArtifactSink,
) -> Result<SpreadsheetExport, ExportError> {
    ensure_not_empty(grid)?;
    let attempt = match to_xlsx_bytes(grid) {
        Ok(bytes) => {
            let filename = artifact_file_name(grid.start(), grid.end(), "xlsx");
            deliver(sink, filename, &bytes, XLSX_MIME)
        }
        Err(e) => Err(e),
    };
    match attempt {
        Ok(filename) => Ok(SpreadsheetExport::Written { filename }),
        Err(e) => {
            warn!(error = %e, "spreadsheet export failed, falling back to csv");
            let filename = export_csv(grid, sink)?;
            Ok(SpreadsheetExport::CsvFallback {
                filename,
                notice: SPREADSHEET_FALLBACK_NOTICE,
            })
        }
    }
}
