#![forbid(unsafe_code)]
use chrono::NaiveDate;
use nurse_roster::export::{spreadsheet_available, CSV_MIME, LEGEND_MIME, PNG_MIME, UTF8_BOM};
use nurse_roster::{
    export_csv, export_image, export_spreadsheet, DirectorySink, ExportError, ImageStyle,
    MemorySink,
    ScheduleGrid, ScheduleResponse, SpreadsheetExport,
};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn response() -> ScheduleResponse {
    serde_json::from_str(
        r#"[
            {"date":"2025-03-01","nurses":{"김하나":"day","이가람":"night"}},
            {"date":"2025-03-02","nurses":{"김하나":"evening"}}
        ]"#,
    )
    .unwrap()
}

fn names() -> Vec<String> {
    vec!["김하나".into(), "이가람".into()]
}

#[test]
fn csv_export_lays_out_nurse_rows() {
    let response = response();
    let grid = ScheduleGrid::new(&response, names(), d(1), d(2));
    let mut sink = MemorySink::new();

    let filename = export_csv(&grid, &mut sink).unwrap();
    assert_eq!(filename, "간호사_근무표_2025-03-01_2025-03-02.csv");

    let artifact = sink.get(&filename).unwrap();
    assert_eq!(artifact.mime, CSV_MIME);
    let text = std::str::from_utf8(&artifact.bytes)
        .unwrap()
        .strip_prefix(UTF8_BOM)
        .unwrap();
    let lines: Vec<Vec<&str>> = text.lines().map(|l| l.split(',').collect()).collect();
    assert_eq!(lines[0], vec!["간호사", "03월 01일", "03월 02일"]);
    assert_eq!(lines[1], vec!["김하나", "D", "E"]);
    assert_eq!(lines[2], vec!["이가람", "N", ""]);
}

#[test]
fn directory_sink_writes_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let response = response();
    let grid = ScheduleGrid::new(&response, names(), d(1), d(2));
    let mut sink = DirectorySink::open(dir.path()).unwrap();

    let filename = export_csv(&grid, &mut sink).unwrap();
    let written = std::fs::read(dir.path().join(&filename)).unwrap();
    assert!(written.starts_with(UTF8_BOM.as_bytes()));
}

#[test]
fn spreadsheet_export_depends_on_capability() {
    let response = response();
    let grid = ScheduleGrid::new(&response, names(), d(1), d(2));
    let mut sink = MemorySink::new();

    let outcome = export_spreadsheet(&grid, &mut sink).unwrap();
    if spreadsheet_available() {
        assert_eq!(
            outcome,
            SpreadsheetExport::Written {
                filename: "간호사_근무표_2025-03-01_2025-03-02.xlsx".into()
            }
        );
    } else {
        assert!(matches!(
            outcome,
            SpreadsheetExport::CsvFallback { ref filename, .. } if filename.ends_with(".csv")
        ));
    }
    assert_eq!(sink.artifacts.len(), 1);
}

#[test]
fn empty_schedule_is_not_exported() {
    let grid = ScheduleGrid::new(&[], names(), d(1), d(2));
    let mut sink = MemorySink::new();
    assert!(matches!(export_csv(&grid, &mut sink), Err(ExportError::EmptySchedule)));
    assert!(matches!(export_image(&grid, &ImageStyle::default(), &mut sink), Err(ExportError::EmptySchedule)));
    assert!(sink.artifacts.is_empty());
}

#[test]
fn image_export_writes_png_and_row_legend() {
    let response = response();
    let grid = ScheduleGrid::new(&response, names(), d(1), d(9));
    let mut sink = MemorySink::new();

    let written = export_image(&grid, &ImageStyle::default(), &mut sink).unwrap();
    assert_eq!(written.filename, "간호사_근무표_2025-03-01_2025-03-09.png");
    let artifact = sink.get(&written.filename).unwrap();
    assert_eq!(artifact.mime, PNG_MIME);
    assert!(artifact.bytes.starts_with(&[0x89, b'P', b'N', b'G']));

    let legend = written.legend.expect("numbered rows need a legend");
    assert_eq!(legend, "간호사_근무표_2025-03-01_2025-03-09.legend.txt");
    let legend = sink.get(&legend).unwrap();
    assert_eq!(legend.mime, LEGEND_MIME);
    assert_eq!(legend.bytes, "1. 김하나\n2. 이가람\n".as_bytes());
}

#[test]
fn missing_font_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = ImageStyle::from_font_file(dir.path().join("absent.ttf")).unwrap_err();
    assert!(matches!(err, ExportError::Io(_)));
}
