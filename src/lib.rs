#![forbid(unsafe_code)]
//! nurse-roster — formulaire de contraintes de planning infirmier.
//!
//! - Saisie de la période et de l'équipe (jours de repos souhaités).
//! - Proxy HTTP vers le service de planification externe (boîte noire).
//! - Rendu du planning renvoyé, export PNG/CSV/XLSX.
//! - Dates civiles sans fuseau ; format filaire `YYYY-MM-DD`.

pub mod client;
pub mod config;
pub mod dates;
pub mod export;
pub mod form;
pub mod io;
pub mod model;
pub mod proxy;

pub use client::{ClientError, HttpScheduleClient, ScheduleClient};
pub use config::ProxyConfig;
pub use dates::{calculate_off_days, dates_in_range, format_date, format_display_date, position_label};
pub use export::{
    export_csv, export_image, export_spreadsheet, ArtifactSink, DirectorySink, ExportError,
    ImageExport, ImageStyle, MemorySink, ScheduleGrid, SpreadsheetExport,
};
pub use form::{FormPhase, RosterForm};
pub use model::{
    DateRange, Nurse, NurseEntry, NurseId, Position, ScheduleRequest, ScheduleResponse,
    ScheduleResponseItem, Shift,
};
pub use proxy::{router, AppState, HealthReport, ProxyError};
