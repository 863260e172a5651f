//! Utilitaires de dates et de libellés, sans état.

use crate::model::Position;
use chrono::NaiveDate;

/// Préfixe commun des fichiers exportés.
pub const ARTIFACT_PREFIX: &str = "간호사_근무표";

const UNKNOWN_POSITION: &str = "알 수 없음";

/// Format filaire `YYYY-MM-DD` ; chaîne vide si absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Format d'affichage court (`MM월 dd일`) ; chaîne vide si absent.
pub fn format_display_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%m월 %d일").to_string())
        .unwrap_or_default()
}

/// Décalages en jours entiers depuis `start`, triés par ordre croissant.
pub fn calculate_off_days(selected: Option<&[NaiveDate]>, start: Option<NaiveDate>) -> Vec<i64> {
    let (Some(selected), Some(start)) = (selected, start) else {
        return Vec::new();
    };
    let mut offsets: Vec<i64> = selected
        .iter()
        .map(|d| d.signed_duration_since(start).num_days())
        .collect();
    offsets.sort_unstable();
    offsets
}

/// Tous les jours de `start` à `end` inclus. Vide si `end < start`.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|d| *d <= end).collect()
}

pub fn position_label(code: i64) -> &'static str {
    Position::from_code(code)
        .map(Position::label)
        .unwrap_or(UNKNOWN_POSITION)
}

/// `간호사_근무표_<start>_<end>.<ext>`
pub fn artifact_file_name(start: NaiveDate, end: NaiveDate, ext: &str) -> String {
    format!(
        "{ARTIFACT_PREFIX}_{}_{}.{ext}",
        format_date(Some(start)),
        format_date(Some(end))
    )
}
