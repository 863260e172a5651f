use crate::model::{Position, ScheduleResponse};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::fs;
use std::path::Path;

/// Ligne d'équipe importée, avant passage dans le formulaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffRow {
    pub name: String,
    pub position: Position,
    pub off_dates: Vec<NaiveDate>,
}

/// Import d'équipe depuis CSV: header `name,position[,off]`
///
/// `position` accepte le code (0..=3) ou le libellé ; `off` est une liste
/// `;` de dates `YYYY-MM-DD` ou de plages `début..fin` / `début/fin`.
pub fn import_nurses_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffRow>> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let position = rec.get(1).context("missing position")?.trim();
        if name.is_empty() {
            bail!("invalid staff row (empty name)");
        }
        let position = parse_position(position)
            .with_context(|| format!("invalid position for {name}"))?;
        let off_dates = match rec.get(2).map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                parse_off_dates(raw).with_context(|| format!("invalid off days for {name}"))?
            }
            _ => Vec::new(),
        };
        out.push(StaffRow {
            name: name.to_string(),
            position,
            off_dates,
        });
    }
    Ok(out)
}

fn parse_position(raw: &str) -> anyhow::Result<Position> {
    if let Ok(code) = raw.parse::<i64>() {
        return Position::from_code(code).with_context(|| format!("unknown position code {code}"));
    }
    Position::ALL
        .into_iter()
        .find(|p| p.label() == raw)
        .with_context(|| format!("unknown position label {raw}"))
}

fn parse_off_dates(raw: &str) -> anyhow::Result<Vec<NaiveDate>> {
    let mut out = Vec::new();
    for chunk in raw.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some((a, b)) = chunk.split_once("..").or_else(|| chunk.split_once('/')) {
            let start = parse_day(a.trim())?;
            let end = parse_day(b.trim())?;
            if end < start {
                bail!("off range {chunk} ends before it starts");
            }
            out.extend(start.iter_days().take_while(|d| *d <= end));
        } else {
            out.push(parse_day(chunk)?);
        }
    }
    Ok(out)
}

fn parse_day(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Lecture d'une réponse du service enregistrée en JSON.
pub fn load_response_json<P: AsRef<Path>>(path: P) -> anyhow::Result<ScheduleResponse> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let response: ScheduleResponse =
        serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(response)
}
