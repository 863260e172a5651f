use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identifiant fort pour Nurse (local au formulaire, jamais transmis)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NurseId(String);

impl NurseId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown position code: {0}")]
pub struct UnknownPosition(pub i64);

/// Rang d'une infirmière, transmis sous forme numérique (0..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "i64")]
pub enum Position {
    HeadNurse,
    ChargeNurse,
    SeniorNurse,
    StaffNurse,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::HeadNurse,
        Position::ChargeNurse,
        Position::SeniorNurse,
        Position::StaffNurse,
    ];

    pub fn code(self) -> u8 {
        match self {
            Position::HeadNurse => 0,
            Position::ChargeNurse => 1,
            Position::SeniorNurse => 2,
            Position::StaffNurse => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|p| i64::from(p.code()) == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::HeadNurse => "수간호사",
            Position::ChargeNurse => "책임 간호사",
            Position::SeniorNurse => "주임 간호사",
            Position::StaffNurse => "평간호사",
        }
    }
}

impl From<Position> for u8 {
    fn from(p: Position) -> Self {
        p.code()
    }
}

impl TryFrom<i64> for Position {
    type Error = UnknownPosition;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Position::from_code(code).ok_or(UnknownPosition(code))
    }
}

/// Créneau attribué par le service externe pour une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Day,
    Evening,
    Night,
    Off,
}

impl Shift {
    /// Abréviation affichée dans le tableau et les exports.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Shift::Day => "D",
            Shift::Evening => "E",
            Shift::Night => "N",
            Shift::Off => "OFF",
        }
    }
}

/// Infirmière saisie dans le formulaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nurse {
    pub id: NurseId,
    pub name: String,
    pub position: Position,
    /// Décalages (en jours) depuis le début du planning.
    pub off: Vec<i64>,
}

impl Nurse {
    pub fn new<N: Into<String>>(name: N, position: Position, off: Vec<i64>) -> Self {
        Self {
            id: NurseId::random(),
            name: name.into(),
            position,
            off,
        }
    }

    /// Forme transmise au service : l'identifiant local est retiré.
    pub fn to_entry(&self) -> NurseEntry {
        NurseEntry {
            name: self.name.clone(),
            position: self.position,
            off: self.off.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseEntry {
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub off: Vec<i64>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}

/// Corps envoyé au service de planification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub nurse_list: Vec<NurseEntry>,
}

impl ScheduleRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.start > self.end {
            return Err(RequestError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// Une journée du planning renvoyé. Les clés gardent l'ordre du JSON reçu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponseItem {
    /// `YYYY-MM-DD`, comparé tel quel.
    pub date: String,
    #[serde(default)]
    pub nurses: IndexMap<String, Shift>,
}

pub type ScheduleResponse = Vec<ScheduleResponseItem>;

/// Période sélectionnée, éventuellement incomplète.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.from?, self.to?))
    }

    pub fn is_complete(&self) -> bool {
        self.bounds().is_some()
    }

    /// Vrai si `day` tombe dans la période (début seul : à partir du début).
    pub fn contains(&self, day: NaiveDate) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= day && day <= to,
            (Some(from), None) => from <= day,
            _ => false,
        }
    }

    pub fn total_days(&self) -> Option<i64> {
        let (from, to) = self.bounds()?;
        Some(to.signed_duration_since(from).num_days() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_roundtrips_through_code() {
        for p in Position::ALL {
            assert_eq!(Position::from_code(i64::from(p.code())), Some(p));
        }
        assert_eq!(Position::from_code(7), None);
    }

    #[test]
    fn request_serializes_without_local_ids() {
        let nurse = Nurse::new("김하나", Position::StaffNurse, vec![0, 3]);
        let request = ScheduleRequest {
            start: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            nurse_list: vec![nurse.to_entry()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start": "2025-03-01",
                "end": "2025-03-07",
                "nurse_list": [{ "name": "김하나", "position": 3, "off": [0, 3] }]
            })
        );
    }

    #[test]
    fn unknown_position_is_rejected_on_decode() {
        let raw = r#"{ "name": "x", "position": 9, "off": [] }"#;
        assert!(serde_json::from_str::<NurseEntry>(raw).is_err());
    }

    #[test]
    fn response_keeps_name_order() {
        let raw = r#"[{ "date": "2025-03-01", "nurses": { "하나": "day", "가람": "night" } }]"#;
        let response: ScheduleResponse = serde_json::from_str(raw).unwrap();
        let names: Vec<&str> = response[0].nurses.keys().map(String::as_str).collect();
        assert_eq!(names, ["하나", "가람"]);
        assert_eq!(response[0].nurses["가람"], Shift::Night);
    }

    #[test]
    fn reversed_range_fails_validation() {
        let request = ScheduleRequest {
            start: NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            nurse_list: Vec::new(),
        };
        assert!(request.validate().is_err());
    }
}
