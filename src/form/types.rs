use crate::model::{Position, ScheduleResponse};
use chrono::NaiveDate;

pub const VALIDATION_MESSAGE: &str = "근무표 기간과 최소 한 명의 간호사를 입력해주세요.";

/// Étape du formulaire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Collecting,
    Submitting,
    DisplayingResult(ScheduleResponse),
    ShowingError(String),
}

impl FormPhase {
    /// Le formulaire reste modifiable à côté d'un message d'erreur.
    pub fn is_editable(&self) -> bool {
        matches!(self, FormPhase::Collecting | FormPhase::ShowingError(_))
    }
}

/// Sous-formulaire de saisie d'une infirmière.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaffDraft {
    pub name: String,
    pub position: Option<Position>,
    pub off_dates: Vec<NaiveDate>,
}

impl StaffDraft {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
