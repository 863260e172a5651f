mod range;
mod staff;
mod submit;
mod types;

pub use types::{FormPhase, StaffDraft, VALIDATION_MESSAGE};

use crate::client::ScheduleClient;
use crate::dates::{format_date, format_display_date};
use crate::export::table_nurse_names;
use crate::model::{DateRange, Nurse, NurseId, Position, ScheduleRequest, ScheduleResponse};
use chrono::{Duration, NaiveDate};

/// Formulaire de contraintes : période, équipe, cycle d'envoi.
#[derive(Debug, Default)]
pub struct RosterForm {
    range: DateRange,
    draft: StaffDraft,
    nurses: Vec<Nurse>,
    phase: FormPhase,
}

impl RosterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }
    pub fn range(&self) -> DateRange {
        self.range
    }
    pub fn draft(&self) -> &StaffDraft {
        &self.draft
    }
    pub fn nurses(&self) -> &[Nurse] {
        &self.nurses
    }

    /// La période est figée dès qu'une infirmière a été ajoutée.
    pub fn is_range_locked(&self) -> bool {
        !self.nurses.is_empty()
    }

    pub fn set_range(&mut self, from: NaiveDate, to: NaiveDate) -> bool {
        range::set_range(self, from, to)
    }

    pub fn select_date(&mut self, day: NaiveDate) -> bool {
        range::select_date(self, day)
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        if self.phase.is_editable() {
            self.draft.name = name.into();
        }
    }

    pub fn select_position(&mut self, position: Position) {
        if self.phase.is_editable() {
            self.draft.position = Some(position);
        }
    }

    /// Ajoute ou retire un jour de repos souhaité ; refusé hors période.
    pub fn toggle_off_date(&mut self, day: NaiveDate) -> bool {
        staff::toggle_off_date(self, day)
    }

    pub fn can_add_nurse(&self) -> bool {
        self.phase.is_editable()
            && !self.draft.name.trim().is_empty()
            && self.draft.position.is_some()
            && self.range.from.is_some()
    }

    pub fn add_nurse(&mut self) -> Option<NurseId> {
        staff::add_nurse(self)
    }

    pub fn remove_nurse(&mut self, id: &NurseId) -> bool {
        staff::remove_nurse(self, id)
    }

    pub fn can_submit(&self) -> bool {
        self.phase.is_editable() && self.range.is_complete() && !self.nurses.is_empty()
    }

    /// Corps de la demande, sans les identifiants locaux.
    pub fn build_request(&self) -> Option<ScheduleRequest> {
        let (start, end) = self.range.bounds()?;
        if self.nurses.is_empty() {
            return None;
        }
        Some(ScheduleRequest {
            start,
            end,
            nurse_list: self.nurses.iter().map(Nurse::to_entry).collect(),
        })
    }

    /// Envoie la demande ; se termine toujours sur un résultat ou une erreur.
    pub async fn submit<C>(&mut self, client: &C) -> &FormPhase
    where
        C: ScheduleClient + ?Sized,
    {
        submit::submit(self, client).await;
        &self.phase
    }

    /// Retour à la saisie : efface le résultat et l'erreur.
    ///
    /// `submit` tient `&mut self` jusqu'à la fin ; un `Submitting` visible ici
    /// vient donc d'un envoi abandonné en cours de route, et il est levé aussi.
    pub fn redo(&mut self) {
        self.phase = FormPhase::Collecting;
    }

    pub fn result(&self) -> Option<&ScheduleResponse> {
        match &self.phase {
            FormPhase::DisplayingResult(r) => Some(r),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::ShowingError(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn table_nurse_names(&self) -> Vec<String> {
        let Some(result) = self.result() else {
            return Vec::new();
        };
        let submitted: Vec<String> = self.nurses.iter().map(|n| n.name.clone()).collect();
        table_nurse_names(result, &submitted)
    }

    pub fn off_day_labels(&self, nurse: &Nurse) -> Vec<String> {
        let Some(start) = self.range.from else {
            return Vec::new();
        };
        nurse
            .off
            .iter()
            .filter_map(|offset| start.checked_add_signed(Duration::days(*offset)))
            .map(|d| format_display_date(Some(d)))
            .collect()
    }

    /// Libellé de la période pour l'affichage.
    pub fn range_label(&self) -> String {
        match (self.range.from, self.range.to) {
            (Some(from), Some(to)) => format!(
                "{} - {}",
                format_display_date(Some(from)),
                format_display_date(Some(to))
            ),
            (Some(from), None) => format_display_date(Some(from)),
            _ => String::new(),
        }
    }

    /// Bornes au format filaire, vides si absentes.
    pub fn wire_bounds(&self) -> (String, String) {
        (format_date(self.range.from), format_date(self.range.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn form_with_range() -> RosterForm {
        let mut form = RosterForm::new();
        assert!(form.set_range(d(1), d(7)));
        form
    }

    #[test]
    fn add_nurse_requires_name_position_and_start() {
        let mut form = RosterForm::new();
        form.set_name("김하나");
        form.select_position(Position::StaffNurse);
        assert!(form.add_nurse().is_none());

        let mut form = form_with_range();
        form.set_name("   ");
        form.select_position(Position::StaffNurse);
        assert!(form.add_nurse().is_none());

        let mut form = form_with_range();
        form.set_name("김하나");
        assert!(form.add_nurse().is_none());
        assert!(form.nurses().is_empty());
    }

    #[test]
    fn add_nurse_computes_offsets_and_clears_draft() {
        let mut form = form_with_range();
        form.set_name("  김하나 ");
        form.select_position(Position::ChargeNurse);
        assert!(form.toggle_off_date(d(5)));
        assert!(form.toggle_off_date(d(2)));
        assert!(!form.toggle_off_date(d(20)));

        let id = form.add_nurse().unwrap();
        let nurse = &form.nurses()[0];
        assert_eq!(nurse.id, id);
        assert_eq!(nurse.name, "김하나");
        assert_eq!(nurse.off, vec![1, 4]);
        assert_eq!(form.draft(), &StaffDraft::default());
        assert_eq!(form.off_day_labels(nurse), vec!["03월 02일", "03월 05일"]);
    }

    #[test]
    fn range_locks_once_staff_exists() {
        let mut form = form_with_range();
        form.set_name("김하나");
        form.select_position(Position::HeadNurse);
        let id = form.add_nurse().unwrap();

        assert!(!form.set_range(d(10), d(12)));
        assert!(!form.select_date(d(10)));
        assert_eq!(form.range(), DateRange::new(d(1), d(7)));

        assert!(form.remove_nurse(&id));
        assert!(!form.remove_nurse(&id));
        assert!(form.set_range(d(10), d(12)));
    }

    #[test]
    fn calendar_clicks_build_and_restart_ranges() {
        let mut form = RosterForm::new();
        form.select_date(d(10));
        assert_eq!(form.range().from, Some(d(10)));
        form.select_date(d(4));
        assert_eq!(form.range(), DateRange::new(d(4), d(10)));
        form.select_date(d(6));
        assert_eq!(form.range(), DateRange { from: Some(d(6)), to: None });
        assert_eq!(form.range_label(), "03월 06일");
    }

    #[test]
    fn request_strips_local_ids() {
        let mut form = form_with_range();
        assert!(form.build_request().is_none());
        form.set_name("이가람");
        form.select_position(Position::SeniorNurse);
        form.add_nurse();
        let request = form.build_request().unwrap();
        assert_eq!(request.start, d(1));
        assert_eq!(request.end, d(7));
        assert_eq!(request.nurse_list[0].name, "이가람");
        assert_eq!(form.wire_bounds(), ("2025-03-01".to_string(), "2025-03-07".to_string()));
    }
}
