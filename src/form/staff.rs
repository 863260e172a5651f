use super::RosterForm;
use crate::dates::calculate_off_days;
use crate::model::{Nurse, NurseId};
use chrono::NaiveDate;

pub(super) fn toggle_off_date(form: &mut RosterForm, day: NaiveDate) -> bool {
    if !form.phase.is_editable() || !form.range.contains(day) {
        return false;
    }
    let dates = &mut form.draft.off_dates;
    match dates.iter().position(|d| *d == day) {
        Some(idx) => {
            dates.remove(idx);
        }
        None => dates.push(day),
    }
    true
}

pub(super) fn add_nurse(form: &mut RosterForm) -> Option<NurseId> {
    if !form.can_add_nurse() {
        return None;
    }
    let position = form.draft.position?;
    let start = form.range.from?;
    let off = calculate_off_days(Some(&form.draft.off_dates), Some(start));
    let nurse = Nurse::new(form.draft.name.trim(), position, off);
    let id = nurse.id.clone();
    form.nurses.push(nurse);
    form.draft.clear();
    Some(id)
}

pub(super) fn remove_nurse(form: &mut RosterForm, id: &NurseId) -> bool {
    if !form.phase.is_editable() {
        return false;
    }
    let before = form.nurses.len();
    form.nurses.retain(|n| &n.id != id);
    form.nurses.len() != before
}
