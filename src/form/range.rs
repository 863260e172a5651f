use super::RosterForm;
use crate::model::DateRange;
use chrono::NaiveDate;

pub(super) fn set_range(form: &mut RosterForm, from: NaiveDate, to: NaiveDate) -> bool {
    if !range_editable(form) || to < from {
        return false;
    }
    apply(form, DateRange::new(from, to));
    true
}

/// Clic dans un calendrier en mode plage.
pub(super) fn select_date(form: &mut RosterForm, day: NaiveDate) -> bool {
    if !range_editable(form) {
        return false;
    }
    let next = match (form.range.from, form.range.to) {
        (Some(from), None) if day >= from => DateRange::new(from, day),
        (Some(from), None) => DateRange::new(day, from),
        _ => DateRange {
            from: Some(day),
            to: None,
        },
    };
    apply(form, next);
    true
}

fn range_editable(form: &RosterForm) -> bool {
    form.phase.is_editable() && !form.is_range_locked()
}

fn apply(form: &mut RosterForm, range: DateRange) {
    form.range = range;
    form.draft.off_dates.retain(|d| range.contains(*d));
}
