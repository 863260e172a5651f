use crate::dates::{dates_in_range, format_date, format_display_date};
use crate::form::RosterForm;
use crate::model::{ScheduleResponseItem, Shift};
use chrono::NaiveDate;

pub const NURSE_HEADER: &str = "간호사";
pub const MISSING_CELL: &str = "-";
pub const EMPTY_SCHEDULE_TEXT: &str = "생성된 근무표가 없습니다.";
pub const WEEK_LEN: usize = 7;

/// Lignes du tableau : noms du premier jour s'il en a, sinon l'équipe envoyée.
pub fn table_nurse_names(response: &[ScheduleResponseItem], submitted: &[String]) -> Vec<String> {
    let Some(first) = response.first() else {
        return Vec::new();
    };
    if !first.nurses.is_empty() {
        return first.nurses.keys().cloned().collect();
    }
    submitted.to_vec()
}

/// Tableau infirmière × jour construit à partir de la réponse du service.
#[derive(Debug, Clone)]
pub struct ScheduleGrid<'a> {
    response: &'a [ScheduleResponseItem],
    nurses: Vec<String>,
    dates: Vec<NaiveDate>,
    start: NaiveDate,
    end: NaiveDate,
}

impl<'a> ScheduleGrid<'a> {
    pub fn new(
        response: &'a [ScheduleResponseItem],
        nurses: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            response,
            nurses,
            dates: dates_in_range(start, end),
            start,
            end,
        }
    }

    /// Grille du résultat affiché par le formulaire, si il y en a un.
    pub fn from_form(form: &'a RosterForm) -> Option<Self> {
        let response = form.result()?;
        let (start, end) = form.range().bounds()?;
        Some(Self::new(response, form.table_nurse_names(), start, end))
    }

    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }
    pub fn nurses(&self) -> &[String] {
        &self.nurses
    }
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }
    pub fn start(&self) -> NaiveDate {
        self.start
    }
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Correspondance exacte sur la date (`YYYY-MM-DD`) puis sur le nom.
    pub fn shift(&self, nurse: &str, date: NaiveDate) -> Option<Shift> {
        let key = format_date(Some(date));
        self.response
            .iter()
            .find(|day| day.date == key)
            .and_then(|day| day.nurses.get(nurse))
            .copied()
    }

    pub fn cell(&self, nurse: &str, date: NaiveDate) -> &'static str {
        self.shift(nurse, date)
            .map(Shift::abbreviation)
            .unwrap_or(MISSING_CELL)
    }

    pub fn weeks(&self) -> std::slice::Chunks<'_, NaiveDate> {
        self.dates.chunks(WEEK_LEN)
    }

    /// En-tête des exports : `간호사` puis les dates d'affichage.
    pub fn header(&self) -> Vec<String> {
        std::iter::once(NURSE_HEADER.to_string())
            .chain(self.dates.iter().map(|d| format_display_date(Some(*d))))
            .collect()
    }

    /// Lignes des exports ; une case sans affectation reste vide.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.nurses
            .iter()
            .map(|nurse| {
                std::iter::once(nurse.clone())
                    .chain(self.dates.iter().map(|d| {
                        self.shift(nurse, *d)
                            .map(|s| s.abbreviation().to_string())
                            .unwrap_or_default()
                    }))
                    .collect()
            })
            .collect()
    }

    /// Rendu texte par blocs de 7 jours.
    pub fn render_text(&self) -> String {
        if self.is_empty() {
            return format!("{EMPTY_SCHEDULE_TEXT}\n");
        }
        let mut blocks = Vec::new();
        for week in self.weeks() {
            let mut lines = Vec::with_capacity(self.nurses.len() + 1);
            let header: Vec<String> = std::iter::once(NURSE_HEADER.to_string())
                .chain(week.iter().map(|d| format_display_date(Some(*d))))
                .collect();
            lines.push(header.join(" | "));
            for nurse in &self.nurses {
                let row: Vec<&str> = std::iter::once(nurse.as_str())
                    .chain(week.iter().map(|d| self.cell(nurse, *d)))
                    .collect();
                lines.push(row.join(" | "));
            }
            blocks.push(lines.join("\n"));
        }
        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}
