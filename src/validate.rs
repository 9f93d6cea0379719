use crate::event::Event;
use crate::season::in_season;
use thiserror::Error;
use time::{Date, UtcOffset, Weekday};

/// The fields of the event form, in display order
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Field {
    Title,
    Date,
    Location,
    Description,
    Url,
}

impl Field {
    pub(crate) const ALL: [Field; 5] = [
        Field::Title,
        Field::Date,
        Field::Location,
        Field::Description,
        Field::Url,
    ];
}

#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub(crate) enum Violation {
    #[error("Title is required")]
    TitleRequired,
    #[error("Date is required")]
    DateRequired,
    #[error("Date must be written as YYYY-MM-DD")]
    DateUnparseable,
    #[error("Only Friday, Saturday, or Sunday events are allowed")]
    WeekendOnly,
    #[error("Date must be between May and October 2025")]
    OutOfSeason,
    #[error("Location is required")]
    LocationRequired,
    #[error("URL must start with http:// or https://")]
    UrlScheme,
}

impl Violation {
    pub(crate) fn field(self) -> Field {
        match self {
            Violation::TitleRequired => Field::Title,
            Violation::DateRequired
            | Violation::DateUnparseable
            | Violation::WeekendOnly
            | Violation::OutOfSeason => Field::Date,
            Violation::LocationRequired => Field::Location,
            Violation::UrlScheme => Field::Url,
        }
    }
}

/// Every rule a draft broke, in the order the rules are checked
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    #[cfg(test)]
    pub(crate) fn contains(&self, v: Violation) -> bool {
        self.0.contains(&v)
    }

    pub(crate) fn for_field(&self, field: Field) -> impl Iterator<Item = Violation> + '_ {
        self.0.iter().copied().filter(move |v| v.field() == field)
    }

    #[cfg(test)]
    pub(crate) fn as_slice(&self) -> &[Violation] {
        &self.0
    }
}

/// What the user typed into the date field
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DateEntry {
    Empty,
    Unparseable,
    Given(Date),
}

/// Raw form input, not yet checked
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventDraft {
    pub(crate) title: String,
    pub(crate) date: DateEntry,
    pub(crate) location: String,
    pub(crate) description: String,
    pub(crate) url: String,
}

/// A draft that passed every rule.  Text fields are trimmed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ValidEvent {
    pub(crate) title: String,
    pub(crate) date: Date,
    pub(crate) location: String,
    pub(crate) description: String,
    pub(crate) url: String,
}

impl ValidEvent {
    pub(crate) fn into_event(self, offset: UtcOffset) -> Event {
        Event::new(
            self.title,
            self.date,
            offset,
            self.location,
            self.description,
            self.url,
        )
    }
}

/// Fridays, Saturdays, and Sundays are the only days events may fall on
pub(crate) fn is_event_day(wd: Weekday) -> bool {
    matches!(wd, Weekday::Friday | Weekday::Saturday | Weekday::Sunday)
}

/// The rules a concrete date breaks.  Both can apply at once.
pub(crate) fn check_date(date: Date) -> Vec<Violation> {
    let mut violations = Vec::new();
    if !is_event_day(date.weekday()) {
        violations.push(Violation::WeekendOnly);
    }
    if !in_season(date) {
        violations.push(Violation::OutOfSeason);
    }
    violations
}

/// Whether the date picker offers `date` at all
pub(crate) fn is_selectable(date: Date) -> bool {
    is_event_day(date.weekday()) && in_season(date)
}

pub(crate) fn validate(draft: &EventDraft) -> Result<ValidEvent, ValidationErrors> {
    let mut violations = Vec::new();
    let title = draft.title.trim();
    if title.is_empty() {
        violations.push(Violation::TitleRequired);
    }
    match draft.date {
        DateEntry::Empty => violations.push(Violation::DateRequired),
        DateEntry::Unparseable => violations.push(Violation::DateUnparseable),
        DateEntry::Given(date) => violations.extend(check_date(date)),
    }
    let location = draft.location.trim();
    if location.is_empty() {
        violations.push(Violation::LocationRequired);
    }
    let url = draft.url.trim();
    if !url.is_empty() && !url.starts_with("http") {
        violations.push(Violation::UrlScheme);
    }
    match draft.date {
        DateEntry::Given(date) if violations.is_empty() => Ok(ValidEvent {
            title: title.to_owned(),
            date,
            location: location.to_owned(),
            description: draft.description.trim().to_owned(),
            url: url.to_owned(),
        }),
        _ => Err(ValidationErrors(violations)),
    }
}
