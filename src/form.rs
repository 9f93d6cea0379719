use crate::event::{long_date, Event, YMD_FMT};
use crate::season::{YearMonth, FIRST_DAY, LAST_DAY};
use crate::theme::{
    form::{FIELD_ERROR_STYLE, FOCUSED_INPUT_STYLE, LABEL_STYLE, PLACEHOLDER_STYLE},
    BASE_STYLE, HINT_STYLE,
};
use crate::validate::{is_selectable, validate, DateEntry, EventDraft, Field, ValidationErrors};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};
use std::iter::successors;
use time::{Date, UtcOffset};

const OUTER_WIDTH: u16 = 64;

/// Longest text accepted in a single field
const MAX_FIELD_LEN: usize = 200;

const DATE_LEN: usize = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EventFormView;

impl StatefulWidget for EventFormView {
    type State = EventForm;

    /*
     * ..................................
     * .┌──────── Add New Event ───────┐.
     * .│Event Title                   │.
     * .│> Chicago Outdoor Festival    │.
     * .│                              │.
     * .│Date (Weekends Only)          │.
     * .│> 2025-06-07                  │.
     * .│  Saturday, June 7, 2025      │.
     * .│...                           │.
     * .│[ENTER] Add Event  [ESC] Cancel│.
     * .└──────────────────────────────┘.
     * ..................................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let text = state.to_text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.height);
        let width = OUTER_WIDTH.min(area.width);
        let [outer_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [outer_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        let title = match state.mode {
            FormMode::Add => " Add New Event ",
            #[cfg(test)]
            FormMode::Edit { .. } => " Edit Event ",
        };
        let block = Block::bordered()
            .title(title)
            .title_alignment(Alignment::Center);
        let text_area = block.inner(block_area);
        block.render(block_area, buf);
        Paragraph::new(text).render(text_area, buf);
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum FormMode {
    Add,
    /// Prefilled from an existing event whose id is kept on submit
    #[cfg(test)]
    Edit { id: String },
}

impl FormMode {
    fn stamp(&self, event: Event) -> Event {
        match self {
            FormMode::Add => event,
            #[cfg(test)]
            FormMode::Edit { id } => Event {
                id: id.clone(),
                ..event
            },
        }
    }
}

/// The add/edit event form
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct EventForm {
    mode: FormMode,
    title: String,
    date: String,
    location: String,
    description: String,
    url: String,
    focus: Field,
    /// Month the date picker starts from when the date field is blank
    anchor: YearMonth,
    offset: UtcOffset,
    errors: ValidationErrors,
}

impl EventForm {
    pub(crate) fn add(anchor: YearMonth, offset: UtcOffset) -> EventForm {
        EventForm {
            mode: FormMode::Add,
            title: String::new(),
            date: String::new(),
            location: String::new(),
            description: String::new(),
            url: String::new(),
            focus: Field::Title,
            anchor,
            offset,
            errors: ValidationErrors::default(),
        }
    }

    // There is no way to save an edit yet, so nothing opens the form in
    // this mode outside of tests.
    #[cfg(test)]
    pub(crate) fn edit(event: &Event, offset: UtcOffset) -> EventForm {
        let day = event.day();
        EventForm {
            mode: FormMode::Edit {
                id: event.id.clone(),
            },
            title: event.title.clone(),
            date: day.format(&YMD_FMT).unwrap_or_default(),
            location: event.location.clone(),
            description: event.description.clone(),
            url: event.url.clone(),
            focus: Field::Title,
            anchor: YearMonth::new(day.year(), day.month()),
            offset,
            errors: ValidationErrors::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Date => &self.date,
            Field::Location => &self.location,
            Field::Description => &self.description,
            Field::Url => &self.url,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Date => &mut self.date,
            Field::Location => &mut self.location,
            Field::Description => &mut self.description,
            Field::Url => &mut self.url,
        }
    }

    fn date_entry(&self) -> DateEntry {
        let s = self.date.trim();
        if s.is_empty() {
            DateEntry::Empty
        } else {
            match Date::parse(s, &YMD_FMT) {
                Ok(d) => DateEntry::Given(d),
                Err(_) => DateEntry::Unparseable,
            }
        }
    }

    fn draft(&self) -> EventDraft {
        EventDraft {
            title: self.title.clone(),
            date: self.date_entry(),
            location: self.location.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
        }
    }

    pub(crate) fn handle_input(&mut self, input: FormInput) -> FormOutput {
        match input {
            FormInput::NextField => {
                self.focus = shift_focus(self.focus, 1);
                FormOutput::Ok
            }
            FormInput::PrevField => {
                self.focus = shift_focus(self.focus, Field::ALL.len() - 1);
                FormOutput::Ok
            }
            FormInput::Char(c) => self.type_char(c),
            FormInput::Backspace => {
                if self.value_mut(self.focus).pop().is_some() {
                    FormOutput::Ok
                } else {
                    FormOutput::Invalid
                }
            }
            FormInput::PickLater => self.pick(true),
            FormInput::PickEarlier => self.pick(false),
            FormInput::Submit => self.submit(),
        }
    }

    fn type_char(&mut self, c: char) -> FormOutput {
        let focus = self.focus;
        let value = self.value_mut(focus);
        let accepted = if focus == Field::Date {
            (c.is_ascii_digit() || c == '-') && value.len() < DATE_LEN
        } else {
            !c.is_control() && value.chars().count() < MAX_FIELD_LEN
        };
        if accepted {
            value.push(c);
            FormOutput::Ok
        } else {
            FormOutput::Invalid
        }
    }

    // Moves the date to the nearest selectable date after (or before) the one
    // currently entered.  With nothing usable entered, the search starts at
    // the edge of the anchor month.
    fn pick(&mut self, later: bool) -> FormOutput {
        if self.focus != Field::Date {
            return FormOutput::Invalid;
        }
        let current = match self.date_entry() {
            DateEntry::Given(d) => Some(d),
            _ => None,
        };
        let found = if later {
            let start = current
                .and_then(Date::next_day)
                .or_else(|| self.anchor.first_day())
                .map(|d| d.max(FIRST_DAY));
            start.and_then(|s| {
                successors(Some(s), |d| d.next_day())
                    .take_while(|&d| d <= LAST_DAY)
                    .find(|&d| is_selectable(d))
            })
        } else {
            let start = current
                .and_then(Date::previous_day)
                .or_else(|| self.anchor.succ().first_day().and_then(Date::previous_day))
                .map(|d| d.min(LAST_DAY));
            start.and_then(|s| {
                successors(Some(s), |d| d.previous_day())
                    .take_while(|&d| d >= FIRST_DAY)
                    .find(|&d| is_selectable(d))
            })
        };
        match found.and_then(|d| d.format(&YMD_FMT).ok()) {
            Some(s) => {
                self.date = s;
                FormOutput::Ok
            }
            None => FormOutput::Invalid,
        }
    }

    fn submit(&mut self) -> FormOutput {
        match validate(&self.draft()) {
            Ok(valid) => {
                self.errors = ValidationErrors::default();
                FormOutput::Submit(self.mode.stamp(valid.into_event(self.offset)))
            }
            Err(errors) => {
                log::debug!("Event form rejected: {errors:?}");
                self.errors = errors;
                FormOutput::Rejected
            }
        }
    }

    fn to_text(&self) -> Text<'static> {
        let mut lines = Vec::new();
        for field in Field::ALL {
            let (label, placeholder) = match field {
                Field::Title => ("Event Title", "Chicago Outdoor Festival"),
                Field::Date => ("Date (Weekends Only)", "YYYY-MM-DD, or ←/→ to pick"),
                Field::Location => ("Location", "Millennium Park, Chicago"),
                Field::Description => ("Description", "Details about the event..."),
                Field::Url => (
                    "Event Website URL (Optional)",
                    "https://www.example.com/event",
                ),
            };
            lines.push(Line::styled(label, LABEL_STYLE));
            let focused = field == self.focus;
            let marker = Span::styled(if focused { "> " } else { "  " }, BASE_STYLE);
            let value = self.value(field);
            let body = if value.is_empty() {
                Span::styled(placeholder, PLACEHOLDER_STYLE)
            } else if focused {
                Span::styled(value.to_owned(), FOCUSED_INPUT_STYLE)
            } else {
                Span::styled(value.to_owned(), BASE_STYLE)
            };
            lines.push(Line::from(vec![marker, body]));
            if field == Field::Date {
                if let DateEntry::Given(d) = self.date_entry() {
                    lines.push(Line::styled(format!("  {}", long_date(d)), HINT_STYLE));
                }
            }
            for v in self.errors.for_field(field) {
                lines.push(Line::styled(format!("  {v}"), FIELD_ERROR_STYLE));
            }
            lines.push(Line::raw(""));
        }
        let verb = match self.mode {
            FormMode::Add => "Add Event",
            #[cfg(test)]
            FormMode::Edit { .. } => "Update Event",
        };
        lines.push(
            Line::from(format!("[ENTER] {verb}   [ESC] Cancel")).alignment(Alignment::Right),
        );
        Text::from(lines)
    }
}

fn shift_focus(focus: Field, by: usize) -> Field {
    let i = Field::ALL.iter().position(|&f| f == focus).unwrap_or(0);
    Field::ALL[(i + by) % Field::ALL.len()]
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FormInput {
    Char(char),
    Backspace,
    NextField,
    PrevField,
    PickLater,
    PickEarlier,
    Submit,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum FormOutput {
    Ok,
    Invalid,
    /// Submission failed validation; the errors are now shown on the form
    Rejected,
    Submit(Event),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::Violation;
    use ratatui::buffer::Cell;
    use time::macros::{date, offset};
    use time::Month;

    fn type_str(form: &mut EventForm, s: &str) {
        for c in s.chars() {
            assert_eq!(form.handle_input(FormInput::Char(c)), FormOutput::Ok);
        }
    }

    fn june_form() -> EventForm {
        EventForm::add(YearMonth::new(2025, Month::June), offset!(-5))
    }

    fn fill(form: &mut EventForm, title: &str, date: &str, location: &str) {
        type_str(form, title);
        form.handle_input(FormInput::NextField);
        type_str(form, date);
        form.handle_input(FormInput::NextField);
        type_str(form, location);
    }

    #[test]
    fn test_submit_valid() {
        let mut form = june_form();
        fill(&mut form, "Picnic", "2025-06-07", "Park");
        let FormOutput::Submit(event) = form.handle_input(FormInput::Submit) else {
            panic!("form should have submitted");
        };
        assert_eq!(event.title, "Picnic");
        assert_eq!(event.day(), date!(2025 - 06 - 07));
        assert_eq!(event.date.offset(), offset!(-5));
        assert_eq!(event.location, "Park");
        assert!(event.description.is_empty());
        assert!(event.url.is_empty());
    }

    #[test]
    fn test_submit_monday() {
        let mut form = june_form();
        fill(&mut form, "Picnic", "2025-06-09", "Park");
        assert_eq!(form.handle_input(FormInput::Submit), FormOutput::Rejected);
        assert_eq!(
            form.errors().for_field(Field::Date).collect::<Vec<_>>(),
            [Violation::WeekendOnly]
        );
    }

    #[test]
    fn test_submit_empty_shows_every_error() {
        let mut form = june_form();
        assert_eq!(form.handle_input(FormInput::Submit), FormOutput::Rejected);
        assert!(form.errors().contains(Violation::TitleRequired));
        assert!(form.errors().contains(Violation::DateRequired));
        assert!(form.errors().contains(Violation::LocationRequired));
        let text = form
            .to_text()
            .lines
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        assert!(text.contains(&String::from("  Title is required")));
        assert!(text.contains(&String::from("  Date is required")));
        assert!(text.contains(&String::from("  Location is required")));
    }

    #[test]
    fn test_date_field_filters_keys() {
        let mut form = june_form();
        form.handle_input(FormInput::NextField);
        assert_eq!(form.handle_input(FormInput::Char('x')), FormOutput::Invalid);
        type_str(&mut form, "2025-06-07");
        assert_eq!(form.handle_input(FormInput::Char('1')), FormOutput::Invalid);
        assert_eq!(form.date, "2025-06-07");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = june_form();
        form.handle_input(FormInput::PrevField);
        assert_eq!(form.focus, Field::Url);
        form.handle_input(FormInput::NextField);
        assert_eq!(form.focus, Field::Title);
    }

    #[test]
    fn test_picker_only_offers_selectable_dates() {
        let mut form = june_form();
        assert_eq!(form.handle_input(FormInput::PickLater), FormOutput::Invalid);
        form.handle_input(FormInput::NextField);
        let mut picked = Vec::new();
        for _ in 0..4 {
            assert_eq!(form.handle_input(FormInput::PickLater), FormOutput::Ok);
            picked.push(form.date.clone());
        }
        assert_eq!(
            picked,
            ["2025-06-01", "2025-06-06", "2025-06-07", "2025-06-08"]
        );
        assert_eq!(form.handle_input(FormInput::PickEarlier), FormOutput::Ok);
        assert_eq!(form.date, "2025-06-07");
    }

    #[test]
    fn test_picker_stops_at_season_edges() {
        let mut form = EventForm::add(YearMonth::new(2025, Month::October), offset!(UTC));
        form.handle_input(FormInput::NextField);
        type_str(&mut form, "2025-10-31");
        assert_eq!(form.handle_input(FormInput::PickLater), FormOutput::Invalid);
        assert_eq!(form.date, "2025-10-31");
        form.date = String::from("2025-05-02");
        assert_eq!(form.handle_input(FormInput::PickEarlier), FormOutput::Invalid);
        assert_eq!(form.date, "2025-05-02");
    }

    #[test]
    fn test_picker_backwards_from_blank_starts_at_month_end() {
        let mut form = june_form();
        form.handle_input(FormInput::NextField);
        assert_eq!(form.handle_input(FormInput::PickEarlier), FormOutput::Ok);
        assert_eq!(form.date, "2025-06-29");
    }

    #[test]
    fn test_edit_keeps_id() {
        let original = Event::new(
            String::from("Picnic"),
            date!(2025 - 06 - 07),
            offset!(-5),
            String::from("Park"),
            String::new(),
            String::new(),
        );
        let mut form = EventForm::edit(&original, offset!(-5));
        assert_eq!(form.date, "2025-06-07");
        type_str(&mut form, "!");
        let FormOutput::Submit(edited) = form.handle_input(FormInput::Submit) else {
            panic!("edit form should have submitted");
        };
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.title, "Picnic!");
    }

    #[test]
    fn test_render_titles() {
        let area = Rect::new(0, 0, 80, 40);
        let mut buffer = Buffer::empty(area);
        EventFormView.render(area, &mut buffer, &mut june_form());
        let text = buffer
            .content
            .chunks(80)
            .map(|row| row.iter().map(Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains(" Add New Event "));
        assert!(text.contains("Date (Weekends Only)"));
        assert!(text.contains("[ENTER] Add Event   [ESC] Cancel"));
    }
}
