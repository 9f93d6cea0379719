use crate::calendar::{MonthCalendar, MonthGrid};
use crate::details::EventDetails;
use crate::event::Event;
use crate::eventlist::EventList;
use crate::export::{ExportError, ExportJob, Exporter, PrintSnapshot};
use crate::form::{EventForm, EventFormView, FormInput, FormOutput};
use crate::help::Help;
use crate::season::Season;
use crate::storage::Storage;
use crate::store::{EventStore, LoadWarning};
use crate::theme::{
    BASE_STYLE, DISABLED_STYLE, HINT_STYLE, MONTH_STYLE, TAGLINE_STYLE, TITLE_STYLE,
};
use crate::toast::Toast;
use crossterm::event::{poll, read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use time::{Date, UtcOffset};

/// How long to wait for a key before checking on background work
const TICK: Duration = Duration::from_millis(250);

const TITLE: &str = "Sassowitz Family Adventures";

const TAGLINE: &str = "Made with love for Mother's Day 2025";

const KEY_HINTS: &str = " a Add event   j/k Select   ENTER Details   d Delete   p Export PDF   ? Help   q Quit";

#[derive(Debug)]
pub(crate) struct App<S> {
    store: EventStore<S>,
    season: Season,
    exporter: Exporter,
    today: Date,
    offset: UtcOffset,
    /// Index into the displayed month's events
    selected: Option<usize>,
    state: AppState,
    toast: Option<Toast>,
    export_job: Option<ExportJob>,
    /// The month grid as last drawn, if the calendar fit on screen
    rendered: Option<MonthGrid>,
}

impl<S: Storage> App<S> {
    pub(crate) fn new(
        store: EventStore<S>,
        season: Season,
        exporter: Exporter,
        today: Date,
        offset: UtcOffset,
    ) -> App<S> {
        App {
            store,
            season,
            exporter,
            today,
            offset,
            selected: None,
            state: AppState::Calendar,
            toast: None,
            export_job: None,
            rendered: None,
        }
    }

    /// Shows a problem found while loading saved events
    pub(crate) fn load_warning(mut self, warning: Option<LoadWarning>) -> App<S> {
        if let Some(w) = warning {
            self.toast = Some(Toast::error(w.to_string(), describe_source(&w)));
        }
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if poll(TICK)? {
            if let Some(KeyEvent {
                code, modifiers, ..
            }) = read()?.as_key_press_event()
            {
                if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                    self.state = AppState::Quitting;
                } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                    self.beep()?;
                }
            }
            // else: Redraw on resize, and we might as well redraw on other
            // stuff too
        }
        self.tick(Instant::now());
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.prev_month(),
                KeyCode::Char('l') | KeyCode::Right => self.next_month(),
                KeyCode::Char('j') | KeyCode::Down => self.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
                KeyCode::Enter => self.show_details(),
                KeyCode::Char('a') => {
                    let form = EventForm::add(self.season.current(), self.offset);
                    self.state = AppState::Form(Box::new(form));
                    true
                }
                KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
                KeyCode::Char('p') => self.start_export(),
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Details(_) => {
                if matches!(key, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    false
                }
            }
            AppState::Form(form) => {
                let input = match key {
                    KeyCode::Esc => {
                        self.state = AppState::Calendar;
                        return true;
                    }
                    KeyCode::Char(c) => FormInput::Char(c),
                    KeyCode::Backspace => FormInput::Backspace,
                    KeyCode::Tab | KeyCode::Down => FormInput::NextField,
                    KeyCode::BackTab | KeyCode::Up => FormInput::PrevField,
                    KeyCode::Right => FormInput::PickLater,
                    KeyCode::Left => FormInput::PickEarlier,
                    KeyCode::Enter => FormInput::Submit,
                    _ => return false,
                };
                match form.handle_input(input) {
                    FormOutput::Ok => true,
                    FormOutput::Invalid | FormOutput::Rejected => false,
                    FormOutput::Submit(event) => self.add_event(event),
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        matches!(self.state, AppState::Quitting)
    }

    /// Collects a finished export and clears expired notifications
    fn tick(&mut self, now: Instant) {
        if let Some(outcome) = self.export_job.as_mut().and_then(ExportJob::poll) {
            self.export_job = None;
            self.finish_export(outcome);
        }
        if self.toast.as_ref().is_some_and(|t| t.expired(now)) {
            self.toast = None;
        }
    }

    fn month_events(&self) -> Vec<&Event> {
        self.store.events_in_month(self.season.current())
    }

    fn selected_event(&self) -> Option<&Event> {
        let i = self.selected?;
        self.month_events().get(i).copied()
    }

    fn prev_month(&mut self) -> bool {
        let moved = self.season.prev();
        if moved {
            self.selected = None;
            log::debug!("Showing {}", self.season.current());
        }
        moved
    }

    fn next_month(&mut self) -> bool {
        let moved = self.season.next();
        if moved {
            self.selected = None;
            log::debug!("Showing {}", self.season.current());
        }
        moved
    }

    fn select_next(&mut self) -> bool {
        let count = self.month_events().len();
        let next = match self.selected {
            None if count > 0 => 0,
            Some(i) if i + 1 < count => i + 1,
            _ => return false,
        };
        self.selected = Some(next);
        true
    }

    fn select_prev(&mut self) -> bool {
        match self.selected {
            Some(i) if i > 0 => {
                self.selected = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    fn show_details(&mut self) -> bool {
        match self.selected_event().cloned() {
            Some(ev) => {
                self.state = AppState::Details(Box::new(ev));
                true
            }
            None => false,
        }
    }

    fn add_event(&mut self, event: Event) -> bool {
        let title = event.title.clone();
        match self.store.add(event) {
            Ok(()) => {
                self.state = AppState::Calendar;
                self.toast = Some(Toast::info(
                    "Event Added",
                    format!("{title} has been added to your calendar."),
                ));
                true
            }
            Err(e) => {
                log::error!("Failed to add event {title:?}: {e}");
                // Keep the form open so nothing typed is lost
                self.toast = Some(Toast::error(
                    "Event could not be saved",
                    describe_chain(&e),
                ));
                false
            }
        }
    }

    fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_event().map(|ev| ev.id.clone()) else {
            return false;
        };
        match self.store.remove(&id) {
            Ok(_) => {
                let remaining = self.month_events().len();
                self.selected = self
                    .selected
                    .filter(|_| remaining > 0)
                    .map(|i| i.min(remaining - 1));
                self.toast = Some(Toast::info(
                    "Event Removed",
                    "The event has been removed from your calendar.",
                ));
                true
            }
            Err(e) => {
                log::error!("Failed to remove event {id}: {e}");
                self.toast = Some(Toast::error(
                    "Event could not be removed",
                    describe_chain(&e),
                ));
                false
            }
        }
    }

    /// The month as last drawn, detached from the live state
    fn snapshot(&self) -> Option<PrintSnapshot> {
        let grid = self.rendered.as_ref()?;
        let events = self
            .store
            .events_in_month(grid.month())
            .into_iter()
            .cloned()
            .collect();
        Some(PrintSnapshot::new(grid.clone(), events))
    }

    fn start_export(&mut self) -> bool {
        if self.export_job.is_some() {
            self.toast = Some(Toast::error(
                "Export already in progress",
                "Wait for the current export to finish",
            ));
            return false;
        }
        log::info!(
            "Exporting {} to {}",
            self.season.current(),
            self.exporter.dir().display()
        );
        self.export_job = Some(self.exporter.spawn(self.snapshot(), self.today));
        self.toast = Some(Toast::info("Exporting PDF", ""));
        true
    }

    fn finish_export(&mut self, outcome: Result<PathBuf, ExportError>) {
        self.toast = Some(match outcome {
            Ok(path) => Toast::info(
                "PDF exported successfully",
                format!("Your calendar has been exported to {}", path.display()),
            ),
            Err(e) => {
                log::error!("PDF export failed: {}", describe_chain(&e));
                Toast::error("PDF export failed", describe_chain(&e))
            }
        });
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let [title_area, tagline_area, _, month_area] =
            Layout::vertical([Constraint::Length(1); 4]).areas(area);
        Line::styled(TITLE, TITLE_STYLE)
            .centered()
            .render(title_area, buf);
        Line::styled(TAGLINE, TAGLINE_STYLE)
            .centered()
            .render(tagline_area, buf);
        let prev_style = if self.season.at_start() {
            DISABLED_STYLE
        } else {
            HINT_STYLE
        };
        let next_style = if self.season.at_end() {
            DISABLED_STYLE
        } else {
            HINT_STYLE
        };
        Line::from(vec![
            Span::styled("◀ h", prev_style),
            Span::raw("   "),
            Span::styled(self.season.current().to_string(), MONTH_STYLE),
            Span::raw("   "),
            Span::styled("l ▶", next_style),
        ])
        .centered()
        .render(month_area, buf);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        match self.toast {
            Some(ref toast) => toast.render(area, buf),
            None => Line::styled(KEY_HINTS, HINT_STYLE).render(area, buf),
        }
    }
}

impl<S: Storage> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [header_area, _, body_area, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);
        self.render_header(header_area, buf);

        let [cal_area, list_area] =
            Layout::horizontal([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)])
                .areas(body_area);
        let ym = self.season.current();
        let grid = MonthGrid::build(ym, self.store.events());
        let block = Block::bordered();
        let grid_area = block.inner(cal_area);
        block.render(cal_area, buf);
        let events = self.month_events();
        let selected = self
            .selected
            .and_then(|i| events.get(i))
            .map(|ev| ev.id.as_str());
        MonthCalendar::new(&grid, self.today)
            .selected(selected)
            .render(grid_area, buf);
        EventList::new(ym.month(), &events)
            .selected(self.selected)
            .render(list_area, buf);
        let fits = MonthCalendar::fits(grid_area);
        self.rendered = fits.then_some(grid);

        self.render_status(status_area, buf);
        match self.state {
            AppState::Helping => Help.render(area, buf),
            AppState::Details(ref ev) => EventDetails::new(ev).render(area, buf),
            AppState::Form(ref mut form) => EventFormView.render(area, buf, form),
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Details(Box<Event>),
    Form(Box<EventForm>),
    Quitting,
}

/// An error's message followed by those of its causes
fn describe_chain(e: &dyn std::error::Error) -> String {
    let mut s = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        s.push_str(": ");
        s.push_str(&cause.to_string());
        source = cause.source();
    }
    s
}

/// The causes of an error, without its own message
fn describe_source(e: &dyn std::error::Error) -> String {
    e.source().map(describe_chain).unwrap_or_default()
}
