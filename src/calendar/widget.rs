use super::grid::{DayCell, MonthGrid, WEEKS};
use super::util::{fit, DAYS_IN_WEEK};
use crate::theme::calendar::{
    BADGE_STYLE, DAY_STYLE, EVENT_DAY_STYLE, MORE_STYLE, SELECTED_BADGE_STYLE, TODAY_STYLE,
    WEEKDAY_STYLE, WEEKEND_HEADER_STYLE,
};
use crate::theme::BASE_STYLE;
use ratatui::{prelude::*, widgets::*};
use time::Date;

static WEEKDAYS: [&str; DAYS_IN_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of lines taken up by the weekday header and its rule
const HEADER_LINES: u16 = 2;

/// Narrowest a day column may be and still show "+9 more"
const MIN_DAY_WIDTH: u16 = 7;

/// Fewest lines per week: the day number plus one badge
const MIN_WEEK_LINES: u16 = 2;

const ACS_HLINE: char = '─';

// Grid dimensions as u16 for layout arithmetic
const COLUMNS: u16 = 7;
const ROWS: u16 = 6;

/// Draws a [`MonthGrid`] as a seven-column month page
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthCalendar<'a> {
    grid: &'a MonthGrid,
    today: Date,
    selected: Option<&'a str>,
}

impl<'a> MonthCalendar<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, today: Date) -> Self {
        MonthCalendar {
            grid,
            today,
            selected: None,
        }
    }

    /// Highlight the badge of the event with this id
    pub(crate) fn selected(mut self, id: Option<&'a str>) -> Self {
        self.selected = id;
        self
    }

    /// Whether `area` is large enough to hold the whole month
    pub(crate) fn fits(area: Rect) -> bool {
        area.width >= COLUMNS * MIN_DAY_WIDTH
            && area.height >= HEADER_LINES + ROWS * MIN_WEEK_LINES
    }
}

impl Widget for MonthCalendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !Self::fits(area) {
            Paragraph::new("Enlarge the terminal to see the calendar")
                .style(BASE_STYLE)
                .centered()
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        }
        debug_assert_eq!(usize::from(ROWS), WEEKS, "one row per grid week");
        let day_width = area.width / COLUMNS;
        let week_lines = (area.height - HEADER_LINES) / ROWS;
        let mut canvas = BufferCanvas::new(area, buf, day_width, week_lines);
        canvas.draw_header();
        for (row, week) in std::iter::zip(0u16.., self.grid.weeks()) {
            for (col, cell) in std::iter::zip(0u16.., week) {
                if let Some(cell) = cell {
                    canvas.draw_day(row, col, cell, cell.date == self.today, self.selected);
                }
            }
            canvas.draw_week_rule(row);
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    day_width: u16,
    week_lines: u16,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer, day_width: u16, week_lines: u16) -> Self {
        Self {
            area,
            buf,
            day_width,
            week_lines,
        }
    }

    fn draw_header(&mut self) {
        for (col, name) in std::iter::zip(0u16.., WEEKDAYS) {
            // Friday through Sunday are the days events can be booked on
            let style = if col == 0 || col >= 5 {
                WEEKEND_HEADER_STYLE
            } else {
                WEEKDAY_STYLE
            };
            let width = usize::from(self.day_width);
            self.mvprint(0, col * self.day_width, format!("{name:^width$}"), style);
        }
        self.hline(1, 0, self.day_width * COLUMNS);
    }

    fn draw_day(
        &mut self,
        row: u16,
        col: u16,
        cell: &DayCell,
        is_today: bool,
        selected: Option<&str>,
    ) {
        let y = HEADER_LINES + row * self.week_lines;
        let x = col * self.day_width;
        // Leave the last column of each day blank as a gutter
        let inner = usize::from(self.day_width - 1);
        let number = if is_today {
            format!("[{}]", cell.day())
        } else {
            cell.day().to_string()
        };
        let style = if is_today {
            TODAY_STYLE
        } else if cell.event_day {
            EVENT_DAY_STYLE
        } else {
            DAY_STYLE
        };
        self.mvprint(y, x, format!("{number:>inner$}"), style);
        // Lines below the day number; when they cannot hold every badge
        // plus the counter, the last one goes to the counter
        let room = usize::from(self.week_lines - 1 - u16::from(self.has_rule()));
        let visible = cell.visible_events();
        let needed = visible.len() + usize::from(cell.overflow() > 0);
        let shown = if needed <= room {
            visible.len()
        } else {
            room - 1
        };
        let mut line = 1;
        for ev in &visible[..shown] {
            let style = if selected == Some(ev.id.as_str()) {
                SELECTED_BADGE_STYLE
            } else {
                BADGE_STYLE
            };
            let title = fit(&ev.title, inner);
            self.mvprint(y + line, x, format!("{title:<inner$}"), style);
            line += 1;
        }
        let hidden = cell.events.len() - shown;
        if hidden > 0 {
            // The counter may run into the gutter
            let more = fit(&format!("+{hidden} more"), usize::from(self.day_width));
            self.mvprint(y + line, x, more, MORE_STYLE);
        }
    }

    // A light rule under each week, drawn only when there is a spare line
    // for it below the badges and the counter
    fn has_rule(&self) -> bool {
        self.week_lines > 4
    }

    fn draw_week_rule(&mut self, row: u16) {
        if self.has_rule() {
            let y = HEADER_LINES + (row + 1) * self.week_lines - 1;
            self.hline(y, 0, self.day_width * COLUMNS);
        }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, length: u16) {
        self.mvprint(
            y,
            x,
            String::from(ACS_HLINE).repeat(length.into()),
            BASE_STYLE,
        );
    }
}
