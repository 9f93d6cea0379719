use super::util::{rest_of_month, WeekdayExt, DAYS_IN_WEEK};
use crate::event::Event;
use crate::season::YearMonth;
use crate::validate::is_event_day;
use time::Date;

pub(crate) const WEEKS: usize = 6;

pub(crate) const CELLS: usize = WEEKS * DAYS_IN_WEEK;

/// Most event titles a single day shows before collapsing the rest into a
/// "+N more" counter
pub(crate) const MAX_BADGES: usize = 2;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    /// Friday, Saturday, or Sunday
    pub(crate) event_day: bool,
    pub(crate) events: Vec<Event>,
}

impl DayCell {
    pub(crate) fn day(&self) -> u8 {
        self.date.day()
    }

    pub(crate) fn visible_events(&self) -> &[Event] {
        &self.events[..self.events.len().min(MAX_BADGES)]
    }

    pub(crate) fn overflow(&self) -> usize {
        self.events.len().saturating_sub(MAX_BADGES)
    }
}

/// Six Sunday-first weeks covering one month.  Cells outside the month are
/// `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    month: YearMonth,
    cells: Vec<Option<DayCell>>,
}

impl MonthGrid {
    pub(crate) fn build(month: YearMonth, events: &[Event]) -> MonthGrid {
        let mut cells = vec![None; CELLS];
        if let Some(first) = month.first_day() {
            let start = usize::from(first.weekday().index0());
            for (slot, date) in cells[start..].iter_mut().zip(rest_of_month(first)) {
                *slot = Some(DayCell {
                    date,
                    event_day: is_event_day(date.weekday()),
                    events: events
                        .iter()
                        .filter(|ev| ev.day() == date)
                        .cloned()
                        .collect(),
                });
            }
        }
        MonthGrid { month, cells }
    }

    pub(crate) fn month(&self) -> YearMonth {
        self.month
    }

    pub(crate) fn cells(&self) -> &[Option<DayCell>] {
        &self.cells
    }

    pub(crate) fn weeks(&self) -> impl Iterator<Item = &[Option<DayCell>]> + '_ {
        self.cells.chunks(DAYS_IN_WEEK)
    }

    #[cfg(test)]
    pub(crate) fn day(&self, day: u8) -> Option<&DayCell> {
        self.cells.iter().flatten().find(|c| c.day() == day)
    }
}
