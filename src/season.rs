use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use time::{
    format_description::BorrowedFormatItem,
    macros::{date, format_description},
    parsing::Parsed,
    Date, Month,
};

/// First day on which events may take place
pub(crate) const FIRST_DAY: Date = date!(2025 - 05 - 01);

/// Last day on which events may take place
pub(crate) const LAST_DAY: Date = date!(2025 - 10 - 31);

static YM_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]");

pub(crate) const FIRST_MONTH: YearMonth = YearMonth::new(2025, Month::May);

pub(crate) const LAST_MONTH: YearMonth = YearMonth::new(2025, Month::October);

pub(crate) fn in_season(date: Date) -> bool {
    (FIRST_DAY..=LAST_DAY).contains(&date)
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub(crate) const fn new(year: i32, month: Month) -> YearMonth {
        YearMonth { year, month }
    }

    pub(crate) fn month(self) -> Month {
        self.month
    }

    /// Returns `None` if the year is beyond what `time` can represent
    pub(crate) fn first_day(self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, 1).ok()
    }

    pub(crate) fn contains(self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub(crate) fn succ(self) -> YearMonth {
        match self.month {
            Month::December => YearMonth::new(self.year + 1, Month::January),
            m => YearMonth::new(self.year, m.next()),
        }
    }

    pub(crate) fn pred(self) -> YearMonth {
        match self.month {
            Month::January => YearMonth::new(self.year - 1, Month::December),
            m => YearMonth::new(self.year, m.previous()),
        }
    }

    fn key(self) -> (i32, u8) {
        (self.year, u8::from(self.month))
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &YearMonth) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &YearMonth) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

impl std::str::FromStr for YearMonth {
    type Err = ParseYearMonthError;

    /// Parses `YYYY-MM`
    fn from_str(s: &str) -> Result<YearMonth, ParseYearMonthError> {
        let mut parsed = Parsed::new();
        let rest = parsed
            .parse_items(s.as_bytes(), YM_FMT)
            .map_err(|_| ParseYearMonthError)?;
        match (rest, parsed.year(), parsed.month()) {
            ([], Some(year), Some(month)) => Ok(YearMonth::new(year, month)),
            _ => Err(ParseYearMonthError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("expected a month of the form YYYY-MM")]
pub(crate) struct ParseYearMonthError;

/// The month currently on display, confined to the season
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Season {
    current: YearMonth,
}

impl Season {
    pub(crate) fn new() -> Season {
        Season {
            current: FIRST_MONTH,
        }
    }

    /// Starts at `ym`, or at the nearest end of the season if `ym` lies
    /// outside it
    pub(crate) fn starting_at(ym: YearMonth) -> Season {
        Season {
            current: ym.clamp(FIRST_MONTH, LAST_MONTH),
        }
    }

    pub(crate) fn current(&self) -> YearMonth {
        self.current
    }

    pub(crate) fn at_start(&self) -> bool {
        self.current <= FIRST_MONTH
    }

    pub(crate) fn at_end(&self) -> bool {
        self.current >= LAST_MONTH
    }

    /// Returns `false` if already showing the last month
    pub(crate) fn next(&mut self) -> bool {
        if self.at_end() {
            false
        } else {
            self.current = self.current.succ();
            true
        }
    }

    /// Returns `false` if already showing the first month
    pub(crate) fn prev(&mut self) -> bool {
        if self.at_start() {
            false
        } else {
            self.current = self.current.pred();
            true
        }
    }
}

impl Default for Season {
    fn default() -> Season {
        Season::new()
    }
}
