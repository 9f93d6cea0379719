use std::iter::successors;
use time::{Date, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) trait WeekdayExt {
    /// Column of the weekday in a Sunday-first week
    fn index0(&self) -> u16;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> u16 {
        self.number_days_from_sunday().into()
    }
}

/// Every date from `first` to the end of its month
pub(super) fn rest_of_month(first: Date) -> impl Iterator<Item = Date> {
    let month = first.month();
    successors(Some(first), |&d| d.next_day()).take_while(move |d| d.month() == month)
}

/// Shortens `s` to at most `width` characters, marking the cut with an
/// ellipsis
pub(crate) fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_owned()
    } else if width == 0 {
        String::new()
    } else {
        let mut out = s.chars().take(width - 1).collect::<String>();
        out.push('…');
        out
    }
}
