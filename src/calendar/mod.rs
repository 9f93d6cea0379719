mod grid;
mod util;
mod widget;
pub(crate) use self::grid::{DayCell, MonthGrid};
pub(crate) use self::util::fit;
pub(crate) use self::widget::MonthCalendar;
