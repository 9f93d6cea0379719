use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = Style::new()
    .fg(Color::LightGreen)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const TAGLINE_STYLE: Style = BASE_STYLE
    .fg(Color::Gray)
    .add_modifier(Modifier::ITALIC);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const DISABLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const INFO_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Green);

pub(crate) const ERROR_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Red)
    .add_modifier(Modifier::BOLD);

pub(crate) mod calendar {
    use super::*;

    pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const WEEKEND_HEADER_STYLE: Style = WEEKDAY_STYLE.fg(Color::LightGreen);

    pub(crate) const DAY_STYLE: Style = BASE_STYLE;

    pub(crate) const EVENT_DAY_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

    pub(crate) const TODAY_STYLE: Style = BASE_STYLE
        .fg(Color::LightYellow)
        .add_modifier(Modifier::BOLD);

    pub(crate) const BADGE_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Green);

    pub(crate) const SELECTED_BADGE_STYLE: Style = BADGE_STYLE
        .bg(Color::LightGreen)
        .add_modifier(Modifier::BOLD);

    pub(crate) const MORE_STYLE: Style = BASE_STYLE.fg(Color::Gray);
}

pub(crate) mod eventlist {
    use super::*;

    pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const SELECTED_TITLE_STYLE: Style = TITLE_STYLE.add_modifier(Modifier::REVERSED);

    pub(crate) const DATE_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const LINK_STYLE: Style = BASE_STYLE
        .fg(Color::LightGreen)
        .add_modifier(Modifier::UNDERLINED);

    pub(crate) const EMPTY_STYLE: Style = BASE_STYLE.fg(Color::Gray);
}

pub(crate) mod form {
    use super::*;

    pub(crate) const LABEL_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const FOCUSED_INPUT_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const FIELD_ERROR_STYLE: Style = BASE_STYLE.fg(Color::LightRed);
}
