use crate::event::Event;
use crate::theme::eventlist::{
    DATE_STYLE, EMPTY_STYLE, LINK_STYLE, SELECTED_TITLE_STYLE, TITLE_STYLE,
};
use crate::theme::BASE_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Text},
    widgets::{Block, Paragraph, Widget, Wrap},
};
use time::Month;

/// The side panel listing one month's events, earliest first
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EventList<'a> {
    month: Month,
    events: &'a [&'a Event],
    selected: Option<usize>,
}

impl<'a> EventList<'a> {
    pub(crate) fn new(month: Month, events: &'a [&'a Event]) -> Self {
        EventList {
            month,
            events,
            selected: None,
        }
    }

    pub(crate) fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    // Returns the lines to draw along with the range of lines occupied by the
    // selected entry
    fn to_lines(self) -> (Vec<Line<'static>>, Option<(usize, usize)>) {
        if self.events.is_empty() {
            return (
                vec![
                    Line::raw(""),
                    Line::styled("No events for this month yet.", EMPTY_STYLE),
                    Line::raw(""),
                    Line::styled("Press a to create one!", EMPTY_STYLE),
                ],
                None,
            );
        }
        let mut lines = Vec::new();
        let mut span = None;
        for (i, ev) in self.events.iter().enumerate() {
            let start = lines.len();
            let style = if self.selected == Some(i) {
                SELECTED_TITLE_STYLE
            } else {
                TITLE_STYLE
            };
            lines.push(Line::styled(ev.title.clone(), style));
            lines.push(Line::styled(ev.long_date(), DATE_STYLE));
            lines.push(Line::styled(ev.location.clone(), BASE_STYLE));
            if ev.has_url() {
                lines.push(Line::styled("Visit event website", LINK_STYLE));
            }
            if self.selected == Some(i) {
                span = Some((start, lines.len()));
            }
            lines.push(Line::raw(""));
        }
        (lines, span)
    }
}

impl Widget for EventList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(format!(" Events for {} ", self.month))
            .style(BASE_STYLE);
        let inner = block.inner(area);
        block.render(area, buf);
        let (lines, span) = self.to_lines();
        // Rows taken up by the first `n` lines once wrapped to the panel
        let rows = |n: usize| {
            Paragraph::new(Text::from(lines[..n].to_vec()))
                .wrap(Wrap { trim: false })
                .line_count(inner.width)
        };
        // Scroll just far enough that the selected entry is fully visible,
        // or at least its title if it is taller than the panel
        let scroll = match span {
            Some((start, end)) => rows(end)
                .saturating_sub(usize::from(inner.height))
                .min(rows(start)),
            None => 0,
        };
        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Cell;
    use time::macros::{date, offset};

    fn event(title: &str, day: time::Date, url: &str) -> Event {
        Event::new(
            title.to_owned(),
            day,
            offset!(UTC),
            String::from("Millennium Park"),
            String::new(),
            url.to_owned(),
        )
    }

    fn render(list: EventList<'_>, width: u16, height: u16) -> Vec<String> {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        list.render(area, &mut buffer);
        buffer
            .content
            .chunks(usize::from(width))
            .map(|row| {
                row.iter()
                    .map(Cell::symbol)
                    .collect::<String>()
                    .trim_end()
                    .to_owned()
            })
            .collect()
    }

    #[test]
    fn test_empty_state() {
        let lines = render(EventList::new(Month::June, &[]), 36, 8);
        assert_eq!(lines[0], "┌ Events for June ─────────────────┐");
        assert_eq!(lines[2], "│No events for this month yet.     │");
        assert_eq!(lines[4], "│Press a to create one!            │");
    }

    #[test]
    fn test_entries() {
        let picnic = event("Picnic", date!(2025 - 06 - 07), "");
        let fair = event("Street Fair", date!(2025 - 06 - 13), "https://example.com");
        let events = [&picnic, &fair];
        let lines = render(EventList::new(Month::June, &events), 36, 12);
        let body = lines
            .iter()
            .map(|l| l.trim_start_matches('│').trim_end_matches('│').trim_end())
            .collect::<Vec<_>>();
        assert_eq!(
            body[1..10],
            [
                "Picnic",
                "Saturday, June 7, 2025",
                "Millennium Park",
                "",
                "Street Fair",
                "Friday, June 13, 2025",
                "Millennium Park",
                "Visit event website",
                "",
            ]
        );
    }

    #[test]
    fn test_scrolls_to_selection() {
        let events = (0..5)
            .map(|i| event(&format!("Event {i}"), date!(2025 - 06 - 06), ""))
            .collect::<Vec<_>>();
        let refs = events.iter().collect::<Vec<_>>();
        let lines = render(
            EventList::new(Month::June, &refs).selected(Some(4)),
            36,
            8,
        );
        let text = lines.join("\n");
        assert!(text.contains("Event 4"));
        assert!(!text.contains("Event 0"));
    }

    #[test]
    fn test_scrolls_past_wrapped_entries() {
        let events = (0..4)
            .map(|i| {
                Event::new(
                    format!("Event {i} at the Lakeside Summer Family Festival"),
                    date!(2025 - 06 - 06),
                    offset!(UTC),
                    String::from("Millennium Park, Chicago, Illinois"),
                    String::new(),
                    String::new(),
                )
            })
            .collect::<Vec<_>>();
        let refs = events.iter().collect::<Vec<_>>();
        let lines = render(
            EventList::new(Month::June, &refs).selected(Some(3)),
            26,
            14,
        );
        let text = lines.join("\n");
        assert!(text.contains("Event 3"));
        assert!(text.contains("Millennium Park,"));
        assert!(!text.contains("Event 0"));
    }
}
