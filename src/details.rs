use crate::event::Event;
use crate::theme::{eventlist::LINK_STYLE, form::LABEL_STYLE, BASE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

const OUTER_WIDTH: u16 = 60;

/// Modal showing everything known about one event
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct EventDetails<'a> {
    event: &'a Event,
}

impl<'a> EventDetails<'a> {
    pub(crate) fn new(event: &'a Event) -> Self {
        EventDetails { event }
    }

    fn to_text(self) -> Text<'static> {
        let ev = self.event;
        let mut lines = vec![
            Line::styled("Date", LABEL_STYLE),
            Line::raw(ev.long_date()),
            Line::raw(""),
            Line::styled("Location", LABEL_STYLE),
            Line::raw(ev.location.clone()),
        ];
        if !ev.description.is_empty() {
            lines.push(Line::raw(""));
            lines.push(Line::styled("Description", LABEL_STYLE));
            lines.extend(ev.description.lines().map(|s| Line::raw(s.to_owned())));
        }
        if ev.has_url() {
            lines.push(Line::raw(""));
            lines.push(Line::styled("Event Website", LABEL_STYLE));
            lines.push(Line::styled(ev.url.clone(), LINK_STYLE));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from("[ESC] Close").alignment(Alignment::Right));
        Text::from(lines)
    }
}

impl Widget for EventDetails<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.to_text();
        let width = OUTER_WIDTH.min(area.width);
        // Border and padding take two columns each side
        let wrap_width = usize::from(width.saturating_sub(4)).max(1);
        let body_lines = text
            .lines
            .iter()
            .map(|l| l.width().max(1).div_ceil(wrap_width))
            .sum::<usize>();
        let height = u16::try_from(body_lines)
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.height);
        let [outer_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [outer_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        let block = Block::bordered()
            .title(format!(" {} ", self.event.title))
            .title_alignment(Alignment::Center);
        let text_area = block.inner(block_area);
        block.render(block_area, buf);
        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .render(text_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Cell;
    use time::macros::{date, offset};

    fn render(ev: &Event) -> String {
        let area = Rect::new(0, 0, 80, 30);
        let mut buffer = Buffer::empty(area);
        EventDetails::new(ev).render(area, &mut buffer);
        buffer
            .content
            .chunks(80)
            .map(|row| row.iter().map(Cell::symbol).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_full_event() {
        let ev = Event::new(
            String::from("Regatta"),
            date!(2025 - 08 - 15),
            offset!(UTC),
            String::from("Lake Harbor"),
            String::from("Bring sunscreen\nand snacks"),
            String::from("https://example.com/regatta"),
        );
        let text = render(&ev);
        assert!(text.contains(" Regatta "));
        assert!(text.contains("Friday, August 15, 2025"));
        assert!(text.contains("Lake Harbor"));
        assert!(text.contains("Bring sunscreen"));
        assert!(text.contains("and snacks"));
        assert!(text.contains("https://example.com/regatta"));
        assert!(text.contains("[ESC] Close"));
    }

    #[test]
    fn test_optional_sections_hidden() {
        let ev = Event::new(
            String::from("Picnic"),
            date!(2025 - 06 - 07),
            offset!(UTC),
            String::from("Park"),
            String::new(),
            String::new(),
        );
        let text = render(&ev);
        assert!(text.contains("Location"));
        assert!(!text.contains("Description"));
        assert!(!text.contains("Event Website"));
    }
}
