use super::{ExportOptions, PrintSnapshot};
use crate::calendar::{fit, DayCell};
use crate::event::Event;

pub(super) const TITLE: &str = "Sassowitz Family Adventures";

static WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Smallest factor the event list's fonts may be shrunk by to fit the page
const MIN_LIST_FIT: f32 = 0.7;

/// Share of the content width given to the month grid
const GRID_SHARE: f32 = 0.68;

// Average Helvetica glyph widths as a fraction of the font size
const REGULAR_ADVANCE: f32 = 0.52;
const BOLD_ADVANCE: f32 = 0.58;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rgb(pub(crate) f32, pub(crate) f32, pub(crate) f32);

const ACCENT: Rgb = Rgb(0.02, 0.59, 0.41);
const INK: Rgb = Rgb(0.12, 0.16, 0.22);
const MUTED: Rgb = Rgb(0.42, 0.45, 0.50);
const RULE: Rgb = Rgb(0.78, 0.80, 0.82);
const PAPER: Rgb = Rgb(1.0, 1.0, 1.0);
const BLANK_CELL: Rgb = Rgb(0.97, 0.97, 0.98);
const EVENT_DAY_CELL: Rgb = Rgb(0.93, 0.99, 0.96);
const BADGE_FILL: Rgb = Rgb(0.82, 0.98, 0.90);
const BADGE_INK: Rgb = Rgb(0.02, 0.37, 0.27);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Font {
    Regular,
    Bold,
}

impl Font {
    fn advance(self) -> f32 {
        match self {
            Font::Regular => REGULAR_ADVANCE,
            Font::Bold => BOLD_ADVANCE,
        }
    }
}

/// One drawing instruction in page coordinates (points, origin at the
/// bottom left)
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Mark {
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Rgb,
        text: String,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
}

/// Everything needed to draw a single printed page
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PrintLayout {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) marks: Vec<Mark>,
}

impl PrintLayout {
    pub(crate) fn build(snapshot: &PrintSnapshot, options: &ExportOptions) -> PrintLayout {
        let mut page = Page::new(options);
        let s = options.scale;
        let margin = options.margin;
        let mut top = options.page_height - margin;

        top -= 20.0 * s;
        page.text(margin, top, 20.0 * s, Font::Bold, ACCENT, TITLE);
        top -= 20.0 * s;
        page.text(
            margin,
            top,
            14.0 * s,
            Font::Bold,
            INK,
            &snapshot.grid.month().to_string(),
        );
        top -= 12.0 * s;

        let content_width = margin.mul_add(-2.0, options.page_width);
        let gutter = 16.0 * s;
        let grid_width = (content_width - gutter) * GRID_SHARE;
        let list_x = margin + grid_width + gutter;
        let list_width = content_width - grid_width - gutter;

        let header_baseline = s.mul_add(-10.0, top);
        draw_grid(
            &mut page,
            snapshot.grid.cells(),
            margin,
            grid_width,
            header_baseline,
            s,
        );
        draw_event_list(
            &mut page,
            &snapshot.events,
            &snapshot.grid.month().month().to_string(),
            list_x,
            list_width,
            header_baseline,
            s,
        );
        page.finish()
    }
}

fn draw_grid(
    page: &mut Page,
    cells: &[Option<DayCell>],
    left: f32,
    width: f32,
    header_baseline: f32,
    s: f32,
) {
    let col_width = width / 7.0;
    let header_size = 9.0 * s;
    for (col, name) in std::iter::zip(0u8.., WEEKDAYS) {
        let x = f32::from(col).mul_add(col_width, left);
        let w = text_width(name, header_size, Font::Bold);
        // Friday through Sunday are event days
        let color = if col == 0 || col >= 5 { ACCENT } else { INK };
        page.text(
            x + (col_width - w) / 2.0,
            header_baseline,
            header_size,
            Font::Bold,
            color,
            name,
        );
    }
    let grid_top = s.mul_add(-6.0, header_baseline);
    let row_height = (grid_top - page.margin) / 6.0;
    let pad = 3.0 * s;
    let number_size = 9.0 * s;
    let badge_size = 7.0 * s;
    let badge_height = s.mul_add(4.0, badge_size);
    let badge_width = pad.mul_add(-2.0, col_width);
    let title_width = s.mul_add(-4.0, badge_width);
    for (i, cell) in std::iter::zip(0u8.., cells) {
        let x = f32::from(i % 7).mul_add(col_width, left);
        let y = f32::from(i / 7 + 1).mul_add(-row_height, grid_top);
        let fill = match cell {
            None => BLANK_CELL,
            Some(c) if c.event_day => EVENT_DAY_CELL,
            Some(_) => PAPER,
        };
        page.rect(x, y, col_width, row_height, Some(fill), Some(RULE));
        let Some(cell) = cell else {
            continue;
        };
        let number = cell.day().to_string();
        let number_color = if cell.event_day { ACCENT } else { INK };
        page.text(
            x + col_width - pad - text_width(&number, number_size, Font::Bold),
            y + row_height - pad - number_size,
            number_size,
            Font::Bold,
            number_color,
            &number,
        );
        let number_top = y + row_height - pad - number_size;
        let mut line_top = s.mul_add(-2.0, number_top);
        for ev in cell.visible_events() {
            let badge_y = line_top - badge_height;
            if badge_y < y + pad {
                break;
            }
            page.rect(
                x + pad,
                badge_y,
                badge_width,
                badge_height - s,
                Some(BADGE_FILL),
                None,
            );
            let title = fit_width(&ev.title, title_width, badge_size, Font::Regular);
            page.text(
                s.mul_add(2.0, x + pad),
                s.mul_add(2.5, badge_y),
                badge_size,
                Font::Regular,
                BADGE_INK,
                &title,
            );
            line_top = badge_y - s;
        }
        let more_size = 6.5 * s;
        if cell.overflow() > 0 && line_top - more_size >= y + pad {
            page.text(
                x + pad,
                line_top - more_size,
                more_size,
                Font::Regular,
                MUTED,
                &format!("+{} more", cell.overflow()),
            );
        }
    }
}

fn draw_event_list(
    page: &mut Page,
    events: &[Event],
    month_name: &str,
    left: f32,
    width: f32,
    top: f32,
    s: f32,
) {
    page.text(
        left,
        top,
        12.0 * s,
        Font::Bold,
        INK,
        &format!("Events for {month_name}"),
    );
    let body_top = s.mul_add(-10.0, top);
    let available = body_top - page.margin;
    if events.is_empty() {
        page.text(
            left,
            s.mul_add(-10.0, body_top),
            9.0 * s,
            Font::Regular,
            MUTED,
            "No events this month.",
        );
        return;
    }
    let needed = events.iter().map(|ev| entry_height(ev, s)).sum::<f32>();
    let list_fit = if needed > available {
        (available / needed).max(MIN_LIST_FIT)
    } else {
        1.0
    };
    let s = s * list_fit;
    let summary_height = 12.0 * s;
    let mut y = body_top;
    for (i, ev) in events.iter().enumerate() {
        let remaining = events.len() - i;
        let reserve = if remaining > 1 { summary_height } else { 0.0 };
        if y - entry_height(ev, s) - reserve < page.margin {
            page.text(
                left,
                s.mul_add(-9.0, y),
                8.0 * s,
                Font::Regular,
                MUTED,
                &format!("… and {remaining} more"),
            );
            return;
        }
        for (text, size, font, color) in entry_lines(ev) {
            let size = size * s;
            y -= size * 1.3;
            let text = fit_width(&text, width, size, font);
            page.text(left, y, size, font, color, &text);
        }
        y -= ENTRY_GAP * s;
    }
}

const ENTRY_GAP: f32 = 7.0;

fn entry_lines(ev: &Event) -> Vec<(String, f32, Font, Rgb)> {
    let mut lines = vec![
        (ev.title.clone(), 10.0, Font::Bold, INK),
        (ev.long_date(), 8.0, Font::Regular, MUTED),
        (ev.location.clone(), 8.0, Font::Regular, INK),
    ];
    if ev.has_url() {
        lines.push((ev.url.clone(), 8.0, Font::Regular, ACCENT));
    }
    lines
}

fn entry_height(ev: &Event, s: f32) -> f32 {
    let lines = entry_lines(ev)
        .iter()
        .map(|&(_, size, _, _)| size * s * 1.3)
        .sum::<f32>();
    ENTRY_GAP.mul_add(s, lines)
}

/// Approximate rendered width of `text` in points
pub(super) fn text_width(text: &str, size: f32, font: Font) -> f32 {
    char_count(text) * size * font.advance()
}

fn char_count(text: &str) -> f32 {
    let n = text.chars().count();
    u16::try_from(n).map_or(f32::from(u16::MAX), f32::from)
}

/// Shortens `text` so that it fits in `width` points
fn fit_width(text: &str, width: f32, size: f32, font: Font) -> String {
    let per_char = size * font.advance();
    if per_char <= 0.0 {
        return String::new();
    }
    let chars = (1..=u16::MAX)
        .take_while(|&n| f32::from(n) * per_char <= width)
        .count();
    fit(text, chars)
}

struct Page {
    width: f32,
    height: f32,
    margin: f32,
    marks: Vec<Mark>,
}

impl Page {
    fn new(options: &ExportOptions) -> Page {
        Page {
            width: options.page_width,
            height: options.page_height,
            margin: options.margin,
            marks: Vec::new(),
        }
    }

    fn text(&mut self, x: f32, y: f32, size: f32, font: Font, color: Rgb, text: &str) {
        if !text.is_empty() {
            self.marks.push(Mark::Text {
                x,
                y,
                size,
                font,
                color,
                text: text.to_owned(),
            });
        }
    }

    fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    ) {
        self.marks.push(Mark::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
        });
    }

    fn finish(self) -> PrintLayout {
        PrintLayout {
            width: self.width,
            height: self.height,
            marks: self.marks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MonthGrid;
    use crate::season::YearMonth;
    use time::macros::{date, offset};
    use time::{Date, Month};

    const EPSILON: f32 = 0.01;

    fn event(title: &str, day: Date) -> Event {
        Event::new(
            title.to_owned(),
            day,
            offset!(UTC),
            String::from("Park"),
            String::new(),
            String::new(),
        )
    }

    fn layout(month: Month, events: Vec<Event>) -> PrintLayout {
        let ym = YearMonth::new(2025, month);
        let grid = MonthGrid::build(ym, &events);
        let snapshot = PrintSnapshot::new(grid, events);
        PrintLayout::build(&snapshot, &ExportOptions::default())
    }

    fn texts(layout: &PrintLayout) -> Vec<&str> {
        layout
            .marks
            .iter()
            .filter_map(|m| match m {
                Mark::Text { text, .. } => Some(text.as_str()),
                Mark::Rect { .. } => None,
            })
            .collect()
    }

    fn assert_within_margins(layout: &PrintLayout, margin: f32) {
        for m in &layout.marks {
            match *m {
                Mark::Text {
                    x,
                    y,
                    size,
                    font,
                    ref text,
                    ..
                } => {
                    assert!(x >= margin - EPSILON, "{text:?} starts left of the margin");
                    assert!(y >= margin - EPSILON, "{text:?} falls below the margin");
                    assert!(
                        y + size <= layout.height - margin + EPSILON,
                        "{text:?} rises above the margin"
                    );
                    assert!(
                        x + text_width(text, size, font) <= layout.width - margin + EPSILON,
                        "{text:?} runs past the right margin"
                    );
                }
                Mark::Rect {
                    x,
                    y,
                    width,
                    height,
                    ..
                } => {
                    assert!(x >= margin - EPSILON);
                    assert!(y >= margin - EPSILON);
                    assert!(x + width <= layout.width - margin + EPSILON);
                    assert!(y + height <= layout.height - margin + EPSILON);
                }
            }
        }
    }

    #[test]
    fn test_landscape_a4() {
        let layout = layout(Month::June, Vec::new());
        assert!(layout.width > layout.height);
        assert!((layout.width - 841.89).abs() < EPSILON);
        assert!((layout.height - 595.28).abs() < EPSILON);
    }

    #[test]
    fn test_headings_and_empty_month() {
        let layout = layout(Month::June, Vec::new());
        let texts = texts(&layout);
        assert_eq!(texts[0], TITLE);
        assert_eq!(texts[1], "June 2025");
        assert!(texts.contains(&"Events for June"));
        assert!(texts.contains(&"No events this month."));
        for name in WEEKDAYS {
            assert!(texts.contains(&name));
        }
        // No keyboard hints or prompts end up on paper
        assert!(!texts.iter().any(|t| t.contains("Press") || t.contains("[")));
    }

    #[test]
    fn test_one_rect_per_cell() {
        let layout = layout(Month::June, Vec::new());
        let cells = layout
            .marks
            .iter()
            .filter(|m| matches!(m, Mark::Rect { stroke: Some(_), .. }))
            .count();
        assert_eq!(cells, 42);
        assert_within_margins(&layout, ExportOptions::default().margin);
    }

    #[test]
    fn test_badges_capped_but_list_complete() {
        let events = ["Breakfast", "Parade", "Barbecue", "Fireworks"]
            .into_iter()
            .map(|t| event(t, date!(2025 - 07 - 04)))
            .collect::<Vec<_>>();
        let layout = layout(Month::July, events);
        let texts = texts(&layout);
        let count = |s: &str| texts.iter().filter(|&&t| t == s).count();
        // Badge plus list entry
        assert_eq!(count("Breakfast"), 2);
        assert_eq!(count("Parade"), 2);
        // List entry only
        assert_eq!(count("Barbecue"), 1);
        assert_eq!(count("Fireworks"), 1);
        assert_eq!(count("+2 more"), 1);
        assert_eq!(count("Friday, July 4, 2025"), 4);
        assert_within_margins(&layout, ExportOptions::default().margin);
    }

    #[test]
    fn test_long_list_is_summarized() {
        let mut events = Vec::new();
        let mut day = date!(2025 - 08 - 01);
        while day.month() == Month::August {
            if crate::validate::is_selectable(day) {
                for n in 0..3 {
                    events.push(event(&format!("Outing {n} on the {}", day.day()), day));
                }
            }
            day = day.next_day().unwrap();
        }
        let total = events.len();
        let layout = layout(Month::August, events);
        let texts = texts(&layout);
        let summary = texts
            .iter()
            .find(|t| t.starts_with("… and "))
            .expect("long list should be summarized");
        let hidden = summary
            .trim_start_matches("… and ")
            .trim_end_matches(" more")
            .parse::<usize>()
            .unwrap();
        assert!(hidden > 0 && hidden < total);
        assert_within_margins(&layout, ExportOptions::default().margin);
    }

    #[test]
    fn test_long_titles_truncated() {
        let events = vec![event(
            "The Annual Extraordinarily Long Named Lakeside Family Festival",
            date!(2025 - 09 - 13),
        )];
        let layout = layout(Month::September, events);
        assert!(texts(&layout).iter().any(|t| t.ends_with('…')));
        assert_within_margins(&layout, ExportOptions::default().margin);
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("Picnic", 100.0, 10.0, Font::Regular), "Picnic");
        assert_eq!(fit_width("Picnic", 23.0, 10.0, Font::Regular), "Pic…");
        assert_eq!(fit_width("Picnic", 1.0, 10.0, Font::Regular), "");
    }
}
