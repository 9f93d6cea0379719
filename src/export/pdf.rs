use super::layout::{Font, Mark, PrintLayout, Rgb};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

/// Draws a print layout as a single-page PDF document
pub(super) fn render(layout: &PrintLayout) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let page_id = Ref::new(5);
    let content_id = Ref::new(6);

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id).kids([page_id]).count(1);
    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    {
        let mut page = pdf.page(page_id);
        page.parent(pages_id)
            .media_box(Rect::new(0.0, 0.0, layout.width, layout.height))
            .contents(content_id);
        page.resources()
            .fonts()
            .pair(REGULAR_FONT, regular_id)
            .pair(BOLD_FONT, bold_id);
    }

    let mut content = Content::new();
    for mark in &layout.marks {
        match mark {
            Mark::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => draw_text(&mut content, *x, *y, *size, *font, *color, text),
            Mark::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => draw_rect(&mut content, *x, *y, *width, *height, *fill, *stroke),
        }
    }
    pdf.stream(content_id, &content.finish());
    pdf.finish()
}

fn draw_text(
    content: &mut Content,
    x: f32,
    y: f32,
    size: f32,
    font: Font,
    color: Rgb,
    text: &str,
) {
    let name = match font {
        Font::Regular => REGULAR_FONT,
        Font::Bold => BOLD_FONT,
    };
    let bytes = win_ansi(text);
    content.save_state();
    content.set_fill_rgb(color.0, color.1, color.2);
    content.begin_text();
    content.set_font(name, size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(&bytes));
    content.end_text();
    content.restore_state();
}

fn draw_rect(
    content: &mut Content,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    fill: Option<Rgb>,
    stroke: Option<Rgb>,
) {
    content.save_state();
    if let Some(Rgb(r, g, b)) = fill {
        content.set_fill_rgb(r, g, b);
    }
    if let Some(Rgb(r, g, b)) = stroke {
        content.set_stroke_rgb(r, g, b);
        content.set_line_width(0.5);
    }
    content.rect(x, y, width, height);
    match (fill.is_some(), stroke.is_some()) {
        (true, true) => {
            content.fill_nonzero_and_stroke();
        }
        (true, false) => {
            content.fill_nonzero();
        }
        (false, true) => {
            content.stroke();
        }
        (false, false) => {
            content.end_path();
        }
    }
    content.restore_state();
}

/// Encodes `text` for the standard 14 fonts.  Characters outside of
/// `WinAnsiEncoding` become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => match u8::try_from(u32::from(ch)) {
                Ok(b) if b >= 0x20 && b != 0x7F && !(0x80..0xA0).contains(&b) => b,
                _ => b'?',
            },
        })
        .collect()
}
