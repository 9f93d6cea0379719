use crate::theme::{ERROR_STYLE, INFO_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use std::time::{Duration, Instant};

const INFO_LIFETIME: Duration = Duration::from_secs(4);

const ERROR_LIFETIME: Duration = Duration::from_secs(8);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ToastKind {
    Info,
    Error,
}

/// A transient notification shown on the status line
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Toast {
    pub(crate) kind: ToastKind,
    pub(crate) title: String,
    pub(crate) description: String,
    shown_at: Instant,
}

impl Toast {
    pub(crate) fn info<T: Into<String>, D: Into<String>>(title: T, description: D) -> Toast {
        Toast::new(ToastKind::Info, title.into(), description.into())
    }

    pub(crate) fn error<T: Into<String>, D: Into<String>>(title: T, description: D) -> Toast {
        Toast::new(ToastKind::Error, title.into(), description.into())
    }

    fn new(kind: ToastKind, title: String, description: String) -> Toast {
        Toast {
            kind,
            title,
            description,
            shown_at: Instant::now(),
        }
    }

    pub(crate) fn expired(&self, now: Instant) -> bool {
        let lifetime = match self.kind {
            ToastKind::Info => INFO_LIFETIME,
            ToastKind::Error => ERROR_LIFETIME,
        };
        now.saturating_duration_since(self.shown_at) >= lifetime
    }
}

impl Widget for &Toast {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = match self.kind {
            ToastKind::Info => INFO_STYLE,
            ToastKind::Error => ERROR_STYLE,
        };
        let mut spans = vec![Span::raw(" "), Span::raw(self.title.as_str())];
        if !self.description.is_empty() {
            spans.push(Span::raw(": "));
            spans.push(Span::raw(self.description.as_str()));
        }
        spans.push(Span::raw(" "));
        Line::from(spans).style(style).render(area, buf);
    }
}
