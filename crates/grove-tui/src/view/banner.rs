//! One-line alert banner.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use grove_core::component::banner::{Kind, Model};

use crate::theme;

pub fn render(frame: &mut Frame, area: Rect, model: &Model) {
    let Some(alert) = &model.alert else {
        return;
    };
    let (color, icon) = theme::alert(alert.kind);
    let hint = match alert.kind {
        Kind::Info | Kind::Dismissable => "  d dismiss",
        Kind::Refreshable => "  f refresh",
    };
    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(alert.message.as_str(), Style::default().fg(color)),
        Span::styled(hint, theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
