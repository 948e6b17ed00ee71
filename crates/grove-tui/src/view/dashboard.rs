//! Sensor readings and the running recipe.

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use grove_core::component::{current_recipe, environmental_data_point as data_point};
use grove_core::dashboard::Model;
use grove_core::poll::PollModel;

use crate::theme;

pub fn render(frame: &mut Frame, area: Rect, model: &Model) {
    let [readings, status] =
        Layout::vertical([Constraint::Min(5), Constraint::Length(4)]).areas(area);
    let [air, water] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(readings);

    render_series(frame, air, &model.air_temperature);
    render_series(frame, water, &model.water_temperature);
    render_status(frame, status, &model.current_recipe, &model.poll);
}

fn render_series(frame: &mut Frame, area: Rect, series: &data_point::Model) {
    let block = Block::default()
        .title(format!(" {} ", series.title))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", format_value(series.measured, series.unit)),
            theme::reading(),
        )),
    ];
    if let Some(desired) = series.desired {
        lines.push(Line::from(vec![
            Span::styled("  target ", theme::muted()),
            Span::styled(format_value(Some(desired), series.unit), theme::set_point()),
        ]));
    }
    if let Some(at) = format_time(series.observed_at) {
        lines.push(Line::from(Span::styled(format!("  at {at}"), theme::muted())));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status(
    frame: &mut Frame,
    area: Rect,
    recipe: &current_recipe::Model,
    poll: &PollModel,
) {
    let block = Block::default()
        .title(" Current recipe ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let running = match (&recipe.recipe_id, format_time(recipe.started_at)) {
        (Some(id), Some(at)) => Span::styled(format!("  {id} since {at}"), theme::text()),
        (Some(id), None) => Span::styled(format!("  {id}"), theme::text()),
        (None, _) => Span::styled("  No recipe running", theme::muted()),
    };
    let link = if poll.misses == 0 {
        Span::styled(format!("  ● live, {} updates", poll.pongs), theme::muted())
    } else {
        Span::styled(
            format!("  ✗ {} missed updates, retrying", poll.misses),
            theme::error(),
        )
    };
    frame.render_widget(Paragraph::new(vec![Line::from(running), Line::from(link)]), inner);
}

fn format_value(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "--".to_owned(), |v| format!("{v:.1} {unit}"))
}

fn format_time(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}
