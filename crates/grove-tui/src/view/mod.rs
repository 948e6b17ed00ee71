//! Rendering. Every function here is a pure function of the model and the
//! small amount of view-only state kept in [`ViewState`].

mod banner;
mod dashboard;
mod recipes;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use grove_core::app;
use grove_core::model::Recipe;
use grove_core::recipes::SyncState;

use crate::theme;

/// View-only state that the core model does not track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Highlighted row of the recipe list.
    pub selected: usize,
}

impl ViewState {
    /// Keep the selection inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

pub fn render(frame: &mut Frame, model: &app::Model, ui: &ViewState) {
    let area = frame.area();
    let [header, body, banner_area, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header, model);
    dashboard::render(frame, body, &model.dashboard);
    banner::render(frame, banner_area, &model.recipes.banner);
    render_footer(frame, footer);

    if model.recipes.modal.is_open {
        recipes::render(frame, centered(area, 72, 20), &model.recipes, ui.selected);
    }

    if let Some(recipe) = &model.pending_start {
        render_confirm(frame, area, recipe);
    }
}

fn render_header(frame: &mut Frame, area: Rect, model: &app::Model) {
    let origin = model
        .recipes
        .origin
        .as_ref()
        .map_or_else(|| "no origin".to_owned(), ToString::to_string);
    let sync = match model.recipes.sync_state {
        SyncState::Idle => Span::styled("○ local", theme::muted()),
        SyncState::Syncing => Span::styled("◐ syncing", Style::default().fg(theme::SUN)),
        SyncState::Synced => Span::styled("● synced", Style::default().fg(theme::LEAF)),
        SyncState::Failed => Span::styled("✗ sync failed", theme::error()),
    };
    let line = Line::from(vec![
        Span::styled(" grove ", theme::title_style()),
        Span::styled("│ ", theme::muted()),
        sync,
        Span::styled(format!("  {origin}"), theme::muted()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" r ", theme::key_hint_key()),
        Span::styled("recipes  ", theme::key_hint()),
        Span::styled("p ", theme::key_hint_key()),
        Span::styled("poll now  ", theme::key_hint()),
        Span::styled("d ", theme::key_hint_key()),
        Span::styled("dismiss  ", theme::key_hint()),
        Span::styled("q ", theme::key_hint_key()),
        Span::styled("quit", theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_confirm(frame: &mut Frame, area: Rect, recipe: &Recipe) {
    let dialog = centered(area, 50, 5);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(" Start recipe ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::SUN))
        .style(Style::default().bg(theme::SOIL));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let text = vec![
        Line::from(Span::styled(format!("  Start {}?", recipe.title()), theme::text())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("start    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
