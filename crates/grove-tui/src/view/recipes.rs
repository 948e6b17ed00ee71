//! Recipes modal: the recipe list and the JSON entry form.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use grove_core::recipes::{Model, Panel};

use crate::theme;

pub fn render(frame: &mut Frame, area: Rect, model: &Model, selected: usize) {
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Recipes ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::SOIL));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [body, hints] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    match model.active_panel {
        Panel::List => {
            render_list(frame, body, model, selected);
            render_hints(frame, hints, LIST_HINTS);
        }
        Panel::Form => {
            render_form(frame, body, model);
            render_hints(frame, hints, FORM_HINTS);
        }
    }
}

const LIST_HINTS: &[(&str, &str)] = &[
    ("↑/↓", "select"),
    ("Enter", "start"),
    ("n", "new"),
    ("s", "sync"),
    ("Esc", "close"),
];

const FORM_HINTS: &[(&str, &str)] = &[("Enter", "save"), ("Ctrl+u", "clear"), ("Esc", "back")];

fn render_list(frame: &mut Frame, area: Rect, model: &Model, selected: usize) {
    if model.recipes.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  No recipes yet. Press n to add one.",
            theme::muted(),
        )));
        frame.render_widget(empty, area);
        return;
    }

    let active = model.recipes.active();
    let items: Vec<ListItem> = model
        .recipes
        .iter()
        .map(|(id, recipe)| {
            let marker = if active == Some(id) { "▶ " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(theme::LEAF)),
                Span::styled(recipe.title().to_owned(), theme::text()),
            ];
            if let Some(description) = &recipe.description {
                spans.push(Span::styled(format!("  {description}"), theme::muted()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(theme::list_selected());
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_form(frame: &mut Frame, area: Rect, model: &Model) {
    let [editor, error] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let block = Block::default()
        .title(" New recipe (JSON) ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let text = Paragraph::new(Line::from(vec![
        Span::styled(model.form.text.as_str(), theme::text()),
        Span::styled("█", Style::default().fg(theme::LEAF)),
    ]))
    .wrap(Wrap { trim: false })
    .block(block);
    frame.render_widget(text, editor);

    if let Some(message) = &model.form.error {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {message}"), theme::error())),
            error,
        );
    }
}

fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {key} "), theme::key_hint_key()),
                Span::styled(format!("{label} "), theme::key_hint()),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::testing::{contains, rendered};
    use super::*;
    use grove_core::component::recipes_form;
    use grove_core::model::Recipe;
    use grove_core::recipes::{self, Action};

    fn with_recipes() -> Model {
        let mut basil = Recipe::new("basil", "Basil");
        basil.description = Some("Sweet Genovese".into());
        let docs = vec![basil, Recipe::new("kale", "Kale")];
        recipes::update(recipes::init("{origin}/recipes").0, Action::RestoredRecipes(Ok(docs))).0
    }

    fn draw(model: &Model, selected: usize) -> Vec<String> {
        rendered(72, 16, |f| {
            let area = f.area();
            render(f, area, model, selected);
        })
    }

    #[test]
    fn empty_list_explains_how_to_add() {
        let screen = draw(&recipes::init("{origin}/recipes").0, 0);
        assert!(contains(&screen, "No recipes yet"));
    }

    #[test]
    fn list_shows_titles_and_descriptions() {
        let screen = draw(&with_recipes(), 1);
        assert!(contains(&screen, "Basil  Sweet Genovese"));
        assert!(contains(&screen, "Kale"));
        assert!(contains(&screen, "Enter start"));
    }

    #[test]
    fn active_recipe_is_marked() {
        let (m, _) = recipes::update(with_recipes(), Action::StartByID("kale".into()));
        let screen = draw(&m, 0);
        assert!(contains(&screen, "▶ Kale"));
    }

    #[test]
    fn form_shows_text_and_error() {
        let m = recipes::update(with_recipes(), Action::ActivatePanel(Panel::Form)).0;
        let m = recipes::update(m, Action::Form(recipes_form::Action::Edit("{ bad".into()))).0;
        let m = recipes::update(m, Action::Form(recipes_form::Action::Submit)).0;
        let screen = draw(&m, 0);
        assert!(contains(&screen, "{ bad"));
        assert!(contains(&screen, "Invalid recipe JSON"));
        assert!(contains(&screen, "Enter save"));
    }
}
