// ── Recipe entry form ──
//
// Free-text JSON editor for new recipes. A successful `Submit` hands the
// parsed recipe to the parent as `Submitted`; the form ignores it.

use crate::effect::Effects;
use crate::model::Recipe;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub text: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Edit(String),
    Insert(char),
    Backspace,
    Submit,
    /// Outbound: a parsed recipe ready to be stored.
    Submitted(Recipe),
    Clear,
}

pub fn init() -> (Model, Effects<Action>) {
    (Model::default(), Effects::none())
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    match action {
        Action::Edit(text) => (Model { text, error: None }, Effects::none()),
        Action::Insert(c) => {
            let mut text = model.text;
            text.push(c);
            (Model { text, error: None }, Effects::none())
        }
        Action::Backspace => {
            let mut text = model.text;
            text.pop();
            (Model { text, ..model }, Effects::none())
        }
        Action::Submit => {
            if model.text.trim().is_empty() {
                let error = Some("Recipe is empty".to_owned());
                return (Model { error, ..model }, Effects::none());
            }
            match Recipe::from_json(&model.text) {
                Ok(recipe) => (Model::default(), Effects::send(Action::Submitted(recipe))),
                Err(e) => {
                    tracing::debug!(error = %e, "recipe form rejected input");
                    let error = Some(format!("Invalid recipe JSON: {e}"));
                    (Model { error, ..model }, Effects::none())
                }
            }
        }
        Action::Submitted(_) => (model, Effects::none()),
        Action::Clear => (Model::default(), Effects::none()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::effect::Task;

    fn with_text(text: &str) -> Model {
        update(init().0, Action::Edit(text.into())).0
    }

    #[test]
    fn valid_submit_clears_and_emits_recipe() {
        let (m, fx) = update(with_text(r#"{"_id": "basil", "name": "Basil"}"#), Action::Submit);
        assert_eq!(m, Model::default());
        let Some(Task::Send(Action::Submitted(recipe))) = fx.into_iter().next() else {
            panic!("expected Submitted");
        };
        assert_eq!(recipe.id, "basil");
    }

    #[test]
    fn invalid_submit_keeps_text_and_sets_error() {
        let (m, fx) = update(with_text("{ nope"), Action::Submit);
        assert_eq!(m.text, "{ nope");
        assert!(m.error.unwrap().starts_with("Invalid recipe JSON"));
        assert!(fx.is_empty());
    }

    #[test]
    fn empty_submit_is_rejected() {
        let (m, fx) = update(init().0, Action::Submit);
        assert!(m.error.is_some());
        assert!(fx.is_empty());
    }

    #[test]
    fn typing_clears_error() {
        let m = update(with_text("{"), Action::Submit).0;
        let m = update(m, Action::Insert('}')).0;
        assert_eq!(m.text, "{}");
        assert_eq!(m.error, None);
        let m = update(m, Action::Backspace).0;
        assert_eq!(m.text, "{");
    }
}
