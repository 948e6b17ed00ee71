// ── Recipe entity ──
//
// Reducer for one entry of the recipe collection. `Activate` is a request
// for the parent: the collection tag turns it into `StartByID`, so the
// entity itself never changes on it.

use crate::effect::Effects;
use crate::model::Recipe;

pub type Model = Recipe;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Activate,
    /// Replace the whole document.
    Replace(Recipe),
    /// The store accepted a write and assigned a new revision.
    Revised(String),
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    match action {
        Action::Activate => (model, Effects::none()),
        Action::Replace(recipe) => (recipe, Effects::none()),
        Action::Revised(rev) => (
            Recipe {
                rev: Some(rev),
                ..model
            },
            Effects::none(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activate_leaves_entity_alone() {
        let r = Recipe::new("basil", "Basil");
        let (next, fx) = update(r.clone(), Action::Activate);
        assert_eq!(next, r);
        assert!(fx.is_empty());
    }

    #[test]
    fn replace_swaps_whole_document() {
        let mut replacement = Recipe::new("basil", "Genovese basil");
        replacement.description = Some("Sweet".into());
        let (next, _) = update(Recipe::new("basil", "Basil"), Action::Replace(replacement.clone()));
        assert_eq!(next, replacement);
    }

    #[test]
    fn revised_only_touches_rev() {
        let (next, _) = update(Recipe::new("basil", "Basil"), Action::Revised("1-a".into()));
        assert_eq!(next.rev.as_deref(), Some("1-a"));
        assert_eq!(next.name, "Basil");
    }
}
