// ── Application root ──
//
// Composes the dashboard and the recipes manager. Starting a recipe on the
// device is a two-step affair: the recipes manager asks, the root holds the
// request until the user confirms or cancels.

use tracing::{info, warn};
use url::Url;

use crate::component::banner;
use crate::cursor::{Cursor, Lens};
use crate::dashboard;
use crate::effect::Effects;
use crate::error::FetchError;
use crate::model::{Recipe, RecipeId};
use crate::recipes;

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub dashboard: dashboard::Model,
    pub recipes: recipes::Model,
    /// Recipe waiting for the user to confirm a start.
    pub pending_start: Option<Recipe>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Dashboard(dashboard::Action),
    Recipes(recipes::Action),
    ConfirmStart,
    CancelStart,
    Started(RecipeId, Result<(), FetchError>),
}

pub fn dashboard() -> Lens<Model, dashboard::Model, dashboard::Action, Action> {
    Cursor {
        get: |m| m.dashboard.clone(),
        set: |m, dashboard| Model { dashboard, ..m },
        update: dashboard::update,
        tag: Action::Dashboard,
    }
}

pub fn recipes() -> Lens<Model, recipes::Model, recipes::Action, Action> {
    Cursor {
        get: |m| m.recipes.clone(),
        set: |m, recipes| Model { recipes, ..m },
        update: recipes::update,
        tag: Action::Recipes,
    }
}

pub fn init(latest_url: Url, origin_template: impl Into<String>) -> (Model, Effects<Action>) {
    let (dashboard, dashboard_fx) = dashboard::init(latest_url);
    let (recipes, recipes_fx) = recipes::init(origin_template);
    let model = Model {
        dashboard,
        recipes,
        pending_start: None,
    };
    let fx = Effects::batch([
        dashboard_fx.map(Action::Dashboard),
        recipes_fx.map(Action::Recipes),
    ]);
    (model, fx)
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    match action {
        Action::Recipes(recipes::Action::RequestStart(recipe)) => {
            let (model, fx) = recipes().update(model, recipes::Action::Close);
            let model = Model {
                pending_start: Some(recipe),
                ..model
            };
            (model, fx)
        }
        Action::Recipes(a) => recipes().update(model, a),
        Action::Dashboard(a) => dashboard().update(model, a),

        Action::ConfirmStart => {
            let Some(recipe) = model.pending_start.clone() else {
                return (model, Effects::none());
            };
            let id = recipe.id;
            info!(%id, "starting recipe");
            let model = Model {
                pending_start: None,
                ..model
            };
            let fx = Effects::start_recipe(id.clone(), move |result| Action::Started(id, result));
            (model, fx)
        }
        Action::CancelStart => (
            Model {
                pending_start: None,
                ..model
            },
            Effects::none(),
        ),

        Action::Started(id, Ok(())) => {
            info!(%id, "recipe started");
            let title = recipe_title(&model, &id);
            notify(model, banner::Action::Notify(format!("Started recipe {title}")))
        }
        Action::Started(id, Err(error)) => {
            warn!(%id, %error, "recipe start failed");
            let title = recipe_title(&model, &id);
            notify(
                model,
                banner::Action::AlertDismissable(format!("Could not start recipe {title}: {error}")),
            )
        }
    }
}

fn recipe_title(model: &Model, id: &str) -> String {
    model
        .recipes
        .recipes
        .get(id)
        .map_or(id, Recipe::title)
        .to_owned()
}

fn notify(model: Model, action: banner::Action) -> (Model, Effects<Action>) {
    recipes().update(model, recipes::Action::Banner(action))
}
