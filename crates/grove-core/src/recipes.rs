// ── Recipes manager ──
//
// Owns the local recipe collection and keeps it in step with the store:
// restore on demand, optimistic writes, replication with a configurable
// origin. Child requests (`Activate`, `Submitted`, `Refresh`) are caught
// here and turned into collection operations.

use tracing::{debug, info, warn};
use url::Url;

use crate::component::{banner, modal, recipe, recipes_form};
use crate::config::render_origin;
use crate::cursor::{Cursor, Lens};
use crate::effect::Effects;
use crate::error::StoreError;
use crate::indexed::{Indexed, update_with_id};
use crate::model::{PutConfirmation, Recipe, RecipeId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    List,
    Form,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncState {
    #[default]
    Idle,
    Syncing,
    Synced,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub origin: Option<Url>,
    pub origin_template: String,
    pub modal: modal::Model,
    pub active_panel: Panel,
    pub banner: banner::Model,
    pub form: recipes_form::Model,
    pub recipes: Indexed<Recipe>,
    pub sync_state: SyncState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Configure(Url),
    RestoreRecipes,
    RestoredRecipes(Result<Vec<Recipe>, StoreError>),
    Sync,
    Synced(Result<(), StoreError>),
    Put(Recipe),
    PutConfirmed(RecipeId, Result<PutConfirmation, StoreError>),
    StartByID(RecipeId),
    /// Outbound: the user picked a recipe to run.
    RequestStart(Recipe),
    ByID(RecipeId, recipe::Action),
    Form(recipes_form::Action),
    Banner(banner::Action),
    Modal(modal::Action),
    ActivatePanel(Panel),
    Open,
    Close,
}

// ── Cursors ──

pub fn form() -> Lens<Model, recipes_form::Model, recipes_form::Action, Action> {
    Cursor {
        get: |m| m.form.clone(),
        set: |m, form| Model { form, ..m },
        update: recipes_form::update,
        tag: Action::Form,
    }
}

pub fn banner() -> Lens<Model, banner::Model, banner::Action, Action> {
    Cursor {
        get: |m| m.banner.clone(),
        set: |m, banner| Model { banner, ..m },
        update: banner::update,
        tag: Action::Banner,
    }
}

pub fn modal() -> Lens<Model, modal::Model, modal::Action, Action> {
    Cursor {
        get: |m| m.modal,
        set: |m, modal| Model { modal, ..m },
        update: modal::update,
        tag: Action::Modal,
    }
}

// ── Init / update ──

/// Empty manager; the local store is read right away.
pub fn init(origin_template: impl Into<String>) -> (Model, Effects<Action>) {
    let model = Model {
        origin: None,
        origin_template: origin_template.into(),
        modal: modal::init().0,
        active_panel: Panel::default(),
        banner: banner::init().0,
        form: recipes_form::init().0,
        recipes: Indexed::new(),
        sync_state: SyncState::default(),
    };
    (model, Effects::send(Action::RestoreRecipes))
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    match action {
        Action::Configure(origin) => {
            info!(%origin, "recipe origin configured");
            let model = Model {
                origin: Some(origin),
                ..model
            };
            (
                model,
                Effects::batch([
                    Effects::send(Action::RestoreRecipes),
                    Effects::send(Action::Sync),
                ]),
            )
        }

        Action::RestoreRecipes => (model, Effects::restore(Action::RestoredRecipes)),

        Action::RestoredRecipes(Ok(docs)) => {
            debug!(count = docs.len(), "recipes restored");
            let recipes = model.recipes.replace_all(docs, |r| r.id.clone());
            let banner = if model.banner.kind() == Some(banner::Kind::Refreshable) {
                banner::Model::default()
            } else {
                model.banner
            };
            (
                Model {
                    recipes,
                    banner,
                    ..model
                },
                Effects::none(),
            )
        }
        Action::RestoredRecipes(Err(error)) => {
            warn!(%error, "failed to restore recipes");
            let message = format!("Could not load recipes: {error}");
            banner().update(model, banner::Action::AlertRefreshable(message))
        }

        Action::Sync => sync(model),
        Action::Synced(Ok(())) => {
            info!(origin = ?model.origin.as_ref().map(Url::as_str), "recipes synced");
            let model = Model {
                sync_state: SyncState::Synced,
                ..model
            };
            (model, Effects::send(Action::RestoreRecipes))
        }
        Action::Synced(Err(error)) => {
            warn!(%error, "recipe sync failed");
            let model = Model {
                sync_state: SyncState::Failed,
                ..model
            };
            let message = format!("Could not sync recipes: {error}");
            banner().update(model, banner::Action::AlertDismissable(message))
        }

        Action::Put(recipe) => {
            let id = recipe.id.clone();
            debug!(%id, "writing recipe");
            let recipes = model.recipes.add(id.clone(), recipe.clone());
            let fx = Effects::put(recipe, move |result| Action::PutConfirmed(id, result));
            (Model { recipes, ..model }, fx)
        }
        Action::PutConfirmed(id, Ok(confirmation)) => {
            debug!(%id, rev = %confirmation.rev, "recipe written");
            let (recipes, fx) = update_with_id(
                recipe::update,
                Action::ByID,
                model.recipes,
                &confirmation.id,
                recipe::Action::Revised(confirmation.rev),
            );
            (Model { recipes, ..model }, fx)
        }
        Action::PutConfirmed(id, Err(error)) => {
            warn!(%id, %error, "failed to write recipe");
            let title = model
                .recipes
                .get(&id)
                .map_or(id.as_str(), Recipe::title)
                .to_owned();
            let message = format!("Could not save recipe {title}: {error}");
            banner().update(model, banner::Action::AlertDismissable(message))
        }

        Action::StartByID(id) => {
            let Some(snapshot) = model.recipes.get(&id).cloned() else {
                debug!(%id, "start requested for unknown recipe");
                return (model, Effects::none());
            };
            let recipes = model.recipes.activate(&id);
            (
                Model { recipes, ..model },
                Effects::send(Action::RequestStart(snapshot)),
            )
        }
        Action::RequestStart(_) => (model, Effects::none()),

        Action::ByID(id, recipe::Action::Activate) => update(model, Action::StartByID(id)),
        Action::ByID(id, action) => {
            let (recipes, fx) =
                update_with_id(recipe::update, Action::ByID, model.recipes, &id, action);
            (Model { recipes, ..model }, fx)
        }

        Action::Form(recipes_form::Action::Submitted(recipe)) => {
            let model = Model {
                active_panel: Panel::List,
                ..model
            };
            update(model, Action::Put(recipe))
        }
        Action::Form(action) => form().update(model, action),

        Action::Banner(banner::Action::Refresh) => {
            let (model, fx) = banner().update(model, banner::Action::Refresh);
            let (model, restore) = update(model, Action::RestoreRecipes);
            (model, fx.and(restore))
        }
        Action::Banner(action) => banner().update(model, action),

        Action::Modal(action) => modal().update(model, action),
        Action::ActivatePanel(active_panel) => (
            Model {
                active_panel,
                ..model
            },
            Effects::none(),
        ),
        Action::Open => modal().update(model, modal::Action::Open),
        Action::Close => modal().update(model, modal::Action::Close),
    }
}

fn sync(model: Model) -> (Model, Effects<Action>) {
    let Some(origin) = model.origin.as_ref() else {
        warn!("sync requested before an origin was configured");
        return (model, Effects::none());
    };

    match render_origin(&model.origin_template, origin) {
        Ok(target) => {
            debug!(%target, "syncing recipes");
            let model = Model {
                sync_state: SyncState::Syncing,
                ..model
            };
            (model, Effects::sync(target, Action::Synced))
        }
        Err(error) => {
            warn!(template = %model.origin_template, %error, "invalid recipe origin");
            let message = format!("Invalid recipe origin: {error}");
            let model = Model {
                sync_state: SyncState::Failed,
                ..model
            };
            banner().update(model, banner::Action::AlertDismissable(message))
        }
    }
}
