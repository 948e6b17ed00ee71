// ── Environmental data points dashboard ──
//
// Polls the "latest" view and fans the newest rows out to the displayed
// series. A failed fetch only counts as a poll miss: the series keep
// showing the last good reading.

use url::Url;

use crate::component::{current_recipe, environmental_data_point as data_point};
use crate::cursor::{Cursor, Lens};
use crate::effect::Effects;
use crate::error::FetchError;
use crate::model::{RecordSet, Variable, read_most_recent};
use crate::poll::{self, PollAction, PollModel};

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// URL of the latest-readings view.
    pub origin: Url,
    pub air_temperature: data_point::Model,
    pub water_temperature: data_point::Model,
    pub current_recipe: current_recipe::Model,
    pub poll: PollModel,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Poll(PollAction),
    GetLatest,
    Got(Result<RecordSet, FetchError>),
    Restore(RecordSet),
    AirTemperature(data_point::Action),
    WaterTemperature(data_point::Action),
    CurrentRecipe(current_recipe::Action),
}

// ── Cursors ──

pub fn air_temperature() -> Lens<Model, data_point::Model, data_point::Action, Action> {
    Cursor {
        get: |m| m.air_temperature.clone(),
        set: |m, air_temperature| Model {
            air_temperature,
            ..m
        },
        update: data_point::update,
        tag: Action::AirTemperature,
    }
}

pub fn water_temperature() -> Lens<Model, data_point::Model, data_point::Action, Action> {
    Cursor {
        get: |m| m.water_temperature.clone(),
        set: |m, water_temperature| Model {
            water_temperature,
            ..m
        },
        update: data_point::update,
        tag: Action::WaterTemperature,
    }
}

pub fn current_recipe() -> Lens<Model, current_recipe::Model, current_recipe::Action, Action> {
    Cursor {
        get: |m| m.current_recipe.clone(),
        set: |m, current_recipe| Model {
            current_recipe,
            ..m
        },
        update: current_recipe::update,
        tag: Action::CurrentRecipe,
    }
}

pub fn poll() -> Lens<Model, PollModel, PollAction, Action> {
    Cursor {
        get: |m| m.poll.clone(),
        set: |m, poll| Model { poll, ..m },
        update: poll::update,
        tag: Action::Poll,
    }
}

// ── Init / update ──

/// Fresh dashboard; the first fetch goes out immediately.
pub fn init(origin: Url) -> (Model, Effects<Action>) {
    let model = Model {
        origin,
        air_temperature: data_point::init(Variable::AirTemperature, "Air temperature", "°C").0,
        water_temperature: data_point::init(Variable::WaterTemperature, "Water temperature", "°C")
            .0,
        current_recipe: current_recipe::init().0,
        poll: poll::init().0,
    };
    (model, Effects::send(Action::Poll(PollAction::Ping)))
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    match action {
        Action::Poll(PollAction::Ping) => {
            let (model, fx) = poll().update(model, PollAction::Ping);
            (model, fx.and(Effects::send(Action::GetLatest)))
        }
        Action::Poll(a) => poll().update(model, a),
        Action::GetLatest => {
            tracing::debug!(url = %model.origin, "fetching latest readings");
            let fx = Effects::get(model.origin.clone(), Action::Got);
            (model, fx)
        }
        Action::Got(Ok(set)) => (
            model,
            Effects::batch([
                Effects::send(Action::Restore(set)),
                Effects::send(Action::Poll(PollAction::Pong)),
            ]),
        ),
        Action::Got(Err(error)) => {
            tracing::debug!(%error, misses = model.poll.misses, "poll missed");
            (model, Effects::send(Action::Poll(PollAction::Miss)))
        }
        Action::Restore(set) => restore(model, &set),
        Action::AirTemperature(a) => air_temperature().update(model, a),
        Action::WaterTemperature(a) => water_temperature().update(model, a),
        Action::CurrentRecipe(a) => current_recipe().update(model, a),
    }
}

/// Route the newest row of each displayed variable into its series.
/// Series with no matching row keep their previous value.
fn restore(model: Model, set: &RecordSet) -> (Model, Effects<Action>) {
    let rows = set.rows.as_slice();
    let mut effects = Vec::new();
    let mut model = model;

    for (variable, cursor) in [
        (Variable::AirTemperature, air_temperature()),
        (Variable::WaterTemperature, water_temperature()),
    ] {
        if let Some(point) = read_most_recent(rows, variable, false) {
            let (m, fx) = cursor.update(model, data_point::Action::Restore(point.clone()));
            model = m;
            effects.push(fx);
        }
        if let Some(point) = read_most_recent(rows, variable, true) {
            let (m, fx) = cursor.update(model, data_point::Action::RestoreDesired(point.clone()));
            model = m;
            effects.push(fx);
        }
    }

    let markers = current_recipe::Action::Restore {
        start: read_most_recent(rows, Variable::RecipeStart, false).cloned(),
        end: read_most_recent(rows, Variable::RecipeEnd, false).cloned(),
    };
    let (model, fx) = current_recipe().update(model, markers);
    effects.push(fx);

    (model, Effects::batch(effects))
}
