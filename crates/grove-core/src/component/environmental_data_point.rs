// ── Environmental data point ──
//
// One displayed sensor series: the latest measurement, the current set
// point and when the measurement was taken.

use chrono::{DateTime, Utc};

use crate::effect::Effects;
use crate::model::{DataPoint, Variable};

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub variable: Variable,
    pub title: &'static str,
    pub unit: &'static str,
    pub measured: Option<f64>,
    pub desired: Option<f64>,
    /// When the last measurement was taken.
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A new measurement. Non-numeric values clear the reading.
    Restore(DataPoint),
    /// A new set point.
    RestoreDesired(DataPoint),
    Clear,
}

pub fn init(variable: Variable, title: &'static str, unit: &'static str) -> (Model, Effects<Action>) {
    let model = Model {
        variable,
        title,
        unit,
        measured: None,
        desired: None,
        observed_at: None,
    };
    (model, Effects::none())
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    let next = match action {
        Action::Restore(point) => Model {
            measured: point.as_f64(),
            observed_at: point.observed_at(),
            ..model
        },
        Action::RestoreDesired(point) => Model {
            desired: point.as_f64(),
            ..model
        },
        Action::Clear => Model {
            measured: None,
            desired: None,
            observed_at: None,
            ..model
        },
    };
    (next, Effects::none())
}
