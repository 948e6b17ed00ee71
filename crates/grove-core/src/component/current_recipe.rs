// ── Currently running recipe ──
//
// Derived from the `recipe_start` / `recipe_end` markers the device
// writes. The start marker carries the recipe id as its value.

use chrono::{DateTime, Utc};

use crate::effect::Effects;
use crate::model::DataPoint;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub recipe_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl Model {
    pub fn is_running(&self) -> bool {
        self.recipe_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Restore {
        start: Option<DataPoint>,
        end: Option<DataPoint>,
    },
}

pub fn init() -> (Model, Effects<Action>) {
    (Model::default(), Effects::none())
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    match action {
        Action::Restore { start, end } => {
            let running = start.filter(|s| match end.as_ref() {
                None => true,
                Some(e) => match (s.timestamp, e.timestamp) {
                    (Some(s), Some(e)) => s > e,
                    (Some(_), None) => true,
                    (None, _) => false,
                },
            });
            let next = match running {
                Some(start) => Model {
                    recipe_id: start.as_str().map(str::to_owned),
                    started_at: start.observed_at(),
                },
                None => Model::default(),
            };
            tracing::trace!(was = ?model.recipe_id, now = ?next.recipe_id, "current recipe");
            (next, Effects::none())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Variable;

    fn start(id: &str, ts: Option<f64>) -> DataPoint {
        let p = DataPoint::new(Variable::RecipeStart, id);
        match ts {
            Some(ts) => p.at(ts),
            None => p,
        }
    }

    fn end(ts: Option<f64>) -> DataPoint {
        let p = DataPoint::new(Variable::RecipeEnd, "basil");
        match ts {
            Some(ts) => p.at(ts),
            None => p,
        }
    }

    fn restore(start: Option<DataPoint>, end: Option<DataPoint>) -> Model {
        update(Model::default(), Action::Restore { start, end }).0
    }

    #[test]
    fn start_without_end_is_running() {
        let m = restore(Some(start("basil", Some(10.0))), None);
        assert_eq!(m.recipe_id.as_deref(), Some("basil"));
        assert_eq!(m.started_at.map(|t| t.timestamp()), Some(10));
    }

    #[test]
    fn newer_end_stops_recipe() {
        let m = restore(Some(start("basil", Some(10.0))), Some(end(Some(20.0))));
        assert!(!m.is_running());
    }

    #[test]
    fn newer_start_overrides_old_end() {
        let m = restore(Some(start("kale", Some(30.0))), Some(end(Some(20.0))));
        assert_eq!(m.recipe_id.as_deref(), Some("kale"));
    }

    #[test]
    fn untimed_end_wins() {
        let m = restore(Some(start("basil", None)), Some(end(None)));
        assert!(!m.is_running());
        assert_eq!(restore(None, None), Model::default());
    }
}
