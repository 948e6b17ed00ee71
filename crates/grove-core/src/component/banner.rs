// ── Alert banner ──
//
// A single-slot message line. Refreshable alerts report that the recipe
// list could not be loaded; they stay up until a refresh and are not
// replaced by lesser messages.

use crate::effect::Effects;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Info,
    Dismissable,
    Refreshable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub kind: Kind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub alert: Option<Alert>,
}

impl Model {
    pub fn message(&self) -> Option<&str> {
        self.alert.as_ref().map(|a| a.message.as_str())
    }

    pub fn kind(&self) -> Option<Kind> {
        self.alert.as_ref().map(|a| a.kind)
    }

    fn is_refreshable(&self) -> bool {
        self.kind() == Some(Kind::Refreshable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Notify(String),
    AlertDismissable(String),
    AlertRefreshable(String),
    Dismiss,
    /// Outbound: the parent reloads, the banner clears.
    Refresh,
}

pub fn init() -> (Model, Effects<Action>) {
    (Model::default(), Effects::none())
}

fn show(model: Model, message: String, kind: Kind) -> Model {
    if model.is_refreshable() && kind != Kind::Refreshable {
        tracing::debug!(%message, "banner busy with a refreshable alert");
        return model;
    }
    Model {
        alert: Some(Alert { message, kind }),
    }
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    let next = match action {
        Action::Notify(message) => show(model, message, Kind::Info),
        Action::AlertDismissable(message) => show(model, message, Kind::Dismissable),
        Action::AlertRefreshable(message) => show(model, message, Kind::Refreshable),
        Action::Dismiss if model.is_refreshable() => model,
        Action::Dismiss | Action::Refresh => Model::default(),
    };
    (next, Effects::none())
}
