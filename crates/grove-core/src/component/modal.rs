// ── Modal visibility ──

use crate::effect::Effects;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Model {
    pub is_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Close,
    Toggle,
}

pub fn init() -> (Model, Effects<Action>) {
    (Model::default(), Effects::none())
}

pub fn update(model: Model, action: Action) -> (Model, Effects<Action>) {
    let is_open = match action {
        Action::Open => true,
        Action::Close => false,
        Action::Toggle => !model.is_open,
    };
    (Model { is_open }, Effects::none())
}
