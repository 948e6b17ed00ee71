//! Leaf reducers embedded by the orchestrators.
//!
//! Each module exposes a `Model`, an `Action`, and
//! `update(model, action) -> (model, effects)`; most also expose `init`.

pub mod banner;
pub mod current_recipe;
pub mod environmental_data_point;
pub mod modal;
pub mod recipe;
pub mod recipes_form;
