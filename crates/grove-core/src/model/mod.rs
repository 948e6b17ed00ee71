// ── Domain record types ──
//
// Documents as they come out of the store and the sensor views. Records
// are never edited in place: an update replaces the whole value.

pub mod data_point;
pub mod recipe;

pub use data_point::{DataPoint, RecordSet, Variable, read_most_recent};
pub use recipe::{PutConfirmation, Recipe, RecipeId, decode_recipes};
