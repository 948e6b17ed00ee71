//! Action-driven state core for the grove dashboard.
//!
//! Every piece of UI state is a plain value changed only by
//! `update(model, action) -> (model, effects)`. Update functions never do
//! I/O; they return [`Effects`], declarative requests paired with the
//! continuation that turns each outcome into the next action. The
//! [`Runtime`] executes those requests against injected gateways and feeds
//! the resulting actions back to the event loop.
//!
//! - **Composition** — [`Cursor`] embeds a child reducer in a parent;
//!   [`Indexed`] and [`update_with_id`] route actions to entities of a
//!   collection by id.
//! - **Orchestrators** — [`dashboard`] polls the latest sensor readings,
//!   [`recipes`] keeps the recipe collection in step with the document
//!   store, [`app`] composes both and gates recipe starts behind a
//!   confirmation.
//! - **Gateways** — [`DocumentStore`] and [`Fetcher`], with HTTP
//!   implementations over `grove-api` and in-memory doubles for tests.

pub mod app;
pub mod component;
pub mod config;
pub mod cursor;
pub mod dashboard;
pub mod effect;
pub mod error;
pub mod fetch;
pub mod indexed;
pub mod model;
pub mod poll;
pub mod recipes;
pub mod runtime;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DatabaseAuth, GroveConfig, render_origin};
pub use cursor::{Cursor, Lens};
pub use effect::{Effects, Task, Then};
pub use error::{CoreError, FetchError, StoreError};
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};
pub use indexed::{Indexed, index_with, update_with_id};
pub use model::{DataPoint, PutConfirmation, Recipe, RecipeId, RecordSet, Variable};
pub use poll::{PollAction, PollModel, PollState};
pub use runtime::Runtime;
pub use store::{CouchStore, DocumentStore, MemoryStore};

// The transport settings are part of `GroveConfig`.
pub use grove_api::TlsMode;
