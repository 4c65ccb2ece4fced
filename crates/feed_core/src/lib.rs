//! Feed core: pure query controller state machine and view-model helpers.
mod effect;
mod item;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use item::{Item, ItemId, PageData};
pub use msg::Msg;
pub use query::{QueryKey, DEFAULT_PAGE_SIZE};
pub use state::{AppState, Session, ViewState};
pub use update::update;
pub use view_model::{AppViewModel, ItemRow};
