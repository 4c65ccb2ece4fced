//! Feed engine: HTTP client, debounce timers and effect execution.
mod api;
mod debounce;
mod engine;
mod types;
mod wire;

pub use api::{FetchSettings, ItemsApi, ReqwestItemsApi};
pub use debounce::{DebouncedValues, Debouncer};
pub use engine::{EngineConfig, EngineError, EngineHandle};
pub use types::{EngineEvent, FailureKind, FetchError};
pub use wire::decode_page;
