use crate::QueryKey;

/// Side effects requested by [`crate::update`]; executed by the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue a page request. The response must come back tagged with `epoch`.
    FetchPage { epoch: u64, key: QueryKey },
    /// Restart the debounce timer for the latest search text.
    Debounce { generation: u64, text: String },
    /// Drop any pending debounce timer without emitting.
    CancelDebounce,
}
