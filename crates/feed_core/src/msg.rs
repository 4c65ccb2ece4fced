use crate::PageData;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view session started; triggers the first page request.
    Mounted,
    /// User edited the search box (raw, undebounced text).
    SearchEdited(String),
    /// User clicked Clear.
    ClearClicked,
    /// Debounce timer fired for the given edit generation.
    SearchSettled { generation: u64, text: String },
    /// User clicked Prev.
    PrevClicked,
    /// User clicked Next.
    NextClicked,
    /// A page request finished. `Err` carries a human-readable message.
    PageLoaded {
        epoch: u64,
        result: Result<PageData, String>,
    },
    /// The view session ended.
    Unmounted,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
