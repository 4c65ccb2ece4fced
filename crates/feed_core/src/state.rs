use crate::view_model::{AppViewModel, ItemRow};
use crate::{Effect, Item, PageData, QueryKey, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Idle,
    Active,
    Ended,
}

/// What the presentation layer reads. Only the orchestrator writes it, through
/// [`ViewState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    items: Vec<Item>,
    total: u64,
    page: u32,
    page_size: u32,
    loading: bool,
    error: Option<String>,
    loaded: bool,
}

#[derive(Debug)]
pub(crate) enum Transition {
    Dispatched,
    Loaded(PageData),
    Failed(String),
}

impl ViewState {
    fn new(page_size: u32) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size,
            loading: false,
            error: None,
            loaded: false,
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once at least one page has been loaded successfully.
    pub fn has_data(&self) -> bool {
        self.loaded
    }

    /// `max(1, ceil(total / page_size))`, recomputed on every read.
    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.page_size.max(1))).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub(crate) fn apply(&mut self, transition: Transition) {
        match transition {
            Transition::Dispatched => {
                self.loading = true;
                self.error = None;
            }
            Transition::Loaded(data) => {
                self.items = data.items;
                self.total = data.total;
                self.page = data.page;
                if data.page_size > 0 {
                    self.page_size = data.page_size;
                }
                self.loading = false;
                self.error = None;
                self.loaded = true;
            }
            // Previously displayed items stay visible.
            Transition::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DebounceTracker {
    generation: u64,
    pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    session: Session,
    search_text: String,
    debounced_text: String,
    page: u32,
    page_size: u32,
    debounce: DebounceTracker,
    epoch: u64,
    in_flight: Option<u64>,
    last_dispatched: Option<QueryKey>,
    view: ViewState,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            session: Session::Idle,
            search_text: String::new(),
            debounced_text: String::new(),
            page: 1,
            page_size,
            debounce: DebounceTracker::default(),
            epoch: 0,
            in_flight: None,
            last_dispatched: None,
            view: ViewState::new(page_size),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let total_pages = self.view.total_pages();
        AppViewModel {
            search_text: self.search_text.clone(),
            page: self.page,
            total_pages,
            total: self.view.has_data().then_some(self.view.total()),
            items: self.view.items().iter().map(ItemRow::from).collect(),
            loading: self.view.loading(),
            error: self.view.error().map(ToOwned::to_owned),
            can_prev: self.can_go_prev(),
            can_next: self.can_go_next(),
            dirty: self.dirty,
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn debounced_text(&self) -> &str {
        &self.debounced_text
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Epoch of the most recently dispatched request; 0 before the first one.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn last_dispatched(&self) -> Option<&QueryKey> {
        self.last_dispatched.as_ref()
    }

    pub fn debounce_pending(&self) -> bool {
        self.debounce.pending
    }

    /// Paging waits for both the in-flight request and any pending search edit.
    pub fn can_go_prev(&self) -> bool {
        self.navigation_idle() && self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.navigation_idle() && self.page < self.view.total_pages()
    }

    fn navigation_idle(&self) -> bool {
        !self.view.loading() && !self.debounce.pending
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mount(&mut self) {
        self.session = Session::Active;
        self.mark_dirty();
    }

    /// Ends the session. Returns whether a debounce timer was still pending.
    pub(crate) fn end_session(&mut self) -> bool {
        self.session = Session::Ended;
        self.in_flight = None;
        self.mark_dirty();
        std::mem::take(&mut self.debounce.pending)
    }

    /// Records a raw edit, resets paging and returns the new debounce generation.
    pub(crate) fn edit_search(&mut self, text: String) -> u64 {
        self.search_text = text;
        self.page = 1;
        self.debounce.generation += 1;
        self.debounce.pending = true;
        self.mark_dirty();
        self.debounce.generation
    }

    /// Accepts a debounce emission if it belongs to the latest edit.
    pub(crate) fn settle_search(&mut self, generation: u64, text: String) -> bool {
        if !self.debounce.pending || generation != self.debounce.generation {
            return false;
        }
        self.debounce.pending = false;
        self.debounced_text = text;
        true
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
        self.mark_dirty();
    }

    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        self.in_flight == Some(epoch)
    }

    pub(crate) fn apply_loaded(&mut self, data: PageData) {
        self.in_flight = None;
        self.view.apply(Transition::Loaded(data));
        let max_page = self.view.total_pages();
        if self.page > max_page {
            self.page = max_page;
        }
        self.mark_dirty();
    }

    pub(crate) fn apply_failed(&mut self, message: String) {
        self.in_flight = None;
        self.view.apply(Transition::Failed(message));
        self.mark_dirty();
    }

    /// Dispatches a request if the derived key differs from the last one sent.
    /// Held while the session is not active or a debounce is pending.
    pub(crate) fn sync_query(&mut self) -> Option<Effect> {
        if self.session != Session::Active || self.debounce.pending {
            return None;
        }
        let key = QueryKey::build(self.page, self.page_size, &self.debounced_text);
        if self.last_dispatched.as_ref() == Some(&key) {
            return None;
        }
        self.epoch += 1;
        self.in_flight = Some(self.epoch);
        self.last_dispatched = Some(key.clone());
        self.view.apply(Transition::Dispatched);
        self.mark_dirty();
        Some(Effect::FetchPage {
            epoch: self.epoch,
            key,
        })
    }
}
