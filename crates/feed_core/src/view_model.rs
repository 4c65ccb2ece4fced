use chrono::{DateTime, Utc};

use crate::{Item, ItemId};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub search_text: String,
    pub page: u32,
    pub total_pages: u32,
    /// `None` until the first page has loaded.
    pub total: Option<u64>,
    pub items: Vec<ItemRow>,
    pub loading: bool,
    pub error: Option<String>,
    pub can_prev: bool,
    pub can_next: bool,
    pub dirty: bool,
}

impl AppViewModel {
    /// `Page 2 / 3 • 45 items`, without the count before any data arrived.
    pub fn status_line(&self) -> String {
        match self.total {
            Some(total) => format!(
                "Page {} / {} \u{2022} {} items",
                self.page, self.total_pages, total
            ),
            None => format!("Page {} / {}", self.page, self.total_pages),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub id: ItemId,
    pub source: String,
    pub title: String,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            source: item.source.clone(),
            title: item.title.clone(),
            url: item.url.clone(),
            published_at: item.published_at,
        }
    }
}
