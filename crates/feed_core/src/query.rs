/// Page size used when configuration does not override it.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Canonical description of one page request.
///
/// Two keys are equal iff page, page size and term are all equal; the
/// controller only dispatches a request when the key changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    page: u32,
    page_size: u32,
    term: Option<String>,
}

impl QueryKey {
    /// Derives a key from the current page, the configured page size and the
    /// debounced search text. Whitespace-only text means "no filter".
    pub fn build(page: u32, page_size: u32, debounced_text: &str) -> Self {
        let term = debounced_text.trim();
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            term: (!term.is_empty()).then(|| term.to_owned()),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Query-string parameters for the items endpoint, in wire order.
    /// `q` is omitted entirely when there is no term.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(term) = &self.term {
            pairs.push(("q", term.clone()));
        }
        pairs
    }
}
