//! Pagination engine.
//!
//! Turns a search phrase into a first page and walks the resulting cursor
//! one page per conversational turn. The engine never touches session
//! storage: the cursor goes in and comes back out, and the dispatcher
//! decides where it lives.

use std::num::NonZeroUsize;

use tracing::{debug, warn};

use quotefinder_core::{Page, PagingCursor, ResultSet};

use crate::lookup::{escape_phrase, QuoteLookup};
use crate::parser;

/// Page size used when nothing else is configured.
pub const PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN;

/// A page plus the cursor to persist for the next turn.
///
/// `cursor` is `None` when there is nothing to continue from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: Page,
    pub cursor: Option<PagingCursor>,
}

/// Session-scoped pagination over quote lookup results.
pub struct PaginationEngine<L> {
    lookup: L,
    page_size: NonZeroUsize,
}

impl<L: QuoteLookup> PaginationEngine<L> {
    pub fn new(lookup: L, page_size: NonZeroUsize) -> Self {
        Self { lookup, page_size }
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Run a fresh search and emit its first page.
    ///
    /// Any cursor the caller held is superseded by the returned one.
    pub fn start_search(&self, phrase: &str) -> PageOutcome {
        let results = self.search(phrase);
        if results.is_empty() {
            debug!(phrase, "Search produced no results");
            return PageOutcome {
                page: Page::NoResults,
                cursor: None,
            };
        }

        debug!(phrase, total = results.len(), "Search produced results");
        self.emit(PagingCursor::new(results))
    }

    /// Emit the next page from `cursor`.
    pub fn continue_paging(&self, cursor: Option<PagingCursor>) -> PageOutcome {
        match cursor {
            None => PageOutcome {
                page: Page::NoActiveSearch,
                cursor: None,
            },
            Some(cursor) if cursor.is_exhausted() => PageOutcome {
                page: Page::AllConsumed,
                cursor: Some(cursor),
            },
            Some(cursor) => self.emit(cursor),
        }
    }

    fn search(&self, phrase: &str) -> ResultSet {
        let raw = self.lookup.fetch(&escape_phrase(phrase));
        match parser::parse(&raw) {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "Discarding unparseable lookup payload");
                ResultSet::empty()
            }
        }
    }

    fn emit(&self, mut cursor: PagingCursor) -> PageOutcome {
        let items = cursor.take_page(self.page_size.get());
        let has_more = !cursor.is_exhausted();
        debug!(
            emitted = items.len(),
            next_index = cursor.next_index(),
            has_more,
            "Page emitted"
        );
        PageOutcome {
            page: Page::Results { items, has_more },
            cursor: Some(cursor),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
