//! Shared domain types for Find My Quote.
//!
//! A search produces a [`ResultSet`] once; a [`PagingCursor`] walks it across
//! conversational turns; each turn yields a transient [`Page`].

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteFinderError, Result};

// =============================================================================
// Result items
// =============================================================================

/// One movie matching the user's quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// The matched quote text as the lookup service reported it.
    pub quote: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i64,
}

impl ResultItem {
    pub fn new(quote: impl Into<String>, title: impl Into<String>, year: i64) -> Self {
        Self {
            quote: quote.into(),
            title: title.into(),
            year,
        }
    }
}

/// Ordered, immutable list of matches for one search phrase.
///
/// Cloning is cheap: every clone shares the same backing slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet(Arc<[ResultItem]>);

impl ResultSet {
    /// A result set with no matches.
    pub fn empty() -> Self {
        Self(Arc::from(Vec::new()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ResultSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<ResultItem>> for ResultSet {
    fn from(items: Vec<ResultItem>) -> Self {
        Self(Arc::from(items))
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ResultItem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for ResultSet {
    type Target = [ResultItem];

    fn deref(&self) -> &[ResultItem] {
        &self.0
    }
}

// =============================================================================
// PagingCursor
// =============================================================================

/// Position of the next item to emit within a shared [`ResultSet`].
///
/// Invariant: `next_index <= result_set.len()`. Both constructors enforce it
/// and [`PagingCursor::take_page`] never moves past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagingCursor {
    result_set: ResultSet,
    next_index: usize,
}

impl PagingCursor {
    /// Start a cursor at the beginning of `result_set`.
    pub fn new(result_set: ResultSet) -> Self {
        Self {
            result_set,
            next_index: 0,
        }
    }

    /// Rebuild a cursor from persisted parts.
    ///
    /// Fails when `next_index` lies beyond the end of `result_set`.
    pub fn resume(result_set: ResultSet, next_index: usize) -> Result<Self> {
        if next_index > result_set.len() {
            return Err(QuoteFinderError::InvalidCursor {
                next_index,
                len: result_set.len(),
            });
        }
        Ok(Self {
            result_set,
            next_index,
        })
    }

    pub fn result_set(&self) -> &ResultSet {
        &self.result_set
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Number of items not yet emitted.
    pub fn remaining(&self) -> usize {
        self.result_set.len() - self.next_index
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Emit up to `page_size` items and advance past them.
    ///
    /// Returns fewer items when the tail is short and none once exhausted.
    pub fn take_page(&mut self, page_size: usize) -> Vec<PagedItem> {
        let start = self.next_index;
        let end = start + page_size.min(self.remaining());
        let items = self.result_set[start..end]
            .iter()
            .enumerate()
            .map(|(offset, item)| PagedItem {
                position: start + offset,
                item: item.clone(),
            })
            .collect();
        self.next_index = end;
        items
    }
}

// =============================================================================
// Page
// =============================================================================

/// An emitted item along with its absolute position in the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedItem {
    pub position: usize,
    pub item: ResultItem,
}

/// What one request produced. Consumed immediately by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    /// One or more matches, and whether any remain after them.
    Results {
        items: Vec<PagedItem>,
        has_more: bool,
    },
    /// The search produced no matches (or the lookup failed).
    NoResults,
    /// A continuation was requested before any search.
    NoActiveSearch,
    /// A continuation was requested after every match was emitted.
    AllConsumed,
}

impl Page {
    /// The emitted items; empty for every non-`Results` variant.
    pub fn items(&self) -> &[PagedItem] {
        match self {
            Page::Results { items, .. } => items,
            _ => &[],
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self, Page::Results { has_more: true, .. })
    }
}

// =============================================================================
// Tests
// =============================================================================
