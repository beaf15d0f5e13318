//! Pagination types
//!
//! Defines the page result, the construction options, and the extent
//! arithmetic shared by the pager and its callers.

use super::strategies::{DynamicTotalLoader, FixedTotalLoader};
use crate::error::ConfigError;
use std::fmt;
use std::sync::Arc;

/// Elements requested per fetch when no page size is set
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Believed total when none is set
pub const DEFAULT_TOTAL: i64 = 1;

/// Offset of the first fetch when none is set
pub const DEFAULT_START_OFFSET: i64 = 0;

/// One fetch's worth of elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Elements returned by the loader, at most `page_size` of them
    pub items: Vec<T>,
    /// Offset the page was requested at
    pub offset: i64,
    /// Is the collection exhausted after this page?
    pub done: bool,
}

impl<T> Page<T> {
    /// Create a page
    pub fn new(items: Vec<T>, offset: i64, done: bool) -> Self {
        Self {
            items,
            offset,
            done,
        }
    }

    /// The empty page returned once the pager is exhausted
    pub fn exhausted(offset: i64) -> Self {
        Self::new(Vec::new(), offset, true)
    }

    /// Number of elements on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page has no elements
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take the elements
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// A single construction option for [`Pager::new`](super::Pager::new)
///
/// Options are applied in order onto a default draft; setting the same thing
/// twice keeps the last value.
pub enum PagerOption<T> {
    /// Offset of the first fetch (must be `>= 0`)
    StartOffset(i64),
    /// Elements requested per fetch (must be `> 0`)
    PageSize(i64),
    /// Total element count (must be `> 0`)
    Total(i64),
    /// Bind a loader whose total is fixed up front
    FixedLoader(Arc<dyn FixedTotalLoader<T>>),
    /// Bind a loader that reports a fresh total on every fetch
    DynamicLoader(Arc<dyn DynamicTotalLoader<T>>),
}

impl<T> PagerOption<T> {
    /// Start fetching at `offset`
    pub fn start_offset(offset: i64) -> Self {
        Self::StartOffset(offset)
    }

    /// Request `size` elements per fetch
    pub fn page_size(size: i64) -> Self {
        Self::PageSize(size)
    }

    /// Assume the collection holds `total` elements
    pub fn total(total: i64) -> Self {
        Self::Total(total)
    }

    /// Bind a fixed-total loader
    pub fn fixed_loader(loader: impl FixedTotalLoader<T> + 'static) -> Self {
        Self::FixedLoader(Arc::new(loader))
    }

    /// Bind a dynamic-total loader
    pub fn dynamic_loader(loader: impl DynamicTotalLoader<T> + 'static) -> Self {
        Self::DynamicLoader(Arc::new(loader))
    }

    /// Validate this option's own argument and write it into `draft`
    pub(crate) fn apply(self, draft: &mut Draft<T>) -> Result<(), ConfigError> {
        match self {
            Self::StartOffset(offset) => {
                if offset < 0 {
                    return Err(ConfigError::NegativeStart(offset));
                }
                draft.start_offset = offset;
            }
            Self::PageSize(size) => {
                if size <= 0 {
                    return Err(ConfigError::NonPositivePageSize(size));
                }
                draft.page_size = size;
            }
            Self::Total(total) => {
                if total <= 0 {
                    return Err(ConfigError::NonPositiveTotal(total));
                }
                draft.total = total;
            }
            Self::FixedLoader(loader) => draft.fixed = Some(loader),
            Self::DynamicLoader(loader) => draft.dynamic = Some(loader),
        }
        Ok(())
    }
}

impl<T> Clone for PagerOption<T> {
    fn clone(&self) -> Self {
        match self {
            Self::StartOffset(v) => Self::StartOffset(*v),
            Self::PageSize(v) => Self::PageSize(*v),
            Self::Total(v) => Self::Total(*v),
            Self::FixedLoader(l) => Self::FixedLoader(Arc::clone(l)),
            Self::DynamicLoader(l) => Self::DynamicLoader(Arc::clone(l)),
        }
    }
}

impl<T> fmt::Debug for PagerOption<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartOffset(v) => f.debug_tuple("StartOffset").field(v).finish(),
            Self::PageSize(v) => f.debug_tuple("PageSize").field(v).finish(),
            Self::Total(v) => f.debug_tuple("Total").field(v).finish(),
            Self::FixedLoader(_) => f.write_str("FixedLoader(..)"),
            Self::DynamicLoader(_) => f.write_str("DynamicLoader(..)"),
        }
    }
}

/// Construction state options are folded into before validation
pub(crate) struct Draft<T> {
    pub(crate) start_offset: i64,
    pub(crate) page_size: i64,
    pub(crate) total: i64,
    pub(crate) fixed: Option<Arc<dyn FixedTotalLoader<T>>>,
    pub(crate) dynamic: Option<Arc<dyn DynamicTotalLoader<T>>>,
}

impl<T> Default for Draft<T> {
    fn default() -> Self {
        Self {
            start_offset: DEFAULT_START_OFFSET,
            page_size: DEFAULT_PAGE_SIZE,
            total: DEFAULT_TOTAL,
            fixed: None,
            dynamic: None,
        }
    }
}

/// Number of `page_size` pages needed to cover `total` elements
///
/// Ceiling division. A `page_size` of zero (or less) yields 0, as does a
/// non-positive `total`.
pub fn pages_for(total: i64, page_size: i64) -> i64 {
    if page_size <= 0 || total <= 0 {
        return 0;
    }
    total / page_size + i64::from(total % page_size != 0)
}

/// 1-based number of the page that starts at or contains `offset`
///
/// Returns 0 for a non-positive `page_size` or a negative `offset`.
pub fn page_number_for(offset: i64, page_size: i64) -> i64 {
    if page_size <= 0 || offset < 0 {
        return 0;
    }
    offset / page_size + 1
}
