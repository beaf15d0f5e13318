//! Pagination module
//!
//! Supports: fixed total, dynamic total (re-read on every fetch), page-number
//! sources via an adapter
//!
//! # Overview
//!
//! A [`Pager`] tracks a cursor (offset of the next element) and an extent
//! (believed total) and calls its bound loader one page at a time. Callers can
//! step with [`Pager::advance`], drain with [`Pager::all`], or consume pages
//! as a stream with [`Pager::into_stream`].

mod pager;
mod strategies;
mod types;

pub use pager::{Pager, PagerBuilder};
pub use strategies::{
    dynamic_fn, fixed_fn, DynamicFn, DynamicTotalLoader, FixedFn, FixedTotalLoader,
    PageNumberLoader, PageNumberTotalLoader, PageNumbered,
};
pub use types::{
    page_number_for, pages_for, Page, PagerOption, DEFAULT_PAGE_SIZE, DEFAULT_START_OFFSET,
    DEFAULT_TOTAL,
};
