//! # pagewalk
//!
//! A small, Rust-native engine for walking paginated data sources.
//!
//! Give it a loader and a page size and it keeps the offset and total-count
//! bookkeeping: one page at a time, as a stream, or fully drained.
//!
//! ## Features
//!
//! - **Two loader strategies**: total fixed up front, or re-reported by the
//!   source on every fetch
//! - **Retry-safe stepping**: a failed fetch leaves the cursor untouched
//! - **Partial results**: draining keeps whatever arrived before a failure
//! - **Cancellation**: a [`Context`] is passed through to every loader call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewalk::{dynamic_fn, Context, Pager};
//!
//! #[tokio::main]
//! async fn main() -> pagewalk::Result<()> {
//!     let mut pager = Pager::builder()
//!         .with_page_size(100)
//!         .with_dynamic_loader(dynamic_fn(|ctx, offset, limit| async move {
//!             let (rows, total) = api.list_users(&ctx, offset, limit).await?;
//!             Ok((rows, total))
//!         }))
//!         .build()?;
//!
//!     let ctx = Context::background();
//!     while !pager.is_done() {
//!         let page = pager.advance(&ctx).await?;
//!         // Process page.items
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Cancellation and deadlines for loader calls
pub mod context;

/// Pager and loader strategies
pub mod pagination;

/// Pager settings from YAML/JSON
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::PagerConfig;
pub use context::{CancelHandle, Context, ContextError};
pub use error::{BoxError, ConfigError, DrainError, Error, FetchError, Result};
pub use pagination::{
    dynamic_fn, fixed_fn, page_number_for, pages_for, DynamicTotalLoader, FixedTotalLoader, Page,
    PageNumberLoader, PageNumberTotalLoader, PageNumbered, Pager, PagerBuilder, PagerOption,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
