//! The pager: cursor state plus one bound loader strategy
//!
//! ```rust,ignore
//! use pagewalk::{fixed_fn, Context, Pager};
//!
//! let mut pager = Pager::builder()
//!     .with_page_size(3)
//!     .with_total(8)
//!     .with_fixed_loader(fixed_fn(|_ctx, offset, size| async move {
//!         Ok(source.slice(offset, size))
//!     }))
//!     .build()?;
//!
//! let items = pager.all(&Context::background()).await?;
//! ```

use super::strategies::{DynamicTotalLoader, FixedTotalLoader};
use super::types::{Draft, Page, PagerOption};
use crate::config::PagerConfig;
use crate::context::Context;
use crate::error::{ConfigError, DrainError, FetchError};
use futures::stream::{self, Stream};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// The loader a pager was built with
enum Strategy<T> {
    Fixed(Arc<dyn FixedTotalLoader<T>>),
    Dynamic(Arc<dyn DynamicTotalLoader<T>>),
}

/// Walks a paginated collection by offset
///
/// `cursor` is the offset of the next element to fetch and `extent` the
/// total element count the pager believes in. Every successful fetch moves
/// the cursor forward by exactly `page_size`; with a dynamic-total loader it
/// also replaces the extent with the reported total. A failed fetch changes
/// nothing, so the same call can be retried.
pub struct Pager<T> {
    page_size: i64,
    cursor: i64,
    extent: i64,
    strategy: Strategy<T>,
}

impl<T> Pager<T> {
    /// Build a pager from options applied in order
    ///
    /// Each option checks its own argument as it is applied; the folded result
    /// then needs exactly one loader and a start offset below the total. If
    /// both loaders are bound the dynamic-total one is used.
    ///
    /// An invalid option fails construction on the spot, before the loader
    /// check and even if a later option would have overridden it.
    pub fn new(options: impl IntoIterator<Item = PagerOption<T>>) -> Result<Self, ConfigError> {
        let mut draft = Draft::default();
        for option in options {
            option.apply(&mut draft)?;
        }

        let strategy = match (draft.fixed, draft.dynamic) {
            (_, Some(dynamic)) => Strategy::Dynamic(dynamic),
            (Some(fixed), None) => Strategy::Fixed(fixed),
            (None, None) => return Err(ConfigError::LoaderRequired),
        };
        if draft.page_size <= 0 {
            return Err(ConfigError::NonPositivePageSize(draft.page_size));
        }
        if draft.total <= 0 {
            return Err(ConfigError::NonPositiveTotal(draft.total));
        }
        if draft.start_offset < 0 {
            return Err(ConfigError::NegativeStart(draft.start_offset));
        }
        if draft.start_offset >= draft.total {
            return Err(ConfigError::StartNotBeforeTotal {
                start: draft.start_offset,
                total: draft.total,
            });
        }

        let pager = Self {
            page_size: draft.page_size,
            cursor: draft.start_offset,
            extent: draft.total,
            strategy,
        };
        debug!(
            page_size = pager.page_size,
            cursor = pager.cursor,
            extent = pager.extent,
            dynamic_total = pager.uses_dynamic_total(),
            "Pager created"
        );
        Ok(pager)
    }

    /// Start a fluent builder
    pub fn builder() -> PagerBuilder<T> {
        PagerBuilder::new()
    }

    /// Elements requested per fetch
    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// Offset of the next element to fetch
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Total element count the pager currently believes in
    pub fn extent(&self) -> i64 {
        self.extent
    }

    /// Check if no more fetches will be issued
    pub fn is_done(&self) -> bool {
        self.cursor >= self.extent
    }

    /// Elements believed left to fetch
    pub fn remaining(&self) -> i64 {
        self.extent.saturating_sub(self.cursor).max(0)
    }

    /// Check if the extent is refreshed from the loader on every fetch
    pub fn uses_dynamic_total(&self) -> bool {
        matches!(self.strategy, Strategy::Dynamic(_))
    }
}

impl<T: Send> Pager<T> {
    /// Fetch the next page
    ///
    /// Once the cursor has reached the extent this returns an empty page with
    /// `done = true` without calling the loader, every time. On loader failure
    /// the cursor and extent are left as they were.
    pub async fn advance(&mut self, ctx: &Context) -> Result<Page<T>, FetchError> {
        let offset = self.cursor;
        if self.is_done() {
            trace!(cursor = offset, extent = self.extent, "Pager exhausted");
            return Ok(Page::exhausted(offset));
        }

        let items = match &self.strategy {
            Strategy::Fixed(loader) => {
                let items = loader
                    .fetch(ctx, offset, self.page_size)
                    .await
                    .map_err(|e| self.fetch_failed(offset, e))?;
                self.cursor = offset.saturating_add(self.page_size);
                items
            }
            Strategy::Dynamic(loader) => {
                let (items, new_extent) = loader
                    .fetch(ctx, offset, self.page_size)
                    .await
                    .map_err(|e| self.fetch_failed(offset, e))?;
                if new_extent < 0 {
                    warn!(offset, new_extent, "Loader reported a negative total");
                }
                self.cursor = offset.saturating_add(self.page_size);
                self.extent = new_extent;
                items
            }
        };

        let done = self.is_done();
        debug!(
            offset,
            items = items.len(),
            cursor = self.cursor,
            extent = self.extent,
            done,
            "Fetched page"
        );
        Ok(Page::new(items, offset, done))
    }

    /// Fetch every remaining page and concatenate them in fetch order
    ///
    /// Stops only when the cursor reaches the extent; empty pages along the
    /// way are kept going past. On failure the items fetched so far come back
    /// inside the [`DrainError`].
    pub async fn all(&mut self, ctx: &Context) -> Result<Vec<T>, DrainError<T>> {
        let capacity = usize::try_from(self.remaining()).unwrap_or(0).min(1 << 16);
        let mut items = Vec::with_capacity(capacity);
        loop {
            match self.advance(ctx).await {
                Ok(page) => {
                    let done = page.done;
                    items.extend(page.items);
                    if done {
                        debug!(total = items.len(), "Drained all pages");
                        return Ok(items);
                    }
                }
                Err(e) => return Err(DrainError::new(items, e)),
            }
        }
    }

    /// Turn the pager into a stream of pages
    ///
    /// Yields every fetched page and ends after the one marked `done`. A fetch
    /// error is yielded once and ends the stream. A pager that is already
    /// exhausted yields nothing.
    pub fn into_stream(self, ctx: Context) -> impl Stream<Item = Result<Page<T>, FetchError>> {
        stream::unfold(Some((self, ctx)), |state| async move {
            let (mut pager, ctx) = state?;
            if pager.is_done() {
                return None;
            }
            match pager.advance(&ctx).await {
                Ok(page) => {
                    let next = if page.done { None } else { Some((pager, ctx)) };
                    Some((Ok(page), next))
                }
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    fn fetch_failed(&self, offset: i64, source: crate::error::BoxError) -> FetchError {
        warn!(offset, page_size = self.page_size, error = %source, "Fetch failed");
        FetchError::new(offset, source)
    }
}

impl<T> fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager")
            .field("page_size", &self.page_size)
            .field("cursor", &self.cursor)
            .field("extent", &self.extent)
            .field("dynamic_total", &self.uses_dynamic_total())
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder recording [`PagerOption`]s in call order
pub struct PagerBuilder<T> {
    options: Vec<PagerOption<T>>,
}

impl<T> Default for PagerBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PagerBuilder<T> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
        }
    }

    /// Set the offset of the first fetch
    #[must_use]
    pub fn with_start_offset(mut self, offset: i64) -> Self {
        self.options.push(PagerOption::StartOffset(offset));
        self
    }

    /// Set elements requested per fetch
    #[must_use]
    pub fn with_page_size(mut self, size: i64) -> Self {
        self.options.push(PagerOption::PageSize(size));
        self
    }

    /// Set the total element count
    #[must_use]
    pub fn with_total(mut self, total: i64) -> Self {
        self.options.push(PagerOption::Total(total));
        self
    }

    /// Bind a fixed-total loader
    #[must_use]
    pub fn with_fixed_loader(mut self, loader: impl FixedTotalLoader<T> + 'static) -> Self {
        self.options.push(PagerOption::fixed_loader(loader));
        self
    }

    /// Bind a dynamic-total loader
    #[must_use]
    pub fn with_dynamic_loader(mut self, loader: impl DynamicTotalLoader<T> + 'static) -> Self {
        self.options.push(PagerOption::dynamic_loader(loader));
        self
    }

    /// Append a raw option
    #[must_use]
    pub fn with_option(mut self, option: PagerOption<T>) -> Self {
        self.options.push(option);
        self
    }

    /// Append the options a loaded config sets
    #[must_use]
    pub fn with_config(mut self, config: &PagerConfig) -> Self {
        self.options.extend(config.options());
        self
    }

    /// Validate and build the pager
    pub fn build(self) -> Result<Pager<T>, ConfigError> {
        Pager::new(self.options)
    }
}
