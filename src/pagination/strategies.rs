//! Loader strategies
//!
//! A pager is driven by exactly one of two loaders:
//!
//! - [`FixedTotalLoader`] when the total element count is known up front
//! - [`DynamicTotalLoader`] when the source reports the total with every page
//!
//! Both are addressed by offset. The page-number adapters below let a source
//! that thinks in 1-based page numbers plug into either one.

use super::types::page_number_for;
use crate::context::Context;
use crate::error::BoxError;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

// ============================================================================
// Offset-addressed Loaders
// ============================================================================

/// Loads one page of a collection whose total is fixed at construction
#[async_trait]
pub trait FixedTotalLoader<T>: Send + Sync {
    /// Fetch up to `page_size` elements starting at `offset`
    async fn fetch(&self, ctx: &Context, offset: i64, page_size: i64)
        -> Result<Vec<T>, BoxError>;
}

/// Loads one page and reports the collection's current total
#[async_trait]
pub trait DynamicTotalLoader<T>: Send + Sync {
    /// Fetch up to `page_size` elements starting at `offset`, along with the
    /// total element count the source reports right now
    async fn fetch(
        &self,
        ctx: &Context,
        offset: i64,
        page_size: i64,
    ) -> Result<(Vec<T>, i64), BoxError>;
}

// ============================================================================
// Closure Loaders
// ============================================================================

/// A [`FixedTotalLoader`] backed by an async closure, see [`fixed_fn`]
pub struct FixedFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

/// A [`DynamicTotalLoader`] backed by an async closure, see [`dynamic_fn`]
pub struct DynamicFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

/// Wrap `Fn(Context, offset, page_size) -> Future<Output = Result<Vec<T>, _>>`
/// as a fixed-total loader
pub fn fixed_fn<T, F, Fut>(f: F) -> FixedFn<F, T>
where
    F: Fn(Context, i64, i64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, BoxError>> + Send + 'static,
{
    FixedFn {
        f,
        _marker: PhantomData,
    }
}

/// Wrap `Fn(Context, offset, page_size) -> Future<Output = Result<(Vec<T>, total), _>>`
/// as a dynamic-total loader
pub fn dynamic_fn<T, F, Fut>(f: F) -> DynamicFn<F, T>
where
    F: Fn(Context, i64, i64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(Vec<T>, i64), BoxError>> + Send + 'static,
{
    DynamicFn {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<T, F, Fut> FixedTotalLoader<T> for FixedFn<F, T>
where
    T: Send,
    F: Fn(Context, i64, i64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, BoxError>> + Send + 'static,
{
    async fn fetch(
        &self,
        ctx: &Context,
        offset: i64,
        page_size: i64,
    ) -> Result<Vec<T>, BoxError> {
        (self.f)(ctx.clone(), offset, page_size).await
    }
}

#[async_trait]
impl<T, F, Fut> DynamicTotalLoader<T> for DynamicFn<F, T>
where
    T: Send,
    F: Fn(Context, i64, i64) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(Vec<T>, i64), BoxError>> + Send + 'static,
{
    async fn fetch(
        &self,
        ctx: &Context,
        offset: i64,
        page_size: i64,
    ) -> Result<(Vec<T>, i64), BoxError> {
        (self.f)(ctx.clone(), offset, page_size).await
    }
}

// ============================================================================
// Page Number Loaders
// ============================================================================

/// Loads a page by 1-based page number, total fixed up front
#[async_trait]
pub trait PageNumberLoader<T>: Send + Sync {
    /// Fetch page `page_num` (1, 2, 3, ...) of `page_size` elements
    async fn fetch_page(
        &self,
        ctx: &Context,
        page_num: i64,
        page_size: i64,
    ) -> Result<Vec<T>, BoxError>;
}

/// Loads a page by 1-based page number and reports the total element count
#[async_trait]
pub trait PageNumberTotalLoader<T>: Send + Sync {
    /// Fetch page `page_num` along with the current total element count
    async fn fetch_page(
        &self,
        ctx: &Context,
        page_num: i64,
        page_size: i64,
    ) -> Result<(Vec<T>, i64), BoxError>;
}

/// Adapts a page-number loader to offset addressing
///
/// The page number passed down is `offset / page_size + 1`, so start offsets
/// should be multiples of the page size.
#[derive(Debug, Clone)]
pub struct PageNumbered<L> {
    inner: L,
}

impl<L> PageNumbered<L> {
    /// Wrap a page-number loader
    pub fn new(inner: L) -> Self {
        Self { inner }
    }

    /// The wrapped loader
    pub fn inner(&self) -> &L {
        &self.inner
    }
}

#[async_trait]
impl<T, L> FixedTotalLoader<T> for PageNumbered<L>
where
    T: Send,
    L: PageNumberLoader<T>,
{
    async fn fetch(
        &self,
        ctx: &Context,
        offset: i64,
        page_size: i64,
    ) -> Result<Vec<T>, BoxError> {
        let page_num = page_number_for(offset, page_size);
        self.inner.fetch_page(ctx, page_num, page_size).await
    }
}

#[async_trait]
impl<T, L> DynamicTotalLoader<T> for PageNumbered<L>
where
    T: Send,
    L: PageNumberTotalLoader<T>,
{
    async fn fetch(
        &self,
        ctx: &Context,
        offset: i64,
        page_size: i64,
    ) -> Result<(Vec<T>, i64), BoxError> {
        let page_num = page_number_for(offset, page_size);
        self.inner.fetch_page(ctx, page_num, page_size).await
    }
}
