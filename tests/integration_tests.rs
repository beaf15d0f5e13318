//! Integration tests against an in-memory "remote" source
//!
//! Tests the full flow: config → pager → loader calls → pages / drained items

use pagewalk::{
    dynamic_fn, fixed_fn, BoxError, Context, ContextError, DynamicTotalLoader, Error, Pager,
    PagerConfig,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Test Source
// ============================================================================

/// A growable table that answers offset/limit queries with the current count
#[derive(Clone, Default)]
struct Table {
    rows: Arc<Mutex<Vec<String>>>,
    queries: Arc<Mutex<Vec<(i64, i64)>>>,
}

impl Table {
    fn with_rows(n: usize) -> Self {
        let table = Self::default();
        table.insert(n);
        table
    }

    fn insert(&self, n: usize) {
        let mut rows = self.rows.lock().unwrap();
        let start = rows.len();
        rows.extend((start..start + n).map(|i| format!("row-{i}")));
    }

    fn query(&self, offset: i64, limit: i64) -> (Vec<String>, i64) {
        self.queries.lock().unwrap().push((offset, limit));
        let rows = self.rows.lock().unwrap();
        let start = (offset as usize).min(rows.len());
        let end = (start + limit as usize).min(rows.len());
        (rows[start..end].to_vec(), rows.len() as i64)
    }

    fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl DynamicTotalLoader<String> for Table {
    async fn fetch(
        &self,
        _ctx: &Context,
        offset: i64,
        page_size: i64,
    ) -> Result<(Vec<String>, i64), BoxError> {
        Ok(self.query(offset, page_size))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// End-to-end Tests
// ============================================================================

#[tokio::test]
async fn test_drain_table_with_yaml_config() {
    init_tracing();
    let table = Table::with_rows(25);
    let config = PagerConfig::from_yaml_str("page_size: 10\n").unwrap();

    let mut pager = Pager::builder()
        .with_config(&config)
        .with_dynamic_loader(table.clone())
        .build()
        .unwrap();

    let rows = pager.all(&Context::background()).await.unwrap();
    assert_eq!(rows.len(), 25);
    assert_eq!(rows.first().map(String::as_str), Some("row-0"));
    assert_eq!(rows.last().map(String::as_str), Some("row-24"));
    assert_eq!(table.query_count(), 3);
}

#[tokio::test]
async fn test_dynamic_total_follows_growth() {
    init_tracing();
    let table = Table::with_rows(4);
    let mut pager = Pager::builder()
        .with_page_size(3)
        .with_dynamic_loader(table.clone())
        .build()
        .unwrap();
    let ctx = Context::background();

    let page = pager.advance(&ctx).await.unwrap();
    assert_eq!(page.items, vec!["row-0", "row-1", "row-2"]);
    assert!(!page.done);

    // Rows land while paging is in progress
    table.insert(3);

    let page = pager.advance(&ctx).await.unwrap();
    assert_eq!(page.items, vec!["row-3", "row-4", "row-5"]);
    assert_eq!(pager.extent(), 7);
    assert!(!page.done);

    let page = pager.advance(&ctx).await.unwrap();
    assert_eq!(page.items, vec!["row-6"]);
    assert!(page.done);
}

#[tokio::test]
async fn test_drain_error_converts_to_crate_error() {
    async fn load_everything() -> pagewalk::Result<Vec<i64>> {
        let mut pager = Pager::builder()
            .with_page_size(2)
            .with_total(6)
            .with_fixed_loader(fixed_fn(|_ctx, offset, size| async move {
                if offset >= 4 {
                    return Err::<Vec<i64>, BoxError>("backend unavailable".into());
                }
                Ok((offset..offset + size).collect())
            }))
            .build()?;
        Ok(pager.all(&Context::background()).await?)
    }

    let err = load_everything().await.unwrap_err();
    assert!(matches!(err, Error::Fetch(_)));
    assert_eq!(err.offset(), Some(4));
    assert!(err.is_retryable());
    assert!(err.to_string().contains("backend unavailable"));
}

#[tokio::test]
async fn test_anyhow_loader_error_keeps_context() {
    use anyhow::Context as _;

    let mut pager = Pager::builder()
        .with_page_size(2)
        .with_total(4)
        .with_fixed_loader(fixed_fn(|_ctx, offset, _size| async move {
            let raw = if offset == 0 { "7" } else { "not-a-number" };
            let value: i64 = raw
                .parse()
                .with_context(|| format!("decoding row at {offset}"))?;
            Ok::<_, BoxError>(vec![value])
        }))
        .build()
        .unwrap();

    let err = pager.all(&Context::background()).await.unwrap_err();
    assert_eq!(err.items(), &[7]);
    assert_eq!(err.fetch_error().offset(), 2);
    assert_eq!(err.fetch_error().cause().to_string(), "decoding row at 2");
}

#[tokio::test]
async fn test_config_error_converts_to_crate_error() {
    let config = PagerConfig::from_json_str(r#"{"page_size": 10, "total": 5, "start_offset": 5}"#)
        .unwrap();
    let err: Error = Pager::<String>::builder()
        .with_config(&config)
        .with_dynamic_loader(Table::default())
        .build()
        .unwrap_err()
        .into();
    assert!(matches!(err, Error::Config(_)));
    assert!(!err.is_retryable());
}

#[tokio::test(start_paused = true)]
async fn test_deadline_surfaces_as_fetch_error() {
    init_tracing();
    let loader = dynamic_fn(|ctx: Context, offset, _size| async move {
        tokio::select! {
            reason = ctx.done() => Err::<(Vec<i64>, i64), BoxError>(reason.into()),
            () = tokio::time::sleep(Duration::from_secs(5)) => Ok((vec![offset], 100)),
        }
    });
    let mut pager = Pager::builder()
        .with_page_size(10)
        .with_dynamic_loader(loader)
        .build()
        .unwrap();

    let ctx = Context::background().with_timeout(Duration::from_millis(100));
    let err = pager.all(&ctx).await.unwrap_err();
    assert!(err.items().is_empty());

    let (_, fetch) = err.into_parts();
    assert!(fetch.is_cancelled());
    assert_eq!(
        fetch.cause().downcast_ref::<ContextError>(),
        Some(&ContextError::DeadlineExceeded)
    );
    assert_eq!(pager.cursor(), 0);
}

#[tokio::test]
async fn test_stream_pages_from_table() {
    use futures::TryStreamExt;

    let table = Table::with_rows(5);
    let pager = Pager::builder()
        .with_page_size(2)
        .with_dynamic_loader(table)
        .build()
        .unwrap();

    let sizes: Vec<usize> = pager
        .into_stream(Context::background())
        .map_ok(|page| page.len())
        .try_collect()
        .await
        .unwrap();
    assert_eq!(sizes, vec![2, 2, 1]);
}
