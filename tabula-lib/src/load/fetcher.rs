//! The page-fetch collaborator.

use std::future::Future;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Row;

/// The result of fetching one page.
#[derive(Debug)]
pub enum FetchOutcome {
    /// A non-empty page of rows.
    Rows(Vec<Row>),
    /// The source has no more rows.
    Empty,
    /// The fetch failed.
    Failed(FetchError),
}

impl FetchOutcome {
    /// Wraps fetched rows, mapping an empty page to [`FetchOutcome::Empty`].
    pub fn from_rows(rows: Vec<Row>) -> Self {
        if rows.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Rows(rows)
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }
}

impl From<Result<Vec<Row>, FetchError>> for FetchOutcome {
    fn from(result: Result<Vec<Row>, FetchError>) -> Self {
        match result {
            Ok(rows) => FetchOutcome::from_rows(rows),
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

/// Supplies pages of rows for progressive loading.
///
/// Pages are numbered from 1; the table asks for `cursor_page + 1`, so with
/// initial data in place the first request is page 2.
///
/// Implementations own their timeouts. The table never cancels a fetch:
/// if it is reset or dropped meanwhile, the result is discarded.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use tabula_lib::load::{FetchOutcome, PageFetcher};
/// use tabula_lib::model::Row;
///
/// struct Numbers;
///
/// #[async_trait]
/// impl PageFetcher for Numbers {
///     async fn fetch_page(&self, page: usize) -> FetchOutcome {
///         if page > 3 {
///             return FetchOutcome::Empty;
///         }
///         FetchOutcome::from_rows(vec![Row::new().set("id", page as i64)])
///     }
/// }
/// ```
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the given 1-based page.
    async fn fetch_page(&self, page: usize) -> FetchOutcome;
}

/// A [`PageFetcher`] backed by an async closure. See [`fetch_fn`].
pub struct FnFetcher<F>(F);

/// Adapts an async closure into a [`PageFetcher`].
///
/// ```
/// use tabula_lib::load::{fetch_fn, FetchOutcome};
///
/// let fetcher = fetch_fn(|page| async move {
///     if page > 2 { FetchOutcome::Empty } else { FetchOutcome::from_rows(vec![]) }
/// });
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher<F>
where
    F: Fn(usize) -> Fut + Send + Sync,
    Fut: Future<Output = FetchOutcome> + Send,
{
    FnFetcher(f)
}

#[async_trait]
impl<F, Fut> PageFetcher for FnFetcher<F>
where
    F: Fn(usize) -> Fut + Send + Sync,
    Fut: Future<Output = FetchOutcome> + Send,
{
    async fn fetch_page(&self, page: usize) -> FetchOutcome {
        (self.0)(page).await
    }
}

/// A [`PageFetcher`] backed by a blocking closure. See [`fetch_fn_sync`].
pub struct SyncFetcher<F>(F);

/// Adapts a synchronous closure into a [`PageFetcher`].
pub fn fetch_fn_sync<F>(f: F) -> SyncFetcher<F>
where
    F: Fn(usize) -> FetchOutcome + Send + Sync,
{
    SyncFetcher(f)
}

#[async_trait]
impl<F> PageFetcher for SyncFetcher<F>
where
    F: Fn(usize) -> FetchOutcome + Send + Sync,
{
    async fn fetch_page(&self, page: usize) -> FetchOutcome {
        (self.0)(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        assert!(matches!(FetchOutcome::from(Ok(vec![])), FetchOutcome::Empty));
        assert!(FetchOutcome::from(Err(FetchError::failed(2, "x"))).is_failed());
        assert!(matches!(
            FetchOutcome::from(Ok(vec![Row::new()])),
            FetchOutcome::Rows(_)
        ));
    }

    #[tokio::test]
    async fn test_async_closure_fetcher() {
        let fetcher = fetch_fn(|page| async move {
            FetchOutcome::from_rows(vec![Row::new().set("page", page as i64)])
        });

        match fetcher.fetch_page(4).await {
            FetchOutcome::Rows(rows) => assert_eq!(rows[0].get_int("page").unwrap(), Some(4)),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
