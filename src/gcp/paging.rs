//! Cursor-based pagination

use super::http::ApiError;
use super::model::Page;
use std::future::Future;

/// Fetch pages until the cursor runs out and collect every item.
///
/// `fetch_page` receives the token of the page to read (`None` for the
/// first one). Any page failure aborts the whole drain.
pub async fn drain<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, ApiError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, ApiError>>,
{
    let mut items = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(page_token.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!("Drained {} items over {} pages", items.len(), pages);
    Ok(items)
}
