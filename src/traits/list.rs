//! List trait for paginated collections.

use async_trait::async_trait;

use crate::client::QuetzClient;
use crate::decode::Record;
use crate::error::Result;
use crate::pagination::{fetch_page, paginate, Page, Pager, PaginationParams};

/// List records from a paginated endpoint.
///
/// Implementors only name their endpoint; paging is shared.
///
/// # Example
///
/// ```ignore
/// use futures::TryStreamExt;
/// use quetz_client::{Channel, List, QuetzClient};
///
/// let client = QuetzClient::from_env()?;
///
/// // Lazily walk every channel, 50 per request
/// let channels: Vec<Channel> = Channel::list(&client, &(), 50)?.try_collect().await?;
///
/// // Or fetch a single page
/// let page = Channel::list_page(&client, &(), PaginationParams { skip: 0, limit: 10 }).await?;
/// ```
#[async_trait]
pub trait List: Record + Send + 'static {
    /// What the listing is scoped to (`()` for global lists, a channel name
    /// for per-channel lists).
    type Scope: ?Sized + Sync;

    /// Endpoint path relative to the server root.
    fn list_path(scope: &Self::Scope) -> String;

    /// Lazily page through every record in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error immediately if `page_size` is zero; request failures
    /// surface while consuming the stream.
    fn list(client: &QuetzClient, scope: &Self::Scope, page_size: u32) -> Result<Pager<Self>> {
        paginate(client, Self::list_path(scope), Vec::new(), page_size)
    }

    /// Fetch a single page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or any item fails to decode.
    async fn list_page(
        client: &QuetzClient,
        scope: &Self::Scope,
        page: PaginationParams,
    ) -> Result<Page<Self>> {
        fetch_page(client, &Self::list_path(scope), &[], page).await
    }
}
