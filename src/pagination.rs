//! Offset pagination over Quetz list endpoints.
//!
//! List endpoints answer with an envelope `{result, count, skip, limit}`.
//! A few routes (channel members) return a bare JSON array instead, which is
//! read as a single, final page. [`paginate`] turns such an endpoint into a
//! lazy [`Pager`] stream that fetches one page at a time, only when the
//! consumer asks for more.

use std::collections::VecDeque;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::QuetzClient;
use crate::decode::{decode, decode_response, Record};
use crate::error::{QuetzError, Result};

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Raw list envelope as returned by the server.
#[derive(Debug, Deserialize)]
struct Envelope {
    result: Vec<Value>,
    count: u64,
    #[serde(default)]
    skip: u64,
    #[serde(default)]
    limit: Option<u64>,
}

/// Either shape a list endpoint may answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Envelope(Envelope),
    Bare(Vec<Value>),
}

impl Record for ListBody {
    const KIND: &'static str = "list envelope";
}

impl ListBody {
    /// Normalize to an envelope; a bare array is the last page at `skip`.
    fn into_envelope(self, skip: u64) -> Envelope {
        match self {
            Self::Envelope(envelope) => envelope,
            Self::Bare(result) => Envelope {
                count: skip + result.len() as u64,
                skip,
                limit: None,
                result,
            },
        }
    }
}

/// A page of results from a Quetz list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub count: u64,
    /// Offset of the first item on this page.
    pub skip: u64,
    /// Page size the server applied.
    pub limit: u64,
}

impl<T> Page<T> {
    /// Returns true if items beyond this page exist.
    ///
    /// An empty page never has more, whatever `count` says.
    #[must_use]
    pub fn has_more(&self) -> bool {
        !self.items.is_empty() && self.skip + (self.items.len() as u64) < self.count
    }

    /// Offset of the following page, if any.
    #[must_use]
    pub fn next_offset(&self) -> Option<u64> {
        self.has_more().then(|| self.skip + self.limit)
    }

    /// Map the items to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            skip: self.skip,
            limit: self.limit,
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns an iterator over the items in this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Query parameters for paginated requests.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip.
    pub skip: u64,
    /// Maximum number of items to return.
    pub limit: u32,
}

/// Extra query parameters sent with every page request.
pub type QueryParams = Vec<(String, String)>;

/// Fetch and decode a single page.
///
/// The envelope is validated as a whole; items are left undecoded.
/// A bare array response counts as the final page.
async fn fetch_envelope(
    client: &QuetzClient,
    path: &str,
    query: &[(String, String)],
    page: PaginationParams,
) -> Result<Envelope> {
    let mut params: Vec<(&str, String)> = query
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    params.push(("skip", page.skip.to_string()));
    params.push(("limit", page.limit.to_string()));

    let response = client.get_with_query(path, &params).await?;
    let body: ListBody = decode_response(response).await?;
    let envelope = body.into_envelope(page.skip);
    tracing::debug!(
        path,
        skip = page.skip,
        limit = page.limit,
        received = envelope.result.len(),
        count = envelope.count,
        "fetched page"
    );
    Ok(envelope)
}

/// Fetch one page of `T` records.
///
/// # Errors
///
/// Returns an error if the request fails or any item fails to decode.
pub async fn fetch_page<T: Record>(
    client: &QuetzClient,
    path: &str,
    query: &[(String, String)],
    page: PaginationParams,
) -> Result<Page<T>> {
    let envelope = fetch_envelope(client, path, query, page).await?;
    let items = envelope
        .result
        .into_iter()
        .map(decode)
        .collect::<Result<Vec<T>>>()?;

    Ok(Page {
        items,
        count: envelope.count,
        skip: envelope.skip,
        limit: envelope.limit.unwrap_or(u64::from(page.limit)),
    })
}

/// Lazy stream of records spread over several pages.
///
/// Created by [`paginate`]. Nothing is requested until the stream is first
/// polled; the next page is requested only once every item of the current
/// page has been yielded. Any error ends the stream.
pub struct Pager<T> {
    inner: BoxStream<'static, Result<T>>,
}

impl<T> fmt::Debug for Pager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pager").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Pager<T> {
    /// Transform every successfully decoded item.
    pub fn map_items<U, F>(self, mut f: F) -> Pager<U>
    where
        U: Send + 'static,
        F: FnMut(T) -> U + Send + 'static,
    {
        Pager {
            inner: self.inner.map(move |item| item.map(&mut f)).boxed(),
        }
    }
}

impl<T> Stream for Pager<T> {
    type Item = Result<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

struct PagerState {
    client: QuetzClient,
    path: String,
    query: QueryParams,
    page_size: u32,
    offset: u64,
    buffer: VecDeque<Value>,
    last_page: bool,
    finished: bool,
}

impl PagerState {
    /// Produce the next item, fetching a page when the buffer is empty.
    async fn next_item<T: Record>(&mut self) -> Option<Result<T>> {
        if self.finished {
            return None;
        }

        if self.buffer.is_empty() {
            if self.last_page {
                self.finished = true;
                return None;
            }

            let page = PaginationParams {
                skip: self.offset,
                limit: self.page_size,
            };
            let envelope =
                match fetch_envelope(&self.client, &self.path, &self.query, page).await {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                };

            let received = envelope.result.len() as u64;
            if received == 0 {
                self.finished = true;
                return None;
            }

            self.last_page = self.offset + received >= envelope.count;
            self.offset += u64::from(self.page_size);
            self.buffer.extend(envelope.result);
        }

        let raw = self.buffer.pop_front()?;
        let item = decode(raw);
        if item.is_err() {
            self.finished = true;
            self.buffer.clear();
        }
        Some(item)
    }
}

/// Lazily page through a list endpoint.
///
/// Requests `path` with `query` plus `skip`/`limit`, starting at offset 0 and
/// advancing by `page_size` until the server's `count` is reached or an
/// empty page comes back.
///
/// # Errors
///
/// Returns [`QuetzError::Config`] immediately if `page_size` is zero. Request
/// and decode failures are yielded by the stream at the item that triggered
/// them.
pub fn paginate<T>(
    client: &QuetzClient,
    path: impl Into<String>,
    query: QueryParams,
    page_size: u32,
) -> Result<Pager<T>>
where
    T: Record + Send + 'static,
{
    if page_size == 0 {
        return Err(QuetzError::Config(
            "page size must be at least 1".to_string(),
        ));
    }

    let state = PagerState {
        client: client.clone(),
        path: path.into(),
        query,
        page_size,
        offset: 0,
        buffer: VecDeque::new(),
        last_page: false,
        finished: false,
    };

    let inner = stream::unfold(state, |mut state| async move {
        let item = state.next_item::<T>().await?;
        Some((item, state))
    })
    .boxed();

    Ok(Pager { inner })
}
