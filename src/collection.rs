//! Lazy, forward-only paginated collections.
//!
//! A [`Collection`] holds one materialized page plus the continuation token
//! for the next. Consuming past the end of the page fetches exactly one
//! more page; nothing is prefetched and pages are never concatenated.

use std::fmt;

use futures::stream::{self, Stream};

use crate::client::AsanaClient;
use crate::error::{AsanaError, Result};
use crate::factory::Decode;
use crate::request::Request;
use crate::response::{Envelope, NextPage};

/// Pagination state of a [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionState {
    /// A page is materialized; more pages may follow.
    HasPage,
    /// Every item has been yielded and the server sent no continuation.
    Exhausted,
}

/// A lazily paginated sequence of resources.
///
/// Borrows the client it was fetched through; the client must outlive it.
///
/// # Example
///
/// ```ignore
/// let mut users = User::find_by_workspace(&client, "1234", RequestOptions::new()).await?;
/// while let Some(user) = users.try_next().await? {
///     println!("{} {:?}", user.gid, user.name);
/// }
/// ```
pub struct Collection<'c, T> {
    client: &'c AsanaClient,
    request: Request,
    items: Vec<T>,
    next_page: Option<NextPage>,
    position: usize,
    state: CollectionState,
}

impl<'c, T: Decode> Collection<'c, T> {
    /// Execute `request` and wrap the resulting page.
    pub(crate) async fn fetch(client: &'c AsanaClient, request: Request) -> Result<Self> {
        let envelope = client.execute(&request).await?;
        Self::from_envelope(client, request, envelope)
    }

    fn from_envelope(client: &'c AsanaClient, request: Request, envelope: Envelope) -> Result<Self> {
        let items = envelope
            .data
            .into_many()
            .into_iter()
            .map(|raw| T::decode(client.factory(), raw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            client,
            request,
            items,
            next_page: envelope.next_page,
            position: 0,
            state: CollectionState::HasPage,
        })
    }

    /// Fetch the page after this one as a fresh collection, leaving `self` untouched.
    ///
    /// Returns `None` when the server sent no continuation token.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error of the page request.
    pub async fn next_page(&self) -> Result<Option<Collection<'c, T>>> {
        match &self.next_page {
            Some(next) => {
                let request = self.request.with_offset(&next.offset);
                Ok(Some(Self::fetch(self.client, request).await?))
            }
            None => Ok(None),
        }
    }
}

impl<'c, T: Decode + Clone> Collection<'c, T> {
    /// Yield the next item, fetching the following page when this one is used up.
    ///
    /// A failed fetch leaves the collection unchanged, so calling again retries
    /// the same page.
    ///
    /// # Errors
    ///
    /// Returns the transport or parse error of the next-page request.
    pub async fn try_next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.items.get(self.position) {
                self.position += 1;
                return Ok(Some(item.clone()));
            }

            let Some(next) = &self.next_page else {
                self.state = CollectionState::Exhausted;
                return Ok(None);
            };

            let request = self.request.with_offset(&next.offset);
            tracing::debug!(%request, offset = %next.offset, "fetching next page");
            *self = Self::fetch(self.client, request).await?;
        }
    }

    /// Drain the remaining items of every page.
    ///
    /// # Errors
    ///
    /// Returns the first page-fetch error encountered.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while let Some(item) = self.try_next().await? {
            all.push(item);
        }
        Ok(all)
    }

    /// Drain at most `n` items, fetching no page beyond the one holding the `n`th.
    ///
    /// # Errors
    ///
    /// Returns the first page-fetch error encountered.
    pub async fn take(mut self, n: usize) -> Result<Vec<T>> {
        let mut taken = Vec::with_capacity(n.min(self.items.len()));
        while taken.len() < n {
            match self.try_next().await? {
                Some(item) => taken.push(item),
                None => break,
            }
        }
        Ok(taken)
    }

    /// The remaining items as a stream.
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> + 'c
    where
        T: 'c,
    {
        stream::try_unfold(self, |mut collection| async move {
            let item = collection.try_next().await?;
            Ok::<_, AsanaError>(item.map(|item| (item, collection)))
        })
    }
}

impl<'c, T> Collection<'c, T> {
    /// Items of the page currently held. Re-reading never triggers a fetch.
    pub fn current_page(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items on the current page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Continuation token for the following page, if any.
    pub fn next_page_token(&self) -> Option<&NextPage> {
        self.next_page.as_ref()
    }

    pub fn state(&self) -> CollectionState {
        self.state
    }

    /// The request that produced the current page.
    pub fn request(&self) -> &Request {
        &self.request
    }
}

impl<'a, 'c, T> IntoIterator for &'a Collection<'c, T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> fmt::Debug for Collection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("request", &self.request.to_string())
            .field("page_len", &self.items.len())
            .field("position", &self.position)
            .field("next_page", &self.next_page.as_ref().map(|n| n.offset.as_str()))
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;
    use crate::factory::AnyResource;
    use crate::request::{HttpMethod, RequestBuilder};
    use crate::stub::StubTransport;
    use futures::TryStreamExt;
    use serde_json::json;
    use std::sync::Arc;

    fn client(stub: &Arc<StubTransport>) -> AsanaClient {
        AsanaClient::with_transport(stub.clone(), ClientConfig::default())
    }

    fn list_request() -> Request {
        RequestBuilder::get("/tags").query("limit", 2).build().unwrap()
    }

    fn stub_two_pages() -> Arc<StubTransport> {
        let stub = Arc::new(StubTransport::default());
        stub.on(HttpMethod::Get, "/tags", |response| {
            if response.request().query_value("offset") == Some("p2") {
                response.body = Some(json!({"data": [{"gid": "3"}], "next_page": null}));
            } else {
                response.body = Some(json!({
                    "data": [{"gid": "1"}, {"gid": "2"}],
                    "next_page": {"offset": "p2"}
                }));
            }
        });
        stub
    }

    #[tokio::test]
    async fn test_iterates_across_pages_in_order() {
        let stub = stub_two_pages();
        let client = client(&stub);
        let mut tags = Collection::<AnyResource>::fetch(&client, list_request())
            .await
            .unwrap();

        let mut gids = Vec::new();
        while let Some(tag) = tags.try_next().await.unwrap() {
            gids.push(tag.gid().unwrap().to_string());
        }
        assert_eq!(gids, vec!["1", "2", "3"]);
        assert_eq!(tags.state(), CollectionState::Exhausted);
        assert_eq!(stub.call_count(), 2);

        assert!(tags.try_next().await.unwrap().is_none());
        assert_eq!(stub.call_count(), 2);
    }

    #[tokio::test]
    async fn test_current_page_rereads_without_fetch() {
        let stub = stub_two_pages();
        let client = client(&stub);
        let tags = Collection::<AnyResource>::fetch(&client, list_request())
            .await
            .unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags.iter().count(), 2);
        assert_eq!((&tags).into_iter().count(), 2);
        assert!(tags.has_next_page());
        assert_eq!(tags.state(), CollectionState::HasPage);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_next_page_does_not_mutate() {
        let stub = stub_two_pages();
        let client = client(&stub);
        let first = Collection::<AnyResource>::fetch(&client, list_request())
            .await
            .unwrap();

        let second = first.next_page().await.unwrap().expect("second page");
        assert_eq!(second.len(), 1);
        assert_eq!(second.request().query_value("offset"), Some("p2"));
        assert!(second.next_page().await.unwrap().is_none());
        assert_eq!(first.len(), 2);
    }

    #[tokio::test]
    async fn test_take_stops_fetching() {
        let stub = stub_two_pages();
        let client = client(&stub);
        let tags = Collection::<AnyResource>::fetch(&client, list_request())
            .await
            .unwrap();

        let taken = tags.take(2).await.unwrap();
        assert_eq!(taken.len(), 2);
        assert_eq!(stub.call_count(), 1);
    }

    #[tokio::test]
    async fn test_stream_yields_all_items() {
        let stub = stub_two_pages();
        let client = client(&stub);
        let tags = Collection::<AnyResource>::fetch(&client, list_request())
            .await
            .unwrap();

        let all: Vec<AnyResource> = tags.into_stream().try_collect().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retryable() {
        let stub = Arc::new(StubTransport::default());
        stub.on(HttpMethod::Get, "/tags", |response| {
            response.body = Some(json!({"data": [{"gid": "1"}], "next_page": {"offset": "p2"}}));
        });
        let client = client(&stub);
        let mut tags = Collection::<AnyResource>::fetch(&client, list_request())
            .await
            .unwrap();
        assert!(tags.try_next().await.unwrap().is_some());

        stub.on(HttpMethod::Get, "/tags", |response| {
            response.status = 500;
            response.body = Some(json!({"errors": [{"message": "Server Error"}]}));
        });
        let err = tags.try_next().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(tags.state(), CollectionState::HasPage);

        stub.on(HttpMethod::Get, "/tags", |response| {
            response.body = Some(json!({"data": [{"gid": "2"}]}));
        });
        let item = tags.try_next().await.unwrap().expect("retried page");
        assert_eq!(item.gid(), Some("2"));
        assert!(tags.try_next().await.unwrap().is_none());
        assert_eq!(stub.call_count(), 3);
    }
}
