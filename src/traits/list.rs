//! List trait for fetching paginated collections.

use async_trait::async_trait;

use crate::client::AsanaClient;
use crate::collection::Collection;
use crate::error::Result;
use crate::factory::Decode;
use crate::params::RequestOptions;
use crate::request::RequestBuilder;
use crate::traits::Resource;

/// List resources matching a query, one lazily fetched page at a time.
///
/// Implementors only describe the first request; paging, `opt_*` options
/// and decoding are shared.
///
/// # Example
///
/// ```ignore
/// use asanapi::{AsanaClient, List, RequestOptions, User, UserListQuery};
///
/// let client = AsanaClient::from_env()?;
/// let mut users = User::find_all(&client, &UserListQuery::default(), RequestOptions::new()).await?;
/// while let Some(user) = users.try_next().await? {
///     println!("{}", user.gid);
/// }
/// ```
#[async_trait]
pub trait List: Resource {
    /// Filters for the list endpoint.
    type Query: Send + Sync;

    /// Describe the first-page request. Required filters are validated here.
    ///
    /// # Errors
    ///
    /// Returns [`AsanaError::MissingParameter`](crate::AsanaError::MissingParameter)
    /// when a required filter is absent.
    fn list_request(query: &Self::Query) -> Result<RequestBuilder>;

    /// Fetch the first page and wrap it in a [`Collection`].
    ///
    /// # Errors
    ///
    /// Validation errors are returned before any request; otherwise the
    /// first page's transport or parse error.
    #[tracing::instrument(skip_all)]
    async fn find_all<'c>(
        client: &'c AsanaClient,
        query: &Self::Query,
        options: RequestOptions,
    ) -> Result<Collection<'c, Self>> {
        let builder = Self::list_request(query)?;
        paginate(client, builder, &options).await
    }
}

/// Apply options and page size to a list request and fetch the first page.
pub(crate) async fn paginate<'c, T: Decode>(
    client: &'c AsanaClient,
    builder: RequestBuilder,
    options: &RequestOptions,
) -> Result<Collection<'c, T>> {
    let per_page = options.resolved_per_page(client.per_page())?;
    let request = builder.options(options).query("limit", per_page).build()?;
    Collection::fetch(client, request).await
}
