//! Get trait for fetching single resources.

use async_trait::async_trait;

use crate::client::AsanaClient;
use crate::error::Result;
use crate::params::RequestOptions;
use crate::request::RequestBuilder;
use crate::traits::Resource;

/// Fetch a single resource by gid.
///
/// The default implementation issues `GET /{plural}/{gid}`; resource types
/// only override it when their endpoint differs.
///
/// # Example
///
/// ```ignore
/// use asanapi::{AsanaClient, Get, RequestOptions, Workspace};
///
/// let client = AsanaClient::from_env()?;
/// let workspace = Workspace::find_by_id(&client, "1234", RequestOptions::new()).await?;
/// ```
#[async_trait]
pub trait Get: Resource {
    /// Fetch the resource by gid.
    ///
    /// # Errors
    ///
    /// Returns an error if the gid is empty, the request fails, or the
    /// payload cannot be decoded as `Self`.
    #[tracing::instrument(skip(client, options))]
    async fn find_by_id(client: &AsanaClient, gid: &str, options: RequestOptions) -> Result<Self> {
        let request = RequestBuilder::get(format!("/{}/{{gid}}", Self::PLURAL_NAME))
            .path_param("gid", gid)
            .options(&options)
            .build()?;
        client.fetch_one(&request).await
    }
}
