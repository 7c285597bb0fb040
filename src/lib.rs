//! Asana API client library.
//!
//! A typed Rust client for the Asana REST API. Each resource type describes
//! its endpoints through small traits ([`Get`], [`List`]) while a shared
//! engine handles parameter validation, request construction, response
//! parsing, polymorphic decoding and lazy pagination.
//!
//! # Quick Start
//!
//! ```no_run
//! use asanapi::{AsanaClient, RequestOptions, User};
//!
//! #[tokio::main]
//! async fn main() -> asanapi::Result<()> {
//!     // Create client from environment variables
//!     let client = AsanaClient::from_env()?;
//!
//!     // The authenticated user
//!     let me = User::me(&client, RequestOptions::new()).await?;
//!     println!("Hello {}", me.name.as_deref().unwrap_or("?"));
//!
//!     // Users of the first workspace, streamed page by page
//!     if let Some(workspace) = me.workspace_gids().first() {
//!         let mut users =
//!             User::find_by_workspace(&client, *workspace, RequestOptions::new().per_page(50))
//!                 .await?;
//!         while let Some(user) = users.try_next().await? {
//!             println!("{} {}", user.gid, user.name.unwrap_or_default());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`RequestBuilder`] resolves path templates and strips blank parameters
//! - [`Transport`] executes a [`Request`]; [`HttpTransport`] is the real one
//!   and [`stub::StubTransport`] serves canned responses in tests
//! - [`ResourceFactory`] turns JSON objects into typed resources, choosing
//!   the type from the `resource_type` discriminator when asked for [`AnyResource`]
//! - [`Collection`] holds one page of results and fetches the next on demand
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `ASANA_ACCESS_TOKEN` (required) - Personal access token
//! - `ASANA_BASE_URL` (optional) - Base URL (defaults to `https://app.asana.com/api/1.0`)
//! - `ASANA_PER_PAGE` (optional) - Default page size for list operations
//! - `ASANA_STRICT_TYPES` (optional) - Reject payloads whose discriminator contradicts the requested type

mod client;
mod collection;
mod error;
mod factory;
mod models;
mod params;
mod request;
mod response;
mod traits;
mod transport;

pub mod cli;
pub mod output;
pub mod stub;

// Re-export core types
pub use client::{AsanaClient, ClientConfig, DEFAULT_BASE_URL};
pub use collection::{Collection, CollectionState};
pub use error::{AsanaError, ErrorBody, Result};
pub use params::{require, RequestOptions, DEFAULT_PER_PAGE};
pub use request::{HttpMethod, Request, RequestBuilder};
pub use response::{parse, Envelope, NextPage, Payload, RawObject};
pub use transport::{resolve_url, HttpTransport, RawResponse, Transport};

// Decoding
pub use factory::{
    discriminator, AnyResource, Decode, Decoder, GenericResource, ResourceFactory,
    ResourceRegistry, TypeMode,
};

// Re-export traits
pub use traits::{Get, List, Resource};

// Re-export models
pub use models::{
    Project, ProjectListQuery, Task, TaskListQuery, User, UserListQuery, UserPhoto, Workspace,
};
