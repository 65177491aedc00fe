//! A client for the [Emsearch](https://emsearch.io) search-indexing API.
//!
//! Every endpoint is modeled as a request type implementing [ApiRequest],
//! whose associated [ApiResponse] is either a single resource ([Item]), a
//! page of resources ([Collection]), or [NoContent]. Each operation expects
//! exactly one success status; any other status fails with
//! [ApiError::UnexpectedResponse].
//!
//! Requests that act on an existing resource borrow it, and take their path
//! identifiers from it. Resources returned by the API are plain values: an
//! update returns a new resource and leaves the one it was given untouched.
//!
//! # Example
//!
//! ```no_run
//! use emsearch::{Client, ListOptions, OrderBy, Profile, project::GetProjects};
//! use emsearch::widget::GetWidgets;
//!
//! # fn main() -> anyhow::Result<()> {
//! let client = Client::new(Profile::from_default_env()?);
//!
//! let projects = client.roundtrip(GetProjects {
//!     list: ListOptions::new()
//!         .include(&["user"])
//!         .order_by(OrderBy::desc("created_at")),
//! })?;
//!
//! for project in &projects.data {
//!     let widgets = client.roundtrip(GetWidgets {
//!         project,
//!         list: ListOptions::new().search("header"),
//!     })?;
//!
//!     println!("{:?}: {} widgets", project.name, widgets.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Other HTTP clients
//!
//! [Client] dispatches through any [Transport]; [ureq] is the default. The
//! request and response types also work with any HTTP client that uses the
//! [`http`] crate: use [`ApiRequest::into_request`] to create a request, and
//! [`ApiResponse::from_response`] to check and parse the response.

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

mod api;
mod config;

pub use api::*;
pub use config::{Error as ConfigError, Profile};
