//! # pbgen Runtime
//!
//! Typed access to the records of a collection store.
//!
//! Models (generated by `pbgen` or written by hand) implement [`Model`]: they
//! convert to and from a [`Record`], the untyped property bag used on the
//! wire. [`Service`] is generic over any such model and turns the CRUD
//! endpoints of one collection into typed calls. The network itself sits
//! behind the [`Transport`] trait.
//!
//! ```rust,ignore
//! use pbgen_runtime::{ListOptions, Service};
//! use tokio_util::sync::CancellationToken;
//!
//! let posts: Service<Posts, _> = Service::new("posts", transport);
//! let ctx = CancellationToken::new();
//!
//! let recent = posts
//!     .get_list(&ctx, Some(&ListOptions::new().sort("-created").per_page(20)))
//!     .await?;
//! let everything = posts.get_all(&ctx, None).await?;
//! ```

pub mod datetime;
pub mod error;
pub mod model;
pub mod record;
pub mod service;
pub mod transport;

pub use datetime::{DateTime, ParseDateTimeError};
pub use error::ClientError;
pub use model::{assert_model, HasTimestamps, Model, RecordMeta, Timestamps};
pub use record::Record;
pub use service::{ListOptions, ListResult, RecordOptions, Service, MAX_PER_PAGE};
pub use transport::{record_path, records_path, Body, Method, Request, Transport, TransportError};

/// Result type for runtime calls.
pub type Result<T> = std::result::Result<T, ClientError>;
