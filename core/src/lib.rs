//! Sync client core for a HAL collection resource.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Reconciler` drives those
//! round trips through a host-supplied `Transport` and keeps the displayed
//! list in step with the server.
//!
//! # Design
//! - `CollectionClient` is stateless; it holds only where the collection
//!   lives.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Collection bodies may be bare arrays or HAL envelopes; mutations use
//!   the server's `_links.self.href` with the origin stripped.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod hal;
pub mod http;
pub mod link;
pub mod reconciler;
pub mod todo;
pub mod types;

pub use client::CollectionClient;
pub use config::{ClientConfig, ConfigError, Policy};
pub use error::{ApiError, ErrorKind};
pub use hal::HalCollection;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use reconciler::Reconciler;
pub use todo::{TodoItem, TodoList};
pub use types::{Link, Links, NewUser, PageMetadata, User};
