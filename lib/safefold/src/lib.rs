//! Typed, exhaustive HTTP status dispatch.
//!
//! A call made through [`SafeClient`] always resolves to an [`Outcome`]: the
//! status and raw body of whatever came back, or the reason nothing did.
//! Folding the outcome names one handler per expected status; every other
//! case, unmentioned statuses, undecodable bodies and failing handlers
//! included, lands in the unknown-error handler.
//!
//! # Example
//!
//! ```ignore
//! use safefold::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     id: u64,
//!     item: String,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Rejection {
//!     reason: String,
//! }
//!
//! enum Lookup {
//!     Found(Order),
//!     Missing,
//!     Rejected(String),
//!     Failed(String),
//! }
//!
//! let orders = SafeClient::new(HttpTransport::new(), "https://shop.example.com/api/")?;
//!
//! let lookup = orders
//!     .get::<Body<Order>>("orders/42")
//!     .await
//!     .fold(
//!         |order| async move { Ok(Lookup::Found(order)) },
//!         |error| async move { Lookup::Failed(error.to_string()) },
//!     )
//!     .no_body(404, || async { Ok(Lookup::Missing) })
//!     .with_body(422, |r: Rejection| async move { Ok(Lookup::Rejected(r.reason)) })
//!     .await?;
//! ```

mod client;
mod connector;
pub mod middleware;
pub mod prelude;
mod safe_client;

pub use client::{BoxedService, ExchangeLimits, HttpTransport, HttpTransportBuilder, ServiceFuture};
pub use safe_client::{SafeClient, SafeClientBuilder};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use safefold_core::{
    BoxError, Body, Cancelled, ContentType, Deserializer, Error, Exchange, Fold, HttpClient,
    JsonDeserializer, JsonSerializer, Mapper, Method, NoBody, Outcome, PRIMARY_STATUS, Payload,
    Primary, Request, RequestBuilder, Response, Result, Serializer, UnmentionedStatus,
    carries_body, from_json, no_body, to_json, to_query_string, with_body,
};

// Re-export http types for status codes and headers
pub use safefold_core::{StatusCode, header};

/// Outcome constructors for unit tests.
#[cfg(feature = "testing")]
pub use safefold_core::testing;

pub use url;
