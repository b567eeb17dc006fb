//! Core types for safefold, a typed dispatcher for HTTP responses.
//!
//! An HTTP exchange becomes an [`Outcome`]; callers [`fold`](Outcome::fold)
//! it into their own type by registering one handler per status code they
//! care about. Exactly one handler runs, and the body is only deserialized
//! when that handler needs it.
//!
//! This crate provides:
//! - [`Outcome`], [`Exchange`], [`Body`] and [`NoBody`] - the tagged result of an exchange
//! - [`Mapper`], [`with_body`] and [`no_body`] - status code bindings
//! - [`Fold`] - the dispatch engine
//! - [`Deserializer`] and [`Serializer`] - capabilities with JSON defaults
//! - [`Error`], [`Result`], [`UnmentionedStatus`] and [`Cancelled`] - error handling
//! - [`HttpClient`], [`Request`], [`Response`] - the transport seam
//!
//! ```
//! use safefold_core::{Body, JsonDeserializer, Outcome};
//!
//! # futures_util::FutureExt::now_or_never(async {
//! let outcome: Outcome<Body<u32>> = Outcome::responded(404, None, JsonDeserializer);
//!
//! let stock = outcome
//!     .fold(|count| async move { Ok(count) }, |_| async { 0 })
//!     .no_body(404, || async { Ok(0) })
//!     .await
//!     .expect("not cancelled");
//! assert_eq!(stock, 0);
//! # }).expect("ready");
//! ```

mod body;
mod client;
mod codec;
mod error;
mod fold;
mod mapper;
mod method;
mod outcome;
pub mod prelude;
mod request;
mod response;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use body::{ContentType, from_json, to_json, to_query_string};
pub use client::HttpClient;
pub use codec::{Deserializer, JsonDeserializer, JsonSerializer, Payload, Serializer};
pub use error::{BoxError, Cancelled, Error, Result, UnmentionedStatus};
pub use fold::Fold;
pub use mapper::{Mapper, no_body, with_body};
pub use method::Method;
pub use outcome::{Body, Exchange, NoBody, Outcome, PRIMARY_STATUS, Primary};
pub use request::{Request, RequestBuilder};
pub use response::{Response, carries_body};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
