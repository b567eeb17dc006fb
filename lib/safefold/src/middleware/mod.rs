//! Tower middleware layers for the HTTP transport.
//!
//! Layers wrap the transport service and see every raw exchange before it
//! becomes an [`Outcome`](crate::Outcome). Add them with
//! [`HttpTransportBuilder::layer`](crate::HttpTransportBuilder::layer), or with
//! the `with_logging` helpers.
//!
//! - [`LoggingLayer`] - Logs requests and responses using `tracing`

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::{Layer, ServiceBuilder};
