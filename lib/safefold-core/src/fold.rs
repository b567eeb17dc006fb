//! The fold engine: turn an [`Outcome`] into exactly one handler result.
//!
//! # Dispatch
//!
//! 1. Transport failure: the network-error handler runs (the unknown-error
//!    handler when none is set). Mappers are not consulted.
//! 2. Status 200: the primary success handler runs, bypassing mappers. A
//!    mapper registered for 200 is never reached.
//! 3. Any other status: the first mapper registered for that code runs.
//! 4. No mapper: the unmentioned-status handler runs, or the unknown-error
//!    handler with [`UnmentionedStatus`].
//!
//! A missing body, a deserialization failure or a handler failure on steps 2
//! and 3 are handed to the unknown-error handler. [`Error::Cancelled`] is the
//! exception: it stops the fold, which then resolves to [`Cancelled`].
//!
//! # Example
//!
//! ```
//! use safefold_core::{Body, JsonDeserializer, Outcome};
//! # #[derive(Debug, serde::Deserialize)]
//! # struct Order { id: u64 }
//! # #[derive(Debug, serde::Deserialize)]
//! # struct Violations { fields: Vec<String> }
//!
//! #[derive(Debug, PartialEq)]
//! enum Placed {
//!     Accepted(u64),
//!     Duplicate,
//!     Rejected(Vec<String>),
//!     Failed(String),
//! }
//!
//! # futures_util::FutureExt::now_or_never(async {
//! let outcome: Outcome<Body<Order>> =
//!     Outcome::responded(422, Some(r#"{"fields":["phone"]}"#.into()), JsonDeserializer);
//!
//! let placed = outcome
//!     .fold(
//!         |order| async move { Ok(Placed::Accepted(order.id)) },
//!         |error| async move { Placed::Failed(error.to_string()) },
//!     )
//!     .no_body(409, || async { Ok(Placed::Duplicate) })
//!     .with_body(422, |v: Violations| async move { Ok(Placed::Rejected(v.fields)) })
//!     .await
//!     .expect("not cancelled");
//!
//! assert_eq!(placed, Placed::Rejected(vec!["phone".to_string()]));
//! # }).expect("ready");
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};

use futures_util::future::{BoxFuture, FutureExt};
use tracing::{debug, trace, warn};

use crate::outcome::PRIMARY_STATUS;
use crate::{
    Cancelled, Deserializer, Error, Exchange, Mapper, Outcome, Primary, Result, UnmentionedStatus,
};

type SuccessHandler<'a, V, T> = Box<dyn FnOnce(V) -> BoxFuture<'a, Result<T>> + Send + 'a>;
type ErrorHandler<'a, T> = Box<dyn FnOnce(Error) -> BoxFuture<'a, T> + Send + 'a>;
type StatusHandler<'a, T> = Box<dyn FnOnce(u16) -> BoxFuture<'a, T> + Send + 'a>;

impl<S, D> Outcome<S, D>
where
    S: Primary,
    D: Deserializer,
{
    /// Start folding this outcome into a `T`.
    ///
    /// `on_success` handles the primary (200) response; `on_unknown_error`
    /// receives every failure that is not a cancellation. Add mappers and
    /// optional fallbacks on the returned [`Fold`], then `.await` it.
    pub fn fold<'a, T, F, Fut, U, UFut>(self, on_success: F, on_unknown_error: U) -> Fold<'a, S, D, T>
    where
        S: 'a,
        D: 'a,
        T: Send + 'a,
        F: FnOnce(S::Value) -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
        U: FnOnce(Error) -> UFut + Send + 'a,
        UFut: Future<Output = T> + Send + 'a,
    {
        Fold {
            outcome: self,
            on_success: Box::new(move |value| on_success(value).boxed()),
            mappers: Vec::new(),
            on_unknown_error: Box::new(move |error| on_unknown_error(error).boxed()),
            on_network_error: None,
            on_unmentioned_status: None,
        }
    }
}

/// A pending fold of an [`Outcome`] into a `T`.
///
/// Built by [`Outcome::fold`]. Awaiting it runs exactly one handler chain and
/// yields its value, or [`Cancelled`] if a handler reported cancellation.
#[must_use = "a fold does nothing unless awaited"]
pub struct Fold<'a, S: Primary, D, T> {
    outcome: Outcome<S, D>,
    on_success: SuccessHandler<'a, S::Value, T>,
    mappers: Vec<Mapper<'a, T, D>>,
    on_unknown_error: ErrorHandler<'a, T>,
    on_network_error: Option<ErrorHandler<'a, T>>,
    on_unmentioned_status: Option<StatusHandler<'a, T>>,
}

impl<'a, S, D, T> Fold<'a, S, D, T>
where
    S: Primary + 'a,
    D: Deserializer + 'a,
    T: Send + 'a,
{
    /// Register a mapper. Earlier registrations win on duplicate codes.
    pub fn map(mut self, mapper: Mapper<'a, T, D>) -> Self {
        self.mappers.push(mapper);
        self
    }

    /// Register several mappers, in iteration order.
    pub fn mappers(mut self, mappers: impl IntoIterator<Item = Mapper<'a, T, D>>) -> Self {
        self.mappers.extend(mappers);
        self
    }

    /// Register a handler for `code` receiving the body deserialized as `X`.
    pub fn with_body<X, F, Fut>(self, code: u16, handler: F) -> Self
    where
        X: serde::de::DeserializeOwned + 'a,
        F: FnOnce(X) -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        self.map(Mapper::body(code, handler))
    }

    /// Register a handler for `code` expecting no body.
    pub fn no_body<F, Fut>(self, code: u16, handler: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        self.map(Mapper::empty(code, handler))
    }

    /// Handle transport failures separately from other errors.
    pub fn on_network_error<F, Fut>(mut self, handler: F) -> Self
    where
        F: FnOnce(Error) -> Fut + Send + 'a,
        Fut: Future<Output = T> + Send + 'a,
    {
        self.on_network_error = Some(Box::new(move |error| handler(error).boxed()));
        self
    }

    /// Handle statuses that no mapper covers.
    pub fn on_unmentioned_status<F, Fut>(mut self, handler: F) -> Self
    where
        F: FnOnce(u16) -> Fut + Send + 'a,
        Fut: Future<Output = T> + Send + 'a,
    {
        self.on_unmentioned_status = Some(Box::new(move |code| handler(code).boxed()));
        self
    }

    async fn run(self) -> std::result::Result<T, Cancelled> {
        let Self {
            outcome,
            on_success,
            mappers,
            on_unknown_error,
            on_network_error,
            on_unmentioned_status,
        } = self;

        let (code, raw_body, deserializer) = match outcome.into_exchange() {
            Exchange::TransportFailed { cause } => {
                if cause.is_cancelled() {
                    return Err(Cancelled);
                }
                debug!(error = %cause, branch = "network", "dispatching transport failure");
                let handler = on_network_error.unwrap_or(on_unknown_error);
                return Ok(handler(cause).await);
            }
            Exchange::Responded {
                code,
                raw_body,
                deserializer,
            } => (code, raw_body, deserializer),
        };

        let attempt = if code == PRIMARY_STATUS {
            debug!(status = code, branch = "primary", "dispatching response");
            if !S::EXPECTS_BODY && raw_body.is_some() {
                trace!(status = code, "ignoring body of primary response");
            }
            match S::decode(code, raw_body.as_deref(), &deserializer) {
                Ok(value) => on_success(value),
                Err(error) => futures_util::future::ready(Err(error)).boxed(),
            }
        } else if let Some(mapper) = mappers.into_iter().find(|mapper| mapper.code() == code) {
            debug!(
                status = code,
                branch = "mapper",
                target = mapper.target().unwrap_or("()"),
                "dispatching response"
            );
            mapper.invoke(raw_body.as_deref(), &deserializer)
        } else {
            debug!(status = code, branch = "unmentioned", "dispatching response");
            let value = match on_unmentioned_status {
                Some(handler) => handler(code).await,
                None => on_unknown_error(UnmentionedStatus::new(code).into()).await,
            };
            return Ok(value);
        };

        match attempt.await {
            Ok(value) => Ok(value),
            Err(Error::Cancelled) => {
                debug!(status = code, "fold cancelled");
                Err(Cancelled)
            }
            Err(error) => {
                warn!(status = code, error = %error, "routing failure to unknown error handler");
                Ok(on_unknown_error(error).await)
            }
        }
    }
}

impl<'a, S, D, T> IntoFuture for Fold<'a, S, D, T>
where
    S: Primary + 'a,
    D: Deserializer + 'a,
    T: Send + 'a,
{
    type Output = std::result::Result<T, Cancelled>;
    type IntoFuture = BoxFuture<'a, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.run().boxed()
    }
}

impl<S: Primary, D, T> fmt::Debug for Fold<'_, S, D, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fold")
            .field("outcome", &self.outcome)
            .field("mappers", &self.mappers)
            .field("on_network_error", &self.on_network_error.is_some())
            .field("on_unmentioned_status", &self.on_unmentioned_status.is_some())
            .finish_non_exhaustive()
    }
}
