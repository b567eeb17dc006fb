//! Status code to handler bindings.
//!
//! A [`Mapper`] binds one status code to an async handler. Body mappers
//! expect a typed body and only deserialize it when selected; empty mappers
//! expect nothing.
//!
//! ```
//! use safefold_core::{Mapper, no_body, with_body};
//! # use safefold_core::JsonDeserializer;
//! # #[derive(serde::Deserialize)]
//! # struct Violations { fields: Vec<String> }
//!
//! let mappers: Vec<Mapper<'_, String, JsonDeserializer>> = vec![
//!     no_body(204, || async { Ok("nothing to do".to_string()) }),
//!     with_body(422, |v: Violations| async move { Ok(v.fields.join(",")) }),
//! ];
//! assert_eq!(mappers[1].code(), 422);
//! ```

use std::fmt;
use std::future::Future;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;

use crate::{Deserializer, Error, Result};

type BodyHandler<'a, T, D> = Box<dyn FnOnce(&str, &D) -> BoxFuture<'a, Result<T>> + Send + 'a>;
type EmptyHandler<'a, T> = Box<dyn FnOnce() -> BoxFuture<'a, Result<T>> + Send + 'a>;

enum Kind<'a, T, D> {
    Body {
        target: &'static str,
        handler: BodyHandler<'a, T, D>,
    },
    Empty {
        handler: EmptyHandler<'a, T>,
    },
}

/// A binding from a status code to a handler producing `T`.
///
/// Mappers are plain values: building one performs no I/O and cannot fail.
pub struct Mapper<'a, T, D> {
    code: u16,
    kind: Kind<'a, T, D>,
}

impl<'a, T, D> Mapper<'a, T, D>
where
    T: Send + 'a,
    D: Deserializer + 'a,
{
    /// Bind `code` to a handler that receives the body deserialized as `X`.
    ///
    /// The handler may fail; its error is routed to the fold's
    /// unknown-error handler.
    pub fn body<X, F, Fut>(code: u16, handler: F) -> Self
    where
        X: DeserializeOwned + 'a,
        F: FnOnce(X) -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        let handler: BodyHandler<'a, T, D> =
            Box::new(move |raw: &str, deserializer: &D| match deserializer.deserialize::<X>(raw) {
                Ok(body) => handler(body).boxed(),
                Err(error) => future::ready(Err(error)).boxed(),
            });

        Self {
            code,
            kind: Kind::Body {
                target: std::any::type_name::<X>(),
                handler,
            },
        }
    }

    /// Bind `code` to a handler that expects no body.
    ///
    /// A body present on the response is ignored.
    pub fn empty<F, Fut>(code: u16, handler: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<T>> + Send + 'a,
    {
        Self {
            code,
            kind: Kind::Empty {
                handler: Box::new(move || handler().boxed()),
            },
        }
    }
}

impl<'a, T, D> Mapper<'a, T, D>
where
    T: Send + 'a,
{
    /// Status code this mapper is bound to.
    #[must_use]
    pub const fn code(&self) -> u16 {
        self.code
    }

    /// Name of the expected body type, or `None` for an empty mapper.
    #[must_use]
    pub const fn target(&self) -> Option<&'static str> {
        match &self.kind {
            Kind::Body { target, .. } => Some(*target),
            Kind::Empty { .. } => None,
        }
    }

    /// Returns `true` if the handler expects a body.
    #[must_use]
    pub const fn expects_body(&self) -> bool {
        matches!(self.kind, Kind::Body { .. })
    }

    /// Run the handler against the response body.
    ///
    /// A body mapper requires `raw_body`; its absence fails with
    /// [`Error::MissingBody`] without calling the handler.
    pub(crate) fn invoke(self, raw_body: Option<&str>, deserializer: &D) -> BoxFuture<'a, Result<T>> {
        match self.kind {
            Kind::Body { target, handler } => match raw_body {
                Some(raw) => handler(raw, deserializer),
                None => future::ready(Err(Error::missing_body(self.code, target))).boxed(),
            },
            Kind::Empty { handler } => handler(),
        }
    }
}

impl<T, D> fmt::Debug for Mapper<'_, T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Mapper");
        debug.field("code", &self.code);
        match &self.kind {
            Kind::Body { target, .. } => debug.field("body", target),
            Kind::Empty { .. } => debug.field("body", &"none"),
        };
        debug.finish_non_exhaustive()
    }
}

/// Bind `code` to a handler receiving the body deserialized as `X`.
///
/// Shorthand for [`Mapper::body`].
pub fn with_body<'a, X, T, D, F, Fut>(code: u16, handler: F) -> Mapper<'a, T, D>
where
    X: DeserializeOwned + 'a,
    T: Send + 'a,
    D: Deserializer + 'a,
    F: FnOnce(X) -> Fut + Send + 'a,
    Fut: Future<Output = Result<T>> + Send + 'a,
{
    Mapper::body(code, handler)
}

/// Bind `code` to a handler expecting no body.
///
/// Shorthand for [`Mapper::empty`].
pub fn no_body<'a, T, D, F, Fut>(code: u16, handler: F) -> Mapper<'a, T, D>
where
    T: Send + 'a,
    D: Deserializer + 'a,
    F: FnOnce() -> Fut + Send + 'a,
    Fut: Future<Output = Result<T>> + Send + 'a,
{
    Mapper::empty(code, handler)
}
