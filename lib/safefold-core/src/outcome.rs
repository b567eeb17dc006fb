//! The tagged result of one HTTP exchange.
//!
//! An [`Outcome`] is either a response (status code, optional raw body, and
//! the deserializer that will later produce typed views of that body) or a
//! transport failure. It never deserializes anything by itself: the body
//! stays raw text until [`Outcome::fold`] finds a handler that needs it.
//!
//! The `S` parameter declares the shape of the primary (200) success body.
//! It is a compile-time marker only:
//!
//! - [`Body<T>`]: a 200 response is deserialized into `T`.
//! - [`NoBody`]: a 200 response carries nothing of interest; any body is
//!   ignored and the deserializer is never called.
//!
//! ```
//! use safefold_core::{Body, JsonDeserializer, NoBody, Outcome};
//!
//! let order: Outcome<Body<u32>> = Outcome::responded(200, Some("42".into()), JsonDeserializer);
//! assert_eq!(order.code(), Some(200));
//!
//! let ack: Outcome<NoBody> = Outcome::responded(200, None, JsonDeserializer);
//! assert_eq!(ack.raw_body(), None);
//! ```

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::{Deserializer, Error, JsonDeserializer, Result};

/// Status code handled by the built-in primary success path.
pub const PRIMARY_STATUS: u16 = 200;

// ============================================================================
// Primary Success Shape
// ============================================================================

/// Declares how the primary (200) success body is produced.
pub trait Primary {
    /// Value handed to the success handler.
    type Value: Send;

    /// Whether the raw body is read at all.
    const EXPECTS_BODY: bool;

    /// Produce the success value from the raw body.
    ///
    /// # Errors
    ///
    /// Returns an error if a required body is absent or does not deserialize.
    fn decode<D: Deserializer>(code: u16, raw: Option<&str>, deserializer: &D)
    -> Result<Self::Value>;
}

/// The primary success response carries a body of type `T`.
pub struct Body<T>(PhantomData<fn() -> T>);

impl<T> Primary for Body<T>
where
    T: DeserializeOwned + Send,
{
    type Value = T;

    const EXPECTS_BODY: bool = true;

    fn decode<D: Deserializer>(code: u16, raw: Option<&str>, deserializer: &D) -> Result<T> {
        let raw = raw.ok_or_else(|| Error::missing_body(code, std::any::type_name::<T>()))?;
        deserializer.deserialize(raw)
    }
}

/// The primary success response carries no value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBody;

impl Primary for NoBody {
    type Value = ();

    const EXPECTS_BODY: bool = false;

    fn decode<D: Deserializer>(_code: u16, _raw: Option<&str>, _deserializer: &D) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Exchange
// ============================================================================

/// What happened on the wire.
pub enum Exchange<D> {
    /// The exchange completed with a status code.
    Responded {
        /// HTTP status code.
        code: u16,
        /// Raw body text; `None` when the exchange carries no body.
        raw_body: Option<String>,
        /// Deserializer for typed views of `raw_body`, not yet applied.
        deserializer: D,
    },
    /// No response was obtained.
    TransportFailed {
        /// Why the transport failed.
        cause: Error,
    },
}

impl<D> fmt::Debug for Exchange<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Responded { code, raw_body, .. } => f
                .debug_struct("Responded")
                .field("code", code)
                .field("raw_body", raw_body)
                .finish_non_exhaustive(),
            Self::TransportFailed { cause } => f
                .debug_struct("TransportFailed")
                .field("cause", cause)
                .finish(),
        }
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Result of one HTTP exchange, typed by its primary success shape `S`.
pub struct Outcome<S = NoBody, D = JsonDeserializer> {
    exchange: Exchange<D>,
    primary: PhantomData<fn() -> S>,
}

impl<S, D> Outcome<S, D> {
    /// An exchange that completed with a status code.
    ///
    /// `raw_body` must be `None` exactly when the exchange carries no body.
    #[must_use]
    pub const fn responded(code: u16, raw_body: Option<String>, deserializer: D) -> Self {
        Self::from_exchange(Exchange::Responded {
            code,
            raw_body,
            deserializer,
        })
    }

    /// An exchange that obtained no response.
    #[must_use]
    pub fn transport_failed(cause: impl Into<Error>) -> Self {
        Self::from_exchange(Exchange::TransportFailed {
            cause: cause.into(),
        })
    }

    /// Wrap an existing exchange.
    #[must_use]
    pub const fn from_exchange(exchange: Exchange<D>) -> Self {
        Self {
            exchange,
            primary: PhantomData,
        }
    }

    /// The underlying exchange.
    #[must_use]
    pub const fn exchange(&self) -> &Exchange<D> {
        &self.exchange
    }

    /// Consume into the underlying exchange.
    #[must_use]
    pub fn into_exchange(self) -> Exchange<D> {
        self.exchange
    }

    /// HTTP status code, if a response arrived.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        match &self.exchange {
            Exchange::Responded { code, .. } => Some(*code),
            Exchange::TransportFailed { .. } => None,
        }
    }

    /// Raw body text, if a response with a body arrived.
    #[must_use]
    pub fn raw_body(&self) -> Option<&str> {
        match &self.exchange {
            Exchange::Responded { raw_body, .. } => raw_body.as_deref(),
            Exchange::TransportFailed { .. } => None,
        }
    }

    /// Transport failure cause, if no response arrived.
    #[must_use]
    pub const fn transport_error(&self) -> Option<&Error> {
        match &self.exchange {
            Exchange::TransportFailed { cause } => Some(cause),
            Exchange::Responded { .. } => None,
        }
    }

    /// Returns `true` if no response was obtained.
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(self.exchange, Exchange::TransportFailed { .. })
    }

    /// Re-declare the primary success shape.
    ///
    /// Nothing is decoded; the raw body is carried over untouched.
    #[must_use]
    pub fn expecting<S2>(self) -> Outcome<S2, D> {
        Outcome::from_exchange(self.exchange)
    }
}

impl<S, D> fmt::Debug for Outcome<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outcome")
            .field("primary", &std::any::type_name::<S>())
            .field("exchange", &self.exchange)
            .finish()
    }
}
