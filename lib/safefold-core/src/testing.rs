//! Outcome constructors for unit-testing code that folds responses.
//!
//! Enabled with the `testing` feature.
//!
//! ```
//! use safefold_core::testing;
//! use safefold_core::{Body, Error, Outcome};
//!
//! let outcome: Outcome<Body<Vec<u32>>> = testing::ok(&vec![1, 2, 3]).expect("encode");
//! assert_eq!(outcome.code(), Some(200));
//! assert_eq!(outcome.raw_body(), Some("[1,2,3]"));
//!
//! let failed: Outcome = testing::network_error(Error::connection("connection reset"));
//! assert!(failed.is_transport_failure());
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Body, Deserializer, Error, JsonDeserializer, Outcome, Result};

/// A 200 outcome whose body is `value` encoded as JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be encoded.
pub fn ok<T: Serialize>(value: &T) -> Result<Outcome<Body<T>>> {
    let raw = serde_json::to_string(value)?;
    Ok(Outcome::responded(200, Some(raw), JsonDeserializer))
}

/// An outcome with the given status and raw JSON body.
#[must_use]
pub fn status<S>(code: u16, raw_body: impl Into<String>) -> Outcome<S> {
    Outcome::responded(code, Some(raw_body.into()), JsonDeserializer)
}

/// A 204 outcome without body, whose deserializer fails if ever used.
#[must_use]
pub fn no_content<S>() -> Outcome<S, RejectingDeserializer> {
    Outcome::responded(204, None, RejectingDeserializer)
}

/// An outcome where no response was obtained.
#[must_use]
pub fn network_error<S>(cause: impl Into<Error>) -> Outcome<S> {
    Outcome::transport_failed(cause)
}

/// Deserializer that rejects every payload.
///
/// Useful to assert that a code path never deserializes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectingDeserializer;

impl Deserializer for RejectingDeserializer {
    fn deserialize<T: DeserializeOwned>(&self, _raw: &str) -> Result<T> {
        Err(Error::deserialization(
            std::any::type_name::<T>(),
            "",
            "deserialization is not expected here",
        ))
    }
}
