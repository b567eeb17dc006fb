//! Serialization capabilities consumed by safefold.
//!
//! - [`Deserializer`] turns a raw response body into a caller-chosen type.
//!   An [`Outcome`](crate::Outcome) carries one, unapplied, until a handler
//!   asks for a typed body.
//! - [`Serializer`] turns a request value into a [`Payload`]. It is only used
//!   on the request path.
//!
//! [`JsonDeserializer`] and [`JsonSerializer`] are the defaults.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ContentType, Result};

/// Converts a raw textual payload into a value of a requested type.
pub trait Deserializer: Send + Sync {
    /// Deserialize `raw` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Deserialization`] if the payload does not
    /// conform to `T`.
    fn deserialize<T: DeserializeOwned>(&self, raw: &str) -> Result<T>;
}

impl<D: Deserializer> Deserializer for &D {
    fn deserialize<T: DeserializeOwned>(&self, raw: &str) -> Result<T> {
        (**self).deserialize(raw)
    }
}

impl<D: Deserializer> Deserializer for Arc<D> {
    fn deserialize<T: DeserializeOwned>(&self, raw: &str) -> Result<T> {
        (**self).deserialize(raw)
    }
}

/// Converts an application value into an outgoing request payload.
pub trait Serializer: Send + Sync {
    /// Serialize `value` into a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Payload>;
}

impl<S: Serializer> Serializer for Arc<S> {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Payload> {
        (**self).serialize(value)
    }
}

/// An encoded request body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    content_type: ContentType,
    bytes: Bytes,
}

impl Payload {
    /// Creates a payload.
    #[must_use]
    pub fn new(content_type: ContentType, bytes: impl Into<Bytes>) -> Self {
        Self {
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Content type of the encoded bytes.
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Encoded bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consume into (content type, bytes).
    #[must_use]
    pub fn into_parts(self) -> (ContentType, Bytes) {
        (self.content_type, self.bytes)
    }
}

/// JSON deserializer backed by `serde_json`, with field paths in errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDeserializer;

impl Deserializer for JsonDeserializer {
    fn deserialize<T: DeserializeOwned>(&self, raw: &str) -> Result<T> {
        crate::from_json(raw)
    }
}

/// JSON serializer backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Payload> {
        crate::to_json(value).map(|bytes| Payload::new(ContentType::Json, bytes))
    }
}
