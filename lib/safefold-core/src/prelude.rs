//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! for easy glob importing:
//!
//! ```ignore
//! use safefold_core::prelude::*;
//! ```

pub use crate::{
    Body, Cancelled, Deserializer, Error, Fold, HttpClient, JsonDeserializer, JsonSerializer,
    Mapper, Method, NoBody, Outcome, Request, Response, Result, Serializer, UnmentionedStatus,
    no_body, with_body,
};
