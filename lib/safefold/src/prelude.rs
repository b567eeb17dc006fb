//! Prelude module for convenient imports.
//!
//! ```ignore
//! use safefold::prelude::*;
//! ```

pub use crate::{
    Body, Cancelled, Error, HttpTransport, Mapper, Method, NoBody, Outcome, Result, SafeClient,
    StatusCode, UnmentionedStatus, no_body, with_body,
};
pub use serde::{Deserialize, Serialize};
