//! Body serialization utilities.

use bytes::Bytes;

use crate::Result;

/// Content type of an encoded request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use safefold_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Courier { name: String }
///
/// let courier = Courier { name: "Alice".to_string() };
/// let bytes = to_json(&courier).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// Uses `serde_html_form` which supports `Vec<T>` for repeated query parameters
/// (e.g., `?tags=a&tags=b&tags=c`).
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use safefold_core::to_query_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Search {
///     zone: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     page: Option<u32>,
/// }
///
/// let search = Search { zone: "north".to_string(), page: Some(1) };
/// let query = to_query_string(&search).expect("serialize");
/// assert_eq!(query, "zone=north&page=1");
/// ```
pub fn to_query_string<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize JSON text to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` so the error names the exact field that failed
/// (e.g., "lines[0].sku") alongside the requested type. The whole text must
/// be one JSON document: anything but whitespace after it is an error.
///
/// # Errors
///
/// Returns [`crate::Error::Deserialization`] if the text does not conform to `T`.
///
/// # Example
///
/// ```
/// use safefold_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Courier { name: String }
///
/// let courier: Courier = from_json(r#"{"name":"Alice"}"#).expect("deserialize");
/// assert_eq!(courier, Courier { name: "Alice".to_string() });
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T> {
    let target = std::any::type_name::<T>();
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::deserialization(target, e.path().to_string(), e.inner().to_string())
    })?;
    deserializer
        .end()
        .map_err(|e| crate::Error::deserialization(target, "", e.to_string()))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_as_str() {
        assert_eq!(ContentType::Json.as_str(), "application/json");
    }

    #[test]
    fn content_type_display() {
        assert_eq!(ContentType::Json.to_string(), "application/json");
    }

    #[test]
    fn to_json_serialize() {
        #[derive(serde::Serialize)]
        struct Delivery {
            id: String,
            parcels: u32,
        }

        let delivery = Delivery {
            id: "D-1".to_string(),
            parcels: 3,
        };

        let bytes = to_json(&delivery).expect("serialize");
        assert_eq!(bytes.as_ref(), br#"{"id":"D-1","parcels":3}"#);
    }

    #[test]
    fn to_query_string_with_option() {
        #[derive(serde::Serialize)]
        struct Search {
            zone: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            page: Option<u32>,
        }

        let search = Search {
            zone: "north".to_string(),
            page: Some(1),
        };
        let query = to_query_string(&search).expect("serialize");
        assert_eq!(query, "zone=north&page=1");

        let search_no_page = Search {
            zone: "north".to_string(),
            page: None,
        };
        let query = to_query_string(&search_no_page).expect("serialize");
        assert_eq!(query, "zone=north");
    }

    #[test]
    fn to_query_string_with_vec() {
        #[derive(serde::Serialize)]
        struct Filter {
            status: Vec<String>,
        }

        let filter = Filter {
            status: vec!["assigned".to_string(), "picked_up".to_string()],
        };

        let query = to_query_string(&filter).expect("serialize");
        assert!(query.contains("status=assigned"));
        assert!(query.contains("status=picked_up"));
    }

    #[test]
    fn from_json_deserialize() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Delivery {
            id: String,
            parcels: u32,
        }

        let delivery: Delivery = from_json(r#"{"id":"D-1","parcels":3}"#).expect("deserialize");

        assert_eq!(
            delivery,
            Delivery {
                id: "D-1".to_string(),
                parcels: 3,
            }
        );
    }

    #[test]
    fn from_json_syntax_error_names_target() {
        #[derive(Debug, serde::Deserialize)]
        struct Delivery {
            #[allow(dead_code)]
            id: String,
        }

        let result: Result<Delivery> = from_json("not json");

        let err = result.expect_err("should fail");
        assert!(err.is_deserialization());
        assert!(err.to_string().contains("Delivery"));
    }

    #[test]
    fn from_json_rejects_trailing_input() {
        #[derive(Debug, serde::Deserialize)]
        struct Delivery {
            #[allow(dead_code)]
            id: u64,
        }

        let result: Result<Delivery> = from_json(r#"{"id":1} this is not json"#);

        let err = result.expect_err("should fail");
        assert!(err.is_deserialization());
        assert!(err.to_string().contains("Delivery"));
    }

    #[test]
    fn from_json_accepts_trailing_whitespace() {
        let parcels: Vec<u32> = from_json("[1, 2]  \n").expect("deserialize");
        assert_eq!(parcels, vec![1, 2]);
    }

    #[test]
    fn from_json_missing_field_error_with_path() {
        #[derive(Debug, serde::Deserialize)]
        struct Address {
            #[allow(dead_code)]
            city: String,
        }

        #[derive(Debug, serde::Deserialize)]
        struct Recipient {
            #[allow(dead_code)]
            address: Address,
        }

        let result: Result<Recipient> = from_json(r#"{"address":{}}"#);

        let err = result.expect_err("should fail");
        let msg = err.to_string();
        assert!(
            msg.contains("address"),
            "Expected path 'address' in error: {msg}"
        );
        assert!(
            msg.contains("city"),
            "Expected field 'city' mentioned in error: {msg}"
        );
    }
}
