//! Client that turns every call into an [`Outcome`].
//!
//! [`SafeClient`] wraps any [`HttpClient`] with a base URL, default headers, a
//! [`Deserializer`] handed to each outcome, and a [`Serializer`] for request
//! bodies. Its calls never fail: whatever happens, the caller gets an
//! [`Outcome`] to fold.

use std::collections::HashMap;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::{
    Deserializer, Error, HttpClient, JsonDeserializer, JsonSerializer, Method, NoBody, Outcome,
    Request, RequestBuilder, Result, Serializer,
};

/// HTTP client whose calls resolve to an [`Outcome`].
///
/// Error statuses are responses like any other: a 404 or a 503 comes back as
/// a responded outcome with its body, for the fold to dispatch. Only the
/// absence of a response (or a request that could not be built) yields a
/// transport-failed outcome.
///
/// # Example
///
/// ```ignore
/// use safefold::{HttpTransport, SafeClient, Body};
///
/// let orders = SafeClient::builder(HttpTransport::new())
///     .base_url("https://shop.example.com/api/")
///     .default_header("Accept", "application/json")
///     .build()?;
///
/// let summary = orders
///     .get::<Body<Order>>("orders/42")
///     .await
///     .fold(|order| async move { Ok(Some(order)) }, |_| async { None })
///     .no_body(404, || async { Ok(None) })
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SafeClient<C, D = JsonDeserializer, Z = JsonSerializer> {
    client: C,
    base_url: Url,
    headers: HashMap<String, String>,
    deserializer: D,
    serializer: Z,
}

impl<C> SafeClient<C> {
    /// Create a client with JSON codecs and no default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Self::builder(client).base_url(base_url).build()
    }

    /// Start building a client around `client`.
    #[must_use]
    pub fn builder(client: C) -> SafeClientBuilder<C> {
        SafeClientBuilder::new(client)
    }
}

impl<C, D, Z> SafeClient<C, D, Z> {
    /// Base URL every path is resolved against. Always ends with `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Headers added to every request.
    #[must_use]
    pub fn default_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Deserializer given to each outcome.
    #[must_use]
    pub fn deserializer(&self) -> &D {
        &self.deserializer
    }

    /// Serializer used for request bodies.
    #[must_use]
    pub fn serializer(&self) -> &Z {
        &self.serializer
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Resolve `path` against the base URL.
    ///
    /// Leading slashes are ignored so that `"/orders"` and `"orders"` both
    /// land under the base path.
    ///
    /// # Errors
    ///
    /// Returns an error if the result is not a valid URL.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Start a request to `path` carrying the default headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be resolved.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder<Bytes>> {
        let url = self.url(path)?;
        let headers = self.headers.iter().map(|(k, v)| (k.clone(), v.clone()));
        Ok(Request::builder(method, url).headers(headers))
    }
}

impl<C, D, Z> SafeClient<C, D, Z>
where
    C: HttpClient,
    D: Deserializer + Clone,
    Z: Serializer,
{
    /// Execute `request` and wrap whatever happens into an [`Outcome`].
    pub async fn execute<S>(&self, request: Request<Bytes>) -> Outcome<S, D> {
        let method = request.method();
        debug!(%method, url = %request.url(), "executing request");

        let result = self.client.execute(request).await;
        let outcome = Outcome::from_transport(method, result, self.deserializer.clone());

        match outcome.code() {
            Some(status) => debug!(%method, status, "response received"),
            None => debug!(%method, error = ?outcome.transport_error(), "no response"),
        }
        outcome
    }

    /// `GET` the resource at `path`.
    pub async fn get<S>(&self, path: &str) -> Outcome<S, D> {
        self.send(Method::Get, path).await
    }

    /// `DELETE` the resource at `path`.
    pub async fn delete<S>(&self, path: &str) -> Outcome<S, D> {
        self.send(Method::Delete, path).await
    }

    /// `HEAD` the resource at `path`; the outcome never carries a body.
    pub async fn head(&self, path: &str) -> Outcome<NoBody, D> {
        self.send(Method::Head, path).await
    }

    /// `POST` `body`, serialized with the client serializer, to `path`.
    pub async fn post<S, B>(&self, path: &str, body: &B) -> Outcome<S, D>
    where
        B: Serialize + ?Sized,
    {
        self.send_with(Method::Post, path, body).await
    }

    /// `PUT` `body`, serialized with the client serializer, to `path`.
    pub async fn put<S, B>(&self, path: &str, body: &B) -> Outcome<S, D>
    where
        B: Serialize + ?Sized,
    {
        self.send_with(Method::Put, path, body).await
    }

    /// `PATCH` `body`, serialized with the client serializer, to `path`.
    pub async fn patch<S, B>(&self, path: &str, body: &B) -> Outcome<S, D>
    where
        B: Serialize + ?Sized,
    {
        self.send_with(Method::Patch, path, body).await
    }

    async fn send<S>(&self, method: Method, path: &str) -> Outcome<S, D> {
        match self.request(method, path) {
            Ok(builder) => self.execute(builder.build()).await,
            Err(error) => Self::not_sent(method, path, error),
        }
    }

    async fn send_with<S, B>(&self, method: Method, path: &str, body: &B) -> Outcome<S, D>
    where
        B: Serialize + ?Sized,
    {
        let request = self.request(method, path).and_then(|builder| {
            let payload = self.serializer.serialize(body)?;
            Ok(builder.payload(payload).build())
        });
        match request {
            Ok(request) => self.execute(request).await,
            Err(error) => Self::not_sent(method, path, error),
        }
    }

    fn not_sent<S>(method: Method, path: &str, error: Error) -> Outcome<S, D> {
        debug!(%method, path, %error, "request not sent");
        Outcome::transport_failed(error)
    }
}

/// Builder for [`SafeClient`].
#[derive(Debug, Clone)]
pub struct SafeClientBuilder<C, D = JsonDeserializer, Z = JsonSerializer> {
    client: C,
    base_url: Option<String>,
    headers: HashMap<String, String>,
    deserializer: D,
    serializer: Z,
}

impl<C> SafeClientBuilder<C> {
    /// Create a builder with JSON codecs.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            base_url: None,
            headers: HashMap::new(),
            deserializer: JsonDeserializer,
            serializer: JsonSerializer,
        }
    }
}

impl<C, D, Z> SafeClientBuilder<C, D, Z> {
    /// Set the base URL. Required.
    #[must_use]
    pub fn base_url(mut self, url: impl AsRef<str>) -> Self {
        self.base_url = Some(url.as_ref().to_string());
        self
    }

    /// Add a header sent with every request.
    #[must_use]
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the deserializer handed to outcomes.
    #[must_use]
    pub fn deserializer<D2>(self, deserializer: D2) -> SafeClientBuilder<C, D2, Z> {
        SafeClientBuilder {
            client: self.client,
            base_url: self.base_url,
            headers: self.headers,
            deserializer,
            serializer: self.serializer,
        }
    }

    /// Replace the serializer used for request bodies.
    #[must_use]
    pub fn serializer<Z2>(self, serializer: Z2) -> SafeClientBuilder<C, D, Z2> {
        SafeClientBuilder {
            client: self.client,
            base_url: self.base_url,
            headers: self.headers,
            deserializer: self.deserializer,
            serializer,
        }
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if no base URL was set or if it cannot be parsed.
    pub fn build(self) -> Result<SafeClient<C, D, Z>> {
        let raw = self
            .base_url
            .ok_or_else(|| Error::invalid_request("base URL is required"))?;
        let mut base_url = Url::parse(&raw)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(SafeClient {
            client: self.client,
            base_url,
            headers: self.headers,
            deserializer: self.deserializer,
            serializer: self.serializer,
        })
    }
}
