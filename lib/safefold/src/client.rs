//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::middleware::LoggingLayer;
use crate::{Error, Request, Response, Result, connector::https_connector};

/// Type-erased service for middleware composition.
pub type BoxedService = BoxCloneService<Request<Bytes>, Response<Bytes>, Error>;

/// Future type for Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// Makes a [`BoxedService`] `Sync`, as required by [`HttpClient`](crate::HttpClient).
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request<Bytes>) -> ServiceFuture {
        // Clone under the lock, call outside of it
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move { service.call(request).await })
    }
}

/// Limits applied to every exchange of an [`HttpTransport`].
///
/// `exchange_timeout` bounds the whole exchange: connecting, sending, waiting
/// for the status line and reading the body. A connect timeout longer than
/// that can never fire, so [`HttpTransportBuilder::build`] caps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeLimits {
    /// Deadline for one complete exchange, body read included.
    pub exchange_timeout: Duration,
    /// Deadline for establishing a connection.
    pub connect_timeout: Duration,
    /// Maximum idle connections kept per host.
    pub pool_idle_per_host: usize,
    /// How long an idle pooled connection is kept.
    pub pool_idle_timeout: Duration,
}

impl Default for ExchangeLimits {
    fn default() -> Self {
        Self {
            exchange_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_idle_per_host: 32,
            pool_idle_timeout: Duration::from_secs(90),
        }
    }
}

impl ExchangeLimits {
    fn capped(mut self) -> Self {
        if self.connect_timeout > self.exchange_timeout {
            tracing::debug!(
                connect_timeout = ?self.connect_timeout,
                exchange_timeout = ?self.exchange_timeout,
                "connect timeout capped to exchange timeout"
            );
            self.connect_timeout = self.exchange_timeout;
        }
        self
    }
}

/// Bare hyper client, the innermost service of the stack.
#[derive(Clone)]
struct RawTransport {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    timeout: Duration,
}

impl RawTransport {
    fn new(limits: &ExchangeLimits) -> Self {
        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(limits.pool_idle_timeout)
            .pool_max_idle_per_host(limits.pool_idle_per_host)
            .build(https_connector(limits.connect_timeout));

        Self {
            inner,
            timeout: limits.exchange_timeout,
        }
    }

    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(body.map_or_else(Full::default, Full::new))
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let hyper_request = Self::build_hyper_request(request)?;

        // The deadline covers the whole exchange, body included
        let exchange = async {
            let response = self
                .inner
                .request(hyper_request)
                .await
                .map_err(Self::map_hyper_error)?;

            let status = response.status().as_u16();
            let headers = Self::extract_headers(response.headers());
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::connection(e.to_string()))?
                .to_bytes();

            Ok::<_, Error>(Response::new(status, headers, body))
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| Error::Timeout)?
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();

        if err.is_connect() {
            return Error::connection(msg);
        }

        if msg.contains("ssl") || msg.contains("tls") || msg.contains("certificate") {
            return Error::tls(msg);
        }

        Error::connection(msg)
    }
}

impl Service<Request<Bytes>> for RawTransport {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let transport = self.clone();
        Box::pin(async move { transport.execute(request).await })
    }
}

/// HTTP transport over hyper-util, with connection pooling, TLS and
/// optional Tower layers.
///
/// Every failure to obtain a complete response (connect, TLS, timeout, body
/// read) comes back as an [`Error`], which [`SafeClient`](crate::SafeClient)
/// turns into a transport-failed [`Outcome`](crate::Outcome).
///
/// # Example
///
/// ```ignore
/// use safefold::HttpTransport;
/// use std::time::Duration;
///
/// let transport = HttpTransport::builder()
///     .exchange_timeout(Duration::from_secs(10))
///     .with_logging()
///     .build();
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    service: SyncService,
    limits: ExchangeLimits,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport with default limits and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    fn with_service(service: BoxedService, limits: ExchangeLimits) -> Self {
        Self {
            service: SyncService::new(service),
            limits,
        }
    }

    /// Create a new transport builder.
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Limits in effect for every exchange.
    #[must_use]
    pub const fn limits(&self) -> &ExchangeLimits {
        &self.limits
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl safefold_core::HttpClient for HttpTransport {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.call(request).await
    }
}

impl Service<Request<Bytes>> for HttpTransport {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HttpTransport`].
///
/// Layers are applied in order: first added is outermost.
#[derive(Default)]
pub struct HttpTransportBuilder {
    limits: ExchangeLimits,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
}

impl std::fmt::Debug for HttpTransportBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportBuilder")
            .field("limits", &self.limits)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HttpTransportBuilder {
    /// Set the deadline for a whole exchange, body read included.
    ///
    /// An exchange that misses it fails with [`Error::Timeout`].
    #[must_use]
    pub const fn exchange_timeout(mut self, timeout: Duration) -> Self {
        self.limits.exchange_timeout = timeout;
        self
    }

    /// Set the connection timeout, capped to the exchange timeout on build.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.limits.connect_timeout = timeout;
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub const fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.limits.pool_idle_per_host = count;
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub const fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.limits.pool_idle_timeout = timeout;
        self
    }

    /// Add a Tower layer around the transport.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use safefold::HttpTransport;
    /// use safefold::middleware::LoggingLayer;
    ///
    /// let transport = HttpTransport::builder()
    ///     .layer(LoggingLayer::debug())
    ///     .build();
    /// ```
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Log every exchange at info level.
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Log every exchange at debug level, headers included.
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Build the transport with all configured layers.
    #[must_use]
    pub fn build(self) -> HttpTransport {
        let limits = self.limits.capped();
        let mut service: BoxedService = BoxCloneService::new(RawTransport::new(&limits));

        // Innermost first so the first added layer ends up outermost
        for layer_fn in self.layers.into_iter().rev() {
            service = layer_fn(service);
        }

        HttpTransport::with_service(service, limits)
    }
}
