//! Orders API Example
//!
//! Demonstrates folding every call of a small order service into a
//! domain result, one handler per expected status.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use safefold::prelude::*;
use safefold::{JsonDeserializer, RequestBuilder, SafeClientBuilder};

// ============================================================================
// Data Types
// ============================================================================

/// An order as stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub item: String,
    pub quantity: u32,
    pub status: String,
}

/// Request to place an order.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub item: String,
    pub quantity: u32,
}

/// Body of a 409 or 422 reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Problem {
    pub reason: String,
}

/// Filter for listing orders.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// What looking up an order can end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(Order),
    Missing,
    Unavailable(String),
}

/// What placing or cancelling an order can end with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Done(Option<Order>),
    Missing,
    Refused(String),
    Unavailable(String),
}

// ============================================================================
// Typed API over SafeClient
// ============================================================================

/// Order service client. Every method resolves to a domain value.
#[derive(Debug, Clone)]
pub struct OrdersApi {
    client: SafeClient<HttpTransport>,
}

/// Mappers shared by every call that changes an order.
fn refusals<'a>() -> Vec<Mapper<'a, Change, JsonDeserializer>> {
    vec![
        no_body(404, || async { Ok(Change::Missing) }),
        with_body(409, |p: Problem| async move { Ok(Change::Refused(p.reason)) }),
        with_body(422, |p: Problem| async move { Ok(Change::Refused(p.reason)) }),
    ]
}

impl OrdersApi {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let transport = HttpTransport::builder().with_logging().build();
        let client = SafeClientBuilder::new(transport)
            .base_url(base_url)
            .default_header("Accept", "application/json")
            .build()?;
        Ok(Self { client })
    }

    /// Fetch one order.
    pub async fn order(&self, id: u64) -> std::result::Result<Lookup, Cancelled> {
        self.client
            .get::<Body<Order>>(&format!("orders/{id}"))
            .await
            .fold(
                |order| async move { Ok(Lookup::Found(order)) },
                |error| async move { Lookup::Unavailable(error.to_string()) },
            )
            .no_body(404, || async { Ok(Lookup::Missing) })
            .await
    }

    /// List orders, an empty list on any failure.
    pub async fn orders(&self, filter: &OrderFilter) -> std::result::Result<Vec<Order>, Cancelled> {
        let request = self
            .client
            .request(Method::Get, "orders")
            .and_then(|builder| builder.query_params(filter))
            .map(RequestBuilder::build);
        let outcome = match request {
            Ok(request) => self.client.execute::<Body<Vec<Order>>>(request).await,
            Err(error) => Outcome::transport_failed(error),
        };

        outcome
            .fold(|orders| async move { Ok(orders) }, |_| async { Vec::new() })
            .await
    }

    /// Place an order; the service answers 201 with the stored order.
    pub async fn place(&self, order: &NewOrder) -> std::result::Result<Change, Cancelled> {
        self.client
            .post::<Body<Order>, _>("orders", order)
            .await
            .fold(
                |stored| async move { Ok(Change::Done(Some(stored))) },
                |error| async move { Change::Unavailable(error.to_string()) },
            )
            .with_body(201, |stored: Order| async move {
                Ok(Change::Done(Some(stored)))
            })
            .mappers(refusals())
            .await
    }

    /// Cancel an order; the service answers 204.
    pub async fn cancel(&self, id: u64) -> std::result::Result<Change, Cancelled> {
        self.client
            .delete::<NoBody>(&format!("orders/{id}"))
            .await
            .fold(
                |()| async { Ok(Change::Done(None)) },
                |error| async move { Change::Unavailable(error.to_string()) },
            )
            .no_body(204, || async { Ok(Change::Done(None)) })
            .mappers(refusals())
            .on_network_error(|error| async move {
                Change::Unavailable(format!("service unreachable: {error}"))
            })
            .await
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let api = OrdersApi::new("https://shop.example.com/api/")?;

    println!("Orders API client created!");
    println!("Base URL: {}", api.client.base_url());

    println!("\n=== Example calls (would require a real service) ===");
    println!("api.order(42).await      -> Found | Missing | Unavailable");
    println!("api.place(&order).await  -> Done | Missing | Refused | Unavailable");
    println!("api.cancel(42).await     -> Done | Missing | Refused | Unavailable");

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    fn kettle() -> Order {
        Order {
            id: 42,
            item: "kettle".to_string(),
            quantity: 1,
            status: "open".to_string(),
        }
    }

    #[tokio::test]
    async fn test_order_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orders/42"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(kettle()))
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let lookup = api.order(42).await.expect("not cancelled");

        assert_eq!(lookup, Lookup::Found(kettle()));
    }

    #[tokio::test]
    async fn test_order_missing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orders/7"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let lookup = api.order(7).await.expect("not cancelled");

        assert_eq!(lookup, Lookup::Missing);
    }

    #[tokio::test]
    async fn test_orders_with_filter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/orders"))
            .and(query_param("status", "open"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![kettle()]))
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let filter = OrderFilter {
            status: Some("open".to_string()),
            page: Some(2),
        };
        let orders = api.orders(&filter).await.expect("not cancelled");

        assert_eq!(orders, vec![kettle()]);
    }

    #[tokio::test]
    async fn test_place_created() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(kettle()))
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let order = NewOrder {
            item: "kettle".to_string(),
            quantity: 1,
        };
        let change = api.place(&order).await.expect("not cancelled");

        assert_eq!(change, Change::Done(Some(kettle())));
    }

    #[tokio::test]
    async fn test_place_refused() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(serde_json::json!({"reason": "quantity must be positive"})),
            )
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let order = NewOrder {
            item: "kettle".to_string(),
            quantity: 0,
        };
        let change = api.place(&order).await.expect("not cancelled");

        assert_eq!(change, Change::Refused("quantity must be positive".to_string()));
    }

    #[tokio::test]
    async fn test_cancel_conflict() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/orders/42"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(serde_json::json!({"reason": "shipped"})),
            )
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let change = api.cancel(42).await.expect("not cancelled");

        assert_eq!(change, Change::Refused("shipped".to_string()));
    }

    #[tokio::test]
    async fn test_cancel_server_error_is_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/orders/42"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let api = OrdersApi::new(mock_server.uri()).expect("client");
        let change = api.cancel(42).await.expect("not cancelled");

        assert_eq!(
            change,
            Change::Unavailable("unmentioned status 500".to_string())
        );
    }
}
