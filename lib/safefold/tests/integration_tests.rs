//! End-to-end folds over `HttpTransport` using wiremock.

use std::time::Duration;

use assert2::{check, let_assert};
use safefold::{Body, Error, HttpTransport, NoBody, Outcome, SafeClient};
use serde::{Deserialize, Serialize};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Order {
    id: u64,
    item: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Rejection {
    reason: String,
}

#[derive(Debug, PartialEq, Eq)]
enum Reply {
    Order(Order),
    Created,
    Deleted,
    Missing,
    Rejected(String),
    Unmentioned(u16),
    Network(String),
    Unknown(String),
}

async fn unknown(error: Error) -> Reply {
    Reply::Unknown(error.to_string())
}

fn client(server: &MockServer) -> SafeClient<HttpTransport> {
    SafeClient::new(HttpTransport::new(), server.uri()).expect("valid base url")
}

fn kettle() -> Order {
    Order {
        id: 42,
        item: "kettle".to_string(),
    }
}

#[tokio::test]
async fn test_primary_body_is_decoded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kettle()))
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server)
        .get::<Body<Order>>("/orders/42")
        .await
        .fold(|order| async move { Ok(Reply::Order(order)) }, unknown)
        .await
        .expect("not cancelled");

    check!(reply == Reply::Order(kettle()));
}

#[tokio::test]
async fn test_no_content_runs_no_body_mapper() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/orders/42"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let outcome: Outcome = client(&mock_server).delete("orders/42").await;
    check!(outcome.code() == Some(204));
    check!(outcome.raw_body().is_none());

    let reply = outcome
        .fold(|()| async { Ok(Reply::Unknown("primary".into())) }, unknown)
        .no_body(204, || async { Ok(Reply::Deleted) })
        .await
        .expect("not cancelled");

    check!(reply == Reply::Deleted);
}

#[tokio::test]
async fn test_error_status_body_is_delivered() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(kettle()))
        .respond_with(ResponseTemplate::new(422).set_body_json(Rejection {
            reason: "out of stock".to_string(),
        }))
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server)
        .post::<NoBody, _>("orders", &kettle())
        .await
        .fold(|()| async { Ok(Reply::Created) }, unknown)
        .no_body(201, || async { Ok(Reply::Created) })
        .with_body(422, |r: Rejection| async move {
            Ok(Reply::Rejected(r.reason))
        })
        .await
        .expect("not cancelled");

    check!(reply == Reply::Rejected("out of stock".to_string()));
}

#[tokio::test]
async fn test_unmentioned_status_reaches_unknown_handler() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/7"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server).get::<Body<Order>>("orders/7").await;
    let reply = outcome
        .fold(
            |order| async move { Ok(Reply::Order(order)) },
            |error| async move {
                let_assert!(Some(503) = error.unmentioned_status());
                Reply::Unknown(error.to_string())
            },
        )
        .no_body(404, || async { Ok(Reply::Missing) })
        .await
        .expect("not cancelled");

    check!(reply == Reply::Unknown("unmentioned status 503".to_string()));
}

#[tokio::test]
async fn test_unmentioned_status_fallback() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/7"))
        .respond_with(ResponseTemplate::new(418))
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server)
        .get::<Body<Order>>("orders/7")
        .await
        .fold(|order| async move { Ok(Reply::Order(order)) }, unknown)
        .on_unmentioned_status(|code| async move { Reply::Unmentioned(code) })
        .await
        .expect("not cancelled");

    check!(reply == Reply::Unmentioned(418));
}

#[tokio::test]
async fn test_malformed_primary_body_reaches_unknown_handler() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"forty-two"}"#))
        .mount(&mock_server)
        .await;

    let reply = client(&mock_server)
        .get::<Body<Order>>("orders/42")
        .await
        .fold(
            |order| async move { Ok(Reply::Order(order)) },
            |error| async move {
                check!(error.is_deserialization());
                Reply::Unknown("malformed".into())
            },
        )
        .await
        .expect("not cancelled");

    check!(reply == Reply::Unknown("malformed".into()));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = SafeClient::new(HttpTransport::new(), format!("http://127.0.0.1:{port}"))
        .expect("valid base url");

    let outcome = client.get::<Body<Order>>("orders/42").await;
    check!(outcome.is_transport_failure());

    let reply = outcome
        .fold(|order| async move { Ok(Reply::Order(order)) }, unknown)
        .on_network_error(|error| async move {
            check!(error.is_network());
            Reply::Network("refused".into())
        })
        .await
        .expect("not cancelled");

    check!(reply == Reply::Network("refused".into()));
}

#[tokio::test]
async fn test_network_error_defaults_to_unknown_handler() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = SafeClient::new(HttpTransport::new(), format!("http://127.0.0.1:{port}"))
        .expect("valid base url");

    let reply = client
        .get::<NoBody>("health")
        .await
        .fold(|()| async { Ok(Reply::Created) }, |_| async {
            Reply::Unknown("no response".into())
        })
        .await
        .expect("not cancelled");

    check!(reply == Reply::Unknown("no response".into()));
}

#[tokio::test]
async fn test_timeout_is_transport_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::builder()
        .exchange_timeout(Duration::from_millis(100))
        .build();
    let client = SafeClient::new(transport, mock_server.uri()).expect("valid base url");

    let outcome: Outcome = client.get("slow").await;
    let_assert!(Some(error) = outcome.transport_error());
    check!(error.is_timeout());
}

#[tokio::test]
async fn test_non_utf8_body_is_transport_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0xfd]))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server).get::<Body<Order>>("binary").await;
    check!(outcome.is_transport_failure());
}

#[tokio::test]
async fn test_head_outcome_has_no_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/orders/42"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server).head("orders/42").await;
    check!(outcome.code() == Some(200));
    check!(outcome.raw_body().is_none());
}

#[tokio::test]
async fn test_default_headers_and_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(header("X-Tenant", "north"))
        .and(query_param("status", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![kettle()]))
        .mount(&mock_server)
        .await;

    let client = SafeClient::builder(HttpTransport::new())
        .base_url(mock_server.uri())
        .default_header("X-Tenant", "north")
        .build()
        .expect("valid client");

    let request = client
        .request(safefold::Method::Get, "orders")
        .expect("valid url")
        .query("status", "open")
        .build();

    let orders = client
        .execute::<Body<Vec<Order>>>(request)
        .await
        .fold(|orders| async move { Ok(orders) }, |_| async { Vec::new() })
        .await
        .expect("not cancelled");

    check!(orders == vec![kettle()]);
}

#[tokio::test]
async fn test_cancelled_handler_propagates() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orders/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(kettle()))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .get::<Body<Order>>("orders/42")
        .await
        .fold(|_| async { Err(Error::Cancelled) }, unknown)
        .await;

    check!(result.is_err());
}
