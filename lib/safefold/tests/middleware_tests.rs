//! Integration tests for transport middleware.

use bytes::Bytes;
use safefold::{
    HttpClient, HttpTransport, Method, NoBody, Outcome, Request, SafeClient,
    middleware::LoggingLayer, tower::util::MapRequestLayer,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

fn tag(request: Request<Bytes>) -> Request<Bytes> {
    let (method, url, headers, body) = request.into_parts();
    let builder = Request::builder(method, url)
        .headers(headers)
        .header("X-Tag", "layered");
    match body {
        Some(body) => builder.body(body).build(),
        None => builder.build(),
    }
}

/// Test that logging middleware doesn't change the exchange.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"logged": true})))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::builder().with_logging().build();

    let url = url::Url::parse(&format!("{}/logged", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = transport.execute(request).await.expect("response");

    assert_eq!(response.status(), 200);
    assert_eq!(response.body().as_ref(), br#"{"logged":true}"#);
}

/// Test that error statuses still come back as responses when logged.
#[tokio::test]
async fn test_debug_logging_keeps_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410).set_body_string("gone"))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::builder().with_debug_logging().build();
    let client = SafeClient::new(transport, mock_server.uri()).expect("valid base url");

    let outcome: Outcome<NoBody> = client.get("gone").await;

    assert_eq!(outcome.code(), Some(410));
    assert_eq!(outcome.raw_body(), Some("gone"));
}

/// Test generic layer API with a custom layer.
#[tokio::test]
async fn test_generic_layer_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/custom-layer"))
        .and(header("X-Tag", "layered"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::builder()
        .layer(LoggingLayer::new())
        .layer(MapRequestLayer::new(tag as fn(Request<Bytes>) -> Request<Bytes>))
        .build();

    let url = url::Url::parse(&format!("{}/custom-layer", mock_server.uri())).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let response = transport.execute(request).await.expect("response");

    assert_eq!(response.status(), 204);
}
