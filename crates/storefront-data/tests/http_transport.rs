use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use storefront_data::{
    variables, CustomApiClient, ErrorKind, QueryError, QueryExecutor, ReqwestTransport,
};
use storefront_observability::{MemorySink, StructuredLogger};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn logger() -> (Arc<MemorySink>, StructuredLogger) {
    let sink = Arc::new(MemorySink::new());
    (sink.clone(), StructuredLogger::new(sink))
}

// ── Executor over HTTP ──────────────────────────────────────────

#[tokio::test]
async fn executor_posts_envelope_with_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/2024-01/graphql.json"))
        .and(header("content-type", "application/json"))
        .and(header("x-shopify-storefront-access-token", "tok"))
        .and(body_json(json!({
            "query": "query { shop { name } }",
            "variables": { "country": "JP" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "shop": { "name": "VeganLife" } } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_, logger) = logger();
    let exec = QueryExecutor::new(Arc::new(ReqwestTransport::new()), logger)
        .with_default_header("X-Shopify-Storefront-Access-Token", "tok");

    let endpoint = format!("{}/api/2024-01/graphql.json", server.uri());
    let data = exec
        .execute(&endpoint, "query { shop { name } }", &variables(json!({ "country": "JP" })))
        .await
        .unwrap();

    assert_eq!(data, json!({ "shop": { "name": "VeganLife" } }));
}

#[tokio::test]
async fn executor_maps_status_to_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .expect(1)
        .mount(&server)
        .await;

    let (sink, logger) = logger();
    let exec = QueryExecutor::new(Arc::new(ReqwestTransport::new()), logger);

    let err = exec
        .execute(&server.uri(), "{ a }", &Default::default())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        QueryError::Http {
            status: 502,
            status_text: "Bad Gateway".to_string()
        }
    );
    assert_eq!(err.to_string(), "API error: 502 Bad Gateway");
    assert!(sink.is_empty());
}

#[tokio::test]
async fn executor_connection_refused() {
    // Bind then drop a server so the port is closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let (_, logger) = logger();
    let exec = QueryExecutor::new(Arc::new(ReqwestTransport::new()), logger);

    let err = exec.execute(&uri, "{ a }", &Default::default()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(err, QueryError::Connection(_)));
}

#[tokio::test]
async fn transport_timeout_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": {} }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let (_, logger) = logger();
    let transport = ReqwestTransport::with_timeout(Duration::from_millis(50)).unwrap();
    let exec = QueryExecutor::new(Arc::new(transport), logger);

    let err = exec
        .execute(&server.uri(), "{ a }", &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Connection(_)));
}

// ── Custom API catalog ──────────────────────────────────────────

#[tokio::test]
async fn custom_api_product_reviews() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "reviews": {
                    "edges": [
                        { "node": { "id": "r1", "author": "Aiko", "rating": 5, "title": "Great",
                                    "body": "Lovely", "createdAt": "2025-01-02", "verified": true } },
                        { "node": { "id": "r2", "author": "Ken", "rating": 4, "title": null,
                                    "body": null, "createdAt": "2025-01-03", "verified": false } }
                    ],
                    "averageRating": 4.5,
                    "totalCount": 12
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_, logger) = logger();
    let client = CustomApiClient::new(Arc::new(ReqwestTransport::new()), logger);
    let endpoint = format!("{}/graphql", server.uri());

    let reviews = client.product_reviews(&endpoint, "123", Some(10)).await.unwrap();

    assert_eq!(reviews.reviews.total_count, 12);
    assert_eq!(reviews.reviews.average_rating, 4.5);
    assert_eq!(reviews.reviews.edges.len(), 2);
    assert!(reviews.reviews.edges[1].node.title.is_none());

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["variables"], json!({ "productId": "123", "first": 10 }));
    assert!(body["query"].as_str().unwrap().contains("query ProductReviews("));
}

#[tokio::test]
async fn custom_api_errors_are_scrubbed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "resolver panicked at recommendations.rs:42" }]
        })))
        .mount(&server)
        .await;

    let (sink, logger) = logger();
    let client = CustomApiClient::new(Arc::new(ReqwestTransport::new()), logger);

    let err = client
        .ai_recommendations(&server.uri(), "123", None)
        .await
        .unwrap_err();

    assert_eq!(err, QueryError::Protocol);
    assert_eq!(err.to_string(), "API returned errors");
    assert!(sink.contains("recommendations.rs:42"));
}
