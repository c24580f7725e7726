//! End-to-end tests driving the HTTP surface against mocked collaborators:
//! the vector store, the regulatory feed, and the completion endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use httpmock::{
    Method::{GET, POST, PUT},
    MockServer,
};
use regex::Regex;
use legalens::{
    analysis::AnalyzerService,
    api,
    embedding::HashedEncoder,
    qa::{CompletionClient, GenerativeBackend},
    regulatory::RegulatoryFeedClient,
    store::{VectorStoreService, record_id_for},
};
use serde_json::{Value, json};
use tower::ServiceExt;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn build_router(server: &MockServer) -> Router {
    let embedder = Arc::new(HashedEncoder::new(8));
    let store = Arc::new(
        VectorStoreService::new(&server.base_url(), None, TIMEOUT).expect("store client"),
    );
    let completion = CompletionClient::new(
        format!("{}/v1/chat/completions", server.base_url()),
        "test-model",
        None,
        TIMEOUT,
    )
    .expect("completion client");
    let qa = GenerativeBackend::new(
        embedder.clone(),
        store.clone(),
        completion,
        "legal-docs",
        3,
    );
    let feed = RegulatoryFeedClient::new(format!("{}/regulatory", server.base_url()), TIMEOUT)
        .expect("feed client");

    let service = AnalyzerService::new(embedder, store, Box::new(qa), feed, "legal-docs", 2);
    api::create_router(Arc::new(service))
}

async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn mock_fresh_store(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path_matches(
                Regex::new(r"^/collections/legal-docs/points/[0-9a-f-]+$").expect("probe pattern"),
            );
            then.status(404).body("not found");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/collections/legal-docs/points");
            then.status(200).json_body(json!({ "result": {} }));
        })
        .await;
}

#[tokio::test]
async fn analyze_reports_clauses_risks_summary_and_affected_sections() {
    let server = MockServer::start_async().await;
    mock_fresh_store(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/regulatory");
            then.status(200).json_body(json!({
                "regulatory_updates": [
                    { "section": "payment", "sub_section": "approval", "update": "stricter review" },
                    { "section": "customs", "sub_section": "tariffs", "update": "unrelated" }
                ]
            }));
        })
        .await;

    let app = build_router(&server).await;
    let (status, body) = post_json(
        app,
        "/analyze",
        json!({
            "document_id": "contract.pdf",
            "text": "The vendor shall deliver the goods. Payment is subject to approval. \
                     The total cost was 1200 dollars."
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key_clauses"], json!(["The vendor shall deliver the goods."]));
    assert_eq!(body["risks"], json!(["Payment is subject to approval."]));
    assert_eq!(body["affected_sections"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["affected_sections"][0]["update"], "stricter review");
    let summary = body["summary"].as_str().expect("summary");
    assert!(!summary.contains("1200"));
}

#[tokio::test]
async fn analyze_survives_unreachable_regulatory_feed() {
    let server = MockServer::start_async().await;
    mock_fresh_store(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/regulatory");
            then.status(502).body("bad gateway");
        })
        .await;

    let app = build_router(&server).await;
    let (status, body) = post_json(
        app,
        "/analyze",
        json!({ "text": "The supplier must indemnify the buyer." }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected_sections"], json!([]));
    assert_eq!(body["key_clauses"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn storing_the_same_document_twice_is_a_noop() {
    let server = MockServer::start_async().await;
    let record_id = record_id_for("contract.pdf");

    let missing = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/collections/legal-docs/points/{record_id}"));
            then.status(404).body("not found");
        })
        .await;
    let write = server
        .mock_async(|when, then| {
            when.method(PUT).path("/collections/legal-docs/points");
            then.status(200).json_body(json!({ "result": {} }));
        })
        .await;

    let payload = json!({ "document_id": "contract.pdf", "text": "Original text" });
    let (status, body) = post_json(build_router(&server).await, "/documents", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stored"], true);
    write.assert_async().await;

    // A record now exists; the second call must skip the write.
    missing.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("/collections/legal-docs/points/{record_id}"));
            then.status(200).json_body(json!({ "result": {} }));
        })
        .await;

    let payload = json!({ "document_id": "contract.pdf", "text": "Different text" });
    let (status, body) = post_json(build_router(&server).await, "/documents", payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stored"], false);
    assert_eq!(write.hits_async().await, 1);
}

#[tokio::test]
async fn ask_grounds_answer_in_retrieved_passages() {
    let server = MockServer::start_async().await;
    mock_fresh_store(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/regulatory");
            then.status(200).json_body(json!({ "regulatory_updates": [] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/collections/legal-docs/points/query");
            then.status(200).json_body(json!({
                "result": [
                    {
                        "id": "p1",
                        "score": 0.93,
                        "payload": {
                            "document_id": "contract.pdf",
                            "text": "The agreement term is two years from the effective date."
                        }
                    }
                ]
            }));
        })
        .await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .body_contains("The agreement term is two years from the effective date.");
            then.status(200).json_body(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": " Two years. " } }
                ]
            }));
        })
        .await;

    let app = build_router(&server).await;
    let (status, _) = post_json(
        app.clone(),
        "/analyze",
        json!({
            "document_id": "contract.pdf",
            "text": "The agreement term is two years from the effective date."
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(
        app,
        "/ask",
        json!({ "question": "How long is the agreement term?" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "Two years.");
    assert!(body.get("failure").is_none());
    completion.assert_async().await;
}

#[tokio::test]
async fn ask_reports_completion_outage_without_crashing() {
    let server = MockServer::start_async().await;
    mock_fresh_store(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/regulatory");
            then.status(200).json_body(json!({ "regulatory_updates": [] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/collections/legal-docs/points/query");
            then.status(200).json_body(json!({ "result": [] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(500).body("upstream error");
        })
        .await;

    let app = build_router(&server).await;
    let (status, _) = post_json(
        app.clone(),
        "/analyze",
        json!({ "document_id": "d1", "text": "Delivery is due in March." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(app, "/ask", json!({ "question": "When is delivery due?" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "");
    assert!(body["failure"].as_str().is_some());
}

#[tokio::test]
async fn metrics_reflect_analysis_activity() {
    let server = MockServer::start_async().await;
    mock_fresh_store(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/regulatory");
            then.status(200).json_body(json!({ "regulatory_updates": [] }));
        })
        .await;

    let app = build_router(&server).await;
    let (status, _) = post_json(
        app.clone(),
        "/analyze",
        json!({ "text": "The contractor shall maintain insurance. Work stops unless paid." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/metrics")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["documents_analyzed"], 1);
    assert_eq!(body["clauses_flagged"], 1);
    assert_eq!(body["risks_flagged"], 1);
}
