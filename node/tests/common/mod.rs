// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hidra_node::engine::Engine;
use hidra_node::server::{build_router, CALLER_HEADER};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt; // for oneshot

pub const NODES: [&str; 3] = [
    "0x539022a255e26c16a3f9c252aa5e50503af554cc",
    "0xdb4bfc458422121bf3195bdaaf562f74ad44fd5f",
    "0x1f4e2b1e2fb6d5bb4a1f6e3d51aa71b1b42dc0c9",
];

pub const CANDIDATE: &str = "0xacd0d6abf6d2bef65c55b8adfd3f3e9942b7c257";

pub fn router(engine: Engine, token: Option<&str>) -> Router {
    build_router(Arc::new(Mutex::new(engine)), token.map(str::to_string))
}

pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        req = req.header(CALLER_HEADER, caller);
    }
    let req = match body {
        Some(body) => req
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Registers the three reference nodes and application #1, and sends event #1.
pub async fn seed(app: &Router) {
    for node in NODES {
        let (status, _) = call(app, "POST", "/v1/nodes", Some(node), Some(serde_json::json!({"spec": "SPECS"}))).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) = call(
        app,
        "POST",
        "/v1/applications",
        Some(NODES[0]),
        Some(serde_json::json!({"info": "APP_INFO", "required_specs": ["CTR_INFO"], "multi_reply_allowed": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);

    let (status, body) = call(
        app,
        "POST",
        "/v1/events",
        Some(NODES[0]),
        Some(serde_json::json!({"payload": "EVENT", "application_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}
