//! End-to-end tests over a real TCP listener.

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_served_routes() {
    let (addr, shutdown) = common::start_server(common::sample_registry()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{}/widgets/9", addr))
        .header("accept", "text/html")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();
    assert!(body.contains("<div>id: 9</div>"));
    assert!(body.contains("<a href=\"/widgets/9\">self</a>"));

    let res = client
        .get(format!("http://{}/widgets/9", addr))
        .header("accept", "application/json")
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        json["links"]["self"],
        format!("http://{}/widgets/9", addr)
    );

    let res = client
        .get(format!("http://{}/nope", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "Not Found: Resource does not exist");

    let res = client
        .post(format!("http://{}/only-get", addr))
        .body("payload")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (addr, shutdown) = common::start_server(common::sample_registry()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{}/only-get", addr))
        .header("x-request-id", "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "req-123");
    assert_eq!(res.text().await.unwrap(), "only get");

    shutdown.trigger();
}

#[tokio::test]
async fn test_silent_handler_sends_empty_ok() {
    let mut registry = restlink::ResourceRegistry::new();
    registry.register("/silent").unwrap().get(|_| Ok(()));
    let (addr, shutdown) = common::start_server(registry).await;

    let res = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
        .get(format!("http://{}/silent", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().is_empty());

    shutdown.trigger();
}
