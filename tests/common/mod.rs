//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, Request, StatusCode};
use restlink::config::AppConfig;
use restlink::{Dispatcher, HttpServer, Representation, ResourceRegistry, Shutdown};

/// Build a request with an empty body.
pub fn request(method: Method, path: &str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Bytes::new())
        .unwrap()
}

/// Build a request with an `Accept` header.
pub fn request_accepting(method: Method, path: &str, accept: &str) -> Request<Bytes> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("accept", accept)
        .header("host", "example.test")
        .body(Bytes::new())
        .unwrap()
}

/// A small catalogue: `/widgets`, `/widgets/:id`, `/only-get`, `/broken`.
pub fn sample_registry() -> ResourceRegistry {
    let mut registry = ResourceRegistry::new();

    registry.register("/widgets").unwrap().get(|ctx| {
        ctx.render(&Representation::new().field("count", 2))?;
        Ok(())
    });
    registry.register("/widgets/:id").unwrap().get(|ctx| {
        let id = ctx.param("id").unwrap_or_default().to_string();
        ctx.render(&Representation::new().field("id", id))?;
        Ok(())
    });
    registry
        .resource_mut("/widgets/:id")
        .unwrap()
        .link("self", "/widgets/:id")
        .unwrap()
        .link("collection", "/widgets")
        .unwrap();

    registry.register("/only-get").unwrap().get(|ctx| {
        ctx.write_str("only get")?;
        Ok(())
    });

    registry
        .register("/broken")
        .unwrap()
        .get(|_ctx| Err("database unavailable".into()));

    registry.register("/teapot").unwrap().get(|ctx| {
        ctx.send_error(StatusCode::FORBIDDEN, "No tea for you")?;
        Ok(())
    });

    registry
}

/// Start a server for `registry` on an ephemeral port.
pub async fn start_server(registry: ResourceRegistry) -> (SocketAddr, Shutdown) {
    let mut config = AppConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();

    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let dispatcher = Dispatcher::from_config(registry, &config.rendering).unwrap();
    let server = HttpServer::new(config, dispatcher);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;
    (addr, shutdown)
}
