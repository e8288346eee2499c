//! restlink server.
//!
//! ```text
//!     Client Request
//!     ─────────────▶ axum (request id, trace, timeout)
//!                      │
//!                      ▼
//!                Dispatcher ──▶ Router (segment tree) ──▶ Resource
//!                      │                                    │
//!                      ▼                                    ▼
//!                RequestContext ◀──── handler ◀──── method lookup
//!                      │
//!                      ▼
//!     ◀─────────── ResponseWriter (deferred status) ◀── Renderer (HTML/JSON + links)
//! ```
//!
//! Serves a small widget catalogue to demonstrate routing and hypermedia.

use std::path::PathBuf;

use axum::http::StatusCode;
use clap::Parser;
use tokio::net::TcpListener;

use restlink::config::{load_config, AppConfig};
use restlink::lifecycle::signals;
use restlink::observability::{logging, metrics};
use restlink::resource::PathProvider;
use restlink::{Dispatcher, HttpServer, Representation, ResourceRegistry, Shutdown};

#[derive(Parser)]
#[command(name = "restlink")]
#[command(about = "Hypermedia resource server", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

const WIDGETS: &[(&str, &str, &str)] = &[
    ("1", "sprocket", "12"),
    ("2", "flange", "4"),
    ("3", "grommet", "250"),
];

fn find_widget(id: &str) -> Option<&'static (&'static str, &'static str, &'static str)> {
    WIDGETS.iter().find(|(widget_id, _, _)| *widget_id == id)
}

/// Register the demo catalogue.
fn catalogue() -> Result<ResourceRegistry, Box<dyn std::error::Error>> {
    let mut registry = ResourceRegistry::new();

    registry.register("/")?.get(|ctx| {
        ctx.render(&Representation::new().field("service", "widget catalogue"))?;
        Ok(())
    });

    registry.register("/widgets")?.get(|ctx| {
        let mut representation = Representation::new();
        for (id, name, _) in WIDGETS {
            representation.push(*id, *name);
        }
        ctx.render(&representation)?;
        Ok(())
    });

    registry.register("/widgets/:id")?.get(|ctx| {
        let id = ctx.param("id").unwrap_or_default().to_string();
        match find_widget(&id) {
            Some((id, name, stock)) => {
                ctx.render(
                    &Representation::new()
                        .field("id", id)
                        .field("name", name)
                        .field("stock", stock),
                )?;
            }
            None => ctx.send_error(StatusCode::NOT_FOUND, "Widget does not exist")?,
        }
        Ok(())
    });

    registry
        .resource_mut("/")
        .ok_or("root resource missing")?
        .link("widgets", "/widgets")?;
    registry
        .resource_mut("/widgets")
        .ok_or("widgets resource missing")?
        .link("up", "/")?;
    registry
        .resource_mut("/widgets/:id")
        .ok_or("widget resource missing")?
        .link("self", "/widgets/:id")?
        .link("collection", "/widgets")?;

    Ok(registry)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!("restlink v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let registry = catalogue()?;
    for resource in registry.resources() {
        tracing::debug!(pattern = %resource.path(), "route");
    }
    let dispatcher = Dispatcher::from_config(registry, &config.rendering)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move { signals::trigger_on_signal(&shutdown).await });
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
