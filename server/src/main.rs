mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use config::Config;
use datastore::{AnnotationStore, FileStore};
use page_service::AppState;
use proxy_service::ProxyConfig;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use youtube_client::{ApiEndpoint, YouTubeApi, YouTubeClient};

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    let config = Config::load()?;

    let backend = FileStore::open(&config.data_dir)
        .with_context(|| format!("Failed to open data dir {}", config.data_dir.display()))?;
    let store = AnnotationStore::load(Arc::new(backend));

    let endpoint = match &config.proxy_base {
        Some(base_url) => {
            info!(%base_url, "calling the API through a proxy");
            ApiEndpoint::Proxy {
                base_url: base_url.clone(),
            }
        }
        None => ApiEndpoint::Direct {
            base_url: config.api_base.clone(),
            api_key: config.api_key.clone().unwrap_or_default(),
        },
    };
    let api: Arc<dyn YouTubeApi> = Arc::new(YouTubeClient::new(endpoint));

    let mut app = page_service::create_router(AppState::new(api, store));
    match config.api_key {
        Some(api_key) => {
            app = app.merge(proxy_service::create_router(ProxyConfig {
                base_url: config.api_base,
                api_key,
            }));
        }
        None => warn!("no API key configured, proxy route disabled"),
    }
    let app = app.layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// `RUST_LOG` directives, or `info` when unset or unparsable
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
    }

    #[test]
    fn log_filter_uses_given_directives() {
        let filter = log_filter(Some("page_service=debug".to_string()));
        assert_eq!(filter.to_string(), "page_service=debug");
    }

    #[test]
    fn unparsable_directives_fall_back_to_info() {
        assert_eq!(log_filter(Some("page_service=loud".to_string())).to_string(), "info");
    }
}
