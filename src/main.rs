use std::sync::Arc;
use tracing::{info, warn};

use seo_scout::config::{load_scout_config, resolve_port};
use seo_scout::repository::{ContentRepository, InMemoryRepository};
use seo_scout::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let args: Vec<String> = std::env::args().collect();
    let scout_config = load_scout_config();

    let content_path = scout_config.resolve_content_path();
    let capabilities = scout_config.resolve_capabilities();
    let repository = if tokio::fs::metadata(&content_path).await.is_ok() {
        InMemoryRepository::load(&content_path, capabilities)?
    } else {
        warn!(
            "Content corpus not found at {}. Serving an empty repository; inline items still work.",
            content_path.display()
        );
        InMemoryRepository::new(Vec::new(), capabilities)
    };
    info!(
        "Repository ready: {} items, edit_posts={}",
        repository.len(),
        repository.current_actor_can(seo_scout::repository::CAP_EDIT_POSTS)
    );

    let state = Arc::new(AppState::new(Arc::new(repository), scout_config));
    let app = api::router(state);

    // Start server
    let port = resolve_port(&args);
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::bail!(
                "Address already in use: {}. Stop the existing process or run with --port {} (or set PORT/SEO_SCOUT_PORT).",
                bind_addr,
                port.saturating_add(1)
            )
        }
        Err(e) => return Err(e.into()),
    };
    info!("SEO scout listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("SEO scout stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).ok();

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                if let Some(ref mut s) = sigterm {
                    s.recv().await;
                } else {
                    std::future::pending::<()>().await;
                }
            } => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
