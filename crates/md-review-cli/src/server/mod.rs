//! Local HTTP server for a review session.
//!
//! The page at `/` talks to a small JSON API. The review ends when the page
//! posts a finished transcript (or asks the server to format one), or when
//! the process is interrupted.

pub mod error;
pub mod handlers;
pub mod models;
pub mod page;
pub mod state;

use axum::{
    Router,
    routing::{get, patch, post, put},
};
use md_review_engine::Feedback;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub use state::AppState;

/// How many ports above the configured one are tried before giving up.
pub const PORT_SEARCH_RANGE: u16 = 100;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/document", get(handlers::document))
        .route("/api/tree", get(handlers::tree))
        .route("/api/file", get(handlers::file))
        .route(
            "/api/selection",
            post(handlers::select).delete(handlers::clear_selection),
        )
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(
            "/api/comments/:id",
            patch(handlers::edit_comment).delete(handlers::delete_comment),
        )
        .route("/api/comment-counts", get(handlers::comment_counts))
        .route("/api/general", put(handlers::set_general))
        .route("/api/feedback", get(handlers::preview))
        .route("/api/finish", post(handlers::finish))
        .route("/done", post(handlers::done))
        .route("/post", post(handlers::done))
        .with_state(state)
}

/// Binds the first free localhost port at or above `start`.
pub async fn bind_free_port(start: u16) -> anyhow::Result<TcpListener> {
    let end = start.saturating_add(PORT_SEARCH_RANGE);
    for port in start..=end {
        match TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).await {
            Ok(listener) => return Ok(listener),
            Err(e) => log::debug!("Port {port} unavailable: {e}"),
        }
    }
    anyhow::bail!("No free port between {start} and {end}")
}

/// Serves until the review completes or the process is interrupted, then
/// shuts down gracefully. Returns the finished feedback, if any.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    completion: oneshot::Receiver<Feedback>,
) -> anyhow::Result<Option<Feedback>> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let app = router(state);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    let feedback = tokio::select! {
        result = completion => result.ok(),
        _ = tokio::signal::ctrl_c() => {
            log::info!("Interrupted, shutting down");
            None
        }
    };

    let _ = shutdown_tx.send(());
    server.await??;
    Ok(feedback)
}
