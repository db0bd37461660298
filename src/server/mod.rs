//! HTTP server

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{Blog, Error};

/// Build the router for all pages and static assets
pub fn router(blog: Arc<Blog>) -> Router {
    let static_files = ServeDir::new(&blog.config.static_dir);

    Router::new()
        .route("/", get(redirect_home))
        .route("/home", get(home))
        .route("/posts", get(posts))
        .route("/post/:id", get(post))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(blog)
}

/// Start the server and run until Ctrl+C or SIGTERM
pub async fn start(blog: Blog, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        environment = %blog.config.environment,
        addr = %listener.local_addr()?,
        "starting server"
    );

    axum::serve(listener, router(Arc::new(blog)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };

    tracing::info!(signal, "shutting down server");
}

async fn redirect_home() -> Redirect {
    Redirect::temporary("/home")
}

async fn home(State(blog): State<Arc<Blog>>) -> Result<Html<Vec<u8>>, PageError> {
    render_page(blog, |blog| blog.home()).await
}

async fn posts(State(blog): State<Arc<Blog>>) -> Result<Html<Vec<u8>>, PageError> {
    render_page(blog, |blog| blog.posts()).await
}

async fn post(
    State(blog): State<Arc<Blog>>,
    Path(id): Path<String>,
) -> Result<Html<Vec<u8>>, PageError> {
    render_page(blog, move |blog| blog.post(&id)).await
}

/// Run a page render off the async executor; file reads and highlighting block
async fn render_page<F>(blog: Arc<Blog>, render: F) -> Result<Html<Vec<u8>>, PageError>
where
    F: FnOnce(&Blog) -> crate::Result<Vec<u8>> + Send + 'static,
{
    let development = blog.config.environment.is_development();

    let result = tokio::task::spawn_blocking(move || render(blog.as_ref()))
        .await
        .map_err(|e| PageError::Panicked {
            message: e.to_string(),
            development,
        })?;

    result.map(Html).map_err(|error| PageError::Render { error, development })
}

/// A failed page request, converted into a status code and body
#[derive(Debug)]
pub enum PageError {
    Render { error: Error, development: bool },
    Panicked { message: String, development: bool },
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::Render { error, .. } if error.is_not_found() => {
                tracing::debug!("{}", error);
                not_found()
            }
            PageError::Render { error, development } => {
                let trace = error.trace();
                tracing::error!(stack_trace = %trace, "server error occurred");
                server_error(development.then_some(trace))
            }
            PageError::Panicked {
                message,
                development,
            } => {
                tracing::error!(stack_trace = %message, "render task failed");
                server_error(development.then_some(message))
            }
        }
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// 500 response; the detail is only shown in development
fn server_error(detail: Option<String>) -> Response {
    match detail {
        Some(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response(),
    }
}
