use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header, header::InvalidHeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::{future::Future, sync::Arc};

use crate::transactions;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub origins: AllowedOrigins,
}

/// Browser origins allowed to call the API.
#[derive(Clone, Debug)]
pub struct AllowedOrigins(Arc<[HeaderValue]>);

impl AllowedOrigins {
    pub fn parse<I, S>(origins: I) -> Result<Self, InvalidHeaderValue>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .map(|origin| HeaderValue::from_str(origin.as_ref().trim_end_matches('/')))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(origins.into()))
    }

    pub fn contains(&self, origin: &HeaderValue) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.0.iter().cloned()))
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    }
}

impl Default for AllowedOrigins {
    fn default() -> Self {
        Self(Arc::new([HeaderValue::from_static("http://localhost:3000")]))
    }
}

/// Reject browser requests from origins outside the allow list, preflights
/// included. Requests without an `Origin` header pass through.
async fn origin_guard(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if let Some(origin) = request.headers().get(header::ORIGIN)
        && !state.origins.contains(origin)
    {
        tracing::warn!(?origin, "rejected request from disallowed origin");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(next.run(request).await)
}

pub fn router(engine: Arc<Engine>, origins: AllowedOrigins) -> Router {
    let cors = origins.cors_layer();
    let state = ServerState { engine, origins };

    Router::new()
        .route("/transactions/", post(transactions::create))
        .route("/transactions", post(transactions::create))
        .layer(cors)
        .layer(middleware::from_fn_with_state(state.clone(), origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener<F>(
    engine: Engine,
    origins: AllowedOrigins,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine), origins))
        .with_graceful_shutdown(shutdown)
        .await
}
