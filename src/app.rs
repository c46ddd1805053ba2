use axum::{http::Request, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{domains::user::rest::user_routes, state::SharedAppState};

pub fn create_app(state: SharedAppState) -> Router {
  Router::new()
    .route("/ping", get(ping_handler))
    .merge(user_routes())
    .with_state(state)
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
      tracing::info_span!("http_request", method = %req.method(), uri = %req.uri())
    }))
}

pub async fn ping_handler() -> &'static str {
  "."
}
