//! Front-desk API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the clinic API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn clinic_api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/doctors",
            get(endpoints::doctors::list).post(endpoints::doctors::create),
        )
        .route(
            "/doctors/:doctor_number/schedule",
            get(endpoints::doctors::schedule),
        )
        .route("/patients", post(endpoints::patients::create))
        .route("/appointments/voice", post(endpoints::appointments::voice))
        .route("/prescriptions", post(endpoints::prescriptions::generate))
        .route("/prescriptions/pdf", post(endpoints::prescriptions::pdf))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}
