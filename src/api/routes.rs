use crate::AppState;
use crate::auth::middleware::signature_middleware;
use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub fn create_router(state: AppState) -> Router {
    let config = state.config_manager.config();
    let verifier = state.verifier.clone();

    let public_routes = Router::new()
        // Public routes (no signature required)
        .route("/health", get(crate::api::handlers::health::health));

    let webhook_routes = Router::new()
        // Platform callbacks (signature required)
        .route(
            &config.server.callback_path,
            post(crate::api::handlers::webhook::callback),
        )
        .layer(middleware::from_fn(move |req: Request, next: Next| {
            signature_middleware(verifier.clone(), req, next)
        }));

    public_routes
        .merge(webhook_routes)
        .layer(RequestBodyLimitLayer::new(config.server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
