use axum::{
    extract::Request,
    http::{header, HeaderName, Method},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

use crate::api::handlers::{self, AppState};
use crate::store::traits::CupcakeStore;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CORS_MAX_AGE: Duration = Duration::from_secs(300);

pub fn create_router<S: CupcakeStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Cupcake collection
        .route(
            "/api/v1/cupcakes",
            get(handlers::list_cupcakes::<S>).post(handlers::create_cupcake::<S>),
        )
        .route(
            "/api/v1/cupcakes/",
            get(handlers::list_cupcakes::<S>).post(handlers::create_cupcake::<S>),
        )
        // Single cupcake
        .route(
            "/api/v1/cupcakes/:id",
            get(handlers::get_cupcake::<S>)
                .put(handlers::update_cupcake::<S>)
                .delete(handlers::delete_cupcake::<S>),
        )
        .route(
            "/api/v1/cupcakes/:id/",
            get(handlers::get_cupcake::<S>)
                .put(handlers::update_cupcake::<S>)
                .delete(handlers::delete_cupcake::<S>),
        )
}

/// Full application: API routes, static frontend fallback and middleware.
pub fn create_app<S: CupcakeStore + 'static>(state: AppState<S>, web_dir: &str) -> Router {
    create_router::<S>()
        .fallback_service(ServeDir::new(web_dir))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::new())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(middleware::from_fn(log_requests)),
        )
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([HeaderName::from_static("link")])
        .max_age(CORS_MAX_AGE)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {:?} [{}]",
        method,
        path,
        response.status().as_u16(),
        started.elapsed(),
        request_id
    );
    response
}
