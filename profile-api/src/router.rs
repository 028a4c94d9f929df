use axum::{
    http::{header, HeaderName, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, auth::USER_ID_HEADER, config::Settings, routes};

pub fn create(app_state: AppState, config: &Settings) -> Router<()> {
    let app_url = config.application.app_url.clone();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .allow_origin(AllowOrigin::predicate(move |origin, _| {
            origin.as_bytes() == app_url.as_bytes()
        }));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/users", routes::users::router())
        .nest_service("/storage", ServeDir::new(&config.storage.public_root))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
