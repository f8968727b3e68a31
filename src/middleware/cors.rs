use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

pub fn api_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(Any)
        .max_age(std::time::Duration::from_secs(3600))
}
