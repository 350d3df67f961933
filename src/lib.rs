//! # gongsu — 프로젝트 공수/일정 관리 백엔드
//!
//! 라이브러리 타깃은 `main.rs`와 통합 테스트(`tests/`)가 같은 라우터를 쓰도록
//! 모듈과 `build_router`를 공개합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::path::Path;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub use routes::AppState;

/// API 라우터(`/api/v1`)에 CORS와 요청 로깅을 붙입니다.
pub fn build_router(state: AppState) -> Router {
    with_layers(Router::new().nest("/api/v1", routes::api_routes().with_state(state)))
}

/// `build_router`에 더해, 프론트엔드 빌드가 있으면 API 외 경로를 정적 파일로 서빙합니다.
/// SPA이므로 찾을 수 없는 경로는 `index.html`로 돌려보냅니다.
pub fn build_app(state: AppState, frontend_dist: &Path) -> Router {
    let api = Router::new().nest("/api/v1", routes::api_routes().with_state(state));

    if frontend_dist.exists() {
        tracing::info!("Serving frontend static files from {}", frontend_dist.display());
        let serve_dir = ServeDir::new(frontend_dist)
            .not_found_service(ServeFile::new(frontend_dist.join("index.html")));
        with_layers(api.fallback_service(serve_dir))
    } else {
        tracing::warn!("Frontend dist directory not found, serving API only");
        with_layers(api)
    }
}

fn with_layers(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router.layer(cors).layer(TraceLayer::new_for_http())
}
