//! # 옷장 일기(Closet Diary) 백엔드
//!
//! 코디 사진을 오브젝트 스토리지에 올리고, 코디 메타데이터와 일기를
//! SQLite에 저장하는 HTTP API입니다.
//!
//! 구성:
//! - `storage`: 스토리지 게이트웨이 (로컬 디렉토리 / S3)
//! - `db`: SQL 데이터 접근 함수 (코디, 일기, 사용자)
//! - `services`: 일기 조립 서비스 (트랜잭션, 코디 ID 해석)
//! - `routes`: HTTP 핸들러와 공유 상태
//! - `middleware`: 인증 추출기 (`AuthUser`)
//!
//! `main.rs`는 설정을 읽어 `AppState`를 만들고 [`app`]으로 라우터를 조립합니다.
//! 통합 테스트도 같은 [`app`]을 서버 없이 직접 호출합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use routes::AppState;

/// 업로드 요청 본문의 최대 크기 (사진 한 장 + 텍스트 필드)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 모든 API 라우트를 `/api` 아래에 조립합니다.
pub fn app(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/me", get(routes::auth::me));

    let outfit_routes = Router::new()
        .route("/outfits", get(routes::list_outfits))
        .route(
            "/outfits/upload",
            post(routes::upload_outfit).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/outfits/image/{file_name}", get(routes::get_outfit_image))
        .route("/outfits/list", get(routes::list_outfit_urls));

    let diary_routes = Router::new()
        .route("/diaries", get(routes::list_diaries).post(routes::create_diary))
        .route(
            "/diaries/{id}",
            get(routes::get_diary)
                .put(routes::update_diary)
                .delete(routes::delete_diary),
        );

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(outfit_routes)
        .merge(diary_routes)
        .route("/health", get(routes::health_check))
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
