//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다.
//! - `auth`: 회원가입, 로그인, 내 정보
//! - `outfits`: 코디 사진 업로드/조회
//! - `diaries`: 일기 CRUD
//! - `health`: 서버 상태 확인

pub mod auth;
pub mod diaries;
pub mod health;
pub mod outfits;

pub use diaries::*;
pub use health::*;
pub use outfits::*;

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{services::DiaryService, storage::StorageGateway};

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 필드가 모두 Arc 기반이라 clone해도 같은 풀/클라이언트를 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// 코디 사진 저장소 (로컬 디렉토리 또는 S3)
    pub storage: Arc<dyn StorageGateway>,
    /// 일기 조립 서비스
    pub diaries: DiaryService,
    /// 액세스 토큰 서명용 비밀키
    pub jwt_secret: String,
}

impl AppState {
    pub fn new(pool: SqlitePool, storage: Arc<dyn StorageGateway>, jwt_secret: String) -> Self {
        Self {
            diaries: DiaryService::new(pool.clone()),
            pool,
            storage,
            jwt_secret,
        }
    }
}
