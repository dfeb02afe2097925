//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! SQLite와 직접 상호작용하는 함수들입니다. ORM 없이 SQL을 그대로 쓰고,
//! 결과는 `sqlx::FromRow` 구조체로 받습니다.
//!
//! - `outfits`: 코디 레코드 저장소 (생성, 소유자별 조회)
//! - `diaries`: 일기와 일기-코디 연결 쿼리
//! - `users`: 사용자 계정 쿼리
//!
//! 한 트랜잭션 안에서 여러 문장을 실행해야 하는 함수는 `&mut SqliteConnection`을,
//! 단일 문장 함수는 풀과 트랜잭션 모두 받을 수 있도록 `SqliteExecutor`를 받습니다.

pub mod diaries;
pub mod outfits;
pub mod users;

pub use diaries::*;
pub use outfits::*;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::error::AppError;

/// 연결 풀을 만들고 `migrations/`의 스키마를 적용합니다.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 하나로 제한합니다.
pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(5);
    if database_url.contains(":memory:") {
        // 연결이 닫히면 메모리 DB도 사라지므로 수명 제한을 끕니다.
        pool_options = pool_options
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(sqlx::Error::from)?;

    Ok(pool)
}
