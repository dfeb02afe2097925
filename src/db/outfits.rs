//! # 코디 레코드 저장소 (Outfit Record Store)
//!
//! `outfits` 테이블에 대한 쿼리 함수들입니다.
//! 코디는 생성과 조회만 있고, 수정/삭제 경로는 없습니다.
//! 같은 카테고리·폴더의 중복 행도 허용합니다.

use crate::error::AppError;
use crate::models::{NewOutfit, Outfit};
use sqlx::{SqliteExecutor, SqlitePool};

/// 코디 행을 삽입하고 저장된 행을 반환합니다.
///
/// 소유자가 존재하면 항상 성공합니다. 소유자가 없으면 외래 키 제약으로 실패합니다.
pub async fn create_outfit(pool: &SqlitePool, new: &NewOutfit) -> Result<Outfit, AppError> {
    // UUIDv7: 시간 기반이라 생성 순서대로 정렬됩니다
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        r#"
        INSERT INTO outfits (id, user_id, category, folder, description, image_key, image_url)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.user_id)
    .bind(&new.category)
    .bind(&new.folder) // None이면 SQL NULL
    .bind(&new.description)
    .bind(&new.image_key)
    .bind(&new.image_url)
    .execute(pool)
    .await?;

    find_outfit(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created outfit".to_string()))
}

/// ID로 코디 하나를 조회합니다. 풀과 트랜잭션 연결 모두에서 호출할 수 있습니다.
pub async fn find_outfit<'e, E>(executor: E, id: &str) -> Result<Option<Outfit>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let outfit = sqlx::query_as::<_, Outfit>(
        r#"
        SELECT id, user_id, category, folder, description, image_key, image_url, created_at
        FROM outfits
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(outfit)
}

/// 소유자의 모든 코디를 삽입 순서대로 조회합니다.
pub async fn list_outfits_by_owner(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Outfit>, AppError> {
    let outfits = sqlx::query_as::<_, Outfit>(
        r#"
        SELECT id, user_id, category, folder, description, image_key, image_url, created_at
        FROM outfits
        WHERE user_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(outfits)
}

/// 소유자의 코디 이미지 URL만 삽입 순서대로 조회합니다.
pub async fn list_image_urls_by_owner(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<String>, AppError> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT image_url FROM outfits WHERE user_id = ? ORDER BY rowid")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(url,)| url).collect())
}

/// 일기에 연결된 코디 목록을 조회합니다.
pub async fn list_outfits_for_diary<'e, E>(
    executor: E,
    diary_id: &str,
) -> Result<Vec<Outfit>, AppError>
where
    E: SqliteExecutor<'e>,
{
    let outfits = sqlx::query_as::<_, Outfit>(
        r#"
        SELECT o.id, o.user_id, o.category, o.folder, o.description,
               o.image_key, o.image_url, o.created_at
        FROM outfits o
        JOIN diary_outfits d ON d.outfit_id = o.id
        WHERE d.diary_id = ?
        ORDER BY o.rowid
        "#,
    )
    .bind(diary_id)
    .fetch_all(executor)
    .await?;

    Ok(outfits)
}
