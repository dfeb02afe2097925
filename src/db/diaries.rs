//! # 일기 데이터베이스 쿼리 모듈
//!
//! `diaries`와 `diary_outfits` 테이블 쿼리입니다.
//! 여러 문장을 한 트랜잭션에서 실행할 수 있도록 모든 함수가
//! `&mut SqliteConnection`을 받습니다. 트랜잭션이면 `&mut *tx`,
//! 풀이면 `&mut *pool.acquire().await?`를 넘깁니다.

use chrono::NaiveDate;
use sqlx::SqliteConnection;

use crate::db::outfits::list_outfits_for_diary;
use crate::error::AppError;
use crate::models::{Diary, DiaryRow};

pub async fn insert_diary(
    conn: &mut SqliteConnection,
    id: &str,
    user_id: &str,
    date: NaiveDate,
    emotion: &str,
    content: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO diaries (id, user_id, date, emotion, content)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(date)
    .bind(emotion)
    .bind(content)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

pub async fn find_diary_row(
    conn: &mut SqliteConnection,
    id: &str,
) -> Result<Option<DiaryRow>, AppError> {
    let row = sqlx::query_as::<_, DiaryRow>(
        r#"
        SELECT id, user_id, date, emotion, content, created_at, updated_at
        FROM diaries
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row)
}

/// 날짜·감정·내용을 덮어쓰고 `updated_at`을 갱신합니다.
///
/// ## 반환값
/// - `true`: 갱신됨
/// - `false`: 해당 ID의 일기가 없음
pub async fn update_diary_row(
    conn: &mut SqliteConnection,
    id: &str,
    date: NaiveDate,
    emotion: &str,
    content: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE diaries
        SET date = ?, emotion = ?, content = ?,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        WHERE id = ?
        "#,
    )
    .bind(date)
    .bind(emotion)
    .bind(content)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 일기를 삭제합니다. `diary_outfits`의 연결은 `ON DELETE CASCADE`로 함께 지워지고,
/// 코디 자체는 남습니다.
pub async fn delete_diary(conn: &mut SqliteConnection, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM diaries WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 일기의 코디 연결을 통째로 교체합니다 (병합하지 않음).
///
/// 중복 ID는 `INSERT OR IGNORE`와 복합 기본키로 한 번만 저장됩니다.
pub async fn replace_diary_outfits(
    conn: &mut SqliteConnection,
    diary_id: &str,
    outfit_ids: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM diary_outfits WHERE diary_id = ?")
        .bind(diary_id)
        .execute(&mut *conn)
        .await?;

    for outfit_id in outfit_ids {
        sqlx::query("INSERT OR IGNORE INTO diary_outfits (diary_id, outfit_id) VALUES (?, ?)")
            .bind(diary_id)
            .bind(outfit_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// 일기 행과 연결된 코디를 함께 조회합니다.
pub async fn find_diary(conn: &mut SqliteConnection, id: &str) -> Result<Option<Diary>, AppError> {
    let Some(row) = find_diary_row(conn, id).await? else {
        return Ok(None);
    };
    let outfits = list_outfits_for_diary(&mut *conn, &row.id).await?;
    Ok(Some(Diary::from_row(row, outfits)))
}

/// 소유자의 모든 일기를 날짜 내림차순(같은 날짜는 작성 순)으로 조회합니다.
pub async fn list_diaries_by_owner(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<Vec<Diary>, AppError> {
    let rows = sqlx::query_as::<_, DiaryRow>(
        r#"
        SELECT id, user_id, date, emotion, content, created_at, updated_at
        FROM diaries
        WHERE user_id = ?
        ORDER BY date DESC, rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut diaries = Vec::with_capacity(rows.len());
    for row in rows {
        let outfits = list_outfits_for_diary(&mut *conn, &row.id).await?;
        diaries.push(Diary::from_row(row, outfits));
    }

    Ok(diaries)
}
