//! # 일기 조립 서비스 (Diary Orchestration Service)
//!
//! 사용자가 보낸 필드와 코디 ID 목록으로 일기를 조립하여 저장합니다.
//!
//! ## 동작 규칙
//! - 변경 작업(create/update/delete)은 각각 하나의 트랜잭션입니다.
//!   `tx.commit()`에 도달하기 전에 `?`로 빠져나가면 `Transaction`이 drop되면서
//!   롤백됩니다.
//! - 코디 ID는 코디 저장소에서 하나씩 찾습니다. 찾지 못한 ID는 오류 없이 빠지고,
//!   `DiaryWrite::dropped_outfit_ids`와 `warn` 로그로만 드러납니다.
//! - 수정 시 코디 연결은 병합하지 않고 통째로 교체합니다.
//! - 조회 실패는 바로 `AppError::NotFound`입니다. 재시도는 없습니다.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::db;
use crate::error::AppError;
use crate::models::{Diary, DiaryRequest, DiaryWrite};

/// 검증을 통과한 일기 입력
#[derive(Debug, Clone)]
struct DiaryDraft {
    date: NaiveDate,
    emotion: String,
    content: String,
    outfit_ids: Vec<String>,
}

impl DiaryDraft {
    /// 필수 스칼라 필드(date, emotion)를 검사합니다. content는 비어 있어도 됩니다.
    fn validate(req: DiaryRequest) -> Result<Self, AppError> {
        let date = req
            .date
            .ok_or_else(|| AppError::BadRequest("date is required".to_string()))?;

        let emotion = req
            .emotion
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::BadRequest("emotion is required".to_string()))?;

        Ok(Self {
            date,
            emotion,
            content: req.content.unwrap_or_default(),
            outfit_ids: req.outfit_ids,
        })
    }
}

/// 일기 CRUD를 담당하는 서비스. 풀만 들고 있으므로 clone 비용이 작습니다.
#[derive(Clone)]
pub struct DiaryService {
    pool: SqlitePool,
}

impl DiaryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 새 일기를 만들고 해석된 코디만 연결합니다.
    pub async fn create(&self, owner_id: &str, req: DiaryRequest) -> Result<DiaryWrite, AppError> {
        let draft = DiaryDraft::validate(req)?;
        let id = uuid::Uuid::now_v7().to_string();

        let mut tx = self.pool.begin().await?;

        db::insert_diary(&mut *tx, &id, owner_id, draft.date, &draft.emotion, &draft.content)
            .await?;
        let (resolved, dropped) = resolve_outfits(&mut *tx, &draft.outfit_ids).await?;
        db::replace_diary_outfits(&mut *tx, &id, &resolved).await?;

        let diary = db::find_diary(&mut *tx, &id)
            .await?
            .ok_or(AppError::Internal("Failed to retrieve created diary".to_string()))?;

        tx.commit().await?;

        log_dropped(&id, &dropped);
        tracing::debug!(diary_id = %id, outfits = resolved.len(), "diary created");

        Ok(DiaryWrite {
            diary,
            dropped_outfit_ids: dropped,
        })
    }

    /// 일기의 날짜·감정·내용을 덮어쓰고 코디 연결을 교체합니다.
    ///
    /// 변경된 행은 같은 트랜잭션 안에서 명시적으로 UPDATE 합니다.
    pub async fn update(&self, diary_id: &str, req: DiaryRequest) -> Result<DiaryWrite, AppError> {
        let draft = DiaryDraft::validate(req)?;

        let mut tx = self.pool.begin().await?;

        let updated = db::update_diary_row(
            &mut *tx,
            diary_id,
            draft.date,
            &draft.emotion,
            &draft.content,
        )
        .await?;
        if !updated {
            return Err(AppError::NotFound);
        }

        let (resolved, dropped) = resolve_outfits(&mut *tx, &draft.outfit_ids).await?;
        db::replace_diary_outfits(&mut *tx, diary_id, &resolved).await?;

        let diary = db::find_diary(&mut *tx, diary_id)
            .await?
            .ok_or(AppError::NotFound)?;

        tx.commit().await?;

        log_dropped(diary_id, &dropped);

        Ok(DiaryWrite {
            diary,
            dropped_outfit_ids: dropped,
        })
    }

    /// 일기를 삭제합니다. 없으면 아무것도 바꾸지 않고 `NotFound`를 반환합니다.
    pub async fn delete(&self, diary_id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if !db::delete_diary(&mut *tx, diary_id).await? {
            return Err(AppError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn find_by_id(&self, diary_id: &str) -> Result<Diary, AppError> {
        let mut conn = self.pool.acquire().await?;
        db::find_diary(&mut *conn, diary_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn find_all_by_owner(&self, owner_id: &str) -> Result<Vec<Diary>, AppError> {
        let mut conn = self.pool.acquire().await?;
        db::list_diaries_by_owner(&mut *conn, owner_id).await
    }
}

/// 코디 ID를 요청 순서대로 해석합니다.
///
/// 반환값: (찾은 ID, 찾지 못한 ID). 같은 ID가 여러 번 오면 처음 한 번만 봅니다.
async fn resolve_outfits(
    conn: &mut SqliteConnection,
    outfit_ids: &[String],
) -> Result<(Vec<String>, Vec<String>), AppError> {
    let mut resolved: Vec<String> = Vec::new();
    let mut dropped: Vec<String> = Vec::new();

    for id in outfit_ids {
        if resolved.contains(id) || dropped.contains(id) {
            continue;
        }
        match db::find_outfit(&mut *conn, id).await? {
            Some(outfit) => resolved.push(outfit.id),
            None => dropped.push(id.clone()),
        }
    }

    Ok((resolved, dropped))
}

fn log_dropped(diary_id: &str, dropped: &[String]) {
    if !dropped.is_empty() {
        tracing::warn!(
            diary_id = %diary_id,
            dropped = dropped.len(),
            ids = ?dropped,
            "dropped unknown outfit references"
        );
    }
}
