//! # 일기(Diary) 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/diaries`      → 내 일기 목록
//! - `POST   /api/diaries`      → 일기 작성
//! - `GET    /api/diaries/{id}` → 일기 하나
//! - `PUT    /api/diaries/{id}` → 일기 수정 (코디 연결은 통째로 교체)
//! - `DELETE /api/diaries/{id}` → 일기 삭제
//!
//! 다른 사용자의 일기는 존재하지 않는 것처럼 404로 응답합니다.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::{Diary, DiaryRequest, DiaryWrite},
    routes::AppState,
};

/// 일기를 찾고 소유자가 요청자인지 확인합니다.
async fn owned_diary(state: &AppState, id: &str, auth_user: &AuthUser) -> Result<Diary, AppError> {
    let diary = state.diaries.find_by_id(id).await?;
    if diary.user_id != auth_user.user_id {
        return Err(AppError::NotFound);
    }
    Ok(diary)
}

pub async fn list_diaries(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let diaries = state.diaries.find_all_by_owner(&auth_user.user_id).await?;
    Ok(Json(json!({ "diaries": diaries })))
}

/// 응답: `{ "diary": {...}, "dropped_outfit_ids": [...] }`
pub async fn create_diary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<DiaryRequest>,
) -> Result<(StatusCode, Json<DiaryWrite>), AppError> {
    let written = state.diaries.create(&auth_user.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(written)))
}

pub async fn get_diary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Diary>, AppError> {
    let diary = owned_diary(&state, &id, &auth_user).await?;
    Ok(Json(diary))
}

pub async fn update_diary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<DiaryRequest>,
) -> Result<Json<DiaryWrite>, AppError> {
    owned_diary(&state, &id, &auth_user).await?;
    let written = state.diaries.update(&id, req).await?;
    Ok(Json(written))
}

pub async fn delete_diary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    owned_diary(&state, &id, &auth_user).await?;
    state.diaries.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
