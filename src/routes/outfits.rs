//! # 코디(Outfit) 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 설명 |
//! |--------|------|------|
//! | POST | /api/outfits/upload | multipart 업로드 (file, category, folder, description) |
//! | GET | /api/outfits/image/{file_name} | 이미지 원본 바이트 |
//! | GET | /api/outfits/list | 내 코디 이미지 URL 목록 |
//! | GET | /api/outfits | 내 코디 전체 레코드 |
//!
//! 업로드와 목록은 `AuthUser` 추출기가 먼저 실행되므로, 인증이 없으면
//! 본문을 읽기 전에 401로 끝나고 스토리지와 DB에는 아무것도 쓰지 않습니다.

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::auth::AuthUser,
    models::NewOutfit,
    routes::AppState,
    storage::{content_type_for, object_key},
};

/// multipart 본문에서 모은 필드들
#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    category: Option<String>,
    folder: Option<String>,
    description: Option<String>,
}

/// 빈 문자열은 값이 없는 것으로 봅니다.
fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(format!("Invalid multipart body: {}", e))
}

/// `POST /api/outfits/upload`: 코디 사진을 올리고 메타데이터를 저장합니다.
///
/// 1. 사진을 `{밀리초}_{파일이름}` 키로 스토리지에 저장
/// 2. 스토리지가 돌려준 URL과 함께 코디 행을 삽입
///
/// 성공하면 본문 없이 200을 반환합니다.
pub async fn upload_outfit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    mut multipart: Multipart,
) -> Result<StatusCode, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // field.bytes()/text()가 field를 소비하므로 이름을 먼저 복사해 둡니다.
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.bytes = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            "category" => form.category = Some(field.text().await.map_err(multipart_error)?),
            "folder" => form.folder = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                form.description = Some(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    let bytes = form
        .bytes
        .ok_or_else(|| AppError::BadRequest("file is required".to_string()))?;
    let category = non_blank(form.category)
        .ok_or_else(|| AppError::BadRequest("category is required".to_string()))?;

    let key = object_key(form.file_name.as_deref(), Utc::now().timestamp_millis());
    let image_url = state
        .storage
        .store(&key, &bytes, content_type_for(&key))
        .await?;

    let outfit = db::create_outfit(
        &state.pool,
        &NewOutfit {
            user_id: auth_user.user_id,
            category,
            folder: non_blank(form.folder),
            description: non_blank(form.description),
            image_key: key,
            image_url,
        },
    )
    .await?;

    tracing::info!(
        outfit_id = %outfit.id,
        key = %outfit.image_key,
        size = bytes.len(),
        "outfit uploaded"
    );

    Ok(StatusCode::OK)
}

/// `GET /api/outfits/image/{file_name}`: 저장된 이미지를 그대로 돌려줍니다.
///
/// 키가 없으면 404, 스토리지 전송 오류는 500이며 어느 경우든 이미지 본문은 없습니다.
pub async fn get_outfit_image(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let bytes = state.storage.fetch(&file_name).await?;

    let disposition = HeaderValue::from_str(&format!("inline; filename={}", file_name))
        .map_err(|_| AppError::BadRequest("Invalid file name".to_string()))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(content_type_for(&file_name)),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /api/outfits/list`: 내 코디의 이미지 URL 배열
pub async fn list_outfit_urls(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<String>>, AppError> {
    let urls = db::list_image_urls_by_owner(&state.pool, &auth_user.user_id).await?;
    Ok(Json(urls))
}

/// `GET /api/outfits`: 내 코디 전체 레코드 `{ "outfits": [...] }`
pub async fn list_outfits(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let outfits = db::list_outfits_by_owner(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "outfits": outfits })))
}
