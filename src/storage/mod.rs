//! # 스토리지 게이트웨이(Storage Gateway)
//!
//! 코디 사진(바이너리)을 오브젝트 스토리지에 저장하고 다시 꺼내오는 경계 계층입니다.
//!
//! - `store(key, bytes)`: 키 아래에 블롭을 쓰고, 역참조 가능한 URL을 돌려줍니다.
//!   같은 키로 다시 올리면 조용히 덮어씁니다.
//! - `fetch(key)`: 블롭 전체를 읽습니다. 키가 없으면 `NotFound`, 전송 오류는 `Io`.
//!
//! 재시도, 스트리밍, 범위 요청은 지원하지 않습니다.
//! 구현체는 `local`(디스크 디렉토리)과 `s3`(S3 호환 버킷) 두 가지입니다.

pub mod local;
pub mod s3;

pub use self::local::LocalStorage;
pub use self::s3::S3Storage;

use std::sync::Arc;
use thiserror::Error;

use crate::config::{Config, StorageBackend};

#[derive(Debug, Error)]
pub enum StorageError {
    /// 해당 키의 오브젝트가 없음
    #[error("object not found: {0}")]
    NotFound(String),
    /// 전송/입출력 실패
    #[error("storage transport failure: {0}")]
    Io(String),
}

/// 오브젝트 스토리지의 추상 인터페이스.
///
/// `AppState`에는 `Arc<dyn StorageGateway>`로 들어가므로
/// `async_trait`으로 dyn 호환 async 메서드를 만듭니다.
#[async_trait::async_trait]
pub trait StorageGateway: Send + Sync {
    /// 블롭을 저장하고 조회용 URL을 반환합니다.
    async fn store(&self, key: &str, bytes: &[u8], content_type: &str)
        -> Result<String, StorageError>;

    /// 키에 해당하는 블롭 전체를 읽습니다.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// 설정에 맞는 스토리지 구현체를 만듭니다.
pub async fn from_config(config: &Config) -> Result<Arc<dyn StorageGateway>, StorageError> {
    match &config.storage {
        StorageBackend::Local { uploads_path } => {
            let storage = LocalStorage::new(uploads_path, &config.public_base_url);
            storage.ensure_root().await?;
            tracing::info!("Using local storage at {}", uploads_path);
            Ok(Arc::new(storage))
        }
        StorageBackend::S3(settings) => {
            let storage = S3Storage::new(settings)?;
            tracing::info!(bucket = %settings.bucket, region = %settings.region, "Using S3 storage");
            Ok(Arc::new(storage))
        }
    }
}

/// 업로드 파일 이름으로 오브젝트 키를 만듭니다.
///
/// 형식: `{unix_millis}_{slug(stem)}.{ext}`
/// 파일 이름이 없거나 slug가 비면 stem은 "image"가 됩니다.
///
/// ```text
/// object_key(Some("Summer Look.JPG"), 1700000000000) → "1700000000000_summer-look.jpg"
/// object_key(None, 1700000000000)                    → "1700000000000_image"
/// ```
pub fn object_key(original_name: Option<&str>, unix_millis: i64) -> String {
    // 브라우저가 보낸 경로 부분("C:\\photos\\a.jpg")은 버립니다.
    let name = original_name
        .map(|n| n.rsplit(['/', '\\']).next().unwrap_or(n))
        .unwrap_or("");

    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let mut stem = slug::slugify(stem);
    if stem.is_empty() {
        stem = "image".to_string();
    }

    let ext = ext
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|e| !e.is_empty());

    match ext {
        Some(ext) => format!("{}_{}.{}", unix_millis, stem, ext),
        None => format!("{}_{}", unix_millis, stem),
    }
}

/// 키의 확장자로 이미지 MIME 타입을 추정합니다. 모르면 JPEG로 간주합니다.
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_timestamp_prefixed_slug() {
        assert_eq!(
            object_key(Some("Summer Look.JPG"), 1_700_000_000_000),
            "1700000000000_summer-look.jpg"
        );
    }

    #[test]
    fn key_strips_client_directories() {
        assert_eq!(
            object_key(Some("C:\\photos\\coat.png"), 42),
            "42_coat.png"
        );
        assert_eq!(object_key(Some("../../etc/passwd"), 42), "42_passwd");
    }

    #[test]
    fn key_without_name_falls_back_to_image() {
        assert_eq!(object_key(None, 7), "7_image");
        assert_eq!(object_key(Some(".jpg"), 7), "7_jpg");
        assert_eq!(object_key(Some("!!!.webp"), 7), "7_image.webp");
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for("1_a.png"), "image/png");
        assert_eq!(content_type_for("1_a.WEBP"), "image/webp");
        assert_eq!(content_type_for("1_a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("1_a"), "image/jpeg");
    }
}
