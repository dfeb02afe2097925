//! # S3 호환 스토리지
//!
//! AWS S3, MinIO 등 S3 API를 쓰는 버킷에 코디 사진을 저장합니다.
//! 반환 URL은 버킷 URL 뒤에 키를 붙인 형태입니다.

use ::s3::creds::Credentials;
use ::s3::{Bucket, Region};

use super::{StorageError, StorageGateway};
use crate::config::S3Settings;

pub struct S3Storage {
    bucket: Box<Bucket>,
}

impl S3Storage {
    /// 설정으로 버킷 핸들을 만듭니다. 네트워크 호출은 하지 않습니다.
    ///
    /// 엔드포인트가 지정되면(MinIO 등) path-style 주소를 씁니다.
    /// 키가 설정되지 않았으면 환경/프로파일의 자격 증명을 찾습니다.
    pub fn new(settings: &S3Settings) -> Result<Self, StorageError> {
        let region = match &settings.endpoint {
            Some(endpoint) => Region::Custom {
                region: settings.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => settings
                .region
                .parse::<Region>()
                .map_err(|e| StorageError::Io(format!("invalid region: {}", e)))?,
        };

        let credentials = match (&settings.access_key, &settings.secret_key) {
            (Some(access), Some(secret)) => {
                Credentials::new(Some(access.as_str()), Some(secret.as_str()), None, None, None)
            }
            _ => Credentials::default(),
        }
        .map_err(|e| StorageError::Io(format!("credentials: {}", e)))?;

        let mut bucket = Bucket::new(&settings.bucket, region, credentials)
            .map_err(|e| StorageError::Io(format!("bucket: {}", e)))?;
        if settings.endpoint.is_some() {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket })
    }
}

#[async_trait::async_trait]
impl StorageGateway for S3Storage {
    async fn store(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, bytes, content_type)
            .await
            .map_err(|e| StorageError::Io(format!("put {}: {}", key, e)))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Io(format!("put {}: HTTP {}", key, status)));
        }

        Ok(format!("{}/{}", self.bucket.url(), key))
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| StorageError::Io(format!("get {}: {}", key, e)))?;

        match response.status_code() {
            200..=299 => Ok(response.bytes().to_vec()),
            404 => Err(StorageError::NotFound(key.to_string())),
            status => Err(StorageError::Io(format!("get {}: HTTP {}", key, status))),
        }
    }
}
