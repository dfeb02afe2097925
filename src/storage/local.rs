//! # 로컬 디스크 스토리지
//!
//! 업로드 디렉토리(`UPLOADS_PATH`)에 키 이름 그대로 파일을 저장합니다.
//! 반환 URL은 이 서버의 이미지 조회 엔드포인트를 가리킵니다.

use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use super::{StorageError, StorageGateway};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 업로드 디렉토리가 없으면 만듭니다 (mkdir -p).
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::Io(format!("create {}: {}", self.root.display(), e)))
    }

    /// 키를 디스크 경로로 바꿉니다.
    /// 디렉토리를 벗어날 수 있는 키는 존재하지 않는 오브젝트로 취급합니다.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\']) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/api/outfits/image/{}", self.public_base_url, key)
    }
}

#[async_trait::async_trait]
impl StorageGateway for LocalStorage {
    async fn store(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        self.ensure_root().await?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Io(format!("write {}: {}", path.display(), e)))?;
        Ok(self.url_for(key))
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(format!("read {}: {}", path.display(), e))),
        }
    }
}
