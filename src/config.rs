//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수(.env 포함)에서 서버 설정값을 읽어옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 액세스 토큰 서명 비밀키 (필수)
//! - `HOST`, `PORT`: 서버 바인딩 주소
//! - `STORAGE_BACKEND`: `local`(기본) 또는 `s3`
//! - `UPLOADS_PATH`: 로컬 스토리지 디렉토리
//! - `PUBLIC_BASE_URL`: 로컬 스토리지 이미지 URL의 앞부분
//! - `S3_BUCKET`, `S3_REGION`, `S3_ENDPOINT`, `S3_ACCESS_KEY`, `S3_SECRET_KEY`

use std::env;
use thiserror::Error;

/// 기본 버킷 이름
const DEFAULT_BUCKET: &str = "closetindiary-image-bucket";
const DEFAULT_REGION: &str = "ap-northeast-2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// 코디 사진을 어디에 저장할지 결정합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// 서버 디스크의 디렉토리에 저장
    Local { uploads_path: String },
    /// S3 호환 버킷에 저장
    S3(S3Settings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// MinIO 등 AWS가 아닌 엔드포인트. None이면 리전의 AWS 엔드포인트를 씁니다.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// 애플리케이션 전체 설정
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// 로컬 스토리지가 돌려주는 이미지 URL의 기준 주소 (예: "http://localhost:3000")
    pub public_base_url: String,
    pub storage: StorageBackend,
}

impl Config {
    /// 프로세스 환경변수에서 설정을 읽습니다.
    ///
    /// # 에러
    /// `DATABASE_URL`, `JWT_SECRET`이 없거나 `STORAGE_BACKEND` 값이
    /// `local`/`s3`가 아니면 에러를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정을 만듭니다. 테스트에서는 HashMap을 넘깁니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        // 파싱 실패 시 기본값 3000을 씁니다.
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let backend = lookup("STORAGE_BACKEND").unwrap_or_else(|| "local".to_string());
        let storage = match backend.to_ascii_lowercase().as_str() {
            "local" => StorageBackend::Local {
                uploads_path: lookup("UPLOADS_PATH")
                    .unwrap_or_else(|| "data/uploads".to_string()),
            },
            "s3" => StorageBackend::S3(S3Settings {
                bucket: lookup("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
                region: lookup("S3_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
                endpoint: lookup("S3_ENDPOINT"),
                access_key: lookup("S3_ACCESS_KEY"),
                secret_key: lookup("S3_SECRET_KEY"),
            }),
            _ => {
                return Err(ConfigError::Invalid {
                    var: "STORAGE_BACKEND",
                    value: backend,
                })
            }
        };

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            public_base_url,
            storage,
        })
    }
}
