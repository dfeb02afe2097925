//! # 일기(Diary) 모델
//!
//! 일기는 날짜, 감정 태그, 자유 텍스트와 그날 입은 코디 목록으로 이루어집니다.
//! 코디 연결은 `diary_outfits` 중간 테이블(N:M)에 저장됩니다.
//!
//! ```text
//! diaries ←── diary_outfits ──→ outfits
//!   (1)          (N:M)            (1)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Outfit;

/// `diaries` 테이블 한 행. 코디 목록은 따로 조회해서 `Diary`로 합칩니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiaryRow {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub emotion: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

/// API 응답으로 나가는 일기 (연결된 코디 포함)
#[derive(Debug, Clone, Serialize)]
pub struct Diary {
    pub id: String,
    pub user_id: String,
    /// "YYYY-MM-DD" 형식으로 직렬화됩니다.
    pub date: NaiveDate,
    pub emotion: String,
    pub content: String,
    pub outfits: Vec<Outfit>,
    pub created_at: String,
    pub updated_at: String,
}

impl Diary {
    pub fn from_row(row: DiaryRow, outfits: Vec<Outfit>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            emotion: row.emotion,
            content: row.content,
            outfits,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }

    /// 연결된 코디 ID 목록 (테스트와 로그용)
    pub fn outfit_ids(&self) -> Vec<&str> {
        self.outfits.iter().map(|o| o.id.as_str()).collect()
    }
}

/// 일기 생성/수정 요청 본문: `POST /api/diaries`, `PUT /api/diaries/{id}`
///
/// 스칼라 필드가 Option인 이유: 누락 여부를 서비스 계층에서 검사하여
/// 400 Bad Request로 돌려주기 위해서입니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiaryRequest {
    pub date: Option<NaiveDate>,
    pub emotion: Option<String>,
    pub content: Option<String>,
    /// 연결할 코디 ID. 존재하지 않는 ID는 오류 없이 빠집니다.
    #[serde(default)]
    pub outfit_ids: Vec<String>,
}

/// 일기 생성/수정 결과
///
/// `dropped_outfit_ids`: 요청에 있었지만 코디를 찾지 못해 연결되지 않은 ID
#[derive(Debug, Clone, Serialize)]
pub struct DiaryWrite {
    pub diary: Diary,
    pub dropped_outfit_ids: Vec<String>,
}
