//! # 코디(Outfit) 모델
//!
//! 코디는 사용자가 올린 옷 사진 한 장과 분류 정보입니다.
//! 업로드할 때 한 번 만들어지고, 이후 수정되지 않습니다.

use serde::{Deserialize, Serialize};

/// `outfits` 테이블 한 행
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Outfit {
    /// UUIDv7 식별자
    pub id: String,
    /// 소유 사용자. 모든 코디는 정확히 한 명의 소유자를 가집니다.
    pub user_id: String,
    /// 분류 (예: "상의", "아우터"). 비어 있을 수 없습니다.
    pub category: String,
    /// 사용자가 정한 폴더 이름
    pub folder: Option<String>,
    pub description: Option<String>,
    /// 스토리지의 오브젝트 키 (예: "1700000000000_summer-look.jpg")
    pub image_key: String,
    /// 스토리지가 돌려준 이미지 URL
    pub image_url: String,
    pub created_at: String,
}

/// 코디 행을 새로 만들 때 필요한 값들
///
/// multipart 업로드에서 필드를 모은 뒤, 스토리지 업로드가 끝나면 만들어집니다.
#[derive(Debug, Clone)]
pub struct NewOutfit {
    pub user_id: String,
    pub category: String,
    pub folder: Option<String>,
    pub description: Option<String>,
    pub image_key: String,
    pub image_url: String,
}
