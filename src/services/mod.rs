//! # 서비스 계층
//!
//! 여러 저장소 호출을 하나의 작업으로 묶는 비즈니스 로직입니다.
//! - `diary`: 일기 조립/저장 (코디 ID 해석 포함)

pub mod diary;

pub use diary::DiaryService;
