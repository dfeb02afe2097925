//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체들을 정의합니다.
//! - `user`: 사용자 계정과 인증 요청/응답
//! - `outfit`: 업로드된 코디 사진의 메타데이터
//! - `diary`: 날짜·감정·내용과 코디 목록을 묶은 일기
//!
//! `pub use X::*;`로 재공개하여 `crate::models::Outfit`처럼 짧게 접근합니다.

pub mod diary;
pub mod outfit;
pub mod user;

pub use diary::*;
pub use outfit::*;
pub use user::*;
