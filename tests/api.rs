//! 라우터 전체를 서버 없이 `oneshot`으로 호출하는 통합 테스트.
//!
//! 각 테스트는 자기만의 메모리 SQLite와 임시 업로드 디렉토리를 씁니다.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use closet_diary::{
    app, db,
    middleware::auth::create_access_token,
    routes::AppState,
    storage::LocalStorage,
};

const SECRET: &str = "test-secret";
const BASE_URL: &str = "http://localhost:3000";
const BOUNDARY: &str = "closet-diary-test-boundary";

struct TestApp {
    router: Router,
    pool: SqlitePool,
    uploads: PathBuf,
    token: String,
}

impl TestApp {
    async fn new() -> Self {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        let uploads = std::env::temp_dir().join(format!(
            "closet-diary-api-{}",
            uuid::Uuid::now_v7()
        ));
        let storage = Arc::new(LocalStorage::new(&uploads, BASE_URL));
        let state = AppState::new(pool.clone(), storage, SECRET.to_string());

        let user = db::users::create_user(&pool, "user-1", "minji", None, "hash")
            .await
            .unwrap();
        let token = create_access_token(&user.id, SECRET).unwrap();

        Self {
            router: app(state),
            pool,
            uploads,
            token,
        }
    }

    /// 두 번째 사용자를 만들고 그 토큰을 돌려줍니다.
    async fn other_user_token(&self) -> String {
        let user = db::users::create_user(&self.pool, "user-2", "seojun", None, "hash")
            .await
            .unwrap();
        create_access_token(&user.id, SECRET).unwrap()
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn upload(&self, token: Option<&str>, fields: &[Part<'_>]) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/outfits/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(multipart_body(fields))).unwrap())
            .await
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn delete(&self, uri: &str, token: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn count(&self, table: &str) -> i64 {
        let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap();
        count
    }

    fn stored_files(&self) -> usize {
        std::fs::read_dir(&self.uploads)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    /// 코디를 하나 올리고 그 ID를 반환합니다.
    async fn upload_outfit(&self, file_name: &str, category: &str) -> String {
        let response = self
            .upload(
                Some(&self.token),
                &[
                    Part::file(file_name, b"fake image bytes"),
                    Part::text("category", category),
                ],
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let outfits = body_json(self.get("/api/outfits", Some(&self.token)).await).await;
        outfits["outfits"]
            .as_array()
            .unwrap()
            .last()
            .unwrap()["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.uploads);
    }
}

struct Part<'a> {
    name: &'a str,
    file_name: Option<&'a str>,
    data: &'a [u8],
}

impl<'a> Part<'a> {
    fn file(file_name: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "file",
            file_name: Some(file_name),
            data,
        }
    }

    fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            data: value.as_bytes(),
        }
    }
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    part.name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                    .as_bytes(),
            ),
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn ids(values: &Value) -> Vec<String> {
    let mut ids: Vec<String> = values
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

fn sorted(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::new().await;
    let response = app.get("/api/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn upload_then_list_includes_url_once() {
    let app = TestApp::new().await;

    let response = app
        .upload(
            Some(&app.token),
            &[
                Part::file("Spring Coat.PNG", b"\x89PNG image"),
                Part::text("category", "outer"),
                Part::text("folder", "spring"),
                Part::text("description", "light trench coat"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let urls = body_json(app.get("/api/outfits/list", Some(&app.token)).await).await;
    let urls: Vec<String> = serde_json::from_value(urls).unwrap();
    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("http://localhost:3000/api/outfits/image/"));
    assert!(urls[0].ends_with("_spring-coat.png"));

    let outfits = body_json(app.get("/api/outfits", Some(&app.token)).await).await;
    let outfit = &outfits["outfits"][0];
    assert_eq!(outfit["category"], "outer");
    assert_eq!(outfit["folder"], "spring");
    assert_eq!(outfit["description"], "light trench coat");
    assert_eq!(outfit["image_url"], urls[0].as_str());

    // 돌려받은 URL로 이미지를 다시 읽을 수 있어야 합니다.
    let path = urls[0].trim_start_matches(BASE_URL);
    let image = app.get(path, None).await;
    assert_eq!(image.status(), StatusCode::OK);
    assert_eq!(image.headers()[header::CONTENT_TYPE], "image/png");
    let disposition = image.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("inline; filename="));
    assert!(disposition.ends_with("_spring-coat.png"));
    assert_eq!(body_bytes(image).await, b"\x89PNG image");
}

#[tokio::test]
async fn lists_only_the_callers_outfits() {
    let app = TestApp::new().await;
    app.upload_outfit("mine.jpg", "top").await;

    let other = app.other_user_token().await;
    let urls = body_json(app.get("/api/outfits/list", Some(&other)).await).await;
    assert_eq!(urls, json!([]));
}

#[tokio::test]
async fn unauthenticated_upload_and_list_have_no_side_effects() {
    let app = TestApp::new().await;
    let fields = [Part::file("coat.jpg", b"bytes"), Part::text("category", "outer")];

    let response = app.upload(None, &fields).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.upload(Some("not-a-jwt"), &fields).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.get("/api/outfits/list", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "missing_token");

    assert_eq!(app.count("outfits").await, 0);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn token_for_deleted_user_is_rejected() {
    let app = TestApp::new().await;
    let ghost = create_access_token("no-such-user", SECRET).unwrap();

    let response = app.get("/api/outfits/list", Some(&ghost)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_without_category_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .upload(Some(&app.token), &[Part::file("coat.jpg", b"bytes")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .upload(Some(&app.token), &[Part::text("category", "outer")])
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.count("outfits").await, 0);
    assert_eq!(app.stored_files(), 0);
}

#[tokio::test]
async fn missing_image_is_not_found_without_partial_body() {
    let app = TestApp::new().await;

    let response = app.get("/api/outfits/image/1700000000000_nope.jpg", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(body_json(response).await["error"]["code"], "not_found");
}

#[tokio::test]
async fn diary_keeps_exactly_the_valid_outfit_subset() {
    let app = TestApp::new().await;
    let top = app.upload_outfit("top.jpg", "top").await;
    let pants = app.upload_outfit("pants.jpg", "bottom").await;

    let response = app
        .send_json(
            "POST",
            "/api/diaries",
            json!({
                "date": "2024-05-01",
                "emotion": "happy",
                "content": "picnic at the park",
                "outfit_ids": [top, "missing-1", pants, "missing-2"]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let written = body_json(response).await;
    assert_eq!(written["diary"]["date"], "2024-05-01");
    assert_eq!(
        ids(&written["diary"]["outfits"]),
        sorted(vec![top.clone(), pants.clone()])
    );
    assert_eq!(written["dropped_outfit_ids"], json!(["missing-1", "missing-2"]));

    let id = written["diary"]["id"].as_str().unwrap();
    let stored = body_json(app.get(&format!("/api/diaries/{}", id), Some(&app.token)).await).await;
    assert_eq!(ids(&stored["outfits"]), sorted(vec![top, pants]));
}

#[tokio::test]
async fn diary_without_emotion_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .send_json("POST", "/api/diaries", json!({ "date": "2024-05-01" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count("diaries").await, 0);
}

#[tokio::test]
async fn updating_outfits_twice_keeps_only_the_last_set() {
    let app = TestApp::new().await;
    let a1 = app.upload_outfit("a1.jpg", "top").await;
    let a2 = app.upload_outfit("a2.jpg", "bottom").await;
    let b1 = app.upload_outfit("b1.jpg", "shoes").await;

    let created = body_json(
        app.send_json(
            "POST",
            "/api/diaries",
            json!({ "date": "2024-05-01", "emotion": "calm", "outfit_ids": [] }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/diaries/{}", created["diary"]["id"].as_str().unwrap());

    let response = app
        .send_json(
            "PUT",
            &uri,
            json!({ "date": "2024-05-01", "emotion": "calm", "outfit_ids": [a1, a2] }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send_json(
            "PUT",
            &uri,
            json!({
                "date": "2024-05-02",
                "emotion": "tired",
                "content": "long day",
                "outfit_ids": [b1]
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = body_json(app.get(&uri, Some(&app.token)).await).await;
    assert_eq!(ids(&stored["outfits"]), vec![b1]);
    assert_eq!(stored["date"], "2024-05-02");
    assert_eq!(stored["emotion"], "tired");
    assert_eq!(stored["content"], "long day");
    assert_eq!(app.count("diary_outfits").await, 1);
}

#[tokio::test]
async fn deleting_missing_diary_is_not_found_and_changes_nothing() {
    let app = TestApp::new().await;
    let top = app.upload_outfit("top.jpg", "top").await;
    app.send_json(
        "POST",
        "/api/diaries",
        json!({ "date": "2024-05-01", "emotion": "happy", "outfit_ids": [top] }),
    )
    .await;

    let response = app.delete("/api/diaries/does-not-exist", &app.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert_eq!(app.count("diaries").await, 1);
    assert_eq!(app.count("diary_outfits").await, 1);
    assert_eq!(app.count("outfits").await, 1);
}

#[tokio::test]
async fn delete_removes_diary_but_keeps_outfits() {
    let app = TestApp::new().await;
    let top = app.upload_outfit("top.jpg", "top").await;
    let created = body_json(
        app.send_json(
            "POST",
            "/api/diaries",
            json!({ "date": "2024-05-01", "emotion": "happy", "outfit_ids": [top] }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/diaries/{}", created["diary"]["id"].as_str().unwrap());

    let response = app.delete(&uri, &app.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(app.get(&uri, Some(&app.token)).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.count("diaries").await, 0);
    assert_eq!(app.count("diary_outfits").await, 0);
    assert_eq!(app.count("outfits").await, 1);
}

#[tokio::test]
async fn other_users_diary_is_hidden() {
    let app = TestApp::new().await;
    let created = body_json(
        app.send_json(
            "POST",
            "/api/diaries",
            json!({ "date": "2024-05-01", "emotion": "happy" }),
        )
        .await,
    )
    .await;
    let uri = format!("/api/diaries/{}", created["diary"]["id"].as_str().unwrap());
    let other = app.other_user_token().await;

    assert_eq!(app.get(&uri, Some(&other)).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&uri, &other).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.count("diaries").await, 1);

    let listed = body_json(app.get("/api/diaries", Some(&other)).await).await;
    assert_eq!(listed["diaries"], json!([]));

    let listed = body_json(app.get("/api/diaries", Some(&app.token)).await).await;
    assert_eq!(listed["diaries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn register_login_and_me() {
    let app = TestApp::new().await;

    let register = |body: Value| {
        Request::builder()
            .method("POST")
            .uri("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let response = app
        .send(register(json!({
            "username": "haneul",
            "email": "haneul@example.com",
            "password": "correct horse"
        })))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .send(register(json!({ "username": "haneul", "password": "another pass" })))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "haneul", "password": "wrong password" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "username": "haneul", "password": "correct horse" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let auth = body_json(response).await;
    assert!(auth["user"].get("password_hash").is_none());

    let token = auth["access_token"].as_str().unwrap();
    let me = body_json(app.get("/api/auth/me", Some(token)).await).await;
    assert_eq!(me["username"], "haneul");
    assert_eq!(me["email"], "haneul@example.com");
}
