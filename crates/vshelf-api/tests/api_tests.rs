//! API integration tests.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use mockall::predicate::{always, eq};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use vshelf_api::error::INTERNAL_ERROR_DETAIL;
use vshelf_api::{create_router, ApiConfig, AppState, Claims};
use vshelf_ingest::{
    AssetRepository, IngestConfig, InMemoryAssetRepository, MockAssetRepository, RepositoryError,
    UploadPipeline,
};
use vshelf_media::{MediaResult, Prober, Remuxer, StreamDimensions};
use vshelf_models::{StorageReference, VideoAsset};
use vshelf_storage::{DeliveryConfig, MockObjectStore, ObjectStore, StorageError, VideoUrlSigner};

const SECRET: &str = "test-secret";
const BOUNDARY: &str = "vshelf-test-boundary";

struct CopyRemuxer;

#[async_trait]
impl Remuxer for CopyRemuxer {
    async fn remux_faststart(&self, input: &Path, output: &Path) -> MediaResult<()> {
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

struct FixedProber(i64, i64);

#[async_trait]
impl Prober for FixedProber {
    async fn probe_dimensions(&self, _path: &Path) -> MediaResult<StreamDimensions> {
        Ok(StreamDimensions {
            width: self.0,
            height: self.1,
        })
    }
}

struct TestApp {
    router: Router,
    assets: Arc<InMemoryAssetRepository>,
    temp: TempDir,
}

impl TestApp {
    fn new(store: MockObjectStore) -> Self {
        Self::with_environment(store, "development")
    }

    fn with_environment(store: MockObjectStore, environment: &str) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let store: Arc<dyn ObjectStore> = Arc::new(store);
        let pipeline = UploadPipeline::new(
            Arc::new(IngestConfig::new("videos").with_temp_dir(temp.path())),
            Arc::new(CopyRemuxer),
            Arc::new(FixedProber(1920, 1080)),
            store.clone(),
            VideoUrlSigner::new(store, DeliveryConfig::default()),
        );

        let assets = Arc::new(InMemoryAssetRepository::new());
        let config = ApiConfig {
            jwt_secret: SECRET.to_string(),
            environment: environment.to_string(),
            ..ApiConfig::default()
        };
        let state = AppState::new(config, pipeline, assets.clone());

        Self {
            router: create_router(state, None),
            assets,
            temp,
        }
    }

    async fn owned_asset(&self, owner: Uuid) -> VideoAsset {
        let asset = VideoAsset::new(owner, "Boots demo");
        self.assets.insert(&asset).await.unwrap();
        asset
    }

    fn temp_is_empty(&self) -> bool {
        std::fs::read_dir(self.temp.path()).unwrap().next().is_none()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

fn token_for(user: Uuid) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.to_string(),
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn multipart_body(field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"clip.mp4\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(video_id: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/videos/{video_id}/upload"))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new(MockObjectStore::new());

    let (status, body) = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_storage() {
    let mut store = MockObjectStore::new();
    store
        .expect_check_connectivity()
        .with(eq("videos"))
        .times(1)
        .returning(|_| Ok(()));
    let app = TestApp::new(store);

    let (status, body) = app
        .send(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["storage"]["status"], "ok");

    let mut store = MockObjectStore::new();
    store
        .expect_check_connectivity()
        .returning(|_| Err(StorageError::AwsSdk("unreachable".to_string())));
    let app = TestApp::new(store);

    let (status, body) = app
        .send(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_upload_success_returns_signed_asset() {
    let mut store = MockObjectStore::new();
    store
        .expect_put_file()
        .with(eq("videos"), always(), always(), eq("video/mp4"))
        .times(1)
        .returning(|_, _, _, _| Ok(()));
    store
        .expect_presign_get()
        .times(1)
        .returning(|bucket, key, _| Ok(format!("https://s3.example/{bucket}/{key}?X-Amz-Signature=abc")));
    let app = TestApp::new(store);

    let owner = Uuid::new_v4();
    let asset = app.owned_asset(owner).await;
    let request = upload_request(
        &asset.id.to_string(),
        Some(&token_for(owner)),
        multipart_body("video", "video/mp4", b"fake mp4 payload"),
    );

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    let url = body["video_url"].as_str().unwrap();
    assert!(url.starts_with("https://s3.example/videos/landscape/"));

    let stored = app.assets.get(&asset.id).await.unwrap().unwrap();
    let reference = StorageReference::decode(stored.video_url.as_deref().unwrap()).unwrap();
    assert_eq!(reference.bucket, "videos");
    assert!(reference.key.starts_with("landscape/"));
    assert!(app.temp_is_empty());
}

#[tokio::test]
async fn test_upload_invalid_id_is_checked_before_auth() {
    let app = TestApp::new(MockObjectStore::new());

    let (status, _) = app
        .send(upload_request(
            "not-a-uuid",
            None,
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_requires_valid_token() {
    let app = TestApp::new(MockObjectStore::new());
    let asset = app.owned_asset(Uuid::new_v4()).await;

    let (status, _) = app
        .send(upload_request(
            &asset.id.to_string(),
            None,
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some("not.a.jwt"),
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_unknown_video_is_404() {
    let app = TestApp::new(MockObjectStore::new());

    let (status, _) = app
        .send(upload_request(
            &Uuid::new_v4().to_string(),
            Some(&token_for(Uuid::new_v4())),
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_by_non_owner_is_401() {
    let mut store = MockObjectStore::new();
    store.expect_put_file().never();
    let app = TestApp::new(store);
    let asset = app.owned_asset(Uuid::new_v4()).await;

    let (status, _) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some(&token_for(Uuid::new_v4())),
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_without_video_part_is_400() {
    let app = TestApp::new(MockObjectStore::new());
    let owner = Uuid::new_v4();
    let asset = app.owned_asset(owner).await;

    let (status, body) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some(&token_for(owner)),
            multipart_body("thumbnail", "video/mp4", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
}

#[tokio::test]
async fn test_upload_wrong_type_is_400() {
    let mut store = MockObjectStore::new();
    store.expect_put_file().never();
    let app = TestApp::new(store);
    let owner = Uuid::new_v4();
    let asset = app.owned_asset(owner).await;

    let (status, body) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some(&token_for(owner)),
            multipart_body("video", "video/quicktime", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");
    assert!(app.temp_is_empty());

    let stored = app.assets.get(&asset.id).await.unwrap().unwrap();
    assert!(stored.video_url.is_none());
}

#[tokio::test]
async fn test_upload_storage_failure_is_500() {
    let mut store = MockObjectStore::new();
    store
        .expect_put_file()
        .times(1)
        .returning(|_, _, _, _| Err(StorageError::upload_failed("connection reset")));
    let app = TestApp::new(store);
    let owner = Uuid::new_v4();
    let asset = app.owned_asset(owner).await;

    let (status, body) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some(&token_for(owner)),
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "storage");
    assert!(body["detail"].as_str().unwrap().contains("connection reset"));
    assert!(app.temp_is_empty());

    let stored = app.assets.get(&asset.id).await.unwrap().unwrap();
    assert!(stored.video_url.is_none());
}

#[tokio::test]
async fn test_get_video_signs_fresh_url() {
    let mut store = MockObjectStore::new();
    store
        .expect_presign_get()
        .with(eq("videos"), eq("portrait/abc"), always())
        .times(2)
        .returning(|_, _, _| Ok("https://s3.example/videos/portrait/abc?sig".to_string()));
    let app = TestApp::new(store);

    let owner = Uuid::new_v4();
    let mut asset = app.owned_asset(owner).await;
    asset.attach_video(&StorageReference::new("videos", "portrait/abc"));
    app.assets.update(&asset).await.unwrap();

    for _ in 0..2 {
        let request = Request::builder()
            .uri(format!("/api/videos/{}", asset.id))
            .header("Authorization", format!("Bearer {}", token_for(owner)))
            .body(Body::empty())
            .unwrap();
        let (status, body) = app.send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["video_url"], "https://s3.example/videos/portrait/abc?sig");
    }

    // The persisted record keeps the reference, not the URL
    let stored = app.assets.get(&asset.id).await.unwrap().unwrap();
    assert_eq!(stored.video_url.as_deref(), Some("videos,portrait/abc"));
}

#[tokio::test]
async fn test_get_video_without_upload_has_no_url() {
    let mut store = MockObjectStore::new();
    store.expect_presign_get().never();
    let app = TestApp::new(store);

    let owner = Uuid::new_v4();
    let asset = app.owned_asset(owner).await;

    let request = Request::builder()
        .uri(format!("/api/videos/{}", asset.id))
        .header("Authorization", format!("Bearer {}", token_for(owner)))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("video_url").is_none());
}

#[tokio::test]
async fn test_get_video_with_malformed_reference_is_500() {
    let app = TestApp::new(MockObjectStore::new());

    let owner = Uuid::new_v4();
    let mut asset = app.owned_asset(owner).await;
    asset.video_url = Some("https://legacy.example/video.mp4".to_string());
    app.assets.update(&asset).await.unwrap();

    let request = Request::builder()
        .uri(format!("/api/videos/{}", asset.id))
        .header("Authorization", format!("Bearer {}", token_for(owner)))
        .body(Body::empty())
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "format");
}

#[tokio::test]
async fn test_create_video() {
    let app = TestApp::new(MockObjectStore::new());
    let owner = Uuid::new_v4();

    let request = Request::builder()
        .method("POST")
        .uri("/api/videos")
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", token_for(owner)))
        .body(Body::from(r#"{"title": "Surfing", "description": "Day one"}"#))
        .unwrap();
    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Surfing");
    assert_eq!(body["user_id"], owner.to_string());
    assert_eq!(app.assets.len().await, 1);
}

#[tokio::test]
async fn test_repository_failure_is_500() {
    let mut assets = MockAssetRepository::new();
    assets
        .expect_get()
        .times(1)
        .returning(|_| Err(RepositoryError::Backend("connection refused".to_string())));

    let temp = tempfile::tempdir().unwrap();
    let store: Arc<dyn ObjectStore> = Arc::new(MockObjectStore::new());
    let pipeline = UploadPipeline::new(
        Arc::new(IngestConfig::new("videos").with_temp_dir(temp.path())),
        Arc::new(CopyRemuxer),
        Arc::new(FixedProber(1920, 1080)),
        store.clone(),
        VideoUrlSigner::new(store, DeliveryConfig::default()),
    );
    let config = ApiConfig {
        jwt_secret: SECRET.to_string(),
        ..ApiConfig::default()
    };
    let router = create_router(AppState::new(config, pipeline, Arc::new(assets)), None);

    let request = Request::builder()
        .uri(format!("/api/videos/{}", Uuid::new_v4()))
        .header("Authorization", format!("Bearer {}", token_for(Uuid::new_v4())))
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_production_hides_server_error_detail() {
    let mut store = MockObjectStore::new();
    store
        .expect_put_file()
        .times(1)
        .returning(|_, _, _, _| Err(StorageError::upload_failed("connection reset")));
    let app = TestApp::with_environment(store, "Production");
    let owner = Uuid::new_v4();
    let asset = app.owned_asset(owner).await;
    let token = token_for(owner);

    let (status, body) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some(&token),
            multipart_body("video", "video/mp4", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], INTERNAL_ERROR_DETAIL);
    assert_eq!(body["code"], "storage");

    // Client errors keep their detail
    let (status, body) = app
        .send(upload_request(
            &asset.id.to_string(),
            Some(&token),
            multipart_body("video", "image/png", b"x"),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_ne!(body["detail"], INTERNAL_ERROR_DETAIL);
    assert_eq!(body["code"], "validation");
}
