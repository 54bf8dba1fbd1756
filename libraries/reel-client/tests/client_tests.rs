//! Tests for the Reel service client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real service.

use reel_client::{
    ClientConfig, ClientError, Credential, GenerateVideoRequest, ImageUpload, ReelClient,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ReelClient {
    ReelClient::new(ClientConfig::new(server.uri())).expect("mock server url is valid")
}

fn video_json() -> serde_json::Value {
    json!({
        "id": 12,
        "user_id": 7,
        "positive_prompt": "a lighthouse at dusk",
        "negative_prompt": "",
        "duration": "4s",
        "resolution": "720x1280",
        "width": 720,
        "height": "1280",
        "fps": 24,
        "filename": "reel_00012.mp4",
        "format": "mp4",
        "source_video": "/media/reel_00012.mp4",
        "created_at": "2025-01-02T03:04:05"
    })
}

async fn received_body(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap_or_default();
    let request = requests.last().expect("a request was sent");
    String::from_utf8_lossy(&request.body).into_owned()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        match ReelClient::new(ClientConfig::new("")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match ReelClient::new(ClientConfig::new("example.com")) {
            Err(ClientError::InvalidUrl(msg)) => {
                assert!(msg.contains("http://") || msg.contains("https://"));
            }
            other => panic!("Expected InvalidUrl error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_custom_api_prefix() {
        let config = ClientConfig {
            api_prefix: "v2".to_string(),
            ..ClientConfig::new("http://localhost:9000/")
        };
        let client = ReelClient::new(config).unwrap();
        assert_eq!(client.api_url(), "http://localhost:9000/v2");
    }
}

// =============================================================================
// Account Tests
// =============================================================================

mod accounts {
    use super::*;

    #[tokio::test]
    async fn test_login_returns_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/login"))
            .and(body_json(json!({"email": "ada@example.com", "password": "hunter22"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok-123",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let credential = client.login(" ada@example.com ", "hunter22").await.unwrap();

        assert_eq!(credential, Credential::bearer("tok-123"));
    }

    #[tokio::test]
    async fn test_login_failure_uses_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({"detail": "Incorrect email or password."})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.login("ada@example.com", "wrong").await.unwrap_err();

        assert!(matches!(err, ClientError::AuthFailed(_)));
        assert_eq!(err.user_message(), "Incorrect email or password.");
    }

    #[tokio::test]
    async fn test_login_failure_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/login"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.login("ada@example.com", "pw").await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "Failed to log in.");
    }

    #[tokio::test]
    async fn test_register_creates_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/register"))
            .and(body_json(json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 7,
                "username": "ada",
                "email": "ada@example.com",
                "role": "user"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let user = client
            .register("ada", "ada@example.com", "hunter22")
            .await
            .unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(user.role.as_deref(), Some("user"));
        assert_eq!(user.created_at, None);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/register"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"detail": "Email is already registered."})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .register("ada", "ada@example.com", "hunter22")
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Email is already registered.");
    }

    #[tokio::test]
    async fn test_register_validation_error_uses_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/users/register"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [{"loc": ["body", "password"], "msg": "too short"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.register("ada", "ada@example.com", "pw").await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to sign up.");
    }

    #[tokio::test]
    async fn test_current_user_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/me"))
            .and(header("Authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "username": "ada",
                "email": "ada@example.com",
                "created_at": "2025-01-01T00:00:00"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let user = client
            .current_user(&Credential::bearer("tok-123"))
            .await
            .unwrap();

        assert_eq!(user.username, "ada");
    }

    #[tokio::test]
    async fn test_expired_credential() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let credential = Credential::bearer("expired");

        assert!(matches!(
            client.current_user(&credential).await,
            Err(ClientError::AuthRequired)
        ));
        assert!(!client.validate_credential(&credential).await.unwrap());
    }
}

// =============================================================================
// Generation Tests
// =============================================================================

mod generation {
    use super::*;

    #[tokio::test]
    async fn test_generate_sends_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/generate"))
            .and(body_string_contains("name=\"user_id\""))
            .and(body_string_contains("a lighthouse at dusk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = GenerateVideoRequest::new(7, "  a lighthouse at dusk ")
            .unwrap()
            .with_negative_prompt("blurry, low quality");
        let video = client.generate(request).await.unwrap();

        assert_eq!(video.id, Some(12));
        assert_eq!(
            video.playable_uri(client.origin()).unwrap().as_str(),
            format!("{}/media/reel_00012.mp4", server.uri())
        );

        let body = received_body(&server).await;
        assert!(body.contains("name=\"negative_prompt\""));
        assert!(body.contains("blurry, low quality"));
        assert!(!body.contains("name=\"image\""));
    }

    #[tokio::test]
    async fn test_generate_omits_blank_negative_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_json()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = GenerateVideoRequest::new(7, "waves")
            .unwrap()
            .with_negative_prompt("   ");
        client.generate(request).await.unwrap();

        let body = received_body(&server).await;
        assert!(!body.contains("negative_prompt"));
    }

    #[tokio::test]
    async fn test_generate_attaches_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_json()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("Start.PNG");
        std::fs::write(&image_path, b"\x89PNG fake").unwrap();
        let image = ImageUpload::from_path(&image_path).await.unwrap();
        assert_eq!(image.mime_type, "image/png");

        let client = client_for(&server).await;
        let request = GenerateVideoRequest::new(7, "waves").unwrap().with_image(image);
        client.generate(request).await.unwrap();

        let body = received_body(&server).await;
        assert!(body.contains("name=\"image\"; filename=\"Start.PNG\""));
        assert!(body.to_ascii_lowercase().contains("content-type: image/png"));
    }

    #[tokio::test]
    async fn test_missing_image_is_rejected_before_sending() {
        let dir = tempfile::tempdir().unwrap();
        let result = ImageUpload::from_path(&dir.path().join("missing.png")).await;

        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_generate_failure_surfaces_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/generate"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"detail": "Model did not return any video file."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .generate(GenerateVideoRequest::new(7, "waves").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(err.user_message(), "Model did not return any video file.");
    }

    #[tokio::test]
    async fn test_generate_failure_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/generate"))
            .respond_with(ResponseTemplate::new(504))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .generate(GenerateVideoRequest::new(7, "waves").unwrap())
            .await
            .unwrap_err();

        assert_eq!(
            err.user_message(),
            "Failed to trigger video generation (status 504)"
        );
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on the discard port
        let client = ReelClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client
            .generate(GenerateVideoRequest::new(7, "waves").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::ServerUnreachable(_)));
    }

    #[tokio::test]
    async fn test_slow_generation_reports_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/videos/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(video_json())
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig {
            timeout_secs: 1,
            ..ClientConfig::new(server.uri())
        };
        let client = ReelClient::new(config).unwrap();
        let err = client
            .generate(GenerateVideoRequest::new(7, "waves").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Timeout(_)));
        assert!(err.user_message().starts_with("Request timed out"));
    }
}
