//! Main Reel service client.

use crate::auth::AuthClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::generation::GenerationClient;
use crate::types::{
    Credential, GenerateVideoRequest, GeneratedVideo, LoginRequest, RegisterRequest, User,
};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the video generation service.
///
/// Holds no session state: authenticated calls take a [`Credential`].
///
/// # Example
///
/// ```ignore
/// use reel_client::{ClientConfig, GenerateVideoRequest, ReelClient};
///
/// let client = ReelClient::new(ClientConfig::default())?;
/// let credential = client.login("ada@example.com", "hunter22").await?;
/// let user = client.current_user(&credential).await?;
///
/// let request = GenerateVideoRequest::new(user.id, "a lighthouse at dusk")?;
/// let video = client.generate(request).await?;
/// println!("{:?}", video.playable_uri(client.origin()));
/// ```
#[derive(Debug, Clone)]
pub struct ReelClient {
    http: Client,
    /// Origin of the service, used to resolve relative media locators
    origin: Url,
    /// Origin plus API prefix, without trailing slash
    api_url: String,
}

impl ReelClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let service_url = config.service_url()?;
        let origin = Url::parse(&format!("{}/", service_url))?;
        let api_url = format!("{}{}", service_url, config.api_path());

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(format!("Reel/{} (CLI)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        debug!(api_url = %api_url, "Created service client");

        Ok(Self {
            http,
            origin,
            api_url,
        })
    }

    /// Service origin (with trailing slash)
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Base of every API route
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.api_url)
    }

    pub fn generation(&self) -> GenerationClient<'_> {
        GenerationClient::new(&self.http, &self.api_url)
    }

    /// Create an account.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let request = RegisterRequest {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.auth().register(&request).await
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.auth().login(&request).await
    }

    /// Get the account a credential belongs to.
    pub async fn current_user(&self, credential: &Credential) -> Result<User> {
        self.auth().current_user(credential).await
    }

    /// Check whether a credential is still accepted.
    pub async fn validate_credential(&self, credential: &Credential) -> Result<bool> {
        match self.current_user(credential).await {
            Ok(_) => Ok(true),
            Err(ClientError::AuthRequired) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Generate a video.
    pub async fn generate(&self, request: GenerateVideoRequest) -> Result<GeneratedVideo> {
        self.generation().generate(request).await
    }
}
