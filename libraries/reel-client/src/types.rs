//! Request and response types for the generation service API.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use url::Url;

// ===== Authentication =====

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Token issued by a successful login.
///
/// Passed explicitly to every authenticated call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Credential {
    /// Wrap a bearer token obtained elsewhere (e.g. from the environment).
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }
}

/// Account as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

// ===== Generation =====

/// Image attached to a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Read an image from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ClientError::InvalidRequest(format!(
                "Image not found: {}",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self::new(file_name, bytes, mime_type_for_image(path)))
    }
}

/// Get MIME type for an image file.
fn mime_type_for_image(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Parameters for a video generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateVideoRequest {
    user_id: i64,
    positive_prompt: String,
    negative_prompt: Option<String>,
    image: Option<ImageUpload>,
}

impl GenerateVideoRequest {
    /// Create a request; the prompt is trimmed and must not be empty.
    pub fn new(user_id: i64, positive_prompt: &str) -> Result<Self> {
        let positive_prompt = positive_prompt.trim();
        if positive_prompt.is_empty() {
            return Err(ClientError::InvalidRequest(
                "Please enter a prompt.".to_string(),
            ));
        }

        Ok(Self {
            user_id,
            positive_prompt: positive_prompt.to_string(),
            negative_prompt: None,
            image: None,
        })
    }

    /// Set the negative prompt; blank prompts are omitted from the request.
    #[must_use]
    pub fn with_negative_prompt(mut self, negative_prompt: &str) -> Self {
        let trimmed = negative_prompt.trim();
        self.negative_prompt = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn positive_prompt(&self) -> &str {
        &self.positive_prompt
    }

    pub fn negative_prompt(&self) -> Option<&str> {
        self.negative_prompt.as_deref()
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub(crate) fn into_parts(self) -> (i64, String, Option<String>, Option<ImageUpload>) {
        (
            self.user_id,
            self.positive_prompt,
            self.negative_prompt,
            self.image,
        )
    }
}

/// A value the service sends either as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    /// Numeric value, parsing text when it holds a plain number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrText::Number(n) => Some(*n),
            NumberOrText::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for NumberOrText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumberOrText::Number(n) => write!(f, "{}", n),
            NumberOrText::Text(s) => f.write_str(s),
        }
    }
}

/// Generated video record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default)]
    pub id: Option<i64>,
    pub user_id: i64,
    #[serde(default)]
    pub input_image: Option<String>,
    #[serde(default)]
    pub positive_prompt: Option<String>,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default)]
    pub duration: Option<NumberOrText>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub width: Option<NumberOrText>,
    #[serde(default)]
    pub height: Option<NumberOrText>,
    #[serde(default)]
    pub fps: Option<NumberOrText>,
    #[serde(default)]
    pub localpath: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub source_video: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl GeneratedVideo {
    /// Locator the player should load
    ///
    /// `source_video`, falling back to `file_url`. Relative locators are
    /// resolved against `base`.
    pub fn playable_uri(&self, base: &Url) -> Option<Url> {
        let locator = [&self.source_video, &self.file_url]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())?;

        base.join(locator).ok()
    }
}
