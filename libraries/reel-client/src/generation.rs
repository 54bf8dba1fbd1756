//! Video generation requests.

use crate::error::{generation_message, send_error, ClientError, Result};
use crate::types::{GenerateVideoRequest, GeneratedVideo};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Generation client for the video service.
pub struct GenerationClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> GenerationClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Submit a generation request and wait for the finished video.
    ///
    /// The service renders synchronously, so this can take minutes.
    /// Failures are never retried.
    pub async fn generate(&self, request: GenerateVideoRequest) -> Result<GeneratedVideo> {
        let (user_id, positive_prompt, negative_prompt, image) = request.into_parts();

        let mut form = Form::new()
            .text("user_id", user_id.to_string())
            .text("positive_prompt", positive_prompt);

        if let Some(negative_prompt) = negative_prompt {
            form = form.text("negative_prompt", negative_prompt);
        }

        let image_name = image.as_ref().map(|i| i.file_name.clone());
        if let Some(image) = image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)?;
            form = form.part("image", part);
        }

        let url = format!("{}/videos/generate", self.base_url);
        debug!(url = %url, user_id, image = ?image_name, "Requesting video generation");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let video: GeneratedVideo = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse generated video: {}", e))
            })?;

            info!(
                video_id = ?video.id,
                filename = ?video.filename,
                "Video generated"
            );

            Ok(video)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            let message = generation_message(status.as_u16(), &error_text);
            warn!(status = %status, error = %message, "Video generation failed");

            Err(ClientError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }
}
