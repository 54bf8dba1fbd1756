//! Account operations for the generation service.

use crate::error::{detail_message, send_error, ClientError, Result};
use crate::types::{Credential, LoginRequest, RegisterRequest, User};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

/// Authentication client for the generation service.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    /// Create an account.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        let url = format!("{}/users/register", self.base_url);
        debug!(url = %url, username = %request.username, "Registering account");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let user: User = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse user: {}", e))
            })?;

            info!(user_id = user.id, username = %user.username, "Account created");
            Ok(user)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                detail_message(&error_text).unwrap_or_else(|| "Failed to sign up.".to_string());
            warn!(status = %status, error = %message, "Registration failed");

            if status.is_client_error() {
                Err(ClientError::AuthFailed(message))
            } else {
                Err(ClientError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Login with email and password.
    ///
    /// Returns the credential to pass to authenticated calls.
    pub async fn login(&self, request: &LoginRequest) -> Result<Credential> {
        let url = format!("{}/users/login", self.base_url);
        debug!(url = %url, email = %request.email, "Attempting login");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let credential: Credential = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse login response: {}", e))
            })?;

            info!(email = %request.email, "Login successful");
            Ok(credential)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            let message =
                detail_message(&error_text).unwrap_or_else(|| "Failed to log in.".to_string());
            warn!(status = %status, error = %message, "Login failed");

            if status.is_client_error() {
                Err(ClientError::AuthFailed(message))
            } else {
                Err(ClientError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Get the account a credential belongs to.
    pub async fn current_user(&self, credential: &Credential) -> Result<User> {
        let url = format!("{}/users/me", self.base_url);
        debug!(url = %url, "Getting current user");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(send_error)?;

        let status = response.status();

        if status.is_success() {
            let user: User = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse user: {}", e))
            })?;

            Ok(user)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(ClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::Server {
                status: status.as_u16(),
                message: detail_message(&error_text).unwrap_or(error_text),
            })
        }
    }
}
