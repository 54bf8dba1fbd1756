//! Reel Service Client
//!
//! HTTP client library for the Reel video generation service.
//!
//! # Features
//!
//! - **Accounts**: register, login, current user
//! - **Generation**: multipart generation requests with an optional image
//! - **Configuration**: `reel.toml` plus `REEL_` environment overrides
//!
//! Credentials are plain values returned by [`ReelClient::login`] and passed
//! explicitly to every authenticated call; the client stores none.
//!
//! # Example
//!
//! ```ignore
//! use reel_client::{ClientConfig, GenerateVideoRequest, ReelClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ReelClient::new(ClientConfig::load()?)?;
//!
//!     let credential = client.login("ada@example.com", "hunter22").await?;
//!     let user = client.current_user(&credential).await?;
//!
//!     let request = GenerateVideoRequest::new(user.id, "a lighthouse at dusk")?
//!         .with_negative_prompt("blurry");
//!     match client.generate(request).await {
//!         Ok(video) => println!("Ready: {:?}", video.playable_uri(client.origin())),
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod generation;
mod types;

// Re-export main types
pub use client::ReelClient;
pub use config::{ClientConfig, DEFAULT_CONFIG_FILE};
pub use error::{ClientError, Result};
pub use types::{
    Credential, GenerateVideoRequest, GeneratedVideo, ImageUpload, LoginRequest, NumberOrText,
    RegisterRequest, User,
};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use generation::GenerationClient;
