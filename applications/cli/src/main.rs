/// Reel CLI - video generation client and headless player preview
mod preview;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reel_client::{
    ClientConfig, ClientError, Credential, GenerateVideoRequest, ImageUpload, ReelClient,
};
use reel_playback::types::{DEFAULT_SEEK_EPSILON_SECS, DEFAULT_STEP_SECS};
use reel_playback::PlayerConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reel-cli")]
#[command(about = "Generate videos and preview playback", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = reel_client::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Service base URL (overrides the configuration file)
    #[arg(long, global = true, env = "REEL_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "REEL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and print an access token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "REEL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the account a token belongs to
    Whoami {
        /// Access token from `login`
        #[arg(short, long, env = "REEL_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Generate a video from a prompt
    Generate {
        /// Access token from `login`; used to look up the user id
        #[arg(short, long, env = "REEL_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Owner of the video (skips the account lookup)
        #[arg(long)]
        user_id: Option<i64>,
        /// What the video should show
        #[arg(short, long)]
        prompt: String,
        /// What the video should avoid
        #[arg(short, long)]
        negative_prompt: Option<String>,
        /// Start image
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Simulate playback controls against a media source
    Preview {
        /// Media locator shown in the logs
        source: String,
        /// Duration the media reports, in seconds (NaN for unknown)
        #[arg(short, long)]
        duration: f64,
        /// Comma-separated steps: toggle, wait N, forward, rewind, seek N, ratio R, rate R
        #[arg(short, long, default_value = "toggle, wait 3, forward, wait 1, rewind")]
        script: String,
        /// Seek tolerance in seconds
        #[arg(long, default_value_t = DEFAULT_SEEK_EPSILON_SECS)]
        epsilon: f64,
        /// Rewind/forward step in seconds
        #[arg(long, default_value_t = DEFAULT_STEP_SECS)]
        step: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel_cli=info,reel_client=info,reel_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let client = connect(&cli.config, cli.base_url)?;
            let user = client
                .register(&username, &email, &password)
                .await
                .map_err(user_error)?;
            println!("Created account #{} ({})", user.id, user.username);
        }
        Commands::Login { email, password } => {
            let client = connect(&cli.config, cli.base_url)?;
            let credential = client.login(&email, &password).await.map_err(user_error)?;
            println!("{}", credential.access_token);
        }
        Commands::Whoami { token } => {
            let client = connect(&cli.config, cli.base_url)?;
            let user = client
                .current_user(&Credential::bearer(token))
                .await
                .map_err(user_error)?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Commands::Generate {
            token,
            user_id,
            prompt,
            negative_prompt,
            image,
        } => {
            let client = connect(&cli.config, cli.base_url)?;
            generate(&client, token, user_id, &prompt, negative_prompt, image).await?;
        }
        Commands::Preview {
            source,
            duration,
            script,
            epsilon,
            step,
        } => {
            let config = PlayerConfig {
                seek_epsilon_secs: epsilon,
                step_secs: step,
            };
            let steps = preview::parse_script(&script)?;
            for (label, view) in preview::run(&source, duration, config, &steps)? {
                println!("{}", preview::format_frame(&label, &view));
            }
        }
    }

    Ok(())
}

fn connect(path: &std::path::Path, base_url: Option<String>) -> anyhow::Result<ReelClient> {
    let mut config = ClientConfig::load_from(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }

    tracing::debug!(base_url = %config.base_url, "Using service");
    Ok(ReelClient::new(config)?)
}

async fn generate(
    client: &ReelClient,
    token: Option<String>,
    user_id: Option<i64>,
    prompt: &str,
    negative_prompt: Option<String>,
    image: Option<PathBuf>,
) -> anyhow::Result<()> {
    let user_id = match (user_id, token) {
        (Some(id), _) => id,
        (None, Some(token)) => {
            client
                .current_user(&Credential::bearer(token))
                .await
                .map_err(user_error)?
                .id
        }
        (None, None) => anyhow::bail!("Log in first (--token or REEL_TOKEN) or pass --user-id"),
    };

    let mut request = GenerateVideoRequest::new(user_id, prompt).map_err(user_error)?;
    if let Some(negative_prompt) = negative_prompt {
        request = request.with_negative_prompt(&negative_prompt);
    }
    if let Some(path) = image {
        request = request.with_image(ImageUpload::from_path(&path).await.map_err(user_error)?);
    }

    tracing::info!(user_id, "Generating video, this can take a few minutes");
    let video = client.generate(request).await.map_err(user_error)?;

    println!("{}", serde_json::to_string_pretty(&video)?);
    match video.playable_uri(client.origin()) {
        Some(uri) => println!("Playable at {}", uri),
        None => tracing::warn!("Service returned no playable locator"),
    }

    Ok(())
}

/// Surface the service's own message rather than the error chain
fn user_error(e: ClientError) -> anyhow::Error {
    tracing::debug!(error = %e, "Request failed");
    anyhow::anyhow!(e.user_message())
}
