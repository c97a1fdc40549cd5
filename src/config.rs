use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

use crate::presence::monitor::PresenceConfig;

/// The application's configuration.
///
/// Every value is read once at process start; a missing required variable is
/// a fatal startup error, never a per-request one.
#[derive(Clone)]
pub struct Config {
    /// The secret used to sign playback session tokens.
    pub session_secret: Zeroizing<Vec<u8>>,
    /// The lifetime of a playback session in seconds.
    pub session_ttl_secs: i64,
    /// The base URL of the identity & entitlement oracle.
    pub identity_oracle_url: String,
    /// The base URL of the upstream content store.
    pub content_store_url: String,
    /// The bearer credential for the upstream content store.
    pub content_store_token: Zeroizing<String>,
    /// The origin allowed to call the session issuer (CORS).
    pub frontend_origin: String,
    /// Presence challenge window and countdown.
    pub presence: PresenceConfig,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let secret = env::var("PLAYER_SESSION_SECRET")
            .context("PLAYER_SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if secret.len() < 32 {
            anyhow::bail!("PLAYER_SESSION_SECRET must be at least 32 bytes");
        }

        let session_ttl_secs: i64 = env::var("PLAYER_SESSION_TTL_SEC")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .context("Invalid PLAYER_SESSION_TTL_SEC")?;

        if session_ttl_secs <= 0 {
            anyhow::bail!("PLAYER_SESSION_TTL_SEC must be positive");
        }

        let presence = PresenceConfig {
            challenge_min_secs: env::var("PRESENCE_CHALLENGE_MIN_SEC")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid PRESENCE_CHALLENGE_MIN_SEC")?,
            challenge_max_secs: env::var("PRESENCE_CHALLENGE_MAX_SEC")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid PRESENCE_CHALLENGE_MAX_SEC")?,
            countdown_secs: env::var("PRESENCE_COUNTDOWN_SEC")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid PRESENCE_COUNTDOWN_SEC")?,
        };

        if presence.challenge_min_secs == 0
            || presence.challenge_min_secs > presence.challenge_max_secs
        {
            anyhow::bail!("Presence challenge window must satisfy 0 < min <= max");
        }

        if presence.countdown_secs == 0 {
            anyhow::bail!("PRESENCE_COUNTDOWN_SEC must be positive");
        }

        Ok(Self {
            session_secret: Zeroizing::new(secret.into_bytes()),
            session_ttl_secs,
            identity_oracle_url: env::var("IDENTITY_ORACLE_URL")
                .context("IDENTITY_ORACLE_URL must be set")?,
            content_store_url: env::var("CONTENT_STORE_URL")
                .context("CONTENT_STORE_URL must be set")?,
            content_store_token: Zeroizing::new(
                env::var("CONTENT_STORE_TOKEN").context("CONTENT_STORE_TOKEN must be set")?,
            ),
            frontend_origin: env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            presence,
        })
    }
}
