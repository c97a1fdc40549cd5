use serde::{Deserialize, Serialize};

/// The video source families recognized by the platform.
///
/// Hosted files are proxied through the streaming gateway; external embeds
/// are rendered client-side as a third-party iframe and never proxied. The
/// enum is closed so an unsupported provider can never reach the byte proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    HostedFile,
    ExternalEmbed,
}

impl Provider {
    /// Parses the wire value used in issue-session requests.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HostedFile" => Some(Provider::HostedFile),
            "ExternalEmbed" => Some(Provider::ExternalEmbed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::HostedFile => "HostedFile",
            Provider::ExternalEmbed => "ExternalEmbed",
        }
    }
}

/// The claims carried by a signed playback session token.
///
/// Immutable once signed; `exp` is always `iat + TTL`. The cookie is the only
/// carrier — there is no server-side session table, so expiry is the sole
/// termination mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerClaims {
    /// Stable identity key returned by the oracle.
    pub sub: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
    #[serde(rename = "lessonId")]
    pub lesson_id: String,
    pub provider: Provider,
    pub reference: String,
    /// Issued-at, epoch seconds.
    pub iat: i64,
    /// Expiry, epoch seconds.
    pub exp: i64,
}

impl PlayerClaims {
    /// Mints claims for a freshly authorized playback session.
    pub fn mint(
        sub: String,
        course_id: String,
        lesson_id: String,
        provider: Provider,
        reference: String,
        issued_at: i64,
        ttl_secs: i64,
    ) -> Self {
        Self {
            sub,
            course_id,
            lesson_id,
            provider,
            reference,
            iat: issued_at,
            exp: issued_at + ttl_secs,
        }
    }
}
