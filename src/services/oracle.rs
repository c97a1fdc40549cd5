use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Verifies bearer credentials and answers entitlement questions.
///
/// The oracle is an external collaborator; this crate only consumes the
/// interface and never reimplements identity or enrollment storage.
#[async_trait]
pub trait IdentityOracle: Send + Sync {
    /// Verifies the credential and returns a stable identity key.
    async fn verify_credential(&self, credential: &str) -> Result<String>;

    /// Whether the identity may view the given course.
    async fn is_entitled(&self, identity: &str, course_id: &str) -> Result<bool>;
}

#[derive(Deserialize)]
struct IdentityResponse {
    uid: String,
}

/// HTTP adapter for the identity & entitlement oracle.
pub struct HttpIdentityOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityOracle {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl IdentityOracle for HttpIdentityOracle {
    async fn verify_credential(&self, credential: &str) -> Result<String> {
        let res = self
            .client
            .get(format!("{}/identity", self.base_url))
            .bearer_auth(credential)
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::warn!("❌ Credential verification rejected: {}", res.status());
            return Err(AppError::Unauthenticated(
                "Credential verification failed".to_string(),
            ));
        }

        let identity: IdentityResponse = res
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Malformed oracle response: {}", e)))?;

        Ok(identity.uid)
    }

    async fn is_entitled(&self, identity: &str, course_id: &str) -> Result<bool> {
        let res = self
            .client
            .get(format!(
                "{}/enrollments/{}/{}",
                self.base_url, identity, course_id
            ))
            .send()
            .await?;

        match res.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            s => Err(AppError::Internal(format!(
                "Unexpected oracle status: {}",
                s
            ))),
        }
    }
}
