use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AppError, Result};
use crate::models::claims::PlayerClaims;

/// The message returned for any verification failure.
///
/// Deliberately identical for tampered and expired tokens so a caller cannot
/// tell the two apart.
pub const OPAQUE_REJECTION: &str = "Invalid or expired session";

/// Signs playback session claims with the server-held secret.
pub fn sign_claims(claims: &PlayerClaims, secret: &[u8]) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Verifies a playback session token and returns its claims.
///
/// Zero leeway: the configured TTL is an exact bound, not a hint.
pub fn verify_token(token: &str, secret: &[u8]) -> Result<PlayerClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    decode::<PlayerClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthenticated(OPAQUE_REJECTION.to_string()))
}
