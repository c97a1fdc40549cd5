use chrono::Utc;

use coursecast::crypto::token;
use coursecast::error::AppError;
use coursecast::models::claims::{PlayerClaims, Provider};

const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

fn sample_claims(issued_at: i64, ttl_secs: i64) -> PlayerClaims {
    PlayerClaims::mint(
        "user-1".to_string(),
        "c1".to_string(),
        "l1".to_string(),
        Provider::HostedFile,
        "f1".to_string(),
        issued_at,
        ttl_secs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_claims_expire_exactly_ttl_after_issuance() {
        let claims = sample_claims(1_700_000_000, 300);
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn sign_and_verify_round_trips_the_claims() {
        let claims = sample_claims(Utc::now().timestamp(), 300);
        let signed = token::sign_claims(&claims, SECRET).unwrap();

        let verified = token::verify_token(&signed, SECRET).unwrap();
        assert_eq!(verified, claims);
    }

    #[test]
    fn provider_wire_names_are_closed() {
        assert_eq!(Provider::parse("HostedFile"), Some(Provider::HostedFile));
        assert_eq!(Provider::parse("ExternalEmbed"), Some(Provider::ExternalEmbed));
        assert_eq!(Provider::parse("youtube"), None);
        assert_eq!(Provider::parse(""), None);
    }

    #[test]
    fn claims_serialize_with_wire_field_names() {
        let claims = sample_claims(1_700_000_000, 300);
        let json = serde_json::to_string(&claims).unwrap();

        assert!(json.contains(r#""courseId":"c1""#));
        assert!(json.contains(r#""lessonId":"l1""#));
        assert!(json.contains(r#""provider":"HostedFile""#));
        assert!(json.contains(r#""sub":"user-1""#));
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = sample_claims(Utc::now().timestamp() - 600, 300);
        let signed = token::sign_claims(&claims, SECRET).unwrap();

        let err = token::verify_token(&signed, SECRET).unwrap_err();
        match err {
            AppError::Unauthenticated(msg) => assert_eq!(msg, token::OPAQUE_REJECTION),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn tampered_token_is_rejected_with_the_same_message_as_expiry() {
        let claims = sample_claims(Utc::now().timestamp(), 300);
        let signed = token::sign_claims(&claims, SECRET).unwrap();

        // flip the last signature character
        let mut tampered = signed.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        let tamper_err = token::verify_token(&tampered, SECRET).unwrap_err();
        let AppError::Unauthenticated(tamper_msg) = tamper_err else {
            panic!("unexpected error kind");
        };

        let expired = sample_claims(Utc::now().timestamp() - 600, 300);
        let expired_signed = token::sign_claims(&expired, SECRET).unwrap();
        let expired_err = token::verify_token(&expired_signed, SECRET).unwrap_err();
        let AppError::Unauthenticated(expired_msg) = expired_err else {
            panic!("unexpected error kind");
        };

        // a forger learns nothing from the rejection
        assert_eq!(tamper_msg, expired_msg);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let claims = sample_claims(Utc::now().timestamp(), 300);
        let signed = token::sign_claims(&claims, SECRET).unwrap();

        assert!(token::verify_token(&signed, b"another-secret-another-secret-xx").is_err());
    }
}
