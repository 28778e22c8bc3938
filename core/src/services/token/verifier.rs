//! Two-phase JWT verification: header-only key selection, then full
//! signature and temporal validation with the selected key.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::domain::entities::claims::Claims;
use crate::errors::{DomainResult, TokenError};
use crate::repositories::KeySource;
use crate::services::token::key_resolver::KeyResolver;

/// Verifies RS256 access tokens using keys selected by the `kid` header
/// parameter.
pub struct TokenVerifier<K: KeySource> {
    keys: KeyResolver<K>,
    validation: Validation,
}

/// The only header field the first phase needs
#[derive(Deserialize)]
struct RawHeader {
    #[serde(default)]
    kid: Option<String>,
}

impl<K: KeySource> TokenVerifier<K> {
    /// Creates a verifier backed by the given key resolver
    pub fn new(keys: KeyResolver<K>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // No expected audience is configured; an `aud` claim is carried
        // through untouched rather than checked.
        validation.validate_aud = false;
        // Expiry is exact, with no clock-skew grace window.
        validation.leeway = 0;

        Self { keys, validation }
    }

    /// Decode only the token's header segment and extract the `kid`.
    ///
    /// No signature check happens here; the result merely selects which key
    /// the second phase verifies with.
    ///
    /// # Errors
    ///
    /// `TokenError::MalformedToken` when the token is not a three-segment
    /// compact JWT, the header is not valid base64url JSON, or it carries no
    /// usable `kid`.
    pub fn extract_key_id(token: &str) -> DomainResult<String> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenError::MalformedToken.into());
        }

        let decoded = URL_SAFE_NO_PAD
            .decode(segments[0])
            .map_err(|_| TokenError::MalformedToken)?;
        let header: RawHeader =
            serde_json::from_slice(&decoded).map_err(|_| TokenError::MalformedToken)?;

        match header.kid {
            Some(kid) if !kid.is_empty() => Ok(kid),
            _ => Err(TokenError::MalformedToken.into()),
        }
    }

    /// Validate signature and temporal claims with the supplied key.
    pub fn verify(&self, token: &str, key: &DecodingKey) -> DomainResult<Claims> {
        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| {
                use jsonwebtoken::errors::ErrorKind;
                let mapped = match err.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    ErrorKind::InvalidToken
                    | ErrorKind::Base64(_)
                    | ErrorKind::Json(_)
                    | ErrorKind::Utf8(_) => TokenError::MalformedToken,
                    _ => TokenError::InvalidSignature,
                };
                mapped.into()
            })
    }

    /// Full pipeline: extract the `kid`, resolve its key, verify.
    pub async fn parse_and_verify(&self, token: &str) -> DomainResult<Claims> {
        let kid = Self::extract_key_id(token)?;
        let key = self.keys.resolve(&kid).await?;
        self.verify(token, &key)
    }

    /// Best-effort claims extraction with signature and expiry validation
    /// disabled.
    ///
    /// Exists for blacklist-only flows (e.g. logout, where the token is being
    /// discarded anyway). The returned claims are NOT authenticated.
    pub fn decode_unverified(token: &str) -> DomainResult<Claims> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::MalformedToken.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::errors::DomainError;
    use crate::repositories::key_source::mock::MockKeySource;
    use crate::services::testing::{
        sign_token, sign_token_without_kid, OTHER_PUBLIC_PEM, TEST_PUBLIC_PEM,
    };

    fn verifier_with(kid: &str, pem: &str) -> TokenVerifier<MockKeySource> {
        let source = MockKeySource::new().with_key(kid, pem.as_bytes());
        TokenVerifier::new(KeyResolver::new(source))
    }

    #[test]
    fn extract_key_id_reads_header_without_verification() {
        let claims = Claims::new(Some("user-1".to_string()), "admin", 15);
        let token = sign_token(&claims, "rotation-2024");
        assert_eq!(
            TokenVerifier::<MockKeySource>::extract_key_id(&token).unwrap(),
            "rotation-2024"
        );
    }

    #[test]
    fn extract_key_id_rejects_wrong_segment_count() {
        for token in ["", "justone", "two.segments", "a.b.c.d"] {
            let err = TokenVerifier::<MockKeySource>::extract_key_id(token).unwrap_err();
            assert!(matches!(
                err,
                DomainError::Token(TokenError::MalformedToken)
            ));
        }
    }

    #[test]
    fn extract_key_id_rejects_missing_kid() {
        let claims = Claims::new(None, "admin", 15);
        let token = sign_token_without_kid(&claims);
        let err = TokenVerifier::<MockKeySource>::extract_key_id(&token).unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::MalformedToken)));
    }

    #[test]
    fn extract_key_id_rejects_undecodable_header() {
        let err =
            TokenVerifier::<MockKeySource>::extract_key_id("!!!.payload.sig").unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::MalformedToken)));
    }

    #[tokio::test]
    async fn valid_token_verifies_and_yields_claims() {
        let verifier = verifier_with("k1", TEST_PUBLIC_PEM);
        let claims = Claims::new(Some("user-42".to_string()), "admin", 15);
        let token = sign_token(&claims, "k1");

        let verified = verifier.parse_and_verify(&token).await.unwrap();
        assert_eq!(verified.sub.as_deref(), Some("user-42"));
        assert_eq!(verified.role, "admin");
        assert_eq!(verified.jti, claims.jti);
    }

    #[tokio::test]
    async fn audience_claim_is_carried_through_unchecked() {
        let verifier = verifier_with("k1", TEST_PUBLIC_PEM);
        let mut claims = Claims::new(Some("user-42".to_string()), "admin", 15);
        claims.aud = Some("billing-service".to_string());
        let token = sign_token(&claims, "k1");

        let verified = verifier.parse_and_verify(&token).await.unwrap();
        assert_eq!(verified.aud.as_deref(), Some("billing-service"));
    }

    #[tokio::test]
    async fn future_nbf_maps_to_token_not_yet_valid() {
        let verifier = verifier_with("k1", TEST_PUBLIC_PEM);
        let mut claims = Claims::new(None, "admin", 120);
        claims.nbf = Some(chrono::Utc::now().timestamp() + 3600);
        let token = sign_token(&claims, "k1");

        let err = verifier.parse_and_verify(&token).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Token(TokenError::TokenNotYetValid)
        ));
    }

    #[tokio::test]
    async fn just_expired_token_gets_no_grace_window() {
        let verifier = verifier_with("k1", TEST_PUBLIC_PEM);
        let mut claims = Claims::new(None, "admin", 15);
        claims.exp = chrono::Utc::now().timestamp() - 5;
        let token = sign_token(&claims, "k1");

        assert!(claims.is_expired());
        let err = verifier.parse_and_verify(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
    }

    #[tokio::test]
    async fn expired_token_maps_to_token_expired() {
        let verifier = verifier_with("k1", TEST_PUBLIC_PEM);
        let claims = Claims::new(Some("user-42".to_string()), "admin", -120);
        let token = sign_token(&claims, "k1");

        let err = verifier.parse_and_verify(&token).await.unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::TokenExpired)));
    }

    #[tokio::test]
    async fn wrong_key_maps_to_invalid_signature() {
        let verifier = verifier_with("k1", OTHER_PUBLIC_PEM);
        let claims = Claims::new(None, "admin", 15);
        let token = sign_token(&claims, "k1");

        let err = verifier.parse_and_verify(&token).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Token(TokenError::InvalidSignature)
        ));
    }

    #[tokio::test]
    async fn unknown_kid_maps_to_key_not_found() {
        let verifier = verifier_with("k1", TEST_PUBLIC_PEM);
        let claims = Claims::new(None, "admin", 15);
        let token = sign_token(&claims, "k2");

        let err = verifier.parse_and_verify(&token).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::Token(TokenError::KeyNotFound { ref kid }) if kid == "k2"
        ));
    }

    #[test]
    fn decode_unverified_extracts_claims_from_expired_token() {
        let mut claims = Claims::new(Some("user-42".to_string()), "viewer", -120);
        claims.aud = Some("billing-service".to_string());
        let token = sign_token(&claims, "k1");

        let decoded = TokenVerifier::<MockKeySource>::decode_unverified(&token).unwrap();
        assert_eq!(decoded.sub.as_deref(), Some("user-42"));
        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.aud.as_deref(), Some("billing-service"));
    }

    #[test]
    fn decode_unverified_still_rejects_garbage() {
        let err = TokenVerifier::<MockKeySource>::decode_unverified("garbage").unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::MalformedToken)));
    }
}
