use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;

/// Issues and verifies signed, expiring bearer tokens.
///
/// Tokens are compact JWS strings signed with HS256 over a single secret. No
/// server-side session state is kept: a token is valid exactly when its
/// signature matches and the current time is before its `exp`.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenService {
    /// Create a new token service with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Load it from configuration, never from code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a token for a user, valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, user_id: i64, email: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(user_id, email, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// Deterministic: identical identity, time, ttl and secret give the same token.
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::for_user(user_id, email, now, ttl);
        self.encode(&claims)
    }

    /// Sign already-built claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the current time.
    ///
    /// # Errors
    /// * `MalformedToken` - Token is not a decodable JWS with the expected claims
    /// * `BadSignature` - Signature does not match this service's secret
    /// * `Expired` - Signature is valid but `exp` has passed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The signature is checked before any claim is looked at, so an expired
    /// verdict is only ever given for authentic tokens.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against `now` with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => TokenError::BadSignature,
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::MalformedToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    /// Replace one character of the payload segment with a different base64url character.
    fn tamper_payload(token: &str, index: usize) -> String {
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let mut payload: Vec<char> = parts[1].chars().collect();
        let position = index % payload.len();
        payload[position] = if payload[position] == 'A' { 'B' } else { 'A' };
        parts[1] = payload.into_iter().collect();
        parts.join(".")
    }

    #[test]
    fn test_issue_and_verify() {
        let service = TokenService::new(SECRET);

        let token = service
            .issue(1, "juan@x.com", Duration::hours(2))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = service.verify(&token).expect("Failed to verify token");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "juan@x.com");
        assert_eq!(claims.expires_at - claims.issued_at, 7200);
    }

    #[test]
    fn test_issue_is_deterministic() {
        let service = TokenService::new(SECRET);

        let first = service
            .issue_at(3, "a@b.c", Duration::hours(2), at(1_700_000_000))
            .unwrap();
        let second = service
            .issue_at(3, "a@b.c", Duration::hours(2), at(1_700_000_000))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_verify_before_and_after_expiry() {
        let service = TokenService::new(SECRET);
        let token = service
            .issue_at(5, "a@b.c", Duration::seconds(60), at(1_000))
            .unwrap();

        let claims = service.verify_at(&token, at(1_059)).expect("Token should be valid");
        assert_eq!(claims.user_id, 5);

        assert_eq!(service.verify_at(&token, at(1_060)), Err(TokenError::Expired));
        assert_eq!(service.verify_at(&token, at(5_000)), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_long_expired_token() {
        let service = TokenService::new(SECRET);
        let token = service
            .issue_at(5, "a@b.c", Duration::hours(2), at(1_000))
            .unwrap();

        assert_eq!(service.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_payload_is_bad_signature() {
        let service = TokenService::new(SECRET);
        let token = service.issue(9, "juan@x.com", Duration::hours(2)).unwrap();
        let payload_len = token.split('.').nth(1).unwrap().len();

        for index in 0..payload_len {
            let tampered = tamper_payload(&token, index);
            assert_ne!(tampered, token);
            assert_eq!(
                service.verify(&tampered),
                Err(TokenError::BadSignature),
                "payload position {} was accepted",
                index
            );
        }
    }

    #[test]
    fn test_tampered_signature_is_bad_signature() {
        let service = TokenService::new(SECRET);
        let token = service.issue(9, "juan@x.com", Duration::hours(2)).unwrap();

        let (message, signature) = token.rsplit_once('.').unwrap();
        let forged = if signature.starts_with('A') {
            format!("{}.B{}", message, &signature[1..])
        } else {
            format!("{}.A{}", message, &signature[1..])
        };

        assert_eq!(service.verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let issuer = TokenService::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = TokenService::new(b"secret2_at_least_32_bytes_long_key!");

        let token = issuer.issue(1, "a@b.c", Duration::hours(2)).unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_verify_malformed_token() {
        let service = TokenService::new(SECRET);

        for token in ["", "garbage", "invalid.token.here", "a.b", "..."] {
            let result = service.verify(token);
            assert!(
                matches!(result, Err(TokenError::MalformedToken(_))),
                "{:?} gave {:?}",
                token,
                result
            );
        }
    }

    #[test]
    fn test_verify_rejects_missing_claims() {
        #[derive(serde::Serialize)]
        struct Partial {
            sub: i64,
            exp: i64,
        }

        let service = TokenService::new(SECRET);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: 1,
                exp: Utc::now().timestamp() + 600,
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            service.verify(&token),
            Err(TokenError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(TokenError::BadSignature.reason(), "bad_signature");
        assert_eq!(TokenError::Expired.reason(), "expired");
        assert_eq!(TokenError::MalformedToken(String::new()).reason(), "malformed");
    }
}
