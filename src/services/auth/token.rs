use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by access-token validation.
///
/// The middleware swallows all of these (the request just proceeds without a
/// principal); they exist so logs and tests can tell the cases apart.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Structure unparseable or signature check failed. Also covers tokens
    /// signed with a different algorithm or key.
    #[error("malformed or tampered token")]
    Malformed,

    #[error("token expired")]
    Expired,

    /// Token subject does not match the account it was checked against.
    /// Guards against replaying a token for a different identity after the
    /// account lookup.
    #[error("token subject mismatch")]
    SubjectMismatch,

    #[error("failed to sign token")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Access token (JWT) claims.
///
/// `sub` is the username; the account id rides along in a custom `userId`
/// claim so handlers never need a second lookup to learn it.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    #[serde(rename = "userId")]
    user_id: i64,
    iat: i64,
    exp: i64,
}

/// The identity a validated token resolves to. Request-scoped, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    pub username: String,
}

/// HS512 access-token issuer/verifier.
///
/// Built once at startup from `JWT_SECRET`; pure function of the secret and
/// the clock afterwards. Key material is intentionally not printable via
/// Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    /// `secret` length is validated by Config at startup (>= 64 bytes).
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue a signed access token for an authenticated account.
    pub fn issue(&self, username: &str, user_id: i64) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: username.to_string(),
            user_id,
            iat: now,
            exp: now + self.ttl_seconds as i64,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(TokenError::Sign)
    }

    /// Validate a token against the account it is supposed to belong to.
    ///
    /// Check order is fixed: signature/structure first, then expiry, then
    /// subject. A tampered-but-expired token therefore reports `Malformed`,
    /// never `Expired`.
    pub fn validate(&self, token: &str, expected_username: &str) -> Result<Principal, TokenError> {
        let claims = self.decode(token, true)?;

        if claims.sub != expected_username {
            return Err(TokenError::SubjectMismatch);
        }

        Ok(Principal {
            user_id: claims.user_id,
            username: claims.sub,
        })
    }

    /// Decode the `sub` claim after signature verification only (no expiry
    /// check). Not sufficient for authorization on its own; the middleware
    /// uses it to find the account to `validate` against.
    pub fn extract_username(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.decode(token, false)?.sub)
    }

    /// Decode the `userId` claim after signature verification only.
    pub fn extract_user_id(&self, token: &str) -> Result<i64, TokenError> {
        Ok(self.decode(token, false)?.user_id)
    }

    fn decode(&self, token: &str, check_exp: bool) -> Result<AccessClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = check_exp;
        // No leeway: "expired" means expired, test-observable to the second.
        validation.leeway = 0;

        let data = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] =
        b"unit-test-secret-0123456789abcdef0123456789abcdef0123456789abcdef0123";

    fn service() -> TokenService {
        TokenService::new(SECRET, 3600)
    }

    /// Sign claims directly with the same secret, bypassing `issue`, so tests
    /// can craft already-expired tokens without sleeping.
    fn sign_raw(sub: &str, user_id: i64, iat: i64, exp: i64) -> String {
        let claims = AccessClaims {
            sub: sub.to_string(),
            user_id,
            iat,
            exp,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    #[test]
    fn issue_then_validate_round_trips() {
        let svc = service();
        let token = svc.issue("alice", 7).unwrap();

        let principal = svc.validate(&token, "alice").unwrap();
        assert_eq!(principal.user_id, 7);
        assert_eq!(principal.username, "alice");
    }

    #[test]
    fn validate_is_idempotent() {
        let svc = service();
        let token = svc.issue("alice", 7).unwrap();

        let first = svc.validate(&token, "alice").unwrap();
        let second = svc.validate(&token, "alice").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let svc = service();
        let now = chrono::Utc::now().timestamp();
        let token = sign_raw("alice", 7, now - 7200, now - 3600);

        assert!(matches!(
            svc.validate(&token, "alice"),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn subject_mismatch_fails() {
        let svc = service();
        let token = svc.issue("alice", 7).unwrap();

        assert!(matches!(
            svc.validate(&token, "bob"),
            Err(TokenError::SubjectMismatch)
        ));
    }

    #[test]
    fn tampered_signature_fails_with_malformed() {
        use base64::Engine as _;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let svc = service();
        let token = svc.issue("alice", 7).unwrap();

        // Flip one bit in the signature segment.
        let (head, sig) = token.rsplit_once('.').unwrap();
        let mut sig_bytes = URL_SAFE_NO_PAD.decode(sig).unwrap();
        sig_bytes[0] ^= 0x01;
        let tampered = format!("{}.{}", head, URL_SAFE_NO_PAD.encode(sig_bytes));

        assert!(matches!(
            svc.validate(&tampered, "alice"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn garbage_fails_with_malformed() {
        let svc = service();
        assert!(matches!(
            svc.validate("not-a-jwt", "alice"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(
            svc.extract_username("a.b.c"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn wrong_key_fails_with_malformed() {
        let svc = service();
        let other = TokenService::new(
            b"another-secret-another-secret-another-secret-another-secret-0000",
            3600,
        );
        let token = other.issue("alice", 7).unwrap();

        assert!(matches!(
            svc.validate(&token, "alice"),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn extraction_ignores_expiry_but_not_signature() {
        let svc = service();
        let now = chrono::Utc::now().timestamp();

        // Expired tokens still decode; the middleware needs the subject to
        // look the account up before `validate` reports Expired.
        let expired = sign_raw("alice", 7, now - 7200, now - 3600);
        assert_eq!(svc.extract_username(&expired).unwrap(), "alice");
        assert_eq!(svc.extract_user_id(&expired).unwrap(), 7);

        let (head, _) = expired.rsplit_once('.').unwrap();
        let truncated_sig = format!("{}.AAAA", head);
        assert!(matches!(
            svc.extract_username(&truncated_sig),
            Err(TokenError::Malformed)
        ));
    }
}
