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
use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Tokens are `header.payload.signature` strings signed with HS256 (HMAC with
/// SHA-256) over a shared secret. Signature comparison is constant-time.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Changing the secret invalidates every token signed with the old one
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token against the current time.
    ///
    /// # Errors
    /// See [`JwtHandler::decode_at`].
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Decode and validate a JWT token as of `now` (Unix timestamp).
    ///
    /// The signature is verified before the payload is trusted; expiry is
    /// checked afterwards, so a forged token never reports `Expired`.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be split or parsed, uses another algorithm, or lacks `exp`
    /// * `InvalidSignature` - Signature does not match header and payload
    /// * `Expired` - `now` is past the token's `exp`
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below against the caller's clock, without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e.to_string()),
            })?
            .claims;

        if claims.is_expired(now) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn claims(id: i64, username: &str) -> Claims {
        let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        Claims::for_user(id, username, false, issued_at, Duration::hours(24))
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(SECRET);
        let claims = claims(7, "alice");

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded = handler
            .decode_at(&token, claims.iat)
            .expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_decode_fresh_token_with_current_clock() {
        let handler = JwtHandler::new(SECRET);
        let claims = Claims::for_user(1, "alice", true, Utc::now(), Duration::hours(1));

        let token = handler.encode(&claims).unwrap();
        let decoded = handler.decode(&token).expect("Failed to decode token");
        assert!(decoded.is_admin());
    }

    #[test]
    fn test_decode_expiry_boundary() {
        let handler = JwtHandler::new(SECRET);
        let claims = claims(7, "alice");
        let token = handler.encode(&claims).unwrap();

        assert!(handler.decode_at(&token, claims.exp).is_ok());
        assert_eq!(
            handler.decode_at(&token, claims.exp + 1),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_decode_expired_with_current_clock() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.encode(&claims(7, "alice")).unwrap();

        assert_eq!(handler.decode(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(SECRET);

        assert!(matches!(
            handler.decode("invalid.token.here"),
            Err(JwtError::Malformed(_))
        ));
        assert!(matches!(
            handler.decode("no-dots-at-all"),
            Err(JwtError::Malformed(_))
        ));
        assert!(matches!(handler.decode(""), Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");
        let claims = claims(7, "alice");

        let token = handler1.encode(&claims).expect("Failed to encode token");

        assert_eq!(
            handler2.decode_at(&token, claims.iat),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_signature_mutation_is_rejected() {
        let handler = JwtHandler::new(SECRET);
        let claims = claims(7, "alice");
        let token = handler.encode(&claims).unwrap();

        let signature_start = token.rfind('.').unwrap() + 1;
        // The final character only partially encodes a byte; mutate every full one.
        let last = token.len() - 1;

        for position in signature_start..last {
            let mut bytes = token.clone().into_bytes();
            bytes[position] = if bytes[position] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();

            let result = handler.decode_at(&tampered, claims.iat);
            assert!(
                matches!(
                    result,
                    Err(JwtError::InvalidSignature) | Err(JwtError::Malformed(_))
                ),
                "mutation at {} was accepted",
                position
            );
        }
    }

    #[test]
    fn test_payload_swap_is_rejected() {
        let handler = JwtHandler::new(SECRET);
        let alice = claims(7, "alice");
        let admin = Claims::for_user(1, "root", true, Utc::now(), Duration::hours(24));

        let alice_token = handler.encode(&alice).unwrap();
        let admin_token = handler.encode(&admin).unwrap();

        let alice_parts: Vec<&str> = alice_token.split('.').collect();
        let admin_parts: Vec<&str> = admin_token.split('.').collect();
        let forged = format!("{}.{}.{}", alice_parts[0], admin_parts[1], alice_parts[2]);

        assert_eq!(
            handler.decode_at(&forged, alice.iat),
            Err(JwtError::InvalidSignature)
        );
    }

    #[test]
    fn test_decode_rejects_other_algorithm() {
        let handler = JwtHandler::new(SECRET);
        let claims = claims(7, "alice");

        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            handler.decode_at(&token, claims.iat),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_rejects_missing_expiration() {
        let handler = JwtHandler::new(SECRET);

        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({ "id": 7, "username": "alice", "roles": ["Member"], "iat": 0 }),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(
            handler.decode_at(&token, 0),
            Err(JwtError::Malformed(_))
        ));
    }
}
