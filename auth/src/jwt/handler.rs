use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::claims::Expiring;
use super::errors::JwtError;

/// JWT token handler for encoding and decoding tokens.
///
/// Generic over the claims type. Signs with HS256 and, on decode, requires
/// `exp` and `sub` and applies no clock leeway. A token whose `exp` is the
/// current second is rejected.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(Algorithm::HS256);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// # Errors
    /// * `TokenExpired` - `exp` is not in the future
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `MissingClaim` - `exp` or `sub` is absent
    /// * `Malformed` - Token structure, encoding, algorithm or payload is invalid
    pub fn decode<T>(&self, token: &str) -> Result<T, JwtError>
    where
        T: for<'de> Deserialize<'de> + Expiring,
    {
        let claims = decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(classify)?;

        // jsonwebtoken still accepts exp == now
        if claims.is_expired(Utc::now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

fn classify(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
        _ => JwtError::Malformed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::jwt::Claims;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct NoExpiry {
        sub: String,
    }

    impl Expiring for NoExpiry {
        fn expires_at(&self) -> i64 {
            i64::MAX
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = JwtHandler::new(SECRET);
        let claims = Claims::for_user(12, 24);

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded: Claims = handler.decode(&token).expect("Failed to decode token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_header_uses_hs256() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.encode(&Claims::for_user(1, 1)).unwrap();

        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let handler = JwtHandler::new(SECRET);

        let result = handler.decode::<Claims>("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let issuer = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let verifier = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let token = issuer.encode(&Claims::for_user(1, 24)).unwrap();

        let result = verifier.decode::<Claims>(&token);
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_decode_tampered_signature() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.encode(&Claims::for_user(1, 24)).unwrap();

        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let forged = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", unsigned, forged, &signature[1..]);

        let result = handler.decode::<Claims>(&tampered);
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = JwtHandler::new(SECRET);
        let issued = Utc::now() - chrono::Duration::hours(25);
        let token = handler.encode(&Claims::issued_at(1, issued, 24)).unwrap();

        let result = handler.decode::<Claims>(&token);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_decode_rejects_token_expiring_this_second() {
        let handler = JwtHandler::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            iat: now - 86_400,
            exp: now,
        };
        let token = handler.encode(&claims).unwrap();

        let result = handler.decode::<Claims>(&token);
        assert_eq!(result, Err(JwtError::TokenExpired));
    }

    #[test]
    fn test_decode_accepts_token_expiring_later() {
        let handler = JwtHandler::new(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".to_string(),
            iat: now - 86_400,
            exp: now + 60,
        };
        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.decode::<Claims>(&token), Ok(claims));
    }

    #[test]
    fn test_decode_requires_exp() {
        let handler = JwtHandler::new(SECRET);
        let token = handler
            .encode(&NoExpiry {
                sub: "1".to_string(),
            })
            .unwrap();

        let result = handler.decode::<NoExpiry>(&token);
        assert_eq!(result, Err(JwtError::MissingClaim("exp".to_string())));
    }
}
