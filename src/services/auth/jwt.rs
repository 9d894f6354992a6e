use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::verifier::{Identity, IdentityId, TokenVerifier, VerifyError};

/// Key material accepted by `JwtVerifier`.
///
/// - `Hs256`: shared secret (the whiteboard issuer signs this way)
/// - `EdDsa`: Ed25519 public key, PKCS#8/SPKI PEM
pub enum JwtKey<'a> {
    Hs256 { secret: &'a [u8] },
    EdDsa { public_key_pem: &'a str },
}

#[derive(Debug, thiserror::Error)]
pub enum JwtKeyError {
    #[error("jwt secret must not be empty")]
    EmptySecret,
    #[error("invalid ed25519 public key pem: {0}")]
    InvalidPem(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by whiteboard access tokens.
///
/// The issuer historically serialized Go-style field names (`Name`, `Id`), so both
/// spellings are accepted.
#[derive(Debug, Clone, Deserialize)]
struct WhiteboardClaims {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Id")]
    id: IdentityId,
    // Presence is enforced by `Validation::required_spec_claims`.
    #[allow(dead_code)]
    exp: u64,
}

/// JWT access-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    pub fn new(
        key: JwtKey<'_>,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, JwtKeyError> {
        let (decoding_key, algorithm) = match key {
            JwtKey::Hs256 { secret } => {
                if secret.is_empty() {
                    return Err(JwtKeyError::EmptySecret);
                }
                (DecodingKey::from_secret(secret), Algorithm::HS256)
            }
            JwtKey::EdDsa { public_key_pem } => (
                DecodingKey::from_ed_pem(public_key_pem.as_bytes())
                    .map_err(JwtKeyError::InvalidPem)?,
                Algorithm::EdDSA,
            ),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = leeway_seconds;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        // Tokens minted without `aud` must keep working unless an audience is configured.
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let data = jsonwebtoken::decode::<WhiteboardClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )
        .map_err(VerifyError::with_source)?;

        let claims = data.claims;
        if claims.name.trim().is_empty() {
            return Err(VerifyError::failed());
        }

        Ok(Identity {
            name: claims.name,
            id: claims.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, get_current_timestamp};
    use serde_json::{Value, json};

    const SECRET: &[u8] = b"whiteboard-test-secret";

    fn sign(claims: &Value) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("sign test token")
    }

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(JwtKey::Hs256 { secret: SECRET }, None, None, 0).unwrap()
    }

    #[test]
    fn accepts_lowercase_claims() {
        let token = sign(&json!({
            "name": "alice",
            "id": "42",
            "exp": get_current_timestamp() + 600,
        }));

        let identity = verifier().verify(&token).unwrap();
        assert_eq!(identity.name, "alice");
        assert_eq!(identity.id, IdentityId::Str("42".into()));
    }

    #[test]
    fn accepts_go_style_claims_with_numeric_id() {
        let token = sign(&json!({
            "Name": "bob",
            "Id": 7,
            "exp": get_current_timestamp() + 600,
        }));

        let identity = verifier().verify(&token).unwrap();
        assert_eq!(identity.name, "bob");
        assert_eq!(identity.id, IdentityId::Int(7));
    }

    #[test]
    fn rejects_expired_token() {
        let token = sign(&json!({
            "name": "alice",
            "id": "42",
            "exp": get_current_timestamp() - 3600,
        }));

        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn rejects_token_without_exp() {
        let token = sign(&json!({ "name": "alice", "id": "42" }));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({ "name": "alice", "id": "42", "exp": get_current_timestamp() + 600 }),
            &EncodingKey::from_secret(b"someone-else"),
        )
        .unwrap();

        let err = verifier().verify(&token).unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn rejects_garbage() {
        assert!(verifier().verify("not-a-jwt").is_err());
        assert!(verifier().verify("").is_err());
    }

    #[test]
    fn rejects_empty_name() {
        let token = sign(&json!({
            "name": "  ",
            "id": 1,
            "exp": get_current_timestamp() + 600,
        }));
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn enforces_issuer_when_configured() {
        let strict =
            JwtVerifier::new(JwtKey::Hs256 { secret: SECRET }, Some("whiteboard"), None, 0)
                .unwrap();
        let exp = get_current_timestamp() + 600;

        let good = sign(&json!({ "name": "a", "id": 1, "exp": exp, "iss": "whiteboard" }));
        let bad = sign(&json!({ "name": "a", "id": 1, "exp": exp, "iss": "elsewhere" }));

        assert!(strict.verify(&good).is_ok());
        assert!(strict.verify(&bad).is_err());
    }

    #[test]
    fn ignores_aud_unless_configured() {
        let token = sign(&json!({
            "name": "a",
            "id": 1,
            "exp": get_current_timestamp() + 600,
            "aud": "somewhere",
        }));
        assert!(verifier().verify(&token).is_ok());

        let strict =
            JwtVerifier::new(JwtKey::Hs256 { secret: SECRET }, None, Some("whiteboard"), 0)
                .unwrap();
        assert!(strict.verify(&token).is_err());
    }

    #[test]
    fn empty_secret_is_a_key_error() {
        let err = JwtVerifier::new(JwtKey::Hs256 { secret: b"" }, None, None, 0).unwrap_err();
        assert!(matches!(err, JwtKeyError::EmptySecret));
    }

    #[test]
    fn invalid_pem_is_a_key_error() {
        let err = JwtVerifier::new(
            JwtKey::EdDsa {
                public_key_pem: "not a pem document",
            },
            None,
            None,
            0,
        )
        .unwrap_err();
        assert!(matches!(err, JwtKeyError::InvalidPem(_)));
    }
}
