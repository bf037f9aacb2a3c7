/// Identity token handling
///
/// The identity provider that signs tokens lives outside this service; we
/// only validate HS256 signatures and read the claims. `encode_token` exists
/// for local tooling and the test suites.
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id
    pub sub: Uuid,
    /// Username at issuance time
    pub username: String,
    /// Expiry as a unix timestamp
    pub exp: usize,
}

/// The authenticated caller, as resolved from a validated token
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            id: claims.sub,
            username: claims.username,
        }
    }
}

/// Validate a bearer token and extract its claims
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Sign a token for the given identity
pub fn encode_token(
    user_id: Uuid,
    username: &str,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (chrono::Utc::now() + chrono::Duration::seconds(ttl_secs)).timestamp() as usize;
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let user_id = Uuid::new_v4();
        let token = encode_token(user_id, "leo", "secret", 3600).unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "leo");
    }

    #[test]
    fn test_rejects_wrong_secret() {
        let token = encode_token(Uuid::new_v4(), "leo", "secret", 3600).unwrap();
        assert!(decode_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_rejects_expired_token() {
        let token = encode_token(Uuid::new_v4(), "leo", "secret", -3600).unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }
}
