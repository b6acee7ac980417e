use serde::{Deserialize, Serialize};

/// JWT claims for access tokens.
///
/// Only identity travels in the token; role and profile data are read from
/// the repository on every request so that role changes take effect
/// immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User's email address (subject claim)
    pub sub: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    pub fn email(&self) -> &str {
        &self.sub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_serialize() {
        let claims = Claims {
            sub: "guest@example.com".to_string(),
            exp: 1234567890,
            iat: 1234567800,
        };
        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""sub":"guest@example.com""#));
        assert!(serialized.contains(r#""exp":1234567890"#));
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"sub":"manager@hotel.test","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.email(), "manager@hotel.test");
        assert_eq!(claims.exp, 9999999999);
        assert_eq!(claims.iat, 9999999900);
    }
}
