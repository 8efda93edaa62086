//! Caller resolution from the `Authorization` header.
//!
//! Absence of a bearer credential is not an error: the caller is a guest.
//! A bearer credential that fails verification is an error, so a client that
//! tried to authenticate is never silently downgraded to the guest scope.

use parley_types::error::AuthError;
use parley_types::identity::Owner;

use super::token::TokenIssuer;

/// Scheme prefix of a bearer `Authorization` header (case-sensitive).
pub const BEARER_PREFIX: &str = "Bearer ";

/// Resolve the owner scope for a request.
///
/// - `None` or a header that does not start with `"Bearer "` -> `Owner::Guest`
/// - `"Bearer <token>"` with a token that fails verification -> `Err`
/// - `"Bearer <token>"` with a valid token -> `Owner::User`
pub fn resolve_owner<T: TokenIssuer + ?Sized>(
    authorization: Option<&str>,
    tokens: &T,
) -> Result<Owner, AuthError> {
    let Some(token) = authorization.and_then(|value| value.strip_prefix(BEARER_PREFIX)) else {
        return Ok(Owner::Guest);
    };

    let claims = tokens.verify(token)?;
    Ok(Owner::User(claims.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_types::identity::{Claims, User, UserId};

    /// Accepts exactly one token string.
    struct FixedTokens {
        token: &'static str,
        user_id: UserId,
    }

    impl TokenIssuer for FixedTokens {
        fn issue(&self, _user: &User) -> Result<String, AuthError> {
            Ok(self.token.to_string())
        }

        fn verify(&self, token: &str) -> Result<Claims, AuthError> {
            if token == self.token {
                Ok(Claims {
                    id: self.user_id,
                    username: "alice".to_string(),
                    iat: 0,
                    exp: i64::MAX,
                })
            } else {
                Err(AuthError::InvalidToken("unknown token".to_string()))
            }
        }
    }

    fn tokens() -> FixedTokens {
        FixedTokens {
            token: "good",
            user_id: UserId::new(),
        }
    }

    #[test]
    fn test_missing_header_is_guest() {
        assert_eq!(resolve_owner(None, &tokens()).unwrap(), Owner::Guest);
    }

    #[test]
    fn test_non_bearer_header_is_guest() {
        let tokens = tokens();
        assert_eq!(
            resolve_owner(Some("Basic dXNlcjpwYXNz"), &tokens).unwrap(),
            Owner::Guest
        );
        assert_eq!(resolve_owner(Some("bearer good"), &tokens).unwrap(), Owner::Guest);
        assert_eq!(resolve_owner(Some("Bearer"), &tokens).unwrap(), Owner::Guest);
    }

    #[test]
    fn test_valid_bearer_resolves_user() {
        let tokens = tokens();
        assert_eq!(
            resolve_owner(Some("Bearer good"), &tokens).unwrap(),
            Owner::User(tokens.user_id)
        );
    }

    #[test]
    fn test_invalid_bearer_is_rejected() {
        let tokens = tokens();
        let err = resolve_owner(Some("Bearer forged"), &tokens).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));

        // An empty token is still an attempt to authenticate.
        let err = resolve_owner(Some("Bearer "), &tokens).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }
}
