//! Authentication middleware
//!
//! Validates JWT bearer tokens minted by the hosted auth provider and
//! extracts the caller's identity and role. User management itself lives in
//! the auth provider; the backend only checks tokens.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;
use crate::AppState;

/// Role claim carried in the auth provider's tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserRole {
    Operator,
    Engineer,
    Admin,
}

impl UserRole {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "operator" => Some(UserRole::Operator),
            "engineer" => Some(UserRole::Engineer),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Roles form a strict ladder: admin > engineer > operator
    fn rank(&self) -> u8 {
        match self {
            UserRole::Operator => 1,
            UserRole::Engineer => 2,
            UserRole::Admin => 3,
        }
    }
}

/// Authenticated user information extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: uuid::Uuid,
    pub plant_id: uuid::Uuid,
    pub role: UserRole,
}

impl AuthUser {
    /// Check that the user's role is at least `required`
    pub fn has_role(&self, required: UserRole) -> bool {
        self.role.rank() >= required.rank()
    }
}

/// Authentication middleware that validates JWT tokens
///
/// Extracts the bearer token from the Authorization header and validates it
/// against the secret in the loaded configuration. Attach with
/// `middleware::from_fn_with_state` so the same config the server started
/// with is the one tokens are checked against.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    // Decode and validate JWT token
    let claims = match decode_jwt(token, &state.config.jwt.secret) {
        Ok(claims) => claims,
        Err(msg) => {
            return unauthorized_response(&msg);
        }
    };

    // Parse identity from claims
    let user_id = match uuid::Uuid::parse_str(&claims.sub) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid user ID in token"),
    };

    let plant_id = match uuid::Uuid::parse_str(&claims.plant_id) {
        Ok(id) => id,
        Err(_) => return unauthorized_response("Invalid plant ID in token"),
    };

    let role = match UserRole::parse(&claims.role) {
        Some(role) => role,
        None => return unauthorized_response("Invalid role in token"),
    };

    // Create AuthUser and insert into request extensions
    let auth_user = AuthUser {
        user_id,
        plant_id,
        role,
    };

    request.extensions_mut().insert(auth_user);

    next.run(request).await
}

/// JWT claims structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    sub: String,
    plant_id: String,
    role: String,
    exp: i64,
    iat: i64,
}

/// Decode and validate JWT token
fn decode_jwt(token: &str, secret: &str) -> Result<Claims, String> {
    use jsonwebtoken::{decode, DecodingKey, Validation};

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

/// Create unauthorized response
fn unauthorized_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: crate::error::ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            field: None,
        },
    };

    (StatusCode::UNAUTHORIZED, Json(error)).into_response()
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: crate::error::ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Authentication required".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })
    }
}

/// Role guard for use in handlers
/// Returns an error if the user's role is below the required one
pub fn require_role(user: &AuthUser, required: UserRole) -> Result<(), crate::error::AppError> {
    if user.has_role(required) {
        Ok(())
    } else {
        Err(crate::error::AppError::InsufficientPermissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_signed_with(secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            plant_id: uuid::Uuid::new_v4().to_string(),
            role: "operator".to_string(),
            exp: now + 3600,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_tokens_signed_with_the_configured_secret() {
        let token = token_signed_with("plant-a-secret");
        let claims = decode_jwt(&token, "plant-a-secret").unwrap();
        assert_eq!(claims.role, "operator");
    }

    #[test]
    fn rejects_tokens_signed_with_a_different_secret() {
        // The secret the server validates with must be the one from the
        // loaded config; a token minted against any other secret fails
        let token = token_signed_with("plant-a-secret");
        assert!(decode_jwt(&token, "plant-b-secret").is_err());
    }

    #[test]
    fn rejects_expired_tokens() {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            plant_id: uuid::Uuid::new_v4().to_string(),
            role: "admin".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"plant-a-secret"),
        )
        .unwrap();
        assert!(decode_jwt(&token, "plant-a-secret").is_err());
    }

    #[test]
    fn role_ladder_ordering() {
        let engineer = AuthUser {
            user_id: uuid::Uuid::new_v4(),
            plant_id: uuid::Uuid::new_v4(),
            role: UserRole::Engineer,
        };
        assert!(engineer.has_role(UserRole::Operator));
        assert!(engineer.has_role(UserRole::Engineer));
        assert!(!engineer.has_role(UserRole::Admin));
    }
}
