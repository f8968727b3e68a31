use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::{Actor, Role};
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub role: Option<String>,
    pub name: Option<String>,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        let actor = Actor::new(self.sub, Role::from_claim(self.role.as_deref()));
        match &self.name {
            Some(name) if !name.trim().is_empty() => actor.with_display_name(name.trim()),
            _ => actor,
        }
    }
}

/// Signs an HS256 token for `actor`, valid for `ttl`.
pub fn issue_token(secret: &str, actor: &Actor, ttl: chrono::Duration) -> Result<String> {
    let role = match actor.role {
        Role::Admin => "admin",
        Role::Employer => "employer",
        Role::JobSeeker => "job_seeker",
    };
    let claims = Claims {
        sub: actor.id,
        exp: (chrono::Utc::now() + ttl).timestamp().max(0) as usize,
        role: Some(role.to_string()),
        name: actor.display_name.clone(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_actor(secret: &str, token: &str) -> Option<Actor> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims.actor())
}

fn unauthorized(code: &str) -> Response {
    Error::Unauthorized(code.to_string()).into_response()
}

/// Resolves the bearer token into an [`Actor`] request extension.
pub async fn require_bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(axum::http::header::AUTHORIZATION) else {
        return unauthorized("missing_authorization");
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return unauthorized("bad_authorization");
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return unauthorized("unsupported_scheme");
    };

    match decode_actor(&state.jwt_secret, token.trim()) {
        Some(actor) => {
            req.extensions_mut().insert(actor);
            next.run(req).await
        }
        None => unauthorized("invalid_token"),
    }
}
