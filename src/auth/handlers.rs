use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{
        ActiveToggled, AdminUser, AuthResponse, LoginRequest, PublicUser, RefreshRequest,
        RegisterRequest, SetRoleRequest,
    },
    jwt::{Actor, JwtKeys},
    password::{hash_password, verify_password},
    rbac::{Capability, Role},
    repo,
    repo::User,
};
use crate::error::ApiError;
use crate::state::AppState;
use uuid::Uuid;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

pub fn admin_user_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(admin_users))
        .route("/admin/users/:id/active", patch(toggle_user_active))
        .route("/admin/users/:id/role", patch(set_user_role))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn public_user(user: &User) -> PublicUser {
    PublicUser {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        role: user.role,
    }
}

fn token_pair(keys: &JwtKeys, user: &User) -> Result<AuthResponse, ApiError> {
    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: public_user(user),
    })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidInput("Invalid email".into()));
    }
    if payload.username.is_empty() {
        return Err(ApiError::InvalidInput("Username is required".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::InvalidInput("Password too short".into()));
    }

    if repo::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email"));
    }
    if repo::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(ApiError::Conflict("Username"));
    }

    let hash = hash_password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::Student);
    let user = repo::create(&state.db, &payload.username, &payload.email, &hash, role).await?;

    let keys = JwtKeys::from_ref(&state);
    let response = token_pair(&keys, &user)?;

    info!(user_id = %user.id, username = %user.username, role = ?user.role, "user registered");
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::InvalidInput("Invalid email".into()));
    }

    let user = repo::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::Unauthorized("Invalid credentials")
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid credentials"));
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on disabled account");
        return Err(ApiError::Forbidden("Account is disabled"));
    }

    let keys = JwtKeys::from_ref(&state);
    let response = token_pair(&keys, &user)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized("Invalid refresh token"))?;

    // Reload the user so a role change or deactivation takes effect on refresh.
    let user = repo::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is disabled"));
    }

    let response = token_pair(&keys, &user)?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<PublicUser>, ApiError> {
    let user = repo::find_by_id(&state.db, actor.id)
        .await?
        .ok_or(ApiError::Unauthorized("User not found"))?;
    Ok(Json(public_user(&user)))
}

#[instrument(skip(state))]
pub async fn admin_users(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<AdminUser>>, ApiError> {
    actor.require(Capability::ManageUsers)?;

    let users = repo::list_all(&state.db).await?;
    let items = users
        .into_iter()
        .map(|u| AdminUser {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn toggle_user_active(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ActiveToggled>, ApiError> {
    actor.require(Capability::ManageUsers)?;

    let target = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if target.role == Role::Admin {
        return Err(ApiError::InvalidInput(
            "Cannot deactivate an admin account".into(),
        ));
    }

    let updated = repo::set_active(&state.db, id, !target.is_active)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    info!(user_id = %updated.id, is_active = updated.is_active, "user active flag toggled");
    Ok(Json(ActiveToggled {
        id: updated.id,
        is_active: updated.is_active,
    }))
}

#[instrument(skip(state))]
pub async fn set_user_role(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    actor.require(Capability::ManageUsers)?;

    let updated = repo::set_role(&state.db, id, payload.role)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    info!(user_id = %updated.id, role = ?updated.role, "user role changed");
    Ok(Json(public_user(&updated)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("student@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.io"));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn public_user_never_serializes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "sam".into(),
            email: "sam@example.com".into(),
            password_hash: "argon2-hash".into(),
            role: Role::Student,
            is_active: true,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&public_user(&user)).unwrap();
        assert!(json.contains("sam@example.com"));
        assert!(!json.contains("argon2-hash"));
    }
}
