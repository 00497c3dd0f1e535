//! Account handlers, bearer-token issuance and the [`CurrentUser`] extractor.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/v1/auth/register` | Body: `{"username","email","password"}`; 201 |
//! | `POST` | `/api/v1/auth/login` | Body: `{"email","password"}` |
//! | `GET`  | `/api/v1/auth/me` | Requires a bearer token |
//!
//! Passwords are stored as argon2 PHC strings. Tokens are HS256 JWTs whose
//! `sub` is the user id.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{StatusCode, header, request::Parts},
  response::IntoResponse,
};
use chrono::{Duration, Utc};
use healthcue_core::{
  store::WellnessStore,
  user::{NewUser, User},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Token signing settings for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub jwt_secret: String,
  pub token_ttl:  Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub sub:      Uuid,
  pub username: String,
  pub exp:      usize,
}

// ─── Tokens ───────────────────────────────────────────────────────────────────

pub fn issue_token(config: &AuthConfig, user: &User) -> Result<String, ApiError> {
  let claims = Claims {
    sub:      user.user_id,
    username: user.username.clone(),
    exp:      (Utc::now() + config.token_ttl).timestamp().max(0) as usize,
  };

  encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
  )
  .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))
}

pub fn verify_token(config: &AuthConfig, token: &str) -> Result<Claims, ApiError> {
  decode::<Claims>(
    token,
    &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
    &Validation::default(),
  )
  .map(|data| data.claims)
  .map_err(|_| ApiError::missing_token())
}

// ─── Passwords ────────────────────────────────────────────────────────────────

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

/// Check `password` against a stored PHC string. Malformed hashes never verify.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

/// Run argon2 off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
  F: FnOnce() -> T + Send + 'static,
  T: Send + 'static,
{
  tokio::task::spawn_blocking(f)
    .await
    .map_err(|e| ApiError::Internal(format!("worker failed: {e}")))
}

// ─── Extractor ────────────────────────────────────────────────────────────────

/// The caller identified by `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
  pub user_id:  Uuid,
  pub username: String,
}

impl<S> FromRequestParts<ApiState<S>> for CurrentUser
where
  S: WellnessStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = parts
      .headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "))
      .ok_or_else(ApiError::missing_token)?;

    let claims = verify_token(&state.auth, token.trim())?;

    // A validly signed token can outlive its account (e.g. a reset database).
    let user = state
      .store
      .get_user(claims.sub)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(|| {
        tracing::debug!(user_id = %claims.sub, "token for unknown user");
        ApiError::missing_token()
      })?;
    Ok(CurrentUser { user_id: user.user_id, username: user.username })
  }
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub email:    Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

struct Registration {
  username: String,
  email:    String,
  password: String,
}

fn validate_registration(body: RegisterBody) -> Result<Registration, ApiError> {
  let username = body.username.unwrap_or_default().trim().to_owned();
  let email = normalize_email(body.email.as_deref().unwrap_or_default());
  let password = body.password.unwrap_or_default();

  if username.is_empty() || email.is_empty() || password.is_empty() {
    return Err(ApiError::BadRequest("username, email and password are required".into()));
  }
  let len = username.chars().count();
  if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
    return Err(ApiError::BadRequest(format!(
      "username must be {MIN_USERNAME_LEN}-{MAX_USERNAME_LEN} characters"
    )));
  }
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
    _ => return Err(ApiError::BadRequest("invalid email address".into())),
  }
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }

  Ok(Registration { username, email, password })
}

pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// `POST /api/v1/auth/register`
pub async fn register<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let reg = validate_registration(body)?;

  if state
    .store
    .find_user_by_username(&reg.username)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict("Username already exists".into()));
  }
  if state
    .store
    .find_user_by_email(&reg.email)
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict("Email already exists".into()));
  }

  let password = reg.password;
  let password_hash = blocking(move || hash_password(&password)).await??;

  // The checks above give the usual answer; a registration racing this one
  // can still claim either column first, and the store reports that as `None`.
  let username = reg.username.clone();
  let Some(user) = state
    .store
    .create_user(NewUser { username: reg.username, email: reg.email, password_hash })
    .await
    .map_err(ApiError::store)?
  else {
    let taken = state
      .store
      .find_user_by_username(&username)
      .await
      .map_err(ApiError::store)?
      .is_some();
    let what = if taken { "Username" } else { "Email" };
    return Err(ApiError::Conflict(format!("{what} already exists")));
  };
  tracing::info!(user_id = %user.user_id, username = %user.username, "user registered");

  let access_token = issue_token(&state.auth, &user)?;
  Ok((
    StatusCode::CREATED,
    Json(json!({ "user": user, "access_token": access_token })),
  ))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  #[serde(default)]
  pub email:    Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

/// `POST /api/v1/auth/login`
pub async fn login<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let email = normalize_email(body.email.as_deref().unwrap_or_default());
  let password = body.password.unwrap_or_default();
  if email.is_empty() || password.is_empty() {
    return Err(ApiError::BadRequest("email and password are required".into()));
  }

  let invalid = || ApiError::Unauthorized("Invalid email or password".into());

  let user = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(invalid)?;

  let phc = user.password_hash.clone();
  if !blocking(move || verify_password(&password, &phc)).await? {
    tracing::debug!(user_id = %user.user_id, "password mismatch");
    return Err(invalid());
  }

  let access_token = issue_token(&state.auth, &user)?;
  Ok(Json(json!({ "user": user, "access_token": access_token })))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

/// `GET /api/v1/auth/me`
pub async fn me<S>(
  State(state): State<ApiState<S>>,
  current: CurrentUser,
) -> Result<impl IntoResponse, ApiError>
where
  S: WellnessStore + Clone + 'static,
{
  let user = state
    .store
    .get_user(current.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
  Ok(Json(json!({ "user": user })))
}
