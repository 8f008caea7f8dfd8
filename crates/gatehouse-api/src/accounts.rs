//! Handlers for the account endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/signup` | Body: `{"email","firstName","lastName","password"}` |
//! | `GET`  | `/users/{email}` | Percent-decoded email; 404 if unknown |
//! | `POST` | `/login` | Body: `{"email","password"}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use gatehouse_core::{
  hasher::CredentialHasher,
  registry::{Registry, Submitted},
  store::AccountStore,
  wire::{
    LoginBody, LoginResponse, SignupBody, SignupResponse, SignupState, StatusResponse,
  },
};

use crate::error::ApiError;

// ─── Signup ───────────────────────────────────────────────────────────────────

/// `POST /signup`
pub async fn signup<S, H>(
  State(registry): State<Arc<Registry<S, H>>>,
  body: Result<Json<SignupBody>, JsonRejection>,
) -> Result<Json<SignupResponse>, ApiError>
where
  S: AccountStore,
  H: CredentialHasher,
{
  let Json(body) = body?;
  registry.signup(body.into()).await?;
  Ok(Json(SignupResponse {
    status:  SignupState::Submitted,
    message: Submitted::MESSAGE.to_string(),
  }))
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// `GET /users/{email}`
pub async fn status<S, H>(
  State(registry): State<Arc<Registry<S, H>>>,
  Path(email): Path<String>,
) -> Result<Json<StatusResponse>, ApiError>
where
  S: AccountStore,
  H: CredentialHasher,
{
  let approval_status = registry.check_status(&email).await?;
  Ok(Json(StatusResponse { approval_status }))
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// `POST /login`
pub async fn login<S, H>(
  State(registry): State<Arc<Registry<S, H>>>,
  body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: AccountStore,
  H: CredentialHasher,
{
  let Json(body) = body?;
  registry.login(body.into()).await.map_err(ApiError::Login)?;
  Ok(Json(LoginResponse { login_success: true }))
}
