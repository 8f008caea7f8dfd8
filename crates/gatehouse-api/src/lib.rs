//! JSON REST API for Gatehouse.
//!
//! Exposes an axum [`Router`] backed by a [`Registry`] over any
//! [`AccountStore`] and [`CredentialHasher`]. TLS, CORS and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gatehouse_api::api_router(registry.clone()))
//! ```

pub mod accounts;
pub mod error;
pub mod hasher;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use gatehouse_core::{hasher::CredentialHasher, registry::Registry, store::AccountStore};

pub use error::ApiError;
pub use hasher::Argon2Hasher;

/// Build the API router for `registry`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, H>(registry: Arc<Registry<S, H>>) -> Router<()>
where
  S: AccountStore + 'static,
  H: CredentialHasher + 'static,
{
  Router::new()
    .route("/signup", post(accounts::signup::<S, H>))
    .route("/users/{email}", get(accounts::status::<S, H>))
    .route("/login", post(accounts::login::<S, H>))
    .with_state(registry)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::Params;
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use gatehouse_core::account::ApprovalStatus;
  use gatehouse_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  type TestRegistry = Registry<SqliteStore, Argon2Hasher>;

  async fn make_state() -> (Arc<TestRegistry>, SqliteStore) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let hasher = Argon2Hasher::with_params(Params::new(8, 1, 1, None).unwrap());
    (Arc::new(Registry::new(store.clone(), hasher)), store)
  }

  async fn send(
    registry: &Arc<TestRegistry>,
    method:   &str,
    uri:      &str,
    body:     Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(registry.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
  }

  fn alice() -> Value {
    json!({
      "email": "a@x.com",
      "firstName": "A",
      "lastName": "B",
      "password": "pw1",
    })
  }

  // ── Signup ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn signup_returns_submitted() {
    let (registry, _) = make_state().await;
    let (status, body) = send(&registry, "POST", "/signup", Some(alice())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "submitted");
  }

  #[tokio::test]
  async fn signup_conflicts_and_rejection() {
    let (registry, store) = make_state().await;
    send(&registry, "POST", "/signup", Some(alice())).await;

    let (status, body) = send(&registry, "POST", "/signup", Some(alice())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["approvalStatus"], "pending");

    store.set_status("a@x.com", ApprovalStatus::Approved).await.unwrap();
    let (status, body) = send(&registry, "POST", "/signup", Some(alice())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["approvalStatus"], "approved");

    store.set_status("a@x.com", ApprovalStatus::Rejected).await.unwrap();
    let (status, body) = send(&registry, "POST", "/signup", Some(alice())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["approvalStatus"], "rejected");
    assert_eq!(body["message"], "Your request was rejected by admin.");
  }

  #[tokio::test]
  async fn signup_with_missing_field_is_400() {
    let (registry, _) = make_state().await;
    let (status, body) = send(
      &registry,
      "POST",
      "/signup",
      Some(json!({ "email": "a@x.com", "firstName": "A", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("lastName"), "{body}");
  }

  #[tokio::test]
  async fn signup_with_malformed_json_is_400() {
    let (registry, _) = make_state().await;
    let resp = api_router(registry)
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/signup")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from("{not json"))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Status ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn status_of_unknown_email_is_404() {
    let (registry, _) = make_state().await;
    let (status, body) = send(&registry, "GET", "/users/nobody%40x.com", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found.");
  }

  #[tokio::test]
  async fn status_path_is_percent_decoded() {
    let (registry, store) = make_state().await;
    send(&registry, "POST", "/signup", Some(alice())).await;

    let (status, body) = send(&registry, "GET", "/users/a%40x.com", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "approvalStatus": "pending" }));

    store.set_status("a@x.com", ApprovalStatus::Approved).await.unwrap();
    let (_, body) = send(&registry, "GET", "/users/a%40x.com", None).await;
    assert_eq!(body["approvalStatus"], "approved");
  }

  // ── Login ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn login_before_approval_is_403() {
    let (registry, _) = make_state().await;
    send(&registry, "POST", "/signup", Some(alice())).await;

    let (status, body) = send(
      &registry,
      "POST",
      "/login",
      Some(json!({ "email": "a@x.com", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["loginSuccess"], false);
    assert_eq!(body["message"], "Not yet approved by admin.");
  }

  #[tokio::test]
  async fn approved_login_checks_password() {
    let (registry, store) = make_state().await;
    send(&registry, "POST", "/signup", Some(alice())).await;
    store.set_status("a@x.com", ApprovalStatus::Approved).await.unwrap();

    let (status, body) = send(
      &registry,
      "POST",
      "/login",
      Some(json!({ "email": "a@x.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["loginSuccess"], false);

    let (status, body) = send(
      &registry,
      "POST",
      "/login",
      Some(json!({ "email": "a@x.com", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "loginSuccess": true }));
  }

  #[tokio::test]
  async fn login_for_unknown_email_is_404() {
    let (registry, _) = make_state().await;
    let (status, body) = send(
      &registry,
      "POST",
      "/login",
      Some(json!({ "email": "nobody@x.com", "password": "pw1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["loginSuccess"], false);
  }

  // ── Internal errors ─────────────────────────────────────────────────────────

  #[tokio::test]
  async fn internal_errors_hide_their_cause() {
    let err = ApiError::Registry(gatehouse_core::Error::Internal("secret table name".into()));
    let resp = axum::response::IntoResponse::into_response(err);
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], error::INTERNAL_MESSAGE);
    assert!(!body.to_string().contains("secret table name"));
  }
}
