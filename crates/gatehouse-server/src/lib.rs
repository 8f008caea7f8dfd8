//! HTTP server wiring for Gatehouse.
//!
//! Mounts the JSON API from `gatehouse-api` under `/api` and wraps it in the
//! request-tracing and CORS layers.

use std::sync::Arc;

use axum::{
  Router,
  http::{HeaderValue, Method, header, header::InvalidHeaderValue},
};
use gatehouse_core::{hasher::CredentialHasher, registry::Registry, store::AccountStore};
use gatehouse_store_sqlite::StoreConfig;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `GATEHOUSE__*` environment variables (e.g. `GATEHOUSE__STORE__PATH`).
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:        String,
  pub port:        u16,
  /// Single allowed browser origin. `None` allows any origin.
  #[serde(default)]
  pub cors_origin: Option<String>,
  pub store:       StoreConfig,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S, H>(
  registry: Arc<Registry<S, H>>,
  config:   &ServerConfig,
) -> Result<Router, InvalidHeaderValue>
where
  S: AccountStore + 'static,
  H: CredentialHasher + 'static,
{
  Ok(
    Router::new()
      .nest("/api", gatehouse_api::api_router(registry))
      .layer(cors_layer(config.cors_origin.as_deref())?)
      .layer(TraceLayer::new_for_http()),
  )
}

fn cors_layer(origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
  let Some(origin) = origin else {
    return Ok(CorsLayer::permissive());
  };
  Ok(
    CorsLayer::new()
      .allow_origin(HeaderValue::from_str(origin)?)
      .allow_methods([Method::GET, Method::POST])
      .allow_headers([header::CONTENT_TYPE]),
  )
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::Params;
  use axum::{body::Body, http::{Request, StatusCode}};
  use gatehouse_api::Argon2Hasher;
  use gatehouse_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn app(cors_origin: Option<&str>) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let hasher = Argon2Hasher::with_params(Params::new(8, 1, 1, None).unwrap());
    let config = ServerConfig {
      host:        "127.0.0.1".to_string(),
      port:        3001,
      cors_origin: cors_origin.map(str::to_string),
      store:       StoreConfig::new(":memory:"),
    };
    router(Arc::new(Registry::new(store, hasher)), &config).unwrap()
  }

  #[tokio::test]
  async fn api_is_mounted_under_api_prefix() {
    let resp = app(None)
      .await
      .oneshot(
        Request::builder()
          .uri("/api/users/nobody%40x.com")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "User not found.");
  }

  #[tokio::test]
  async fn configured_origin_is_echoed_on_preflight() {
    let resp = app(Some("http://localhost:3000"))
      .await
      .oneshot(
        Request::builder()
          .method("OPTIONS")
          .uri("/api/signup")
          .header(header::ORIGIN, "http://localhost:3000")
          .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "http://localhost:3000"
    );
  }

  #[test]
  fn invalid_origin_is_refused() {
    assert!(cors_layer(Some("bad\norigin")).is_err());
  }
}
