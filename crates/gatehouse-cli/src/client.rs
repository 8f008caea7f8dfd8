//! Async HTTP client wrapping the Gatehouse JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use gatehouse_core::{
  account::ApprovalStatus,
  wire::{ErrorBody, LoginBody, LoginResponse, SignupBody, SignupResponse, StatusResponse},
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::poll::StatusSource;

/// Connection settings for the Gatehouse API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Upper bound on a single request, connect to last byte.
  pub timeout:  Duration,
}

/// A well-formed non-2xx answer from the server.
#[derive(Debug, Error)]
#[error("{} ({status})", .body.message)]
pub struct Refusal {
  pub status: StatusCode,
  pub body:   ErrorBody,
}

/// What the server said, when it said anything sensible at all.
#[derive(Debug)]
pub enum Outcome<T> {
  Accepted(T),
  Refused(Refusal),
}

/// Async HTTP client for the Gatehouse JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  base:   Url,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .context("failed to build HTTP client")?;
    let base = Url::parse(&config.base_url)
      .with_context(|| format!("invalid server URL {:?}", config.base_url))?;
    if base.cannot_be_a_base() {
      return Err(anyhow!("server URL {:?} cannot carry a path", config.base_url));
    }
    Ok(Self { client, base })
  }

  /// `<base>/api/<segments…>`, each segment percent-encoded.
  fn url(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().push("api").extend(segments);
    }
    url
  }

  /// `POST /api/signup`
  pub async fn signup(&self, body: &SignupBody) -> Result<Outcome<SignupResponse>> {
    let resp = self
      .client
      .post(self.url(&["signup"]))
      .json(body)
      .send()
      .await
      .context("POST /signup failed")?;
    decode(resp).await
  }

  /// `GET /api/users/{email}`
  pub async fn check_status(&self, email: &str) -> Result<Outcome<StatusResponse>> {
    let resp = self
      .client
      .get(self.url(&["users", email]))
      .send()
      .await
      .context("GET /users failed")?;
    decode(resp).await
  }

  /// `POST /api/login`
  pub async fn login(&self, body: &LoginBody) -> Result<Outcome<LoginResponse>> {
    let resp = self
      .client
      .post(self.url(&["login"]))
      .json(body)
      .send()
      .await
      .context("POST /login failed")?;
    decode(resp).await
  }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<Outcome<T>> {
  let status = resp.status();
  if status.is_success() {
    let body = resp
      .json()
      .await
      .with_context(|| format!("deserialising {status} response"))?;
    return Ok(Outcome::Accepted(body));
  }
  let body: ErrorBody = resp
    .json()
    .await
    .with_context(|| format!("server answered {status} without a readable body"))?;
  Ok(Outcome::Refused(Refusal { status, body }))
}

impl StatusSource for ApiClient {
  async fn fetch_status(&self, email: &str) -> Result<ApprovalStatus> {
    match self.check_status(email).await? {
      Outcome::Accepted(resp) => Ok(resp.approval_status),
      Outcome::Refused(refusal) => Err(refusal.into()),
    }
  }
}
