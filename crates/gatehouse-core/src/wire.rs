//! JSON bodies exchanged between the HTTP API and its clients.
//!
//! Field names are camelCase on the wire. Request fields default to empty
//! strings so that an absent field reaches validation as a blank one and is
//! reported as a bad request naming that field.

use serde::{Deserialize, Serialize};

use crate::account::{ApprovalStatus, Credentials, Signup};

// ─── Requests ────────────────────────────────────────────────────────────────

/// `POST /signup`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupBody {
  pub email:      String,
  pub first_name: String,
  pub last_name:  String,
  pub password:   String,
}

impl From<SignupBody> for Signup {
  fn from(body: SignupBody) -> Self {
    Self {
      email:       body.email,
      given_name:  body.first_name,
      family_name: body.last_name,
      secret:      body.password,
    }
  }
}

/// `POST /login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

impl From<LoginBody> for Credentials {
  fn from(body: LoginBody) -> Self { Self { email: body.email, secret: body.password } }
}

// ─── Responses ───────────────────────────────────────────────────────────────

/// Marker value of [`SignupResponse::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignupState {
  Submitted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
  pub status:  SignupState,
  pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
  pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
  pub login_success: bool,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
  pub message:         String,
  /// Present on conflict and forbidden responses.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub approval_status: Option<ApprovalStatus>,
  /// Present (and `false`) on login failures.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub login_success:   Option<bool>,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn missing_signup_fields_deserialize_blank() {
    let body: SignupBody = serde_json::from_value(json!({ "email": "a@x.com" })).unwrap();
    assert_eq!(body.email, "a@x.com");
    assert!(body.first_name.is_empty());
    assert!(Signup::from(body).validate().is_err());
  }

  #[test]
  fn signup_body_uses_camel_case() {
    let body: SignupBody = serde_json::from_value(json!({
      "email": "a@x.com",
      "firstName": "A",
      "lastName": "B",
      "password": "pw1",
    }))
    .unwrap();
    let signup = Signup::from(body);
    assert_eq!(signup.given_name, "A");
    assert_eq!(signup.family_name, "B");
    assert!(signup.validate().is_ok());
  }

  #[test]
  fn error_body_omits_absent_fields() {
    let body = ErrorBody {
      message:         "User not found.".into(),
      approval_status: None,
      login_success:   None,
    };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "message": "User not found." }));

    let body = ErrorBody {
      message:         "Not yet approved by admin.".into(),
      approval_status: Some(ApprovalStatus::Pending),
      login_success:   Some(false),
    };
    assert_eq!(
      serde_json::to_value(&body).unwrap(),
      json!({
        "message": "Not yet approved by admin.",
        "approvalStatus": "pending",
        "loginSuccess": false,
      })
    );
  }

  #[test]
  fn status_response_shape() {
    let body = StatusResponse { approval_status: ApprovalStatus::Approved };
    assert_eq!(serde_json::to_value(&body).unwrap(), json!({ "approvalStatus": "approved" }));
  }
}
