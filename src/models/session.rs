// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! In-memory login session.

use serde::Deserialize;

use crate::api::ApiResponse;

/// Logged-in identity and its short-lived access token.
///
/// The refresh token never appears here; it lives in the HTTP client's cookie jar.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub access_token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Why a response could not be turned into a session.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Authentication rejected with status {0}")]
    Rejected(u16),
    #[error("Authentication response did not name a user: {0}")]
    MissingUsername(String),
}

#[derive(Deserialize)]
struct AuthBody {
    username: String,
}

impl Session {
    /// Build a session from a refresh/login response: token from the
    /// `authorization` header, username from the JSON body.
    pub fn from_auth_response(response: &ApiResponse) -> Result<Self, SessionError> {
        if !response.is_success() {
            return Err(SessionError::Rejected(response.status));
        }
        let body: AuthBody = response
            .json()
            .map_err(|e| SessionError::MissingUsername(e.to_string()))?;
        let username = body.username.trim().to_string();
        if username.is_empty() {
            return Err(SessionError::MissingUsername("empty username".into()));
        }

        Ok(Self {
            username,
            access_token: response.authorization.clone(),
        })
    }

    /// Swap in a token issued by a later refresh.
    pub fn renew(&mut self, token: String) {
        self.access_token = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionError};
    use crate::api::testing::response;

    #[test]
    fn builds_session_from_header_and_body() {
        let resp = response(200, r#"{"username":"mao"}"#).with_authorization("Bearer abc");

        let session = Session::from_auth_response(&resp).unwrap();

        assert_eq!(session.username, "mao");
        assert_eq!(session.access_token.as_deref(), Some("Bearer abc"));
    }

    #[test]
    fn rejects_non_success_status() {
        let resp = response(401, r#"{"username":"mao"}"#);

        assert_eq!(
            Session::from_auth_response(&resp),
            Err(SessionError::Rejected(401))
        );
    }

    #[test]
    fn rejects_body_without_username() {
        assert!(matches!(
            Session::from_auth_response(&response(200, "{}")),
            Err(SessionError::MissingUsername(_))
        ));
        assert!(matches!(
            Session::from_auth_response(&response(200, r#"{"username":"  "}"#)),
            Err(SessionError::MissingUsername(_))
        ));
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session {
            username: "mao".into(),
            access_token: Some("Bearer secret".into()),
        };

        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("mao"));
    }
}
