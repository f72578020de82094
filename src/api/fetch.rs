// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Request helper with a single refresh-and-retry on failure.

use super::transport::{ApiRequest, ApiResponse, HttpMethod, Transport, TransportError};
use super::endpoints;

/// Which step of the helper produced the returned response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStage {
    /// The original request; it succeeded or was exempt from refreshing.
    FirstAttempt,
    /// The token refresh was rejected; the response is the refresh response.
    RefreshRejected,
    /// The refresh succeeded and the original request was sent a second time.
    Retried,
}

/// Response plus how it was obtained.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched {
    pub response: ApiResponse,
    pub stage: FetchStage,
    /// Access token issued by a successful refresh, if the backend sent one.
    pub renewed_token: Option<String>,
}

impl Fetched {
    fn first(response: ApiResponse) -> Self {
        Self {
            response,
            stage: FetchStage::FirstAttempt,
            renewed_token: None,
        }
    }
}

/// Send `request`, refreshing the access token and retrying once when it fails.
///
/// The flow is fixed at depth one:
/// - a 2xx response is returned as-is;
/// - so is any response when `bypass_refresh` is set (login/signup) or when the
///   request is itself the token refresh (`PUT /auth/tokens`);
/// - otherwise `PUT /auth/tokens` is sent; a non-2xx refresh response is
///   returned to the caller as [`FetchStage::RefreshRejected`];
/// - after a successful refresh the original request is sent exactly once more.
///
/// Transport failures at any step come back as `Err` instead of panicking.
pub fn fetch_data(
    transport: &dyn Transport,
    request: &ApiRequest,
    bypass_refresh: bool,
) -> Result<Fetched, TransportError> {
    let is_token_refresh =
        request.endpoint == endpoints::TOKENS && request.method == HttpMethod::Put;

    let first = transport.send(request)?;
    if first.is_success() || bypass_refresh || is_token_refresh {
        return Ok(Fetched::first(first));
    }

    tracing::debug!(
        endpoint = %request.endpoint,
        status = first.status,
        "request rejected; refreshing access token"
    );
    let refresh = transport.send(&ApiRequest::new(HttpMethod::Put, endpoints::TOKENS))?;
    if !refresh.is_success() {
        tracing::info!(status = refresh.status, "access token refresh rejected");
        return Ok(Fetched {
            response: refresh,
            stage: FetchStage::RefreshRejected,
            renewed_token: None,
        });
    }

    let renewed_token = refresh.authorization.clone();
    let mut retry = request.clone();
    if renewed_token.is_some() {
        retry.access_token = renewed_token.clone();
    }
    let response = transport.send(&retry)?;
    tracing::debug!(
        endpoint = %request.endpoint,
        status = response.status,
        "retried after token refresh"
    );

    Ok(Fetched {
        response,
        stage: FetchStage::Retried,
        renewed_token,
    })
}
