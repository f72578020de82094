// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Backend access: transport abstraction, endpoint paths and the retrying request helper.

pub mod fetch;
pub mod transport;

pub use fetch::{FetchStage, Fetched, fetch_data};
pub use transport::{
    ApiRequest, ApiResponse, FormData, HttpMethod, ReqwestTransport, Transport, TransportError,
};

/// Endpoint paths relative to the configured API base URL.
pub mod endpoints {
    /// Silent session restore on launch (GET).
    pub const REFRESH: &str = "/auth/refresh";
    /// Server-side logout after a failed restore (GET).
    pub const LOGOUT: &str = "/auth/logout";
    /// Token pair: PUT refreshes the access token, DELETE logs out.
    pub const TOKENS: &str = "/auth/tokens";
    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/users";
    pub const POSTS: &str = "/posts";

    /// Path of a single post.
    pub fn post(id: &str) -> String {
        format!("{POSTS}/{id}")
    }
}
