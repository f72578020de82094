// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Side effects requested by `update` and executed on worker threads.

use std::path::PathBuf;

use super::Msg;
use crate::api::{
    ApiRequest, ApiResponse, FetchStage, Fetched, FormData, HttpMethod, Transport, TransportError,
    endpoints, fetch_data,
};
use crate::logic::export::{suggested_export_name, write_post_html};
use crate::models::{Post, Session, ValidationErrors, parse_post_list};
use crate::ui::components::auth_form::AuthMode;
use crate::ui::components::post_form::republish_form;
use crate::utils::ensure_extension;

/// Commands represent side-effects executed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    RefreshSession,
    Logout {
        access_token: Option<String>,
    },
    Authenticate {
        mode: AuthMode,
        form: FormData,
    },
    LoadPosts {
        access_token: Option<String>,
    },
    SubmitPost {
        post_id: Option<String>,
        form: FormData,
        access_token: Option<String>,
    },
    SetPublished {
        post: Post,
        publish: bool,
        access_token: Option<String>,
    },
    DeletePost {
        post_id: String,
        access_token: Option<String>,
    },
    PickExportPath(Post),
    ExportPost {
        post: Post,
        output: PathBuf,
    },
    OpenUrl(String),
}

impl Command {
    /// Short name for logs; payloads carry credentials and are never logged.
    pub fn label(&self) -> &'static str {
        match self {
            Command::RefreshSession => "refresh_session",
            Command::Logout { .. } => "logout",
            Command::Authenticate { .. } => "authenticate",
            Command::LoadPosts { .. } => "load_posts",
            Command::SubmitPost { .. } => "submit_post",
            Command::SetPublished { .. } => "set_published",
            Command::DeletePost { .. } => "delete_post",
            Command::PickExportPath(_) => "pick_export_path",
            Command::ExportPost { .. } => "export_post",
            Command::OpenUrl(_) => "open_url",
        }
    }
}

/// Why an API call did not produce a usable value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiFailure {
    /// The token refresh was rejected; the user has to log in again.
    SessionExpired,
    /// Non-2xx answer, carrying whatever messages the backend sent.
    Rejected(ValidationErrors),
    /// The request never got an answer.
    Transport(String),
    /// 2xx answer whose body could not be understood.
    Malformed(String),
}

/// Outcome of one helper call, plus a token renewed along the way.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiReply<T> {
    pub result: Result<T, ApiFailure>,
    pub renewed_token: Option<String>,
}

impl<T> ApiReply<T> {
    fn from_fetch(
        fetched: Result<Fetched, TransportError>,
        parse: impl FnOnce(&ApiResponse) -> Result<T, String>,
    ) -> Self {
        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(err) => {
                return Self {
                    result: Err(ApiFailure::Transport(err.to_string())),
                    renewed_token: None,
                };
            }
        };

        let result = if fetched.stage == FetchStage::RefreshRejected {
            Err(ApiFailure::SessionExpired)
        } else if !fetched.response.is_success() {
            Err(ApiFailure::Rejected(ValidationErrors::from_response_body(
                fetched.response.status,
                &fetched.response.body,
            )))
        } else {
            parse(&fetched.response).map_err(ApiFailure::Malformed)
        };

        Self {
            result,
            renewed_token: fetched.renewed_token,
        }
    }
}

fn parse_post(response: &ApiResponse) -> Result<Post, String> {
    response.json::<Post>().map_err(|e| e.to_string())
}

/// Execute a command synchronously on the calling worker and return the resulting message.
pub fn run_command(cmd: Command, transport: &dyn Transport) -> Msg {
    tracing::debug!(command = cmd.label(), "running command");
    match cmd {
        Command::RefreshSession => Msg::RefreshCompleted(refresh_access_token(transport)),
        Command::Logout { access_token } => {
            let request =
                ApiRequest::new(HttpMethod::Delete, endpoints::TOKENS).with_token(access_token);
            match fetch_data(transport, &request, false) {
                Ok(fetched) => {
                    tracing::info!(status = fetched.response.status, "logout request finished")
                }
                Err(err) => tracing::warn!(error = %err, "logout request failed"),
            }
            Msg::LogoutCompleted
        }
        Command::Authenticate { mode, form } => {
            let request = ApiRequest::new(HttpMethod::Post, mode.endpoint()).with_form(form);
            let reply = ApiReply::from_fetch(fetch_data(transport, &request, true), |response| {
                authenticated_session(mode, response)
            });
            Msg::AuthCompleted { mode, reply }
        }
        Command::LoadPosts { access_token } => {
            let request =
                ApiRequest::new(HttpMethod::Get, endpoints::POSTS).with_token(access_token);
            Msg::PostsLoaded(ApiReply::from_fetch(
                fetch_data(transport, &request, false),
                |response| parse_post_list(&response.body).map_err(|e| e.to_string()),
            ))
        }
        Command::SubmitPost {
            post_id,
            form,
            access_token,
        } => {
            let request = match &post_id {
                Some(id) => ApiRequest::new(HttpMethod::Put, endpoints::post(id)),
                None => ApiRequest::new(HttpMethod::Post, endpoints::POSTS),
            }
            .with_form(form)
            .with_token(access_token);
            Msg::PostSaved(ApiReply::from_fetch(
                fetch_data(transport, &request, false),
                parse_post,
            ))
        }
        Command::SetPublished {
            post,
            publish,
            access_token,
        } => {
            let request = ApiRequest::new(HttpMethod::Put, endpoints::post(&post.id))
                .with_form(republish_form(&post, publish))
                .with_token(access_token);
            let reply = ApiReply::from_fetch(fetch_data(transport, &request, false), |response| {
                // Some backends answer updates with a bare status; keep the local copy then.
                Ok(parse_post(response).unwrap_or_else(|_| Post {
                    is_published: publish,
                    ..post
                }))
            });
            Msg::PublishChanged(reply)
        }
        Command::DeletePost {
            post_id,
            access_token,
        } => {
            let request = ApiRequest::new(HttpMethod::Delete, endpoints::post(&post_id))
                .with_token(access_token);
            Msg::PostDeleted(ApiReply::from_fetch(
                fetch_data(transport, &request, false),
                |_| Ok(()),
            ))
        }
        Command::PickExportPath(post) => {
            let dialog = rfd::FileDialog::new()
                .set_title("Export post as HTML")
                .add_filter("HTML document", &["html"])
                .set_file_name(suggested_export_name(&post));
            match dialog.save_file() {
                Some(path) => Msg::ExportRequested {
                    post,
                    output: ensure_extension(path, "html"),
                },
                None => Msg::ExportCancelled,
            }
        }
        Command::ExportPost { post, output } => {
            let res = write_post_html(&output, &post).map(|_| output);
            Msg::ExportCompleted(res.map_err(|e| format!("{e:#}")))
        }
        Command::OpenUrl(url) => {
            Msg::UrlOpened(open::that(&url).map_err(|e| format!("Could not open {url}: {e}")))
        }
    }
}

/// Login/signup response to session. A signup answered without a token yields `None`.
fn authenticated_session(mode: AuthMode, response: &ApiResponse) -> Result<Option<Session>, String> {
    if mode == AuthMode::Signup && response.authorization.is_none() {
        return Ok(None);
    }
    Session::from_auth_response(response)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Silent session restore: `GET /auth/refresh`, falling back to `GET /auth/logout`.
///
/// Any failure clears the server-side refresh cookie via the logout endpoint;
/// the logout result itself is ignored.
pub fn refresh_access_token(transport: &dyn Transport) -> Result<Session, String> {
    let outcome = transport
        .send(&ApiRequest::new(HttpMethod::Get, endpoints::REFRESH))
        .map_err(|e| e.to_string())
        .and_then(|response| Session::from_auth_response(&response).map_err(|e| e.to_string()));

    match outcome {
        Ok(session) => {
            tracing::info!(username = %session.username, "session restored");
            Ok(session)
        }
        Err(reason) => {
            tracing::info!(%reason, "no valid refresh token; forcing logout");
            if let Err(err) = transport.send(&ApiRequest::new(HttpMethod::Get, endpoints::LOGOUT)) {
                tracing::debug!(error = %err, "forced logout request failed");
            }
            Err(reason)
        }
    }
}
