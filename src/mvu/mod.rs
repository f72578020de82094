// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Root Model-View-Update kernel: session, routing, page state and the commands they issue.

mod command;

use std::path::PathBuf;

pub use command::{ApiFailure, ApiReply, Command, run_command};

use crate::models::{Post, Session, ValidationErrors};
use crate::ui::components::auth_form::{self, AuthFormEvent, AuthFormModel, AuthFormMsg, AuthMode};
use crate::ui::components::post_detail::{self, PostDetailEvent, PostDetailModel, PostDetailMsg};
use crate::ui::components::post_form::{self, PostFormEvent, PostFormModel, PostFormMsg};
use crate::ui::components::post_list::{self, PostListEvent, PostListModel, PostListMsg};

/// Which page the central panel shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Route {
    /// Waiting for the silent session restore after launch.
    #[default]
    Starting,
    Login,
    Signup,
    Posts,
    PostDetail,
    PostForm,
    /// Generic failure page with the message to show.
    Error(String),
}

impl Route {
    /// Pages that are only reachable with a session.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Posts | Route::PostDetail | Route::PostForm)
    }
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Logged-in user; `None` when logged out.
    pub session: Option<Session>,
    pub route: Route,
    pub auth: AuthFormModel,
    pub posts: PostListModel,
    pub detail: PostDetailModel,
    pub form: PostFormModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    fn access_token(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.access_token.clone())
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    AppStarted,
    RefreshCompleted(Result<Session, String>),
    Navigate(Route),
    NewPost,
    Logout,
    LogoutCompleted,
    Auth(AuthFormMsg),
    AuthCompleted {
        mode: AuthMode,
        reply: ApiReply<Option<Session>>,
    },
    PostList(PostListMsg),
    PostsLoaded(ApiReply<Vec<Post>>),
    PostDetail(PostDetailMsg),
    PostForm(PostFormMsg),
    PostSaved(ApiReply<Post>),
    PublishChanged(ApiReply<Post>),
    PostDeleted(ApiReply<()>),
    ExportRequested { post: Post, output: PathBuf },
    ExportCancelled,
    ExportCompleted(Result<PathBuf, String>),
    OpenUrl(String),
    UrlOpened(Result<(), String>),
    DismissError,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::AppStarted => {
            model.route = Route::Starting;
            cmds.push(Command::RefreshSession);
        }
        Msg::RefreshCompleted(Ok(session)) => redirect_to_posts(model, Some(session), cmds),
        Msg::RefreshCompleted(Err(reason)) => {
            tracing::debug!(%reason, "session restore failed");
            redirect_to_login(model);
        }
        Msg::Navigate(route) => navigate(model, route, cmds),
        Msg::NewPost => {
            model.form = PostFormModel::default();
            navigate(model, Route::PostForm, cmds);
        }
        Msg::Logout => {
            model.status = Some("Logging out…".into());
            cmds.push(Command::Logout {
                access_token: model.access_token(),
            });
        }
        Msg::LogoutCompleted => {
            redirect_to_login(model);
            surface_event(model, "Logged out.".into(), false);
        }
        Msg::Auth(m) => match auth_form::update(&mut model.auth, m) {
            Some(AuthFormEvent::Submit { mode, form }) => {
                cmds.push(Command::Authenticate { mode, form })
            }
            Some(AuthFormEvent::SwitchMode(mode)) => navigate(model, auth_route(mode), cmds),
            None => {}
        },
        Msg::AuthCompleted { mode, reply } => {
            model.auth.submitting = false;
            match reply.result {
                Ok(Some(session)) => {
                    surface_event(model, format!("Hello, {}!", session.username), false);
                    redirect_to_posts(model, Some(session), cmds);
                }
                Ok(None) => {
                    navigate(model, Route::Login, cmds);
                    surface_event(model, "Account created. Please log in.".into(), false);
                }
                Err(ApiFailure::Rejected(errors)) => {
                    tracing::info!(?mode, "authentication rejected");
                    model.auth.errors = errors;
                }
                Err(ApiFailure::Malformed(message)) => {
                    model.auth.errors = ValidationErrors::general(message);
                }
                Err(ApiFailure::Transport(message)) => show_error_page(model, message),
                Err(ApiFailure::SessionExpired) => redirect_to_login(model),
            }
        }
        Msg::PostList(m) => match post_list::update(&mut model.posts, m) {
            Some(PostListEvent::Open(post)) => {
                model.detail = PostDetailModel::showing(post);
                navigate(model, Route::PostDetail, cmds);
            }
            Some(PostListEvent::Reload) => navigate(model, Route::Posts, cmds),
            None => {}
        },
        Msg::PostsLoaded(reply) => {
            if model.session.is_none() {
                tracing::debug!("post list arrived after logout; dropped");
                return;
            }
            renew_token(model, reply.renewed_token);
            model.posts.loading = false;
            match reply.result {
                Ok(posts) => {
                    model.posts.error = None;
                    model.status = Some(format!("Loaded {} post(s).", posts.len()));
                    model.posts.posts = posts;
                }
                Err(ApiFailure::SessionExpired) => redirect_to_login(model),
                Err(ApiFailure::Rejected(errors)) => model.posts.error = Some(summary(&errors)),
                Err(ApiFailure::Transport(message)) | Err(ApiFailure::Malformed(message)) => {
                    model.posts.error = Some(message)
                }
            }
        }
        Msg::PostDetail(m) => match post_detail::update(&mut model.detail, m) {
            Some(PostDetailEvent::Edit(post)) => {
                model.form = PostFormModel::from_post(&post);
                navigate(model, Route::PostForm, cmds);
            }
            Some(PostDetailEvent::SetPublished { post, publish }) => {
                cmds.push(Command::SetPublished {
                    post,
                    publish,
                    access_token: model.access_token(),
                })
            }
            Some(PostDetailEvent::Delete(post)) => cmds.push(Command::DeletePost {
                post_id: post.id,
                access_token: model.access_token(),
            }),
            Some(PostDetailEvent::Export(post)) => cmds.push(Command::PickExportPath(post)),
            None => {}
        },
        Msg::PostForm(m) => match post_form::update(&mut model.form, m) {
            Some(PostFormEvent::Submit { post_id, form }) => cmds.push(Command::SubmitPost {
                post_id,
                form,
                access_token: model.access_token(),
            }),
            Some(PostFormEvent::Cancel { post_id }) => {
                let showing_same = post_id.is_some()
                    && model.detail.post.as_ref().map(|p| &p.id) == post_id.as_ref();
                let route = if showing_same {
                    Route::PostDetail
                } else {
                    Route::Posts
                };
                navigate(model, route, cmds);
            }
            None => {}
        },
        Msg::PostSaved(reply) => {
            renew_token(model, reply.renewed_token);
            model.form.submitting = false;
            if model.route != Route::PostForm {
                tracing::debug!(route = ?model.route, "save reply arrived after leaving the form");
                return;
            }
            match reply.result {
                Ok(post) => {
                    tracing::info!(post_id = %post.id, "post saved");
                    model.detail = PostDetailModel::showing(post);
                    navigate(model, Route::PostDetail, cmds);
                    surface_event(model, "Post saved.".into(), false);
                }
                Err(ApiFailure::Rejected(errors)) => model.form.errors = errors,
                Err(ApiFailure::SessionExpired) => redirect_to_login(model),
                Err(ApiFailure::Transport(message)) => show_error_page(model, message),
                Err(ApiFailure::Malformed(message)) => {
                    surface_event(model, format!("Unexpected response from server:\n\n{message}"), true)
                }
            }
        }
        Msg::PublishChanged(reply) => {
            renew_token(model, reply.renewed_token);
            model.detail.busy = false;
            match reply.result {
                Ok(post) => {
                    let state = if post.is_published {
                        "published"
                    } else {
                        "unpublished"
                    };
                    surface_event(model, format!("Post {state}."), false);
                    model.detail.post = Some(post);
                }
                Err(failure) => request_failed(model, failure, "update the post"),
            }
        }
        Msg::PostDeleted(reply) => {
            renew_token(model, reply.renewed_token);
            model.detail.busy = false;
            match reply.result {
                Ok(()) => {
                    model.detail = PostDetailModel::default();
                    redirect_to_posts(model, None, cmds);
                    surface_event(model, "Post deleted.".into(), false);
                }
                Err(failure) => request_failed(model, failure, "delete the post"),
            }
        }
        Msg::ExportRequested { post, output } => cmds.push(Command::ExportPost { post, output }),
        Msg::ExportCancelled => surface_event(model, "Export cancelled.".into(), false),
        Msg::ExportCompleted(result) => match result {
            Ok(path) => surface_event(model, format!("Post exported: {}", path.display()), false),
            Err(err) => surface_event(model, format!("Failed to export post:\n\n{err}"), true),
        },
        Msg::OpenUrl(url) => cmds.push(Command::OpenUrl(url)),
        Msg::UrlOpened(Ok(())) => {}
        Msg::UrlOpened(Err(err)) => surface_event(model, err, true),
        Msg::DismissError => model.error = None,
    }
}

/// Switch pages, bouncing to login when the target needs a session.
fn navigate(model: &mut AppModel, route: Route, cmds: &mut Vec<Command>) {
    if route.requires_auth() && model.session.is_none() {
        tracing::debug!(?route, "no session; redirecting to login");
        redirect_to_login(model);
        return;
    }

    match &route {
        Route::Posts => {
            model.posts.loading = true;
            model.posts.error = None;
            cmds.push(Command::LoadPosts {
                access_token: model.access_token(),
            });
        }
        Route::Login => model.auth = AuthFormModel::new(AuthMode::Login),
        Route::Signup => model.auth = AuthFormModel::new(AuthMode::Signup),
        _ => {}
    }
    model.route = route;
}

/// Drop the session and any user data, then show the login page.
pub fn redirect_to_login(model: &mut AppModel) {
    if model.session.take().is_some() {
        tracing::info!("session cleared");
    }
    model.posts = PostListModel::default();
    model.detail = PostDetailModel::default();
    model.form = PostFormModel::default();
    model.auth = AuthFormModel::new(AuthMode::Login);
    model.route = Route::Login;
}

/// Optionally install `session`, then open the post list (which loads it).
pub fn redirect_to_posts(model: &mut AppModel, session: Option<Session>, cmds: &mut Vec<Command>) {
    if let Some(session) = session {
        tracing::info!(username = %session.username, "session established");
        model.session = Some(session);
    }
    navigate(model, Route::Posts, cmds);
}

fn auth_route(mode: AuthMode) -> Route {
    match mode {
        AuthMode::Login => Route::Login,
        AuthMode::Signup => Route::Signup,
    }
}

fn renew_token(model: &mut AppModel, token: Option<String>) {
    if let (Some(session), Some(token)) = (model.session.as_mut(), token) {
        tracing::debug!("access token renewed");
        session.renew(token);
    }
}

fn show_error_page(model: &mut AppModel, message: String) {
    tracing::warn!(%message, "request failed");
    model.route = Route::Error(message);
}

/// Shared handling for detail-page actions that did not go through.
fn request_failed(model: &mut AppModel, failure: ApiFailure, action: &str) {
    match failure {
        ApiFailure::SessionExpired => redirect_to_login(model),
        ApiFailure::Transport(message) => show_error_page(model, message),
        ApiFailure::Rejected(errors) => {
            surface_event(model, format!("Could not {action}:\n\n{}", summary(&errors)), true)
        }
        ApiFailure::Malformed(message) => {
            surface_event(model, format!("Could not {action}:\n\n{message}"), true)
        }
    }
}

fn summary(errors: &ValidationErrors) -> String {
    errors
        .items()
        .iter()
        .map(|item| item.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::api::testing::{ScriptedTransport, response};
    use crate::api::{FormData, HttpMethod, endpoints};
    use crate::models::Author;

    fn session() -> Session {
        Session {
            username: "mao".into(),
            access_token: Some("Bearer abc".into()),
        }
    }

    fn logged_in() -> AppModel {
        let mut model = AppModel::default();
        model.session = Some(session());
        model
    }

    fn post() -> Post {
        Post {
            id: "p1".into(),
            title: "Hello".into(),
            text: "Body".into(),
            category: "CSS".into(),
            image_url: None,
            image_credit: None,
            object_fit: None,
            is_published: false,
            timestamp: "2023-09-04T12:00:00Z".into(),
            author: Author { name: "mao".into() },
        }
    }

    #[test]
    fn start_requests_silent_refresh() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::AppStarted, &mut cmds);

        assert_eq!(cmds, vec![Command::RefreshSession]);
        assert_eq!(model.route, Route::Starting);
    }

    #[test]
    fn restored_session_opens_post_list_and_loads_it() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::RefreshCompleted(Ok(session())), &mut cmds);

        assert_eq!(model.route, Route::Posts);
        assert_eq!(model.username(), Some("mao"));
        assert!(model.posts.loading);
        assert_eq!(
            cmds,
            vec![Command::LoadPosts {
                access_token: Some("Bearer abc".into())
            }]
        );
    }

    #[test]
    fn unauthenticated_visitor_cannot_reach_post_form() {
        for msg in [Msg::NewPost, Msg::Navigate(Route::PostForm)] {
            let mut model = AppModel::default();
            let mut cmds = Vec::new();

            update(&mut model, msg, &mut cmds);

            assert_eq!(model.route, Route::Login);
            assert!(cmds.is_empty());
        }
    }

    #[test]
    fn unauthenticated_edit_redirects_to_login() {
        let mut model = AppModel::default();
        model.detail = PostDetailModel::showing(post());
        let mut cmds = Vec::new();

        update(&mut model, Msg::PostDetail(PostDetailMsg::Edit), &mut cmds);

        assert_eq!(model.route, Route::Login);
        assert!(model.form.post_id.is_none());
    }

    #[test]
    fn failed_refresh_clears_session_and_redirects() {
        let mut model = logged_in();
        model.route = Route::PostDetail;
        model.detail = PostDetailModel::showing(post());
        let mut cmds = Vec::new();

        update(&mut model, Msg::RefreshCompleted(Err("401".into())), &mut cmds);

        assert!(model.session.is_none());
        assert_eq!(model.route, Route::Login);
        assert!(model.detail.post.is_none());
        assert!(cmds.is_empty());
    }

    #[test]
    fn rejected_token_refresh_during_request_logs_out() {
        let mut model = logged_in();
        model.route = Route::Posts;
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::PostsLoaded(ApiReply {
                result: Err(ApiFailure::SessionExpired),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert!(model.session.is_none());
        assert_eq!(model.route, Route::Login);
    }

    #[test]
    fn list_load_retries_once_and_stores_renewed_token() {
        let transport = ScriptedTransport::new(vec![
            Ok(response(401, "")),
            Ok(response(200, "").with_authorization("Bearer fresh")),
            Ok(response(200, "[]")),
        ]);
        let mut model = logged_in();
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Route::Posts), &mut cmds);

        let msg = run_command(cmds.remove(0), &transport);
        update(&mut model, msg, &mut cmds);

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].method, HttpMethod::Put);
        assert_eq!(calls[1].endpoint, endpoints::TOKENS);
        assert_eq!(calls[2].access_token.as_deref(), Some("Bearer fresh"));
        assert_eq!(
            model.session.and_then(|s| s.access_token).as_deref(),
            Some("Bearer fresh")
        );
        assert!(!model.posts.loading);
        assert!(model.posts.error.is_none());
    }

    #[test]
    fn validation_errors_keep_the_form_open() {
        let mut model = logged_in();
        let mut cmds = Vec::new();
        update(&mut model, Msg::NewPost, &mut cmds);
        update(
            &mut model,
            Msg::PostForm(PostFormMsg::TitleChanged("Draft".into())),
            &mut cmds,
        );
        update(
            &mut model,
            Msg::PostForm(PostFormMsg::Markdown(
                crate::ui::components::markdown::MarkdownMsg::SetText("Body".into()),
            )),
            &mut cmds,
        );
        update(&mut model, Msg::PostForm(PostFormMsg::Submit), &mut cmds);
        assert!(matches!(cmds.last(), Some(Command::SubmitPost { post_id: None, .. })));

        let errors = ValidationErrors::for_field("title", "Title already exists");
        update(
            &mut model,
            Msg::PostSaved(ApiReply {
                result: Err(ApiFailure::Rejected(errors.clone())),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert_eq!(model.route, Route::PostForm);
        assert_eq!(model.form.errors, errors);
        assert_eq!(model.form.title, "Draft");
        assert!(!model.form.submitting);
    }

    #[test]
    fn saved_post_opens_its_detail_view() {
        let mut model = logged_in();
        model.route = Route::PostForm;
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::PostSaved(ApiReply {
                result: Ok(post()),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert_eq!(model.route, Route::PostDetail);
        assert_eq!(model.detail.post.as_ref().map(|p| p.id.as_str()), Some("p1"));
    }

    #[test]
    fn post_list_arriving_after_logout_is_dropped() {
        let mut model = logged_in();
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Route::Posts), &mut cmds);
        update(&mut model, Msg::LogoutCompleted, &mut cmds);

        update(
            &mut model,
            Msg::PostsLoaded(ApiReply {
                result: Ok(vec![post()]),
                renewed_token: Some("Bearer stale".into()),
            }),
            &mut cmds,
        );

        assert_eq!(model.route, Route::Login);
        assert!(model.session.is_none());
        assert!(model.posts.posts.is_empty());
    }

    #[test]
    fn save_reply_after_cancel_keeps_current_page() {
        let mut model = logged_in();
        let mut cmds = Vec::new();
        update(&mut model, Msg::NewPost, &mut cmds);
        model.form.submitting = true;
        update(&mut model, Msg::PostForm(PostFormMsg::Cancel), &mut cmds);
        assert_eq!(model.route, Route::Posts);
        cmds.clear();

        update(
            &mut model,
            Msg::PostSaved(ApiReply {
                result: Ok(post()),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert_eq!(model.route, Route::Posts);
        assert!(model.detail.post.is_none());
        assert!(cmds.is_empty());
    }

    #[test]
    fn transport_failure_on_submit_shows_error_page() {
        let mut model = logged_in();
        model.route = Route::PostForm;
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::PostSaved(ApiReply {
                result: Err(ApiFailure::Transport("connection refused".into())),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert_eq!(model.route, Route::Error("connection refused".into()));
    }

    #[test]
    fn logout_always_ends_on_login() {
        let mut model = logged_in();
        model.route = Route::Posts;
        let mut cmds = Vec::new();

        update(&mut model, Msg::Logout, &mut cmds);
        assert_eq!(
            cmds,
            vec![Command::Logout {
                access_token: Some("Bearer abc".into())
            }]
        );

        update(&mut model, Msg::LogoutCompleted, &mut cmds);
        assert!(model.session.is_none());
        assert_eq!(model.route, Route::Login);
    }

    #[test]
    fn signup_without_session_lands_on_login_with_status() {
        let mut model = AppModel::default();
        model.route = Route::Signup;
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::AuthCompleted {
                mode: AuthMode::Signup,
                reply: ApiReply {
                    result: Ok(None),
                    renewed_token: None,
                },
            },
            &mut cmds,
        );

        assert_eq!(model.route, Route::Login);
        assert_eq!(model.auth.mode, AuthMode::Login);
        assert!(model.status.as_deref().unwrap_or_default().contains("log in"));
    }

    #[test]
    fn login_submit_issues_authenticate_command() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(&mut model, Msg::Navigate(Route::Login), &mut cmds);
        update(&mut model, Msg::Auth(AuthFormMsg::UsernameChanged("mao".into())), &mut cmds);
        update(&mut model, Msg::Auth(AuthFormMsg::PasswordChanged("pw".into())), &mut cmds);

        update(&mut model, Msg::Auth(AuthFormMsg::Submit), &mut cmds);

        assert_eq!(
            cmds,
            vec![Command::Authenticate {
                mode: AuthMode::Login,
                form: FormData::new().with("username", "mao").with("password", "pw"),
            }]
        );
    }

    #[test]
    fn publish_toggle_updates_detail() {
        let mut model = logged_in();
        model.detail = PostDetailModel::showing(post());
        let mut cmds = Vec::new();

        update(&mut model, Msg::PostDetail(PostDetailMsg::TogglePublish), &mut cmds);
        assert!(matches!(
            cmds.as_slice(),
            [Command::SetPublished { publish: true, .. }]
        ));

        let mut published = post();
        published.is_published = true;
        update(
            &mut model,
            Msg::PublishChanged(ApiReply {
                result: Ok(published),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert!(!model.detail.busy);
        assert!(model.detail.post.as_ref().is_some_and(|p| p.is_published));
        assert_eq!(model.status.as_deref(), Some("Post published."));
    }

    #[test]
    fn deleted_post_returns_to_list() {
        let mut model = logged_in();
        model.route = Route::PostDetail;
        model.detail = PostDetailModel::showing(post());
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::PostDeleted(ApiReply {
                result: Ok(()),
                renewed_token: None,
            }),
            &mut cmds,
        );

        assert_eq!(model.route, Route::Posts);
        assert!(model.detail.post.is_none());
        assert!(matches!(cmds.as_slice(), [Command::LoadPosts { .. }]));
    }

    #[test]
    fn export_failure_surfaces_error() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::ExportCompleted(Err("disk full".into())), &mut cmds);

        assert!(model.error.as_deref().unwrap_or_default().contains("disk full"));
        update(&mut model, Msg::DismissError, &mut cmds);
        assert!(model.error.is_none());
    }
}
