// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Top-level egui application shell: header, page routing, status bar and
//! the worker pool that executes commands against the backend.

pub mod components;

use std::sync::Arc;

use eframe::egui;

use crate::api::Transport;
use crate::config::REPOSITORY_URL;
use crate::mvu::{self, AppModel, Command, Msg, Route};
use crate::ui::components::{auth_form, post_detail, post_form, post_list};

/// Stateful egui application for managing blog posts.
pub struct CmsApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl CmsApp {
    /// Spawn `workers` command threads sharing `transport` and queue the session restore.
    pub fn new(ctx: &egui::Context, transport: Arc<dyn Transport>, workers: usize) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        for _ in 0..workers.max(1) {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let transport = Arc::clone(&transport);
            let ctx = ctx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd, transport.as_ref());
                    if msg_tx.send(msg).is_err() {
                        break;
                    }
                    ctx.request_repaint();
                }
            });
        }

        Self {
            model: AppModel::default(),
            inbox: vec![Msg::AppStarted],
            cmd_tx,
            msg_rx,
        }
    }

    /// Apply queued messages in arrival order and dispatch resulting commands.
    fn process_inbox(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                tracing::debug!(command = cmd.label(), "dispatching command");
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }
    }
}

impl eframe::App for CmsApp {
    /// Required by eframe 0.34; all rendering happens in `update`, which eframe
    /// still calls each frame before `ui`.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: drains worker replies, updates the model and
    /// renders header, status bar and the page for the current route.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);
        self.process_inbox();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            self.render_header(ui);
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            self.render_route(ctx, ui);
        });

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl CmsApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    /// Brand, repository link, greeting and account navigation.
    fn render_header(&mut self, ui: &mut egui::Ui) {
        use egui_phosphor::regular as icons;

        let logged_in = self.model.session.is_some();
        ui.horizontal(|ui| {
            let brand = ui.add(
                egui::Button::new(egui::RichText::new(".BLOG CMS").heading().strong())
                    .frame(false),
            );
            if brand.clicked() {
                let route = if logged_in { Route::Posts } else { Route::Login };
                self.inbox.push(Msg::Navigate(route));
            }
            if ui
                .button(icons::GITHUB_LOGO)
                .on_hover_text("Source repository")
                .clicked()
            {
                self.inbox.push(Msg::OpenUrl(REPOSITORY_URL.to_string()));
            }
            if let Some(username) = self.model.username() {
                ui.separator();
                ui.label(format!("Hello, {username}!"));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_switch(ui);
                ui.separator();
                if self.model.route == Route::Starting {
                    return;
                }
                if logged_in {
                    if ui.button(format!("{} Logout", icons::SIGN_OUT)).clicked() {
                        self.inbox.push(Msg::Logout);
                    }
                    if ui.button(format!("{} New Post", icons::NOTE_PENCIL)).clicked() {
                        self.inbox.push(Msg::NewPost);
                    }
                    if ui.button(format!("{} Posts", icons::LIST_BULLETS)).clicked() {
                        self.inbox.push(Msg::Navigate(Route::Posts));
                    }
                } else {
                    if ui.button("Sign up").clicked() {
                        self.inbox.push(Msg::Navigate(Route::Signup));
                    }
                    if ui.button("Login").clicked() {
                        self.inbox.push(Msg::Navigate(Route::Login));
                    }
                }
            });
        });
    }

    fn render_route(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        match &self.model.route {
            Route::Starting => {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    ui.add(egui::Spinner::new().size(24.0));
                    ui.label("Restoring session…");
                });
            }
            Route::Login | Route::Signup => {
                let msgs = auth_form::view(ui, &self.model.auth);
                self.inbox.extend(msgs.into_iter().map(Msg::Auth));
            }
            Route::Posts => {
                let msgs = post_list::view(ui, &self.model.posts);
                self.inbox.extend(msgs.into_iter().map(Msg::PostList));
            }
            Route::PostDetail => {
                let msgs = post_detail::view(ctx, ui, &self.model.detail);
                self.inbox.extend(msgs.into_iter().map(Msg::PostDetail));
            }
            Route::PostForm => {
                let msgs = post_form::view(ui, &self.model.form);
                self.inbox.extend(msgs.into_iter().map(Msg::PostForm));
            }
            Route::Error(message) => {
                let message = message.clone();
                self.render_error_page(ui, &message);
            }
        }
    }

    /// Generic failure page shown when a request never reached the backend.
    fn render_error_page(&mut self, ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.heading(format!("{} Something went wrong", egui_phosphor::regular::WARNING));
            ui.add_space(8.0);
            ui.label("The server could not be reached. Please try again later.");
            ui.label(
                egui::RichText::new(message)
                    .small()
                    .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(12.0);
            if ui.button("Back to posts").clicked() {
                self.inbox.push(Msg::Navigate(Route::Posts));
            }
        });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        let text = self.model.status.as_deref().unwrap_or_default();
        if text.is_empty() && self.model.pending_commands == 0 {
            return;
        }
        let display = if self.model.pending_commands > 0 {
            format!("{}  ({} working…)", text, self.model.pending_commands)
        } else {
            text.to_string()
        };
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(110)));
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0))
                    .on_hover_text(format!(
                        "{} request(s) running in background",
                        self.model.pending_commands
                    ));
            }
        });
    }
}
