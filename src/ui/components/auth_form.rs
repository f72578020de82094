// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Login and signup form.

use eframe::egui;

use super::error_list;
use crate::api::{FormData, endpoints};
use crate::models::ValidationErrors;

/// Which of the two account forms is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Log in",
            AuthMode::Signup => "Sign up",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            AuthMode::Login => endpoints::LOGIN,
            AuthMode::Signup => endpoints::SIGNUP,
        }
    }

    fn other(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthFormModel {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    /// Password confirmation, signup only.
    pub confirm: String,
    pub errors: ValidationErrors,
    /// A request is in flight; further submits are ignored.
    pub submitting: bool,
}

impl AuthFormModel {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthFormMsg {
    UsernameChanged(String),
    PasswordChanged(String),
    ConfirmChanged(String),
    Submit,
    SwitchMode,
}

/// Outcomes the parent has to act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthFormEvent {
    Submit { mode: AuthMode, form: FormData },
    SwitchMode(AuthMode),
}

pub fn update(model: &mut AuthFormModel, msg: AuthFormMsg) -> Option<AuthFormEvent> {
    match msg {
        AuthFormMsg::UsernameChanged(text) => model.username = text,
        AuthFormMsg::PasswordChanged(text) => model.password = text,
        AuthFormMsg::ConfirmChanged(text) => model.confirm = text,
        AuthFormMsg::SwitchMode => return Some(AuthFormEvent::SwitchMode(model.mode.other())),
        AuthFormMsg::Submit => {
            if model.submitting {
                return None;
            }
            let missing = missing_fields(model);
            if !missing.is_empty() {
                model.errors = missing;
                return None;
            }
            model.errors = ValidationErrors::default();
            model.submitting = true;
            return Some(AuthFormEvent::Submit {
                mode: model.mode,
                form: form_data(model),
            });
        }
    }
    None
}

/// Required-field checks mirroring the inputs' `required` attribute.
fn missing_fields(model: &AuthFormModel) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if model.username.trim().is_empty() {
        errors.merge(ValidationErrors::for_field("username", "Username is required"));
    }
    if model.password.is_empty() {
        errors.merge(ValidationErrors::for_field("password", "Password is required"));
    }
    if model.mode == AuthMode::Signup && model.confirm.is_empty() {
        errors.merge(ValidationErrors::for_field("confirm", "Please confirm your password"));
    }
    errors
}

fn form_data(model: &AuthFormModel) -> FormData {
    let form = FormData::new()
        .with("username", model.username.trim())
        .with("password", model.password.as_str());
    match model.mode {
        AuthMode::Login => form,
        AuthMode::Signup => form.with("confirm", model.confirm.as_str()),
    }
}

pub fn view(ui: &mut egui::Ui, model: &AuthFormModel) -> Vec<AuthFormMsg> {
    let mut msgs = Vec::new();

    ui.vertical_centered(|ui| {
        ui.set_max_width(360.0);
        egui::Frame::group(ui.style()).inner_margin(16.0).show(ui, |ui| {
            ui.heading(model.mode.title());
            ui.add_space(8.0);
            error_list::view(ui, &model.errors);
            ui.add_space(4.0);

            let mut enter = false;
            egui::Grid::new("auth_form_grid")
                .num_columns(2)
                .spacing(egui::vec2(8.0, 8.0))
                .show(ui, |ui| {
                    ui.label("Username");
                    let mut username = model.username.clone();
                    let resp = ui.add(egui::TextEdit::singleline(&mut username));
                    if resp.changed() {
                        msgs.push(AuthFormMsg::UsernameChanged(username));
                    }
                    ui.end_row();

                    ui.label("Password");
                    let mut password = model.password.clone();
                    let resp = ui.add(egui::TextEdit::singleline(&mut password).password(true));
                    if resp.changed() {
                        msgs.push(AuthFormMsg::PasswordChanged(password));
                    }
                    enter |= resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    ui.end_row();

                    if model.mode == AuthMode::Signup {
                        ui.label("Confirm password");
                        let mut confirm = model.confirm.clone();
                        let resp = ui.add(egui::TextEdit::singleline(&mut confirm).password(true));
                        if resp.changed() {
                            msgs.push(AuthFormMsg::ConfirmChanged(confirm));
                        }
                        enter |= resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let submit = ui.add_enabled(
                    !model.submitting,
                    egui::Button::new(format!(
                        "{} {}",
                        egui_phosphor::regular::SIGN_IN,
                        model.mode.title()
                    )),
                );
                if submit.clicked() || enter {
                    msgs.push(AuthFormMsg::Submit);
                }
                if model.submitting {
                    ui.add(egui::Spinner::new());
                }
            });

            ui.add_space(6.0);
            let prompt = match model.mode {
                AuthMode::Login => "No account yet? Sign up",
                AuthMode::Signup => "Already registered? Log in",
            };
            if ui.link(prompt).clicked() {
                msgs.push(AuthFormMsg::SwitchMode);
            }
        });
    });

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_with_missing_fields_sets_errors_and_emits_nothing() {
        let mut model = AuthFormModel::new(AuthMode::Signup);

        let event = update(&mut model, AuthFormMsg::Submit);

        assert!(event.is_none());
        assert!(!model.submitting);
        assert_eq!(model.errors.items().len(), 3);
    }

    #[test]
    fn login_submit_builds_trimmed_form() {
        let mut model = AuthFormModel::new(AuthMode::Login);
        update(&mut model, AuthFormMsg::UsernameChanged("  mao ".into()));
        update(&mut model, AuthFormMsg::PasswordChanged("secret".into()));

        let event = update(&mut model, AuthFormMsg::Submit);

        match event {
            Some(AuthFormEvent::Submit { mode, form }) => {
                assert_eq!(mode, AuthMode::Login);
                assert_eq!(form.get("username"), Some("mao"));
                assert_eq!(form.get("password"), Some("secret"));
                assert_eq!(form.get("confirm"), None);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(model.submitting);
        assert!(model.errors.is_empty());
    }

    #[test]
    fn second_submit_while_in_flight_is_ignored() {
        let mut model = AuthFormModel::new(AuthMode::Login);
        model.username = "mao".into();
        model.password = "pw".into();

        assert!(update(&mut model, AuthFormMsg::Submit).is_some());
        assert!(update(&mut model, AuthFormMsg::Submit).is_none());
    }

    #[test]
    fn switch_mode_points_at_the_other_form() {
        let mut model = AuthFormModel::new(AuthMode::Login);

        assert_eq!(
            update(&mut model, AuthFormMsg::SwitchMode),
            Some(AuthFormEvent::SwitchMode(AuthMode::Signup))
        );
    }
}
