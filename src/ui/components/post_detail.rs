// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Single post view with edit, publish, delete and export actions.

use eframe::egui;

use super::post_view;
use crate::models::Post;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostDetailModel {
    pub post: Option<Post>,
    pub confirm_delete: bool,
    /// A publish toggle or delete is in flight.
    pub busy: bool,
}

impl PostDetailModel {
    pub fn showing(post: Post) -> Self {
        Self {
            post: Some(post),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostDetailMsg {
    Edit,
    TogglePublish,
    RequestDelete,
    CancelDelete,
    ConfirmDelete,
    Export,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PostDetailEvent {
    Edit(Post),
    SetPublished { post: Post, publish: bool },
    Delete(Post),
    Export(Post),
}

pub fn update(model: &mut PostDetailModel, msg: PostDetailMsg) -> Option<PostDetailEvent> {
    let post = model.post.clone()?;
    match msg {
        PostDetailMsg::Edit => Some(PostDetailEvent::Edit(post)),
        PostDetailMsg::Export => Some(PostDetailEvent::Export(post)),
        PostDetailMsg::RequestDelete => {
            model.confirm_delete = true;
            None
        }
        PostDetailMsg::CancelDelete => {
            model.confirm_delete = false;
            None
        }
        PostDetailMsg::ConfirmDelete => {
            model.confirm_delete = false;
            if model.busy {
                return None;
            }
            model.busy = true;
            Some(PostDetailEvent::Delete(post))
        }
        PostDetailMsg::TogglePublish => {
            if model.busy {
                return None;
            }
            model.busy = true;
            let publish = !post.is_published;
            Some(PostDetailEvent::SetPublished { post, publish })
        }
    }
}

pub fn view(ctx: &egui::Context, ui: &mut egui::Ui, model: &PostDetailModel) -> Vec<PostDetailMsg> {
    let mut msgs = Vec::new();
    let Some(post) = &model.post else {
        ui.weak("No post selected.");
        return msgs;
    };

    ui.horizontal(|ui| {
        use egui_phosphor::regular as icons;

        if ui.button(format!("{} Edit", icons::PENCIL_SIMPLE)).clicked() {
            msgs.push(PostDetailMsg::Edit);
        }
        let publish_label = if post.is_published {
            format!("{} Unpublish", icons::EYE_SLASH)
        } else {
            format!("{} Publish", icons::EYE)
        };
        if ui
            .add_enabled(!model.busy, egui::Button::new(publish_label))
            .clicked()
        {
            msgs.push(PostDetailMsg::TogglePublish);
        }
        if ui
            .button(format!("{} Export HTML", icons::EXPORT))
            .on_hover_text("Save this post as a standalone HTML file")
            .clicked()
        {
            msgs.push(PostDetailMsg::Export);
        }
        if ui
            .add_enabled(
                !model.busy,
                egui::Button::new(
                    egui::RichText::new(format!("{} Delete", icons::TRASH))
                        .color(ui.visuals().error_fg_color),
                ),
            )
            .clicked()
        {
            msgs.push(PostDetailMsg::RequestDelete);
        }
        if model.busy {
            ui.add(egui::Spinner::new());
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| post_view::post(ui, post));

    if model.confirm_delete {
        egui::Window::new("Delete post")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Delete \"{}\"? This cannot be undone.",
                    post.display_title()
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        msgs.push(PostDetailMsg::ConfirmDelete);
                    }
                    if ui.button("Cancel").clicked() {
                        msgs.push(PostDetailMsg::CancelDelete);
                    }
                });
            });
    }

    msgs
}
