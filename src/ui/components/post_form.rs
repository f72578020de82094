// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! New/edit post form.

use eframe::egui;
use url::Url;

use super::markdown::{self, MarkdownModel, MarkdownMsg};
use super::{error_list, toggle_switch};
use crate::api::FormData;
use crate::models::{Category, ObjectFit, Post, ValidationErrors};

#[derive(Clone, Debug, Default)]
pub struct PostFormModel {
    /// Id of the post being edited; `None` creates a new post.
    pub post_id: Option<String>,
    pub title: String,
    pub image_url: String,
    pub image_credit: String,
    pub object_fit: ObjectFit,
    pub category: Category,
    pub publish: bool,
    pub markdown: MarkdownModel,
    pub errors: ValidationErrors,
    pub submitting: bool,
}

impl PostFormModel {
    /// Pre-fill from an existing post with entities decoded for editing.
    pub fn from_post(post: &Post) -> Self {
        Self {
            post_id: Some(post.id.clone()),
            title: post.display_title(),
            image_url: post.image_url.clone().unwrap_or_default(),
            image_credit: post.image_credit.clone().unwrap_or_default(),
            object_fit: post.fit(),
            category: Category::from_value(&post.category).unwrap_or(Category::Other),
            publish: post.is_published,
            markdown: MarkdownModel::with_text(post.display_text()),
            errors: ValidationErrors::default(),
            submitting: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.post_id.is_some()
    }

    /// Form fields in submission order; `publish` is only present when checked.
    pub fn to_form(&self) -> FormData {
        let mut form = FormData::new()
            .with("title", self.title.trim())
            .with("image", self.image_url.trim())
            .with("credit", self.image_credit.trim())
            .with("objectfit", self.object_fit.as_str())
            .with("category", self.category.label())
            .with("text", self.markdown.text.as_str());
        if self.publish {
            form.push("publish", "on");
        }
        form
    }
}

/// Form payload for an existing post with only the publication flag changed.
pub fn republish_form(post: &Post, publish: bool) -> FormData {
    let mut model = PostFormModel::from_post(post);
    model.publish = publish;
    model.to_form()
}

/// Checks run before anything is sent.
pub fn local_errors(model: &PostFormModel) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    if model.title.trim().is_empty() {
        errors.merge(ValidationErrors::for_field("title", "Title is required"));
    }
    if model.markdown.text.trim().is_empty() {
        errors.merge(ValidationErrors::for_field("text", "Text is required"));
    }
    let image = model.image_url.trim();
    if !image.is_empty() {
        let valid = Url::parse(image)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            errors.merge(ValidationErrors::for_field(
                "image",
                "Image URL must be an http or https address",
            ));
        }
    }
    errors
}

#[derive(Clone, Debug)]
pub enum PostFormMsg {
    TitleChanged(String),
    ImageUrlChanged(String),
    ImageCreditChanged(String),
    SetObjectFit(ObjectFit),
    SetCategory(Category),
    SetPublish(bool),
    Markdown(MarkdownMsg),
    Submit,
    Cancel,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostFormEvent {
    Submit {
        post_id: Option<String>,
        form: FormData,
    },
    Cancel {
        post_id: Option<String>,
    },
}

pub fn update(model: &mut PostFormModel, msg: PostFormMsg) -> Option<PostFormEvent> {
    match msg {
        PostFormMsg::TitleChanged(text) => model.title = text,
        PostFormMsg::ImageUrlChanged(text) => model.image_url = text,
        PostFormMsg::ImageCreditChanged(text) => model.image_credit = text,
        PostFormMsg::SetObjectFit(fit) => model.object_fit = fit,
        PostFormMsg::SetCategory(category) => model.category = category,
        PostFormMsg::SetPublish(publish) => model.publish = publish,
        PostFormMsg::Markdown(msg) => markdown::update(&mut model.markdown, msg),
        PostFormMsg::Cancel => {
            return Some(PostFormEvent::Cancel {
                post_id: model.post_id.clone(),
            });
        }
        PostFormMsg::Submit => {
            if model.submitting {
                return None;
            }
            let errors = local_errors(model);
            if !errors.is_empty() {
                model.errors = errors;
                return None;
            }
            model.errors = ValidationErrors::default();
            model.submitting = true;
            return Some(PostFormEvent::Submit {
                post_id: model.post_id.clone(),
                form: model.to_form(),
            });
        }
    }
    None
}

pub fn view(ui: &mut egui::Ui, model: &PostFormModel) -> Vec<PostFormMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.heading(if model.is_edit() { "Edit post" } else { "New post" });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if model.is_edit() { "Save changes" } else { "Create post" };
            if ui
                .add_enabled(
                    !model.submitting,
                    egui::Button::new(format!("{} {label}", egui_phosphor::regular::FLOPPY_DISK)),
                )
                .clicked()
            {
                msgs.push(PostFormMsg::Submit);
            }
            if ui.button("Cancel").clicked() {
                msgs.push(PostFormMsg::Cancel);
            }
            if model.submitting {
                ui.add(egui::Spinner::new());
            }
        });
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            error_list::view(ui, &model.errors);
            ui.add_space(4.0);

            ui.label("Title");
            let mut title = model.title.clone();
            if ui
                .add(
                    egui::TextEdit::singleline(&mut title)
                        .hint_text("Post title")
                        .desired_width(f32::INFINITY),
                )
                .changed()
            {
                msgs.push(PostFormMsg::TitleChanged(title));
            }
            ui.add_space(12.0);

            render_meta_group(ui, model, &mut msgs);
            ui.add_space(12.0);

            ui.label("Text");
            ui.label(
                egui::RichText::new("Use Markdown to format text.")
                    .small()
                    .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(4.0);
            let md_msgs = markdown::view(&model.markdown, ui);
            msgs.extend(md_msgs.into_iter().map(PostFormMsg::Markdown));
        });

    msgs
}

/// Image, category and publication controls.
fn render_meta_group(ui: &mut egui::Ui, model: &PostFormModel, msgs: &mut Vec<PostFormMsg>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        egui::Grid::new("post_meta_grid")
            .num_columns(2)
            .spacing(egui::vec2(8.0, 10.0))
            .min_col_width(120.0)
            .show(ui, |ui| {
                ui.label("Image URL");
                let mut image = model.image_url.clone();
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut image)
                            .hint_text("https://…")
                            .desired_width(f32::INFINITY),
                    )
                    .changed()
                {
                    msgs.push(PostFormMsg::ImageUrlChanged(image));
                }
                ui.end_row();

                ui.label("Image credit");
                let mut credit = model.image_credit.clone();
                if ui
                    .add(
                        egui::TextEdit::singleline(&mut credit)
                            .hint_text("e.g., Unsplash")
                            .desired_width(f32::INFINITY),
                    )
                    .changed()
                {
                    msgs.push(PostFormMsg::ImageCreditChanged(credit));
                }
                ui.end_row();

                ui.label("Image fit");
                ui.horizontal(|ui| {
                    for fit in ObjectFit::ALL {
                        let label = match fit {
                            ObjectFit::Contain => "Contain",
                            ObjectFit::Cover => "Cover",
                        };
                        if ui
                            .add(egui::Button::new(label).selected(model.object_fit == fit))
                            .clicked()
                        {
                            msgs.push(PostFormMsg::SetObjectFit(fit));
                        }
                    }
                });
                ui.end_row();

                ui.label("Category");
                egui::ComboBox::from_id_salt("post_category")
                    .selected_text(model.category.label())
                    .show_ui(ui, |ui| {
                        for category in Category::ALL {
                            if ui
                                .selectable_label(model.category == category, category.label())
                                .clicked()
                            {
                                msgs.push(PostFormMsg::SetCategory(category));
                            }
                        }
                    });
                ui.end_row();

                ui.label("Publish");
                let mut publish = model.publish;
                if toggle_switch(ui, "Visible on the blog", &mut publish).changed() {
                    msgs.push(PostFormMsg::SetPublish(publish));
                }
                ui.end_row();
            });
    });
}
