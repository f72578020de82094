// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Read-only rendering of markdown blocks and full posts.

use eframe::egui;
use egui_extras::syntax_highlighting::{CodeTheme, code_view_ui};

use crate::logic::markdown::{Block, Span, render_blocks};
use crate::models::{ObjectFit, Post};

const IMAGE_MAX_HEIGHT: f32 = 288.0;

/// Image frame, credit, title, byline and body for one post.
pub fn post(ui: &mut egui::Ui, post: &Post) {
    if let Some(url) = post.image() {
        header_image(ui, url, post.fit());
        if let Some(credit) = post.credit() {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                ui.label(
                    egui::RichText::new(format!("Image from {credit}"))
                        .small()
                        .italics(),
                );
            });
        }
        ui.add_space(8.0);
    }

    ui.vertical_centered(|ui| {
        ui.label(
            egui::RichText::new(post.display_title())
                .heading()
                .strong()
                .size(28.0),
        );
        ui.add_space(4.0);
        ui.label(egui::RichText::new(post.byline()).italics());
    });
    ui.add_space(16.0);

    blocks(ui, &render_blocks(&post.display_text()));
}

fn header_image(ui: &mut egui::Ui, url: &str, fit: ObjectFit) {
    let width = ui.available_width();
    let image = egui::Image::new(url.to_string()).corner_radius(4.0);
    let image = match fit {
        ObjectFit::Contain => image.max_height(IMAGE_MAX_HEIGHT).max_width(width),
        ObjectFit::Cover => image
            .fit_to_exact_size(egui::vec2(width, IMAGE_MAX_HEIGHT))
            .maintain_aspect_ratio(false),
    };
    ui.vertical_centered(|ui| {
        ui.add(image);
    });
}

/// Lay out rendered markdown blocks top to bottom.
pub fn blocks(ui: &mut egui::Ui, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading { level, spans } => {
                ui.add_space(6.0);
                let size = match level {
                    1 => 26.0,
                    2 => 22.0,
                    3 => 19.0,
                    _ => 16.0,
                };
                spans_line(ui, spans, Some(size));
            }
            Block::Paragraph(spans) => spans_line(ui, spans, None),
            Block::Quote(spans) => {
                egui::Frame::new()
                    .inner_margin(egui::Margin::symmetric(10, 4))
                    .stroke(egui::Stroke::new(1.0, ui.visuals().weak_text_color()))
                    .show(ui, |ui| spans_line(ui, spans, None));
            }
            Block::ListItem {
                depth,
                marker,
                spans,
            } => {
                ui.horizontal_wrapped(|ui| {
                    ui.add_space(16.0 * (*depth as f32 + 1.0));
                    ui.label(marker.as_str());
                    spans_inline(ui, spans, None);
                });
            }
            Block::Code { language, code } => {
                let theme = CodeTheme::from_memory(ui.ctx(), ui.style());
                let language = language.as_deref().map(normalize_language).unwrap_or("txt");
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    code_view_ui(ui, &theme, code, language);
                });
            }
            Block::Image { url, alt } => {
                ui.add(
                    egui::Image::new(url.clone())
                        .max_width(ui.available_width())
                        .max_height(IMAGE_MAX_HEIGHT),
                )
                .on_hover_text(alt.as_str());
            }
            Block::Table { header, rows } => table(ui, header, rows),
            Block::Rule => {
                ui.separator();
            }
        }
        ui.add_space(6.0);
    }
}

/// Map fence labels to names the highlighter recognises.
fn normalize_language(language: &str) -> &str {
    match language {
        "js" | "jsx" | "javascript" | "ts" | "tsx" | "typescript" => "js",
        "rs" => "rs",
        "sh" | "bash" | "shell" => "sh",
        other => other,
    }
}

fn spans_line(ui: &mut egui::Ui, spans: &[Span], size: Option<f32>) {
    ui.horizontal_wrapped(|ui| spans_inline(ui, spans, size));
}

fn spans_inline(ui: &mut egui::Ui, spans: &[Span], size: Option<f32>) {
    ui.spacing_mut().item_spacing.x = 0.0;
    for span in spans {
        let mut text = egui::RichText::new(span.text.as_str());
        if let Some(size) = size {
            text = text.size(size).strong();
        }
        if span.style.strong {
            text = text.strong();
        }
        if span.style.emphasis {
            text = text.italics();
        }
        if span.style.strikethrough {
            text = text.strikethrough();
        }
        if span.style.code {
            text = text.code();
        }
        match &span.link {
            Some(url) => {
                ui.hyperlink_to(text, url);
            }
            None => {
                ui.label(text);
            }
        }
    }
}

fn table(ui: &mut egui::Ui, header: &[String], rows: &[Vec<String>]) {
    let columns = header.len().max(rows.iter().map(Vec::len).max().unwrap_or(0));
    egui::Frame::group(ui.style()).show(ui, |ui| {
        egui::Grid::new(ui.next_auto_id())
            .num_columns(columns)
            .striped(true)
            .spacing(egui::vec2(16.0, 4.0))
            .show(ui, |ui| {
                for cell in header {
                    ui.label(egui::RichText::new(cell.as_str()).strong());
                }
                ui.end_row();
                for row in rows {
                    for cell in row {
                        ui.label(cell.as_str());
                    }
                    ui.end_row();
                }
            });
    });
}
