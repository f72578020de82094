// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Validation error list shown above forms.

use eframe::egui;

use crate::models::ValidationErrors;

/// Render every message, prefixing field-scoped ones with the field name.
pub fn view(ui: &mut egui::Ui, errors: &ValidationErrors) {
    if errors.is_empty() {
        return;
    }
    let color = ui.visuals().error_fg_color;

    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, color))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            for item in errors.items() {
                let text = match &item.field {
                    Some(field) => format!(
                        "{} {}: {}",
                        egui_phosphor::regular::WARNING_CIRCLE,
                        field,
                        item.message
                    ),
                    None => format!("{} {}", egui_phosphor::regular::WARNING_CIRCLE, item.message),
                };
                ui.label(egui::RichText::new(text).color(color));
            }
        });
}
