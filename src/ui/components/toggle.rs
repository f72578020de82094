// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Labelled on/off switch used for the publish flag.

use eframe::egui;

/// Draw `label` followed by a compact switch. Clicking flips `on` and marks the response changed.
pub fn toggle_switch(ui: &mut egui::Ui, label: &str, on: &mut bool) -> egui::Response {
    ui.horizontal(|ui| {
        ui.label(label);
        switch(ui, on)
    })
    .inner
}

fn switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let spacing = ui.style().spacing.interact_size;
    let size = egui::vec2(spacing.x.max(32.0), spacing.y.max(18.0));
    let (rect, mut response) = ui.allocate_exact_size(size, egui::Sense::click());
    if response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    if ui.is_rect_visible(rect) {
        let how_on = ui.ctx().animate_bool(response.id, *on);
        let visuals = ui.style().interact_selectable(&response, *on);
        let off = ui.visuals().widgets.inactive.bg_fill;
        let fill = lerp_color(off, visuals.bg_fill, how_on);

        ui.painter()
            .rect_filled(rect.expand(visuals.expansion), rect.height() * 0.5, fill);
        let knob_x = egui::lerp((rect.left() + 8.0)..=(rect.right() - 8.0), how_on);
        ui.painter().circle(
            egui::pos2(knob_x, rect.center().y),
            6.5,
            visuals.fg_stroke.color,
            egui::Stroke::NONE,
        );
    }

    response
}

fn lerp_color(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let channel = |a: u8, b: u8| egui::lerp(a as f32..=b as f32, t).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
        channel(from.a(), to.a()),
    )
}
