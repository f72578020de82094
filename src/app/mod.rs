// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Application entry point wiring egui/eframe to launch the CMS window.

use std::sync::Arc;

use eframe::egui;
use egui_phosphor::Variant;

use crate::api::Transport;
use crate::config::Config;
use crate::ui::CmsApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: &Config, transport: Arc<dyn Transport>) -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    let workers = config.workers;
    eframe::run_native(
        ".BLOG CMS",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            // Post images are fetched by URL.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(CmsApp::new(&cc.egui_ctx, transport, workers)))
        }),
    )
}
