// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Reusable egui components structured for MVU-style updates.

pub mod auth_form;
pub mod error_list;
pub mod markdown;
pub mod post_detail;
pub mod post_form;
pub mod post_list;
pub mod post_view;
pub mod toggle;

pub use toggle::toggle_switch;
