// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Domain layer: pure data types shared between the UI and backend calls.

pub mod post;
pub mod session;
pub mod validation;

pub use post::{Author, Category, ObjectFit, Post, parse_post_list};
pub use session::Session;
pub use validation::ValidationErrors;
