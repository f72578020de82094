// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Shared helper utilities reused by UI and business logic.

pub mod entities;
pub mod filename;

/// Decode HTML entities stored by the backend.
pub use entities::decode_entities;
/// Filesystem helpers for exported posts.
pub use filename::{ensure_extension, file_stem_for_title};
