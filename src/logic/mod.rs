// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Business logic that does not touch the UI: markdown rendering and post export.

pub mod export;
pub mod markdown;
