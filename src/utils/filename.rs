// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Turn post titles into filesystem-safe file stems.

use std::path::PathBuf;

/// Stem used when a title yields nothing usable.
const FALLBACK_STEM: &str = "post";

/// Longest stem we produce; long titles get cut at a separator boundary.
const MAX_STEM_CHARS: usize = 80;

/// Produce a lowercase, hyphen-separated file stem from a post title.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` ("Ærøskøbing" → "aeroskobing").
/// - Keep ASCII alphanumerics; every other run of characters becomes one `-`.
/// - Trim leading/trailing separators and cap the length.
/// - Guard against empty results and Windows device names.
pub fn file_stem_for_title(title: &str) -> String {
    let transliterated = deunicode::deunicode(title);
    let mut out = String::with_capacity(transliterated.len());

    for ch in transliterated.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }

    if out.len() > MAX_STEM_CHARS {
        let cut = out[..MAX_STEM_CHARS].rfind('-').unwrap_or(MAX_STEM_CHARS);
        out.truncate(cut);
    }

    while out.ends_with('-') {
        out.pop();
    }

    if out.is_empty() {
        return FALLBACK_STEM.to_string();
    }

    let reserved = matches!(
        out.to_ascii_uppercase().as_str(),
        "CON" | "PRN" | "AUX" | "NUL" | "COM1" | "COM2" | "COM3" | "COM4" | "LPT1" | "LPT2" | "LPT3"
    );
    if reserved {
        out.push_str("-post");
    }

    out
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps an existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ensure_extension, file_stem_for_title};

    #[test]
    fn stem_transliterates_and_hyphenates() {
        assert_eq!(
            file_stem_for_title("Café & Crème: a CSS story"),
            "cafe-creme-a-css-story"
        );
    }

    #[test]
    fn stem_collapses_separator_runs_and_trims_edges() {
        assert_eq!(file_stem_for_title("  --Hello,   World!--  "), "hello-world");
    }

    #[test]
    fn stem_falls_back_for_symbol_only_titles() {
        assert_eq!(file_stem_for_title("!!!"), "post");
        assert_eq!(file_stem_for_title(""), "post");
    }

    #[test]
    fn stem_suffixes_windows_device_names() {
        assert_eq!(file_stem_for_title("CON"), "con-post");
    }

    #[test]
    fn stem_is_capped_on_a_word_boundary() {
        let title = "word ".repeat(40);
        let stem = file_stem_for_title(&title);

        assert!(stem.len() <= 80);
        assert!(stem.ends_with("word"));
    }

    // Should leave an existing matching extension untouched, ignoring case.
    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = PathBuf::from("/tmp/post.HTML");
        assert_eq!(ensure_extension(path.clone(), "html"), path);
    }

    #[test]
    fn ensure_extension_replaces_when_different() {
        let result = ensure_extension(PathBuf::from("post.txt"), "html");
        assert_eq!(result.extension().and_then(|e| e.to_str()), Some("html"));
    }
}
