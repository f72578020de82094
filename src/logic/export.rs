// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Export a post as a standalone, sanitized HTML document.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use html_escape::{encode_double_quoted_attribute, encode_text};

use super::markdown::markdown_to_html;
use crate::models::Post;
use crate::utils::file_stem_for_title;

const STYLE: &str = "body{max-width:65ch;margin:2rem auto;padding:0 1rem;font-family:system-ui,sans-serif;line-height:1.6}\
img.cover{width:100%;max-height:18rem;object-fit:cover}\
img.contain{width:100%;max-height:18rem;object-fit:contain}\
.credit{font-size:.75rem;font-style:italic;text-align:right}\
.byline{font-style:italic;text-align:center}\
pre{background:#111b27;color:#e3eaf2;padding:1rem;overflow-x:auto}";

/// Suggest an export filename from the post title.
pub fn suggested_export_name(post: &Post) -> String {
    format!("{}.html", file_stem_for_title(&post.display_title()))
}

/// Build the full HTML document for `post`.
///
/// Title, byline and image attributes are escaped; the body goes through
/// [`markdown_to_html`] so embedded HTML is sanitized.
pub fn render_post_document(post: &Post) -> String {
    let title = post.display_title();
    let mut doc = String::new();

    doc.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str(&format!("<title>{}</title>\n", encode_text(&title)));
    doc.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n<article>\n"));

    if let Some(url) = post.image() {
        let class = match post.fit() {
            crate::models::ObjectFit::Contain => "contain",
            crate::models::ObjectFit::Cover => "cover",
        };
        doc.push_str(&format!(
            "<img class=\"{class}\" src=\"{}\" alt=\"article image\">\n",
            encode_double_quoted_attribute(url)
        ));
        if let Some(credit) = post.credit() {
            doc.push_str(&format!(
                "<p class=\"credit\">Image from {}</p>\n",
                encode_text(credit)
            ));
        }
    }

    doc.push_str(&format!("<h1>{}</h1>\n", encode_text(&title)));
    doc.push_str(&format!(
        "<p class=\"byline\">{}</p>\n",
        encode_text(&post.byline())
    ));
    doc.push_str(&markdown_to_html(&post.display_text()));
    doc.push_str("\n</article>\n</body>\n</html>\n");
    doc
}

/// Write the rendered document to `output`, creating parent directories as needed.
pub fn write_post_html(output: &Path, post: &Post) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }

    fs::write(output, render_post_document(post))
        .with_context(|| format!("Failed to write post export {:?}", output))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::{render_post_document, suggested_export_name, write_post_html};
    use crate::models::{Author, Post};

    fn post() -> Post {
        Post {
            id: "1".into(),
            title: "Tips &amp; Tricks".into(),
            text: "## Intro\n\nHello <script>alert(1)</script> **world**".into(),
            category: "CSS".into(),
            image_url: Some("https://img.example.com/a.png?x=1&y=\"2\"".into()),
            image_credit: Some("Unsplash".into()),
            object_fit: Some("object-cover".into()),
            is_published: true,
            timestamp: "2023-09-04T12:00:00Z".into(),
            author: Author { name: "Mao".into() },
        }
    }

    #[test]
    fn suggested_name_uses_decoded_title() {
        assert_eq!(suggested_export_name(&post()), "tips-tricks.html");
    }

    #[test]
    fn document_escapes_metadata_and_sanitizes_body() {
        let doc = render_post_document(&post());

        assert!(doc.contains("<title>Tips &amp; Tricks</title>"));
        assert!(doc.contains("<h1>Tips &amp; Tricks</h1>"));
        assert!(doc.contains("<strong>world</strong>"));
        assert!(doc.contains("class=\"cover\""));
        assert!(doc.contains("Image from Unsplash"));
        assert!(!doc.contains("<script>"));
        assert!(!doc.contains("y=\"2\""));
    }

    #[test]
    fn document_without_image_has_no_credit() {
        let mut p = post();
        p.image_url = None;

        let doc = render_post_document(&p);

        assert!(!doc.contains("<img"));
        assert!(!doc.contains("Image from"));
    }

    #[test]
    fn write_creates_missing_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested").join("post.html");

        write_post_html(&out, &post()).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
