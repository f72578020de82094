// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Blog post as served by the backend, plus the enumerations its form uses.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::utils::decode_entities;

/// Post categories offered by the form, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    JavaScript,
    TypeScript,
    Html,
    Css,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::JavaScript,
        Category::TypeScript,
        Category::Html,
        Category::Css,
        Category::Other,
    ];

    /// Label shown in the UI and submitted as the form value.
    pub fn label(self) -> &'static str {
        match self {
            Category::JavaScript => "JavaScript",
            Category::TypeScript => "TypeScript",
            Category::Html => "HTML",
            Category::Css => "CSS",
            Category::Other => "Other",
        }
    }

    /// Case-insensitive match against stored values; older posts used lowercase.
    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("javascript/typescript") {
            return Some(Category::JavaScript);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(value))
    }
}

/// How the header image is fitted into its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ObjectFit {
    #[default]
    Contain,
    Cover,
}

impl ObjectFit {
    pub const ALL: [ObjectFit; 2] = [ObjectFit::Contain, ObjectFit::Cover];

    /// Value stored by the backend (`object-contain` / `object-cover`).
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectFit::Contain => "object-contain",
            ObjectFit::Cover => "object-cover",
        }
    }

    pub fn from_value(value: &str) -> Self {
        match value.trim() {
            "object-cover" | "cover" => ObjectFit::Cover,
            _ => ObjectFit::Contain,
        }
    }
}

/// Author reference embedded in a post.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
}

/// A post exactly as the backend serializes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_credit: Option<String>,
    #[serde(default)]
    pub object_fit: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub author: Author,
}

impl Post {
    /// Title with HTML entities decoded.
    pub fn display_title(&self) -> String {
        decode_entities(&self.title)
    }

    /// Markdown body with HTML entities decoded.
    pub fn display_text(&self) -> String {
        decode_entities(&self.text)
    }

    pub fn fit(&self) -> ObjectFit {
        self.object_fit
            .as_deref()
            .map(ObjectFit::from_value)
            .unwrap_or_default()
    }

    /// Image URL when one is set and non-blank.
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Credit line, only meaningful alongside an image.
    pub fn credit(&self) -> Option<&str> {
        self.image()?;
        self.image_credit
            .as_deref()
            .filter(|credit| !credit.trim().is_empty())
    }

    /// Timestamp rendered like `Mon Sep 04 2023` in local time.
    pub fn display_date(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(parsed) => parsed
                .with_timezone(&Local)
                .format("%a %b %d %Y")
                .to_string(),
            Err(_) => self.timestamp.clone(),
        }
    }

    /// Byline under the title.
    pub fn byline(&self) -> String {
        let state = if self.is_published {
            "Published on "
        } else {
            "Unpublished - "
        };
        format!(
            "{state}{} - Written by {}",
            self.display_date(),
            self.author.name
        )
    }
}

/// The list endpoint has answered both with a bare array and a wrapped object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PostsPayload {
    List(Vec<Post>),
    Wrapped { posts: Vec<Post> },
}

/// Parse a `GET /posts` response body.
pub fn parse_post_list(body: &str) -> Result<Vec<Post>, serde_json::Error> {
    serde_json::from_str::<PostsPayload>(body).map(|payload| match payload {
        PostsPayload::List(posts) | PostsPayload::Wrapped { posts } => posts,
    })
}

#[cfg(test)]
mod tests {
    use super::{Category, ObjectFit, Post, parse_post_list};

    const SAMPLE: &str = r#"{
        "_id": "64f1",
        "title": "Why &quot;this&quot; matters",
        "text": "Some `code` &amp; prose",
        "category": "javascript",
        "imageURL": "https://img.example.com/a.png",
        "imageCredit": "Unsplash",
        "objectFit": "object-cover",
        "isPublished": true,
        "timestamp": "2023-09-04T12:00:00.000Z",
        "author": { "name": "Mao" }
    }"#;

    #[test]
    fn deserializes_backend_shape() {
        let post: Post = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(post.id, "64f1");
        assert_eq!(post.display_title(), "Why \"this\" matters");
        assert_eq!(post.display_text(), "Some `code` & prose");
        assert_eq!(post.fit(), ObjectFit::Cover);
        assert_eq!(post.credit(), Some("Unsplash"));
        assert_eq!(post.author.name, "Mao");
        assert_eq!(Category::from_value(&post.category), Some(Category::JavaScript));
    }

    #[test]
    fn optional_fields_default_when_missing() {
        let post: Post =
            serde_json::from_str(r#"{"_id":"1","title":"t","text":"b"}"#).unwrap();

        assert!(!post.is_published);
        assert_eq!(post.image(), None);
        assert_eq!(post.fit(), ObjectFit::Contain);
    }

    #[test]
    fn credit_requires_an_image() {
        let mut post: Post = serde_json::from_str(SAMPLE).unwrap();
        post.image_url = Some("  ".into());

        assert_eq!(post.image(), None);
        assert_eq!(post.credit(), None);
    }

    #[test]
    fn byline_reflects_publication_state() {
        let mut post: Post = serde_json::from_str(SAMPLE).unwrap();
        assert!(post.byline().starts_with("Published on "));
        assert!(post.byline().ends_with(" - Written by Mao"));

        post.is_published = false;
        assert!(post.byline().starts_with("Unpublished - "));
    }

    #[test]
    fn unparseable_timestamp_is_shown_raw() {
        let mut post: Post = serde_json::from_str(SAMPLE).unwrap();
        post.timestamp = "yesterday".into();

        assert_eq!(post.display_date(), "yesterday");
    }

    #[test]
    fn post_list_accepts_array_and_wrapped_forms() {
        let array = format!("[{SAMPLE}]");
        let wrapped = format!(r#"{{"posts":[{SAMPLE},{SAMPLE}]}}"#);

        assert_eq!(parse_post_list(&array).unwrap().len(), 1);
        assert_eq!(parse_post_list(&wrapped).unwrap().len(), 2);
        assert!(parse_post_list("{\"nope\":1}").is_err());
    }

    #[test]
    fn category_matching_is_case_insensitive() {
        assert_eq!(Category::from_value("css"), Some(Category::Css));
        assert_eq!(Category::from_value("HTML"), Some(Category::Html));
        assert_eq!(
            Category::from_value("javascript/typescript"),
            Some(Category::JavaScript)
        );
        assert_eq!(Category::from_value("rust"), None);
    }
}
