// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! HTML entity decoding for text the backend stores escaped.

/// Decode HTML entities (`&amp;`, `&#x27;`, `&quot;`, ...) into plain text.
///
/// The backend escapes titles and bodies on the way in, so anything shown in
/// the UI or pre-filled into a form goes through here first.
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::decode_entities;

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(
            decode_entities("Tom &amp; Jerry&#x27;s &quot;show&quot; &lt;3"),
            "Tom & Jerry's \"show\" <3"
        );
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(decode_entities("plain `code` text"), "plain `code` text");
    }
}
