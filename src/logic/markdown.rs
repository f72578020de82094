// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Markdown handling for post bodies.
//!
//! - [`render_blocks`] flattens pulldown-cmark events into display blocks the
//!   egui post view can lay out directly.
//! - [`markdown_to_html`] renders sanitized HTML for exported posts.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};

/// Inline styling flags for a run of text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
}

/// A run of uniformly styled inline text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    /// Target when the run sits inside a link.
    pub link: Option<String>,
}

/// Block-level element ready for layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph(Vec<Span>),
    Quote(Vec<Span>),
    /// One list entry; `depth` starts at 0, `marker` is `•` or `3.`.
    ListItem {
        depth: usize,
        marker: String,
        spans: Vec<Span>,
    },
    Code {
        language: Option<String>,
        code: String,
    },
    Image { url: String, alt: String },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Rule,
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Parse markdown into display blocks.
pub fn render_blocks(text: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(text, parser_options()) {
        builder.process_event(event);
    }
    builder.finish()
}

/// Render markdown to sanitized HTML.
///
/// Raw HTML in the source is passed through pulldown-cmark and then cleaned by
/// Ammonia, so scripts and event handlers never reach the output.
pub fn markdown_to_html(body: &str) -> String {
    let parser = Parser::new_ext(body, parser_options());
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    ammonia::Builder::default().clean(&html_output).to_string()
}

#[derive(Debug)]
struct ListState {
    /// Next number for ordered lists, `None` for bullets.
    next_number: Option<u64>,
}

#[derive(Debug, Default)]
struct TableBuffer {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    current_cell: String,
}

#[derive(Debug, Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    strong: usize,
    emphasis: usize,
    strikethrough: usize,
    links: Vec<String>,
    heading: Option<u8>,
    quote_depth: usize,
    lists: Vec<ListState>,
    pending_marker: Option<String>,
    code: Option<(Option<String>, String)>,
    image: Option<(String, String)>,
    table: Option<TableBuffer>,
}

impl BlockBuilder {
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.add_text(&text),
            Event::Code(code) => self.push_span(&code, true),
            Event::SoftBreak => self.add_text(" "),
            Event::HardBreak => self.add_text("\n"),
            Event::Rule => {
                self.flush();
                self.blocks.push(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                self.add_text(if checked { "[x] " } else { "[ ] " });
            }
            // Raw HTML and footnote references have no egui counterpart.
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(heading_level(level));
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string)
                        .filter(|lang| !lang.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListState { next_number: start });
            }
            Tag::Item => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(ListState {
                        next_number: Some(n),
                    }) => {
                        let marker = format!("{n}.");
                        *n += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                self.pending_marker = Some(marker);
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.links.push(dest_url.to_string()),
            Tag::Image { dest_url, .. } => {
                self.image = Some((dest_url.to_string(), String::new()));
            }
            Tag::Table(_) => {
                self.flush();
                self.table = Some(TableBuffer::default());
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item => self.flush(),
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                if let Some((language, mut code)) = self.code.take() {
                    if code.ends_with('\n') {
                        code.pop();
                    }
                    self.blocks.push(Block::Code { language, code });
                }
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => {
                self.links.pop();
            }
            TagEnd::Image => {
                if let Some((url, alt)) = self.image.take() {
                    self.flush();
                    self.blocks.push(Block::Image { url, alt });
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.current_cell);
                    table.current_row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.current_row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.blocks.push(Block::Table {
                        header: table.header,
                        rows: table.rows,
                    });
                }
            }
            _ => {}
        }
    }

    fn add_text(&mut self, text: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(text);
        } else if let Some((_, alt)) = self.image.as_mut() {
            alt.push_str(text);
        } else if let Some(table) = self.table.as_mut() {
            table.current_cell.push_str(text);
        } else {
            self.push_span(text, false);
        }
    }

    fn push_span(&mut self, text: &str, code: bool) {
        if let Some(table) = self.table.as_mut() {
            table.current_cell.push_str(text);
            return;
        }
        let style = SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code,
        };
        let link = self.links.last().cloned();

        // Merge with the previous run when nothing about it changes.
        if let Some(last) = self.spans.last_mut()
            && last.style == style
            && last.link == link
            && !code
        {
            last.text.push_str(text);
            return;
        }
        self.spans.push(Span {
            text: text.to_string(),
            style,
            link,
        });
    }

    /// Close the current run of spans into a block chosen by context.
    fn flush(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        let heading = self.heading.take();
        if spans.iter().all(|span| span.text.trim().is_empty()) {
            return;
        }

        let block = if let Some(level) = heading {
            Block::Heading { level, spans }
        } else if !self.lists.is_empty() {
            Block::ListItem {
                depth: self.lists.len() - 1,
                marker: self.pending_marker.take().unwrap_or_default(),
                spans,
            }
        } else if self.quote_depth > 0 {
            Block::Quote(spans)
        } else {
            Block::Paragraph(spans)
        };
        self.blocks.push(block);
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, markdown_to_html, render_blocks};

    fn plain(spans: &[super::Span]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn headings_and_paragraphs_become_separate_blocks() {
        let blocks = render_blocks("# Title\n\nFirst *para*.\n\nSecond.");

        assert_eq!(blocks.len(), 3);
        match &blocks[0] {
            Block::Heading { level, spans } => {
                assert_eq!(*level, 1);
                assert_eq!(plain(spans), "Title");
            }
            other => panic!("expected heading, got {other:?}"),
        }
        match &blocks[1] {
            Block::Paragraph(spans) => {
                assert_eq!(plain(spans), "First para.");
                assert!(spans.iter().any(|s| s.style.emphasis && s.text == "para"));
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn fenced_code_keeps_language_and_drops_trailing_newline() {
        let blocks = render_blocks("```ts\nconst a = 1;\n```");

        assert_eq!(
            blocks,
            vec![Block::Code {
                language: Some("ts".into()),
                code: "const a = 1;".into()
            }]
        );
    }

    #[test]
    fn ordered_and_nested_lists_carry_markers_and_depth() {
        let blocks = render_blocks("3. three\n4. four\n   - nested\n");

        let items: Vec<(usize, String, String)> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::ListItem {
                    depth,
                    marker,
                    spans,
                } => Some((*depth, marker.clone(), plain(spans))),
                _ => None,
            })
            .collect();

        assert_eq!(
            items,
            vec![
                (0, "3.".to_string(), "three".to_string()),
                (0, "4.".to_string(), "four".to_string()),
                (1, "•".to_string(), "nested".to_string()),
            ]
        );
    }

    #[test]
    fn links_and_inline_code_are_tracked_per_span() {
        let blocks = render_blocks("See [docs](https://example.com) and `x()`.");

        let Block::Paragraph(spans) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(
            spans
                .iter()
                .any(|s| s.text == "docs" && s.link.as_deref() == Some("https://example.com"))
        );
        assert!(spans.iter().any(|s| s.text == "x()" && s.style.code));
    }

    #[test]
    fn images_tables_quotes_and_rules_are_recognised() {
        let md = "![alt text](https://img/x.png)\n\n> quoted\n\n---\n\n| A | B |\n|---|---|\n| 1 | 2 |\n";
        let blocks = render_blocks(md);

        assert!(blocks.contains(&Block::Image {
            url: "https://img/x.png".into(),
            alt: "alt text".into()
        }));
        assert!(blocks.iter().any(|b| matches!(b, Block::Quote(s) if plain(s) == "quoted")));
        assert!(blocks.contains(&Block::Rule));
        assert!(blocks.contains(&Block::Table {
            header: vec!["A".into(), "B".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        }));
    }

    #[test]
    fn empty_input_yields_no_blocks() {
        assert!(render_blocks("").is_empty());
        assert!(render_blocks("   \n\n").is_empty());
    }

    // Markdown HTML rendering should sanitize scripts while retaining formatting like strikethrough.
    #[test]
    fn markdown_to_html_sanitizes_and_keeps_formatting() {
        let html = markdown_to_html("Hello <script>alert('x')</script> ~~gone~~");

        assert!(html.contains("<del>gone</del>"));
        assert!(!html.contains("script"));
    }

    #[test]
    fn markdown_to_html_strips_event_handlers() {
        let html = markdown_to_html("<img src=\"a.png\" onerror=\"alert(1)\">");

        assert!(!html.contains("onerror"));
    }
}
