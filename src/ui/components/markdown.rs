// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Markdown editor for post bodies: formatting toolbar, text area and live preview.

use eframe::egui;
use egui::text::{CCursor, CCursorRange};
use egui::text_edit::TextEditState;
use egui_phosphor::regular;

use super::post_view;
use crate::logic::markdown::render_blocks;

const MAX_TABLE_ROWS: u8 = 50;
const MAX_TABLE_COLS: u8 = 10;

/// Editor state, including the egui cursor so toolbar actions wrap the selection.
#[derive(Clone, Debug)]
pub struct MarkdownModel {
    /// Raw markdown content.
    pub text: String,
    /// Heading level used by the heading picker (1-6).
    pub heading_level: u8,
    /// Current cursor selection reported by egui.
    pub cursor: Option<CCursorRange>,
    /// Cursor to apply on the next frame after a toolbar edit.
    pub cursor_override: Option<CCursorRange>,
    pub table_rows: u8,
    pub table_cols: u8,
    /// Show the rendered preview instead of the text area.
    pub preview: bool,
}

impl Default for MarkdownModel {
    fn default() -> Self {
        Self {
            text: String::new(),
            heading_level: 2,
            cursor: None,
            cursor_override: None,
            table_rows: 2,
            table_cols: 2,
            preview: false,
        }
    }
}

impl MarkdownModel {
    pub fn with_text(text: String) -> Self {
        Self {
            text,
            ..Default::default()
        }
    }
}

/// Formatting actions offered by the toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleKind {
    Bold,
    Italic,
    Strikethrough,
    Link,
    Quote,
    Image,
    Rule,
    CodeInline,
    CodeBlock,
    ListUnordered,
    ListOrdered,
}

impl StyleKind {
    /// Toolbar buttons in display order: (kind, icon, tooltip).
    const TOOLBAR: [(StyleKind, &'static str, &'static str); 11] = [
        (StyleKind::Bold, regular::TEXT_BOLDER, "Bold"),
        (StyleKind::Italic, regular::TEXT_ITALIC, "Italic"),
        (StyleKind::Strikethrough, regular::TEXT_STRIKETHROUGH, "Strikethrough"),
        (StyleKind::CodeInline, regular::CODE_SIMPLE, "Inline code"),
        (StyleKind::CodeBlock, regular::CODE_BLOCK, "Code block"),
        (StyleKind::ListUnordered, regular::LIST_DASHES, "Bulleted list"),
        (StyleKind::ListOrdered, regular::LIST_NUMBERS, "Numbered list"),
        (StyleKind::Link, regular::LINK_SIMPLE, "Link"),
        (StyleKind::Quote, regular::QUOTES, "Quote"),
        (StyleKind::Image, regular::IMAGE_SQUARE, "Image"),
        (StyleKind::Rule, regular::RULER, "Horizontal rule"),
    ];

    /// (prefix, suffix, placeholder, block-level)
    fn template(self) -> (&'static str, &'static str, &'static str, bool) {
        match self {
            StyleKind::Bold => ("**", "**", "bold", false),
            StyleKind::Italic => ("_", "_", "italic", false),
            StyleKind::Strikethrough => ("~~", "~~", "text", false),
            StyleKind::Link => ("[", "](https://example.com)", "text", false),
            StyleKind::Quote => ("> ", "", "quote", true),
            StyleKind::Image => ("![", "](https://example.com/image.png)", "alt text", false),
            StyleKind::Rule => ("---", "", "", true),
            StyleKind::CodeInline => ("`", "`", "code", false),
            StyleKind::CodeBlock => ("```js\n", "\n```", "code", true),
            StyleKind::ListUnordered => ("- ", "", "item", true),
            StyleKind::ListOrdered => ("1. ", "", "first", true),
        }
    }
}

/// Messages emitted by the editor view.
#[derive(Clone, Debug)]
pub enum MarkdownMsg {
    SetText(String),
    SetCursor(Option<CCursorRange>),
    ClearCursorOverride,
    InsertHeading(u8),
    ApplyStyle(StyleKind),
    InsertTable { rows: u8, cols: u8 },
    SetTableRows(u8),
    SetTableCols(u8),
    SetPreview(bool),
}

pub fn update(model: &mut MarkdownModel, msg: MarkdownMsg) {
    match msg {
        MarkdownMsg::SetText(text) => model.text = text,
        MarkdownMsg::SetCursor(cursor) => model.cursor = cursor,
        MarkdownMsg::ClearCursorOverride => model.cursor_override = None,
        MarkdownMsg::InsertHeading(level) => insert_heading(model, level),
        MarkdownMsg::ApplyStyle(kind) => {
            let (prefix, suffix, placeholder, block) = kind.template();
            wrap_selection(model, prefix, suffix, placeholder, block);
        }
        MarkdownMsg::InsertTable { rows, cols } => insert_table(model, rows, cols),
        MarkdownMsg::SetTableRows(rows) => model.table_rows = rows.clamp(1, MAX_TABLE_ROWS),
        MarkdownMsg::SetTableCols(cols) => model.table_cols = cols.clamp(1, MAX_TABLE_COLS),
        MarkdownMsg::SetPreview(preview) => model.preview = preview,
    }
}

/// Render toolbar plus editor (or preview), returning messages instead of mutating.
pub fn view(model: &MarkdownModel, ui: &mut egui::Ui) -> Vec<MarkdownMsg> {
    let mut msgs = Vec::new();

    ui.horizontal_wrapped(|ui| {
        let mut preview = model.preview;
        ui.selectable_value(&mut preview, false, format!("{} Write", regular::PENCIL_SIMPLE));
        ui.selectable_value(&mut preview, true, format!("{} Preview", regular::EYE));
        if preview != model.preview {
            msgs.push(MarkdownMsg::SetPreview(preview));
        }
        ui.separator();

        ui.add_enabled_ui(!model.preview, |ui| {
            toolbar(ui, model, &mut msgs);
        });
    });

    ui.add_space(4.0);

    if model.preview {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_min_height(200.0);
            ui.set_width(ui.available_width());
            let blocks = render_blocks(&model.text);
            if blocks.is_empty() {
                ui.label(egui::RichText::new("Nothing to preview yet.").italics());
            } else {
                post_view::blocks(ui, &blocks);
            }
        });
    } else {
        editor(ui, model, &mut msgs);
    }

    msgs
}

fn toolbar(ui: &mut egui::Ui, model: &MarkdownModel, msgs: &mut Vec<MarkdownMsg>) {
    egui::ComboBox::from_id_salt("post_heading_picker")
        .width(40.0)
        .selected_text(heading_icon(model.heading_level))
        .show_ui(ui, |ui| {
            for level in 1..=6u8 {
                if ui
                    .selectable_label(model.heading_level == level, heading_icon(level))
                    .clicked()
                {
                    msgs.push(MarkdownMsg::InsertHeading(level));
                }
            }
        })
        .response
        .on_hover_text("Heading");

    for (kind, icon, hover) in StyleKind::TOOLBAR {
        if ui.button(icon).on_hover_text(hover).clicked() {
            msgs.push(MarkdownMsg::ApplyStyle(kind));
        }
    }

    egui::ComboBox::from_id_salt("post_table_picker")
        .width(70.0)
        .selected_text(format!(
            "{} {}×{}",
            regular::TABLE,
            model.table_rows,
            model.table_cols
        ))
        .show_ui(ui, |ui| table_size_picker(ui, model, msgs))
        .response
        .on_hover_text("Insert table");
}

fn editor(ui: &mut egui::Ui, model: &MarkdownModel, msgs: &mut Vec<MarkdownMsg>) {
    let body_id = ui.id().with("post_body_text_edit");

    if let Some(state) = TextEditState::load(ui.ctx(), body_id) {
        msgs.push(MarkdownMsg::SetCursor(state.cursor.char_range()));
    }

    let mut buffer = model.text.clone();
    let mut output = egui::TextEdit::multiline(&mut buffer)
        .code_editor()
        .id_source(body_id)
        .hint_text("Write your post in Markdown…")
        .desired_width(f32::INFINITY)
        .desired_rows(20)
        .show(ui);

    if buffer != model.text {
        msgs.push(MarkdownMsg::SetText(buffer));
    }

    if let Some(range) = model.cursor_override {
        output.state.cursor.set_char_range(Some(range));
        msgs.push(MarkdownMsg::SetCursor(Some(range)));
        msgs.push(MarkdownMsg::ClearCursorOverride);
    } else {
        msgs.push(MarkdownMsg::SetCursor(output.state.cursor.char_range()));
    }

    output.state.store(ui.ctx(), body_id);
}

fn table_size_picker(ui: &mut egui::Ui, model: &MarkdownModel, msgs: &mut Vec<MarkdownMsg>) {
    let mut rows = model.table_rows;
    let mut cols = model.table_cols;

    egui::Grid::new("post_table_size_grid")
        .num_columns(2)
        .spacing(egui::vec2(8.0, 4.0))
        .show(ui, |ui| {
            ui.label("Rows");
            if ui
                .add(egui::DragValue::new(&mut rows).range(1..=MAX_TABLE_ROWS).speed(0.2))
                .changed()
            {
                msgs.push(MarkdownMsg::SetTableRows(rows));
            }
            ui.end_row();

            ui.label("Columns");
            if ui
                .add(egui::DragValue::new(&mut cols).range(1..=MAX_TABLE_COLS).speed(0.2))
                .changed()
            {
                msgs.push(MarkdownMsg::SetTableCols(cols));
            }
            ui.end_row();
        });

    if ui
        .button(format!("{} Insert table", regular::PLUS))
        .clicked()
    {
        msgs.push(MarkdownMsg::InsertTable { rows, cols });
        ui.close();
    }
}

fn heading_icon(level: u8) -> &'static str {
    match level {
        1 => regular::TEXT_H_ONE,
        2 => regular::TEXT_H_TWO,
        3 => regular::TEXT_H_THREE,
        4 => regular::TEXT_H_FOUR,
        5 => regular::TEXT_H_FIVE,
        6 => regular::TEXT_H_SIX,
        _ => regular::TEXT_H,
    }
}

fn insert_heading(model: &mut MarkdownModel, level: u8) {
    let level = level.clamp(1, 6);
    model.heading_level = level;
    let (_, _, selected) = selection(model);
    let cleaned = selected.trim().trim_start_matches('#').trim_start();
    let content = if cleaned.is_empty() {
        "Heading".to_string()
    } else {
        cleaned.to_string()
    };
    let prefix = format!("{} ", "#".repeat(level as usize));

    replace_selection(model, &prefix, "", &content, true);
}

/// Pipe-table snippet with `Column n` headers and empty body rows.
fn table_snippet(rows: u8, cols: u8) -> String {
    let headers: Vec<String> = (1..=cols.max(1)).map(|c| format!(" Column {c} ")).collect();
    let line = |cells: &mut dyn Iterator<Item = String>| -> String {
        let mut out: String = cells.map(|cell| format!("|{cell}")).collect();
        out.push_str("|\n");
        out
    };

    let mut snippet = line(&mut headers.iter().cloned());
    snippet.push_str(&line(&mut headers.iter().map(|h| "-".repeat(h.len()))));
    for _ in 0..rows.max(1) {
        snippet.push_str(&line(&mut headers.iter().map(|h| " ".repeat(h.len()))));
    }
    snippet
}

fn insert_table(model: &mut MarkdownModel, rows: u8, cols: u8) {
    let rows = rows.clamp(1, MAX_TABLE_ROWS);
    let cols = cols.clamp(1, MAX_TABLE_COLS);
    let (_, end_char, _) = selection(model);
    let at = char_to_byte(&model.text, end_char);

    let mut insertion = String::new();
    if !model.text[..at].is_empty() && !model.text[..at].ends_with("\n\n") {
        insertion.push_str(if model.text[..at].ends_with('\n') { "\n" } else { "\n\n" });
    }
    insertion.push_str(&table_snippet(rows, cols));

    model.text.insert_str(at, &insertion);
    place_cursor(model, end_char + insertion.chars().count());
}

/// Current selection as (start char, end char, selected text). No cursor means end of text.
fn selection(model: &MarkdownModel) -> (usize, usize, String) {
    let (start, end) = match &model.cursor {
        Some(range) => {
            let (a, b) = (range.primary.index, range.secondary.index);
            (a.min(b), a.max(b))
        }
        None => {
            let len = model.text.chars().count();
            (len, len)
        }
    };
    let selected = model.text.chars().skip(start).take(end - start).collect();
    (start, end, selected)
}

/// Wrap the selection (or a placeholder) in `prefix`/`suffix`.
fn wrap_selection(model: &mut MarkdownModel, prefix: &str, suffix: &str, placeholder: &str, block: bool) {
    let (_, _, selected) = selection(model);
    let content = if selected.is_empty() {
        placeholder.to_string()
    } else {
        selected
    };
    replace_selection(model, prefix, suffix, &content, block);
}

fn replace_selection(model: &mut MarkdownModel, prefix: &str, suffix: &str, content: &str, block: bool) {
    let (start_char, end_char, selected) = selection(model);
    let start = char_to_byte(&model.text, start_char);
    let end = char_to_byte(&model.text, end_char);
    let before = &model.text[..start];

    let mut insertion = format!("{prefix}{content}{suffix}");
    if block {
        // Block constructs must start on their own line and end with one.
        if !before.is_empty() && !before.ends_with('\n') {
            insertion.insert(0, '\n');
        }
        if !insertion.ends_with('\n') {
            insertion.push('\n');
        }
    } else if selected.is_empty() && !before.is_empty() && !before.ends_with(char::is_whitespace) {
        insertion.insert(0, ' ');
    }

    model.text.replace_range(start..end, &insertion);
    place_cursor(model, start_char + insertion.chars().count());
}

fn place_cursor(model: &mut MarkdownModel, char_pos: usize) {
    let range = CCursorRange::one(CCursor::new(char_pos));
    model.cursor = Some(range);
    model.cursor_override = Some(range);
}

/// Convert a character index to a byte index, clamping to the string end.
fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(model: &mut MarkdownModel, start: usize, end: usize) {
        model.cursor = Some(CCursorRange::two(CCursor::new(start), CCursor::new(end)));
    }

    #[test]
    fn bold_wraps_selection() {
        let mut model = MarkdownModel::with_text("make this loud".into());
        select(&mut model, 10, 14);

        update(&mut model, MarkdownMsg::ApplyStyle(StyleKind::Bold));

        assert_eq!(model.text, "make this **loud**");
        assert_eq!(model.cursor_override.map(|c| c.primary.index), Some(18));
    }

    #[test]
    fn inline_style_without_selection_inserts_placeholder_with_space() {
        let mut model = MarkdownModel::with_text("word".into());

        update(&mut model, MarkdownMsg::ApplyStyle(StyleKind::CodeInline));

        assert_eq!(model.text, "word `code`");
    }

    #[test]
    fn block_style_starts_on_new_line() {
        let mut model = MarkdownModel::with_text("intro".into());

        update(&mut model, MarkdownMsg::ApplyStyle(StyleKind::ListUnordered));

        assert_eq!(model.text, "intro\n- item\n");
    }

    #[test]
    fn heading_replaces_existing_hashes() {
        let mut model = MarkdownModel::with_text("## Old".into());
        select(&mut model, 0, 6);

        update(&mut model, MarkdownMsg::InsertHeading(3));

        assert_eq!(model.text, "### Old\n");
        assert_eq!(model.heading_level, 3);
    }

    #[test]
    fn styles_handle_multibyte_text() {
        let mut model = MarkdownModel::with_text("héllo wörld".into());
        select(&mut model, 6, 11);

        update(&mut model, MarkdownMsg::ApplyStyle(StyleKind::Italic));

        assert_eq!(model.text, "héllo _wörld_");
    }

    #[test]
    fn table_is_inserted_as_its_own_block() {
        let mut model = MarkdownModel::with_text("text".into());

        update(&mut model, MarkdownMsg::InsertTable { rows: 1, cols: 2 });

        assert_eq!(
            model.text,
            "text\n\n| Column 1 | Column 2 |\n|----------|----------|\n|          |          |\n"
        );
    }

    #[test]
    fn table_dimensions_are_clamped() {
        let mut model = MarkdownModel::default();

        update(&mut model, MarkdownMsg::SetTableRows(0));
        update(&mut model, MarkdownMsg::SetTableCols(200));

        assert_eq!(model.table_rows, 1);
        assert_eq!(model.table_cols, MAX_TABLE_COLS);
    }
}
