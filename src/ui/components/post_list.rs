// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Post overview table with a local publication filter.

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::models::Post;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PostFilter {
    #[default]
    All,
    Published,
    Drafts,
}

impl PostFilter {
    const ALL: [PostFilter; 3] = [PostFilter::All, PostFilter::Published, PostFilter::Drafts];

    fn label(self) -> &'static str {
        match self {
            PostFilter::All => "All",
            PostFilter::Published => "Published",
            PostFilter::Drafts => "Drafts",
        }
    }

    pub fn matches(self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Published => post.is_published,
            PostFilter::Drafts => !post.is_published,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostListModel {
    pub posts: Vec<Post>,
    pub filter: PostFilter,
    /// Set while `GET /posts` is in flight.
    pub loading: bool,
    /// Last load failure, shown in place of the table.
    pub error: Option<String>,
}

impl PostListModel {
    pub fn visible(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|post| self.filter.matches(post))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostListMsg {
    SetFilter(PostFilter),
    Open(String),
    Reload,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PostListEvent {
    Open(Post),
    Reload,
}

pub fn update(model: &mut PostListModel, msg: PostListMsg) -> Option<PostListEvent> {
    match msg {
        PostListMsg::SetFilter(filter) => {
            model.filter = filter;
            None
        }
        PostListMsg::Open(id) => model
            .posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .map(PostListEvent::Open),
        PostListMsg::Reload => {
            if model.loading {
                None
            } else {
                Some(PostListEvent::Reload)
            }
        }
    }
}

pub fn view(ui: &mut egui::Ui, model: &PostListModel) -> Vec<PostListMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.heading("Posts");
        ui.add_space(12.0);
        for filter in PostFilter::ALL {
            if ui
                .selectable_label(model.filter == filter, filter.label())
                .clicked()
            {
                msgs.push(PostListMsg::SetFilter(filter));
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let reload = ui.add_enabled(
                !model.loading,
                egui::Button::new(format!("{} Reload", egui_phosphor::regular::ARROW_CLOCKWISE)),
            );
            if reload.clicked() {
                msgs.push(PostListMsg::Reload);
            }
            if model.loading {
                ui.add(egui::Spinner::new());
            }
        });
    });
    ui.separator();

    if let Some(error) = &model.error {
        ui.colored_label(ui.visuals().error_fg_color, error);
        return msgs;
    }

    let visible: Vec<&Post> = model.visible().collect();
    if visible.is_empty() {
        if !model.loading {
            ui.weak("No posts to show.");
        }
        return msgs;
    }

    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 8.0;
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::remainder().at_least(200.0).clip(true))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(100.0))
        .header(row_height, |mut header| {
            for title in ["Title", "Category", "State", "Date", "Author"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for post in visible {
                body.row(row_height, |mut row| {
                    row.col(|ui| {
                        if ui.link(post.display_title()).clicked() {
                            msgs.push(PostListMsg::Open(post.id.clone()));
                        }
                    });
                    row.col(|ui| {
                        ui.label(post.category.as_str());
                    });
                    row.col(|ui| {
                        if post.is_published {
                            ui.colored_label(egui::Color32::from_rgb(0x3c, 0xa3, 0x5b), "Published");
                        } else {
                            ui.weak("Draft");
                        }
                    });
                    row.col(|ui| {
                        ui.label(post.display_date());
                    });
                    row.col(|ui| {
                        ui.label(post.author.name.as_str());
                    });
                });
            }
        });

    msgs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;

    fn post(id: &str, published: bool) -> Post {
        Post {
            id: id.into(),
            title: format!("Post {id}"),
            text: String::new(),
            category: "Other".into(),
            image_url: None,
            image_credit: None,
            object_fit: None,
            is_published: published,
            timestamp: "2023-09-04T12:00:00Z".into(),
            author: Author { name: "Mao".into() },
        }
    }

    fn model() -> PostListModel {
        PostListModel {
            posts: vec![post("a", true), post("b", false), post("c", true)],
            ..Default::default()
        }
    }

    #[test]
    fn filter_limits_visible_posts() {
        let mut model = model();

        update(&mut model, PostListMsg::SetFilter(PostFilter::Drafts));
        let ids: Vec<_> = model.visible().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b"]);

        update(&mut model, PostListMsg::SetFilter(PostFilter::Published));
        assert_eq!(model.visible().count(), 2);
    }

    #[test]
    fn open_resolves_post_by_id() {
        let mut model = model();

        match update(&mut model, PostListMsg::Open("c".into())) {
            Some(PostListEvent::Open(post)) => assert_eq!(post.id, "c"),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(update(&mut model, PostListMsg::Open("zzz".into())), None);
    }

    #[test]
    fn reload_is_suppressed_while_loading() {
        let mut model = model();
        model.loading = true;

        assert_eq!(update(&mut model, PostListMsg::Reload), None);
        model.loading = false;
        assert_eq!(
            update(&mut model, PostListMsg::Reload),
            Some(PostListEvent::Reload)
        );
    }
}
