//! Index page listing every post

use anyhow::Result;
use serde::Serialize;

use super::{page_context, HeadData, Header};
use crate::helpers::url_for;
use crate::query::PostSummary;
use crate::templates::TemplateRenderer;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostRow {
    pub title: String,
    pub date: String,
    pub date_iso: String,
    pub href: String,
}

/// The index page, rows in the order the query returned them
#[derive(Debug, Clone, Serialize)]
pub struct PostList {
    pub posts: Vec<PostRow>,
}

impl PostList {
    pub const TITLE: &'static str = "Home";

    pub fn new(root: &str, summaries: Vec<PostSummary>) -> Self {
        let posts = summaries
            .into_iter()
            .map(|summary| PostRow {
                href: url_for(root, &summary.path),
                title: summary.title,
                date: summary.date,
                date_iso: summary.date_iso,
            })
            .collect();
        Self { posts }
    }

    pub fn render(
        &self,
        templates: &TemplateRenderer,
        head: &HeadData,
        header: &Header,
    ) -> Result<String> {
        let mut context = page_context(head, Some(header));
        context.insert("posts", &self.posts);
        templates.render("index.html", &context)
    }
}
