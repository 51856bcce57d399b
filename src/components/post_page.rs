//! A single post

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;

use super::{page_context, HeadData, Header};
use crate::content::Post;
use crate::helpers::{date_iso, format_date};
use crate::templates::TemplateRenderer;

#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub title: String,
    pub date: String,
    pub date_iso: String,
    /// Rendered HTML body
    pub content: String,
}

impl PostPage {
    pub fn new(post: &Post, date_format: &str, timezone: Tz) -> Self {
        let local = post.date.with_timezone(&timezone);
        Self {
            title: post.title.clone(),
            date: format_date(&local, date_format),
            date_iso: date_iso(&local),
            content: post.content.clone(),
        }
    }

    pub fn render(
        &self,
        templates: &TemplateRenderer,
        head: &HeadData,
        header: &Header,
    ) -> Result<String> {
        let mut context = page_context(head, Some(header));
        context.insert("post", self);
        templates.render("post.html", &context)
    }
}
