//! 404 page

use anyhow::Result;

use super::{page_context, HeadData, Header};
use crate::templates::TemplateRenderer;

pub struct NotFound;

impl NotFound {
    pub const TITLE: &'static str = "404: Not found";
    pub const FILE: &'static str = "404.html";

    pub fn render(
        &self,
        templates: &TemplateRenderer,
        head: &HeadData,
        header: &Header,
    ) -> Result<String> {
        templates.render(Self::FILE, &page_context(head, Some(header)))
    }
}
