//! Site header: the title linking home and the configured icon links

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use crate::config::SiteConfig;
use crate::helpers::url_for;
use crate::query::ImageQuery;
use crate::templates::TemplateRenderer;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeaderIcon {
    pub name: String,
    pub href: String,
    /// Resolved icon image; the link shows its name when absent
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub site_title: Option<String>,
    pub root: String,
    pub icons: Vec<HeaderIcon>,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            site_title: None,
            root: "/".to_string(),
            icons: Vec::new(),
        }
    }
}

impl Header {
    /// Build the header from the site config, resolving icons through the image query
    pub fn from_config(config: &SiteConfig, images: &ImageQuery) -> Self {
        let root = config.root.as_str();
        let icons = config
            .header
            .links
            .iter()
            .map(|link| {
                let image_url = link.icon.as_deref().and_then(|icon| match images.resolve(icon) {
                    Some(node) => Some(url_for(root, &node.public_path)),
                    None => {
                        tracing::warn!("Header icon {} not found for {}", icon, link.name);
                        None
                    }
                });
                let href = if link.href.starts_with('/') && !link.href.starts_with("//") {
                    url_for(root, &link.href)
                } else {
                    link.href.clone()
                };
                HeaderIcon {
                    name: link.name.clone(),
                    href,
                    image_url,
                }
            })
            .collect();

        Self {
            site_title: Some(config.site_metadata.title.clone()),
            root: url_for(root, ""),
            icons,
        }
    }

    /// Title shown in the header; empty when none is set
    pub fn title(&self) -> &str {
        self.site_title.as_deref().unwrap_or("")
    }

    pub(super) fn insert_into(&self, context: &mut Context) {
        context.insert("header", self);
        context.insert("header_title", self.title());
    }

    /// Render the header on its own
    pub fn render(&self, templates: &TemplateRenderer) -> Result<String> {
        let mut context = Context::new();
        self.insert_into(&mut context);
        templates.render("partials/header.html", &context)
    }
}
