//! Document head: title, SEO meta, manifest and analytics

use serde::Serialize;

use crate::config::SiteConfig;
use crate::helpers::{full_url_for, url_for};
use crate::plugins::{Plugins, MANIFEST_FILE};

/// A `<meta>` tag keyed by `name` or `property`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetaTag {
    pub attr: &'static str,
    pub key: String,
    pub content: String,
}

impl MetaTag {
    fn name(key: &str, content: &str) -> Self {
        Self {
            attr: "name",
            key: key.to_string(),
            content: content.to_string(),
        }
    }

    fn property(key: &str, content: &str) -> Self {
        Self {
            attr: "property",
            key: key.to_string(),
            content: content.to_string(),
        }
    }
}

/// Everything rendered into `<head>` plus the scripts closing `<body>`
#[derive(Debug, Clone, Serialize)]
pub struct HeadData {
    pub lang: String,
    pub title: String,
    pub canonical: Option<String>,
    pub meta: Vec<MetaTag>,
    pub stylesheets: Vec<String>,
    pub manifest_url: Option<String>,
    pub theme_color: Option<String>,
    pub icon_url: Option<String>,
    pub gtag_head: Option<String>,
    pub gtag_body: Option<String>,
}

/// Site-wide inputs to every page head
pub struct SiteHead<'a> {
    config: &'a SiteConfig,
    plugins: &'a Plugins,
    icon_url: Option<String>,
}

impl<'a> SiteHead<'a> {
    /// `icon_url` is the published manifest icon, if any
    pub fn new(config: &'a SiteConfig, plugins: &'a Plugins, icon_url: Option<String>) -> Self {
        Self {
            config,
            plugins,
            icon_url,
        }
    }

    /// Head of one page; `path` is the page URL path without root
    pub fn page(
        &self,
        title: &str,
        description: Option<&str>,
        path: &str,
        stylesheet: &str,
    ) -> HeadData {
        let metadata = &self.config.site_metadata;
        let root = self.config.root.as_str();
        let url_path = url_for(root, path);

        let full_title = if title.is_empty() {
            metadata.title.clone()
        } else {
            format!("{} | {}", title, metadata.title)
        };

        let (meta, canonical) = if self.plugins.head_metadata() {
            let description = description
                .filter(|d| !d.is_empty())
                .unwrap_or(&metadata.description);
            let meta = vec![
                MetaTag::name("description", description),
                MetaTag::property("og:title", title),
                MetaTag::property("og:description", description),
                MetaTag::property("og:type", "website"),
                MetaTag::name("twitter:card", "summary"),
                MetaTag::name("twitter:creator", &metadata.author),
                MetaTag::name("twitter:title", title),
                MetaTag::name("twitter:description", description),
            ];
            (meta, Some(full_url_for(&metadata.url, root, path)))
        } else {
            (Vec::new(), None)
        };

        let manifest = self.plugins.manifest();
        let (gtag_head, gtag_body) = match self.plugins.gtag() {
            Some(gtag) => {
                let snippet = gtag.snippet_for(&url_path);
                if gtag.in_head() {
                    (snippet, None)
                } else {
                    (None, snippet)
                }
            }
            None => (None, None),
        };

        HeadData {
            lang: "en".to_string(),
            title: full_title,
            canonical,
            meta,
            stylesheets: vec![url_for(root, stylesheet)],
            manifest_url: manifest.map(|_| url_for(root, MANIFEST_FILE)),
            theme_color: manifest.map(|m| m.theme_color.clone()),
            icon_url: self.icon_url.clone(),
            gtag_head,
            gtag_body,
        }
    }
}
