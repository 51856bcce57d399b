//! Web app manifest (`manifest.webmanifest`)

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::ManifestOptions;
use crate::helpers::extension_of;

/// File name of the manifest in the public directory
pub const MANIFEST_FILE: &str = "manifest.webmanifest";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub background_color: String,
    pub theme_color: String,
    pub display: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl WebManifest {
    /// Build the manifest; `icon_url` is where the copied icon is served from
    pub fn new(options: &ManifestOptions, icon_url: Option<&str>) -> Self {
        let icons = match (options.icon.as_deref(), icon_url) {
            (Some(icon), Some(url)) => vec![ManifestIcon {
                src: url.to_string(),
                sizes: "any".to_string(),
                mime_type: icon_mime_type(icon).to_string(),
            }],
            _ => Vec::new(),
        };

        let short_name = if options.short_name.is_empty() {
            options.name.clone()
        } else {
            options.short_name.clone()
        };

        Self {
            name: options.name.clone(),
            short_name,
            start_url: options.start_url.clone(),
            background_color: options.background_color.clone(),
            theme_color: options.theme_color.clone(),
            display: options.display.clone(),
            icons,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// MIME type of an icon file, by extension
pub fn icon_mime_type(path: &Path) -> &'static str {
    match extension_of(path).as_deref() {
        Some("svg") => "image/svg+xml",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}
