//! Site configuration (site.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use crate::plugins::PluginEntry;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site_metadata: SiteMetadata,

    // URL
    pub root: String,
    pub posts_dir: String,

    // Directory
    pub public_dir: String,

    // Dates
    pub date_format: String,
    pub timezone: String,

    pub header: HeaderConfig,

    /// Ordered build plugins
    pub plugins: Vec<PluginEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_metadata: SiteMetadata::default(),
            root: "/".to_string(),
            posts_dir: "posts".to_string(),
            public_dir: "public".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            timezone: "UTC".to_string(),
            header: HeaderConfig::default(),
            plugins: Self::default_plugins(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse {:?}: {}", path.as_ref(), e))?;
        config.tz()?;
        Ok(config)
    }

    /// Time zone used to display dates
    pub fn tz(&self) -> Result<Tz> {
        if self.timezone.trim().is_empty() {
            return Ok(Tz::UTC);
        }
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|_| anyhow!("Unknown timezone: {}", self.timezone))
    }

    /// Host of the site URL, used to tell external links apart
    pub fn site_host(&self) -> Option<String> {
        crate::helpers::host_of(&self.site_metadata.url)
    }

    /// The plugin list the blog ships with
    pub fn default_plugins() -> Vec<PluginEntry> {
        vec![
            configured(
                "source-filesystem",
                &[
                    ("name", "markdown-pages".into()),
                    ("path", "src/markdown-posts".into()),
                ],
            ),
            configured(
                "transformer-markdown",
                &[(
                    "plugins",
                    Value::Sequence(vec![
                        plain("markdown-highlight"),
                        configured("markdown-images", &[("max_width", 590.into())]),
                        configured(
                            "markdown-copy-linked-files",
                            &[(
                                "ignore_file_extensions",
                                vec!["png", "jpg", "jpeg", "bmp", "tiff"].into(),
                            )],
                        ),
                        configured(
                            "markdown-external-links",
                            &[("target", "_blank".into()), ("rel", "nofollow".into())],
                        ),
                    ]
                    .into_iter()
                    .map(entry_value)
                    .collect()),
                )],
            ),
            plain("catch-links"),
            plain("head-metadata"),
            configured(
                "source-filesystem",
                &[("name", "images".into()), ("path", "src/images".into())],
            ),
            plain("transformer-sharp"),
            plain("plugin-sharp"),
            configured(
                "manifest",
                &[
                    ("name", "duzzifelipe's blog".into()),
                    ("short_name", "blog".into()),
                    ("start_url", "/".into()),
                    ("background_color", "#663399".into()),
                    ("theme_color", "#663399".into()),
                    ("display", "minimal-ui".into()),
                    ("icon", "src/images/icon.svg".into()),
                ],
            ),
            configured(
                "gtag",
                &[
                    ("tracking_ids", vec!["UA-101363511-1"].into()),
                    (
                        "gtag_config",
                        mapping(&[("anonymize_ip", true.into()), ("cookie_expires", 0.into())]),
                    ),
                    (
                        "plugin_config",
                        mapping(&[
                            ("head", false.into()),
                            ("respect_dnt", false.into()),
                            ("exclude", Value::Sequence(Vec::new())),
                        ]),
                    ),
                ],
            ),
        ]
    }
}

fn mapping(pairs: &[(&str, Value)]) -> Value {
    let mut map = Mapping::new();
    for (key, value) in pairs {
        map.insert(Value::from(*key), value.clone());
    }
    Value::Mapping(map)
}

fn configured(name: &str, options: &[(&str, Value)]) -> PluginEntry {
    PluginEntry::with_options(name, mapping(options))
}

fn plain(name: &str) -> PluginEntry {
    PluginEntry::Name(name.to_string())
}

fn entry_value(entry: PluginEntry) -> Value {
    match entry {
        PluginEntry::Name(name) => Value::String(name),
        PluginEntry::Configured { resolve, options } => {
            mapping(&[("resolve", Value::String(resolve)), ("options", options)])
        }
    }
}

/// `siteMetadata`: values shared by every page head
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "duzzifelipe's blog".to_string(),
            description: String::new(),
            author: "@duzzifelipe".to_string(),
            url: "http://localhost".to_string(),
        }
    }
}

/// Links shown in the header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub links: Vec<HeaderLink>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            links: vec![
                HeaderLink {
                    name: "GitHub".to_string(),
                    href: "https://github.com/duzzifelipe".to_string(),
                    icon: Some("github.svg".to_string()),
                },
                HeaderLink {
                    name: "Resume".to_string(),
                    href: "/resume/".to_string(),
                    icon: Some("resume.svg".to_string()),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeaderLink {
    pub name: String,
    pub href: String,
    /// Image path relative to the `images` source
    #[serde(default)]
    pub icon: Option<String>,
}
