//! Typed option structs for each registered plugin

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::PluginEntry;

/// `source-filesystem`: a named directory whose files become content nodes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceOptions {
    pub name: String,
    /// Directory relative to the site base directory
    pub path: PathBuf,
    /// Glob patterns (relative to `path`) of files to skip
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl SourceOptions {
    /// Compile the ignore globs
    pub fn ignore_patterns(&self) -> Result<Vec<glob::Pattern>, glob::PatternError> {
        self.ignore.iter().map(|p| glob::Pattern::new(p)).collect()
    }
}

/// `transformer-markdown` as written in the config, before its sub-plugins are resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkdownOptions {
    pub excerpt_separator: String,
    pub plugins: Vec<PluginEntry>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            excerpt_separator: "<!-- more -->".to_string(),
            plugins: Vec::new(),
        }
    }
}

/// `markdown-highlight`: syntax highlighting of fenced code blocks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HighlightOptions {
    pub class_prefix: String,
    pub show_line_numbers: bool,
    /// syntect theme name
    pub theme: String,
    /// Language aliases, e.g. `ex: elixir`
    pub aliases: HashMap<String, String>,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            class_prefix: "language-".to_string(),
            show_line_numbers: false,
            theme: "InspiredGitHub".to_string(),
            aliases: HashMap::new(),
        }
    }
}

/// `markdown-images`: responsive wrappers for local images
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImagesOptions {
    pub max_width: u32,
    pub link_images_to_original: bool,
    pub wrapper_style: String,
}

impl Default for ImagesOptions {
    fn default() -> Self {
        Self {
            max_width: 650,
            link_images_to_original: true,
            wrapper_style: String::new(),
        }
    }
}

impl ImagesOptions {
    /// Extensions this plugin takes over from copy-linked-files
    pub const EXTENSIONS: [&'static str; 6] = ["png", "jpg", "jpeg", "bmp", "tiff", "webp"];
}

/// `markdown-copy-linked-files`: copy files referenced from posts into the public directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CopyLinkedFilesOptions {
    pub ignore_file_extensions: Vec<String>,
    pub destination_dir: String,
}

impl Default for CopyLinkedFilesOptions {
    fn default() -> Self {
        Self {
            ignore_file_extensions: Vec::new(),
            destination_dir: "static".to_string(),
        }
    }
}

impl CopyLinkedFilesOptions {
    pub fn ignores(&self, extension: Option<&str>) -> bool {
        match extension {
            Some(ext) => self
                .ignore_file_extensions
                .iter()
                .any(|ignored| ignored.trim_start_matches('.').eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// `markdown-external-links`: attributes for links leaving the site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExternalLinksOptions {
    pub target: Option<String>,
    /// Empty string omits the attribute
    pub rel: String,
}

impl Default for ExternalLinksOptions {
    fn default() -> Self {
        Self {
            target: None,
            rel: "nofollow noopener noreferrer".to_string(),
        }
    }
}

/// `manifest`: installable web app descriptor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ManifestOptions {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub background_color: String,
    pub theme_color: String,
    pub display: String,
    /// Icon path relative to the site base directory
    pub icon: Option<PathBuf>,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            short_name: String::new(),
            start_url: "/".to_string(),
            background_color: "#ffffff".to_string(),
            theme_color: "#ffffff".to_string(),
            display: "minimal-ui".to_string(),
            icon: None,
        }
    }
}

/// `gtag`: Google global site tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GtagOptions {
    pub tracking_ids: Vec<String>,
    #[serde(default)]
    pub gtag_config: GtagConfig,
    #[serde(default)]
    pub plugin_config: GtagPluginConfig,
}

/// Passed verbatim to `gtag('config', ...)`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GtagConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymize_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookie_expires: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GtagPluginConfig {
    /// Put the snippet in `<head>` instead of the end of `<body>`
    pub head: bool,
    pub respect_dnt: bool,
    /// Glob patterns of page paths that get no snippet
    pub exclude: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_defaults_from_empty_mapping() {
        let images: ImagesOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(images.max_width, 650);
        assert!(images.link_images_to_original);

        let links: ExternalLinksOptions = serde_yaml::from_str("target: _blank").unwrap();
        assert_eq!(links.target.as_deref(), Some("_blank"));
        assert_eq!(links.rel, "nofollow noopener noreferrer");
    }

    #[test]
    fn test_copy_linked_files_ignores() {
        let options = CopyLinkedFilesOptions {
            ignore_file_extensions: vec!["png".into(), ".JPG".into()],
            ..Default::default()
        };
        assert!(options.ignores(Some("png")));
        assert!(options.ignores(Some("jpg")));
        assert!(!options.ignores(Some("pdf")));
        assert!(!options.ignores(None));
    }

    #[test]
    fn test_source_requires_name_and_path() {
        assert!(serde_yaml::from_str::<SourceOptions>("name: posts").is_err());
        let source: SourceOptions =
            serde_yaml::from_str("name: posts\npath: src/posts").unwrap();
        assert_eq!(source.path, PathBuf::from("src/posts"));
        assert!(source.ignore.is_empty());
    }

    #[test]
    fn test_gtag_config_json_skips_unset() {
        let config = GtagConfig {
            optimize_id: None,
            anonymize_ip: Some(true),
            cookie_expires: Some(0),
        };
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"anonymize_ip":true,"cookie_expires":0}"#
        );
    }
}
