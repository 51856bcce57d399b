//! Build plugins
//!
//! `site.yml` carries an ordered list of plugin entries, each a bare name or a
//! `{ resolve, options }` mapping. [`PluginRegistry::resolve`] looks every name
//! up in a fixed table and deserializes its options into a typed struct, so a
//! misspelled name or option fails the build before any content is read.

mod gtag;
mod manifest;
mod options;

pub use gtag::Gtag;
pub use manifest::{icon_mime_type, ManifestIcon, WebManifest, MANIFEST_FILE};
pub use options::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a plugin list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PluginEntry {
    Name(String),
    Configured {
        resolve: String,
        #[serde(default)]
        options: serde_yaml::Value,
    },
}

impl PluginEntry {
    /// Entry with an options mapping
    pub fn with_options(name: &str, options: serde_yaml::Value) -> Self {
        PluginEntry::Configured {
            resolve: name.to_string(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PluginEntry::Name(name) => name,
            PluginEntry::Configured { resolve, .. } => resolve,
        }
    }

    /// Options mapping; absent or null options read as an empty mapping
    pub fn options(&self) -> serde_yaml::Value {
        match self {
            PluginEntry::Configured { options, .. } if !options.is_null() => options.clone(),
            _ => serde_yaml::Value::Mapping(serde_yaml::Mapping::new()),
        }
    }
}

/// Errors raised while resolving the plugin list
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Unknown plugin: {0}")]
    Unknown(String),

    #[error("Invalid options for plugin {name}: {message}")]
    InvalidOptions { name: String, message: String },

    #[error("Duplicate source name: {0}")]
    DuplicateSource(String),

    #[error("Plugin {plugin} requires {requires}")]
    MissingDependency { plugin: String, requires: String },
}

impl PluginError {
    fn invalid(name: &str, message: impl ToString) -> Self {
        PluginError::InvalidOptions {
            name: name.to_string(),
            message: message.to_string(),
        }
    }
}

/// A resolved top-level plugin
#[derive(Debug, Clone)]
pub enum Plugin {
    SourceFilesystem(SourceOptions),
    TransformerMarkdown(MarkdownConfig),
    CatchLinks,
    HeadMetadata,
    TransformerSharp,
    PluginSharp,
    Manifest(ManifestOptions),
    Gtag(Gtag),
}

impl Plugin {
    pub fn name(&self) -> &'static str {
        match self {
            Plugin::SourceFilesystem(_) => "source-filesystem",
            Plugin::TransformerMarkdown(_) => "transformer-markdown",
            Plugin::CatchLinks => "catch-links",
            Plugin::HeadMetadata => "head-metadata",
            Plugin::TransformerSharp => "transformer-sharp",
            Plugin::PluginSharp => "plugin-sharp",
            Plugin::Manifest(_) => "manifest",
            Plugin::Gtag(_) => "gtag",
        }
    }
}

/// A resolved markdown sub-plugin
#[derive(Debug, Clone)]
pub enum MarkdownPlugin {
    Highlight(HighlightOptions),
    Images(ImagesOptions),
    CopyLinkedFiles(CopyLinkedFilesOptions),
    ExternalLinks(ExternalLinksOptions),
}

impl MarkdownPlugin {
    pub fn name(&self) -> &'static str {
        match self {
            MarkdownPlugin::Highlight(_) => "markdown-highlight",
            MarkdownPlugin::Images(_) => "markdown-images",
            MarkdownPlugin::CopyLinkedFiles(_) => "markdown-copy-linked-files",
            MarkdownPlugin::ExternalLinks(_) => "markdown-external-links",
        }
    }
}

/// `transformer-markdown` with its sub-plugins resolved, in list order
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    pub excerpt_separator: String,
    pub plugins: Vec<MarkdownPlugin>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            excerpt_separator: MarkdownOptions::default().excerpt_separator,
            plugins: Vec::new(),
        }
    }
}

impl MarkdownConfig {
    pub fn highlight(&self) -> Option<&HighlightOptions> {
        self.plugins.iter().find_map(|p| match p {
            MarkdownPlugin::Highlight(o) => Some(o),
            _ => None,
        })
    }

    pub fn images(&self) -> Option<&ImagesOptions> {
        self.plugins.iter().find_map(|p| match p {
            MarkdownPlugin::Images(o) => Some(o),
            _ => None,
        })
    }

    pub fn copy_linked_files(&self) -> Option<&CopyLinkedFilesOptions> {
        self.plugins.iter().find_map(|p| match p {
            MarkdownPlugin::CopyLinkedFiles(o) => Some(o),
            _ => None,
        })
    }

    pub fn external_links(&self) -> Option<&ExternalLinksOptions> {
        self.plugins.iter().find_map(|p| match p {
            MarkdownPlugin::ExternalLinks(o) => Some(o),
            _ => None,
        })
    }
}

/// The resolved plugin list
#[derive(Debug, Clone, Default)]
pub struct Plugins {
    entries: Vec<Plugin>,
}

impl Plugins {
    pub fn iter(&self) -> impl Iterator<Item = &Plugin> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered sources, in list order
    pub fn sources(&self) -> impl Iterator<Item = &SourceOptions> {
        self.entries.iter().filter_map(|p| match p {
            Plugin::SourceFilesystem(o) => Some(o),
            _ => None,
        })
    }

    pub fn source(&self, name: &str) -> Option<&SourceOptions> {
        self.sources().find(|s| s.name == name)
    }

    pub fn markdown(&self) -> Option<&MarkdownConfig> {
        self.entries.iter().find_map(|p| match p {
            Plugin::TransformerMarkdown(o) => Some(o),
            _ => None,
        })
    }

    pub fn catch_links(&self) -> bool {
        self.has(|p| matches!(p, Plugin::CatchLinks))
    }

    pub fn head_metadata(&self) -> bool {
        self.has(|p| matches!(p, Plugin::HeadMetadata))
    }

    /// Whether image files become queryable nodes
    pub fn image_nodes(&self) -> bool {
        self.has(|p| matches!(p, Plugin::TransformerSharp))
    }

    pub fn manifest(&self) -> Option<&ManifestOptions> {
        self.entries.iter().find_map(|p| match p {
            Plugin::Manifest(o) => Some(o),
            _ => None,
        })
    }

    pub fn gtag(&self) -> Option<&Gtag> {
        self.entries.iter().find_map(|p| match p {
            Plugin::Gtag(o) => Some(o),
            _ => None,
        })
    }

    fn has(&self, pred: impl Fn(&Plugin) -> bool) -> bool {
        self.entries.iter().any(pred)
    }
}

type Constructor = fn(&PluginEntry) -> Result<Plugin, PluginError>;
type MarkdownConstructor = fn(&PluginEntry) -> Result<MarkdownPlugin, PluginError>;

/// The closed set of plugins the build knows about
pub struct PluginRegistry;

impl PluginRegistry {
    const PLUGINS: &'static [(&'static str, Constructor)] = &[
        ("source-filesystem", source_filesystem),
        ("transformer-markdown", transformer_markdown),
        ("catch-links", catch_links),
        ("head-metadata", head_metadata),
        ("transformer-sharp", transformer_sharp),
        ("plugin-sharp", plugin_sharp),
        ("manifest", manifest),
        ("gtag", gtag),
    ];

    const MARKDOWN_PLUGINS: &'static [(&'static str, MarkdownConstructor)] = &[
        ("markdown-highlight", markdown_highlight),
        ("markdown-images", markdown_images),
        ("markdown-copy-linked-files", markdown_copy_linked_files),
        ("markdown-external-links", markdown_external_links),
    ];

    /// Names of all top-level plugins
    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::PLUGINS.iter().map(|(name, _)| *name)
    }

    /// Names of all markdown sub-plugins
    pub fn markdown_names() -> impl Iterator<Item = &'static str> {
        Self::MARKDOWN_PLUGINS.iter().map(|(name, _)| *name)
    }

    /// Resolve a plugin list, preserving order
    pub fn resolve(entries: &[PluginEntry]) -> Result<Plugins, PluginError> {
        let mut resolved = Vec::with_capacity(entries.len());

        for entry in entries {
            let constructor = Self::PLUGINS
                .iter()
                .find(|(name, _)| *name == entry.name())
                .map(|(_, constructor)| constructor)
                .ok_or_else(|| PluginError::Unknown(entry.name().to_string()))?;
            let plugin = constructor(entry)?;
            tracing::debug!("Resolved plugin {}", plugin.name());
            resolved.push(plugin);
        }

        let plugins = Plugins { entries: resolved };
        Self::check(&plugins)?;
        Ok(plugins)
    }

    fn resolve_markdown(entry: &PluginEntry) -> Result<MarkdownPlugin, PluginError> {
        Self::MARKDOWN_PLUGINS
            .iter()
            .find(|(name, _)| *name == entry.name())
            .map(|(_, constructor)| constructor)
            .ok_or_else(|| PluginError::Unknown(entry.name().to_string()))
            .and_then(|constructor| constructor(entry))
    }

    /// Cross-plugin constraints
    fn check(plugins: &Plugins) -> Result<(), PluginError> {
        let mut seen = std::collections::HashSet::new();
        for source in plugins.sources() {
            if !seen.insert(source.name.as_str()) {
                return Err(PluginError::DuplicateSource(source.name.clone()));
            }
        }

        let has_sharp = plugins.has(|p| matches!(p, Plugin::PluginSharp));
        if let Some(markdown) = plugins.markdown() {
            if markdown.images().is_some() && !has_sharp {
                return Err(PluginError::MissingDependency {
                    plugin: "markdown-images".to_string(),
                    requires: "plugin-sharp".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn parse_options<T: serde::de::DeserializeOwned>(entry: &PluginEntry) -> Result<T, PluginError> {
    serde_yaml::from_value(entry.options()).map_err(|e| PluginError::invalid(entry.name(), e))
}

fn source_filesystem(entry: &PluginEntry) -> Result<Plugin, PluginError> {
    let options: SourceOptions = parse_options(entry)?;
    options
        .ignore_patterns()
        .map_err(|e| PluginError::invalid(entry.name(), e))?;
    Ok(Plugin::SourceFilesystem(options))
}

fn transformer_markdown(entry: &PluginEntry) -> Result<Plugin, PluginError> {
    let options: MarkdownOptions = parse_options(entry)?;
    let plugins = options
        .plugins
        .iter()
        .map(PluginRegistry::resolve_markdown)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Plugin::TransformerMarkdown(MarkdownConfig {
        excerpt_separator: options.excerpt_separator,
        plugins,
    }))
}

fn catch_links(_: &PluginEntry) -> Result<Plugin, PluginError> {
    Ok(Plugin::CatchLinks)
}

fn head_metadata(_: &PluginEntry) -> Result<Plugin, PluginError> {
    Ok(Plugin::HeadMetadata)
}

fn transformer_sharp(_: &PluginEntry) -> Result<Plugin, PluginError> {
    Ok(Plugin::TransformerSharp)
}

fn plugin_sharp(_: &PluginEntry) -> Result<Plugin, PluginError> {
    Ok(Plugin::PluginSharp)
}

fn manifest(entry: &PluginEntry) -> Result<Plugin, PluginError> {
    let options: ManifestOptions = parse_options(entry)?;
    if options.name.is_empty() {
        return Err(PluginError::invalid(entry.name(), "name must not be empty"));
    }
    Ok(Plugin::Manifest(options))
}

fn gtag(entry: &PluginEntry) -> Result<Plugin, PluginError> {
    let options: GtagOptions = parse_options(entry)?;
    Gtag::new(options)
        .map(Plugin::Gtag)
        .map_err(|message| PluginError::invalid(entry.name(), message))
}

fn markdown_highlight(entry: &PluginEntry) -> Result<MarkdownPlugin, PluginError> {
    Ok(MarkdownPlugin::Highlight(parse_options(entry)?))
}

fn markdown_images(entry: &PluginEntry) -> Result<MarkdownPlugin, PluginError> {
    Ok(MarkdownPlugin::Images(parse_options(entry)?))
}

fn markdown_copy_linked_files(entry: &PluginEntry) -> Result<MarkdownPlugin, PluginError> {
    Ok(MarkdownPlugin::CopyLinkedFiles(parse_options(entry)?))
}

fn markdown_external_links(entry: &PluginEntry) -> Result<MarkdownPlugin, PluginError> {
    Ok(MarkdownPlugin::ExternalLinks(parse_options(entry)?))
}
