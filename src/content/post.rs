//! Post and image node models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file referenced from a post that gets copied into the public directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinkedAsset {
    /// File on disk
    pub source: PathBuf,
    /// Destination relative to the public directory
    pub public_path: String,
}

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// URL-friendly name
    pub slug: String,

    /// Publication date
    pub date: DateTime<Utc>,

    /// Short description for the page head
    pub description: Option<String>,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the site base directory)
    pub source: String,

    /// URL path without root, e.g. `posts/hello-world/`
    pub path: String,

    /// Files the markdown plugins asked to copy
    pub assets: Vec<LinkedAsset>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, slug: String, date: DateTime<Utc>, source: String) -> Self {
        Self {
            title,
            slug,
            date,
            description: None,
            content: String::new(),
            source,
            path: String::new(),
            assets: Vec::new(),
        }
    }
}

/// An image file discovered in a source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageNode {
    /// Name of the source the image came from
    pub source_name: String,
    /// Path relative to the source root, `/`-separated
    pub relative_path: String,
    /// Lowercased extension
    pub extension: String,
    /// Full path on disk
    pub full_path: PathBuf,
    /// Destination relative to the public directory
    pub public_path: String,
}

/// Image nodes, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ImageIndex {
    nodes: Vec<ImageNode>,
}

impl ImageIndex {
    pub fn push(&mut self, node: ImageNode) {
        self.nodes.push(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by source name and relative path
    pub fn find(&self, source_name: &str, relative_path: &str) -> Option<&ImageNode> {
        let relative_path = relative_path.trim_start_matches("./");
        self.nodes
            .iter()
            .find(|n| n.source_name == source_name && n.relative_path == relative_path)
    }
}

/// Everything the loader produced for one build
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub posts: Vec<Post>,
    pub images: ImageIndex,
}
