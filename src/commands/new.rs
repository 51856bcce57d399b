//! Create a new post

use anyhow::{anyhow, bail, Result};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Source new posts are written into
pub const POSTS_SOURCE: &str = "markdown-pages";

/// Write a post scaffold; returns the created file
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let plugins = site.plugins()?;
    let source = plugins
        .source(POSTS_SOURCE)
        .ok_or_else(|| anyhow!("No source named {} is registered", POSTS_SOURCE))?;

    let target_dir = site.base_dir.join(&source.path);
    fs::create_dir_all(&target_dir)?;

    let slug = match slug {
        Some(slug) => slug::slugify(slug),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        bail!("Cannot derive a slug from {:?}", title);
    }

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let now = chrono::Utc::now();
    let content = format!(
        "---\ntitle: {}\ndate: {}\nslug: {}\n---\n\n",
        yaml_scalar(title),
        now.format("%Y-%m-%d %H:%M:%S"),
        slug
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Quote a title when YAML would otherwise misread it
fn yaml_scalar(value: &str) -> String {
    match serde_yaml::from_str::<String>(value) {
        Ok(parsed) if parsed == value => value.to_string(),
        _ => serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value)),
    }
}
