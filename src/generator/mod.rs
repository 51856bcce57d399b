//! Generator module - writes the public directory using the built-in templates

use anyhow::{anyhow, bail, Context as _, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::components::{Header, NotFound, PostList, PostPage, Resume, SiteHead};
use crate::content::{Content, LinkedAsset};
use crate::helpers::{copy_into, is_contained, url_for};
use crate::plugins::{Plugins, WebManifest, MANIFEST_FILE};
use crate::query::{ImageQuery, PostListQuery};
use crate::templates::{TemplateRenderer, LAYOUT_CSS, RESUME_CSS};
use crate::Site;

const LAYOUT_CSS_PATH: &str = "css/layout.css";
const RESUME_CSS_PATH: &str = "css/resume.css";

/// Static site generator using Tera templates
pub struct Generator<'a> {
    site: &'a Site,
    plugins: &'a Plugins,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site, plugins: &'a Plugins) -> Result<Self> {
        Ok(Self {
            site,
            plugins,
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site
    pub fn generate(&self, content: &Content) -> Result<()> {
        let config = &self.site.config;
        let root = config.root.as_str();

        // Ensure public directory exists
        fs::create_dir_all(&self.site.public_dir)?;

        self.write(LAYOUT_CSS_PATH, LAYOUT_CSS)?;
        self.write(RESUME_CSS_PATH, RESUME_CSS)?;

        let icon_url = self.generate_manifest()?;

        let images = ImageQuery::new(&content.images);
        let header = Header::from_config(config, &images);
        let site_head = SiteHead::new(config, self.plugins, icon_url);

        // Index
        let summaries = PostListQuery::from_config(config)?.run(&content.posts);
        let head = site_head.page(PostList::TITLE, None, "", LAYOUT_CSS_PATH);
        let html = PostList::new(root, summaries).render(&self.renderer, &head, &header)?;
        self.write("index.html", &html)?;

        // Posts
        let timezone = config.tz()?;
        let mut assets: BTreeMap<String, &LinkedAsset> = BTreeMap::new();
        for post in &content.posts {
            let page = PostPage::new(post, &config.date_format, timezone);
            let head = site_head.page(
                &post.title,
                post.description.as_deref(),
                &post.path,
                LAYOUT_CSS_PATH,
            );
            let html = page.render(&self.renderer, &head, &header)?;
            self.write(&format!("{}index.html", post.path), &html)?;

            for asset in &post.assets {
                assets.entry(asset.public_path.clone()).or_insert(asset);
            }
        }

        // Resume
        let head = site_head.page(Resume::TITLE, None, Resume::PATH, RESUME_CSS_PATH);
        let html = Resume::default().render(&self.renderer, &head)?;
        self.write(&format!("{}index.html", Resume::PATH), &html)?;

        // 404
        let head = site_head.page(NotFound::TITLE, None, NotFound::FILE, LAYOUT_CSS_PATH);
        let html = NotFound.render(&self.renderer, &head, &header)?;
        self.write(NotFound::FILE, &html)?;

        // Files linked from posts and images resolved by queries
        for asset in assets.values() {
            self.copy(&asset.source, &asset.public_path)?;
        }
        let used_images = images.used();
        for node in &used_images {
            if !assets.contains_key(&node.public_path) {
                self.copy(&node.full_path, &node.public_path)?;
            }
        }

        tracing::info!(
            "Generated {} posts, {} linked files and {} images into {:?}",
            content.posts.len(),
            assets.len(),
            used_images.len(),
            self.site.public_dir
        );
        Ok(())
    }

    /// Write the manifest and copy its icon; returns the icon URL
    fn generate_manifest(&self) -> Result<Option<String>> {
        let Some(options) = self.plugins.manifest() else {
            return Ok(None);
        };
        let root = self.site.config.root.as_str();

        let icon_url = match &options.icon {
            Some(icon) => {
                let source = self.site.base_dir.join(icon);
                if !source.is_file() {
                    return Err(anyhow!("Manifest icon not found: {:?}", source));
                }
                let file_name = icon
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or_else(|| anyhow!("Manifest icon has no file name: {:?}", icon))?;
                let public_path = format!("icons/{}", file_name);
                self.copy(&source, &public_path)?;
                Some(url_for(root, &public_path))
            }
            None => None,
        };

        let manifest = WebManifest::new(options, icon_url.as_deref());
        self.write(MANIFEST_FILE, &manifest.to_json()?)?;

        Ok(icon_url)
    }

    /// Output path for a file relative to the public directory
    fn output_path(&self, relative: &str) -> Result<std::path::PathBuf> {
        if !is_contained(Path::new(relative)) {
            bail!("Refusing to write outside the public directory: {:?}", relative);
        }
        Ok(self.site.public_dir.join(relative))
    }

    fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let output_path = self.output_path(relative)?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, contents)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    fn copy(&self, source: &Path, relative: &str) -> Result<()> {
        let output_path = self.output_path(relative)?;
        copy_into(source, &output_path)?;
        tracing::debug!("Copied: {:?} -> {:?}", source, output_path);
        Ok(())
    }
}
