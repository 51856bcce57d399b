//! Content loader - walks the registered sources for posts and images

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::markdown::RenderContext;
use super::{Content, FrontMatter, ImageNode, MarkdownRenderer, Post};
use crate::helpers::{extension_of, hashed_asset_path, is_contained, strip_html, summarize};
use crate::plugins::{ImagesOptions, Plugins, SourceOptions};
use crate::Site;

/// Length of descriptions derived from post text
const DESCRIPTION_LENGTH: usize = 160;

/// Loads content from the sources the plugin list registers
pub struct ContentLoader<'a> {
    site: &'a Site,
    plugins: &'a Plugins,
    renderer: Option<MarkdownRenderer>,
    site_host: Option<String>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site, plugins: &'a Plugins) -> Self {
        let renderer = plugins.markdown().cloned().map(MarkdownRenderer::new);
        Self {
            site,
            plugins,
            renderer,
            site_host: site.config.site_host(),
        }
    }

    /// Load every post and image node
    pub fn load(&self) -> Result<Content> {
        let mut content = Content::default();
        let mut skipped_markdown = 0usize;

        for source in self.plugins.sources() {
            let root = self.site.base_dir.join(&source.path);
            if !root.is_dir() {
                tracing::warn!("Source {} not found at {:?}", source.name, root);
                continue;
            }

            for path in source_files(&root, source)? {
                if is_markdown_file(&path) {
                    let Some(renderer) = &self.renderer else {
                        skipped_markdown += 1;
                        continue;
                    };
                    match self.load_post(&path, renderer) {
                        Ok(Some(post)) => content.posts.push(post),
                        Ok(None) => tracing::debug!("Skipping unpublished post {:?}", path),
                        Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
                    }
                } else if self.plugins.image_nodes() && is_image_file(&path) {
                    match image_node(&root, &path, source) {
                        Ok(node) => content.images.push(node),
                        Err(e) => tracing::warn!("Failed to index image {:?}: {}", path, e),
                    }
                }
            }
        }

        if skipped_markdown > 0 {
            tracing::warn!(
                "{} markdown files skipped: transformer-markdown is not registered",
                skipped_markdown
            );
        }

        content.posts.sort_by(|a, b| a.source.cmp(&b.source));
        check_unique_slugs(&content.posts)?;

        tracing::debug!(
            "Loaded {} posts and {} images",
            content.posts.len(),
            content.images.len()
        );
        Ok(content)
    }

    /// Load a single post; `None` when it is unpublished
    fn load_post(
        &self,
        path: &Path,
        renderer: &MarkdownRenderer,
    ) -> Result<Option<Post>> {
        let raw = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        if !fm.published {
            return Ok(None);
        }

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let date = match fm.parse_date() {
            Some(date) => date,
            None => {
                if let Some(value) = &fm.date {
                    tracing::warn!("Unparseable date {:?} in {:?}, using mtime", value, path);
                }
                file_modified(path)?
            }
        };

        let title = fm.title.clone().unwrap_or_else(|| stem.clone());
        let slug = match fm.slug.as_deref().map(|s| s.trim().trim_matches('/')) {
            Some(slug) if is_contained(Path::new(slug)) => slug.to_string(),
            Some(slug) if !slug.is_empty() => {
                tracing::warn!("Unsafe slug {:?} in {:?}, slugifying it", slug, path);
                slug::slugify(slug)
            }
            _ => slug::slugify(&stem),
        };
        if slug.is_empty() {
            bail!("Post {:?} has an empty slug", path);
        }

        let source_path = path
            .strip_prefix(&self.site.base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");

        let ctx = RenderContext {
            dir: path.parent().unwrap_or(Path::new(".")),
            root: &self.site.config.root,
            site_host: self.site_host.as_deref(),
            catch_links: self.plugins.catch_links(),
        };

        // Split excerpt and render markdown
        let (excerpt_md, full_md) = renderer.split_excerpt(body);
        let rendered = renderer.render(&full_md, &ctx)?;

        let description = fm.description.clone().or_else(|| {
            let text = match &excerpt_md {
                Some(excerpt) => MarkdownRenderer::plain_text(excerpt),
                None => strip_html(&rendered.html),
            };
            let text = summarize(&text, DESCRIPTION_LENGTH);
            (!text.is_empty()).then_some(text)
        });

        let mut post = Post::new(title, slug, date, source_path);
        post.description = description;
        post.content = rendered.html;
        post.path = format!(
            "{}/{}/",
            self.site.config.posts_dir.trim_matches('/'),
            post.slug
        );
        post.assets = rendered.assets;

        Ok(Some(post))
    }
}

/// Files of a source, sorted, skipping dotfiles and ignore globs
fn source_files(root: &Path, source: &SourceOptions) -> Result<Vec<std::path::PathBuf>> {
    let ignore = source.ignore_patterns()?;
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = relative_path(root, entry.path());
        if ignore.iter().any(|pattern| pattern.matches(&relative)) {
            tracing::debug!("Ignoring {} in source {}", relative, source.name);
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

fn image_node(root: &Path, path: &Path, source: &SourceOptions) -> Result<ImageNode> {
    Ok(ImageNode {
        source_name: source.name.clone(),
        relative_path: relative_path(root, path),
        extension: extension_of(path).unwrap_or_default(),
        full_path: path.to_path_buf(),
        public_path: hashed_asset_path("static", path)?,
    })
}

fn check_unique_slugs(posts: &[Post]) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for post in posts {
        if let Some(other) = seen.insert(&post.slug, &post.source) {
            bail!(
                "Duplicate post slug {:?} in {} and {}",
                post.slug,
                other,
                post.source
            );
        }
    }
    Ok(())
}

fn file_modified(path: &Path) -> Result<DateTime<Utc>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}

fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|s| s.starts_with('.')).unwrap_or(false)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    matches!(extension_of(path).as_deref(), Some("md" | "markdown"))
}

/// Files the image plugins index; svg is included for icons
fn is_image_file(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| ext == "svg" || ext == "gif" || ImagesOptions::EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::plugins::{PluginEntry, PluginRegistry};

    fn site_with(dir: &Path, plugins_yaml: &str) -> (Site, Plugins) {
        let config = SiteConfig {
            plugins: serde_yaml::from_str::<Vec<PluginEntry>>(plugins_yaml).unwrap(),
            ..Default::default()
        };
        let plugins = PluginRegistry::resolve(&config.plugins).unwrap();
        (Site::with_config(dir, config), plugins)
    }

    const PLUGINS: &str = r#"
- resolve: source-filesystem
  options: { name: markdown-pages, path: posts }
- transformer-markdown
- resolve: source-filesystem
  options: { name: images, path: images }
- transformer-sharp
"#;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_posts_and_images() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("posts/first.md"),
            "---\ntitle: First\ndate: 2020-01-02\nslug: my-first\n---\nIntro text.\n<!-- more -->\nRest.",
        );
        write(&dir.path().join("posts/Second Post.md"), "No front matter here.");
        write(&dir.path().join("posts/.draft.md"), "---\ntitle: Hidden\n---\nx");
        write(&dir.path().join("images/github.svg"), "<svg/>");
        write(&dir.path().join("images/notes.txt"), "not an image");

        let (site, plugins) = site_with(dir.path(), PLUGINS);
        let content = ContentLoader::new(&site, &plugins).load().unwrap();

        assert_eq!(content.posts.len(), 2);
        // Sorted by source path: uppercase sorts first
        assert_eq!(content.posts[0].slug, "second-post");
        let first = &content.posts[1];
        assert_eq!(first.title, "First");
        assert_eq!(first.slug, "my-first");
        assert_eq!(first.path, "posts/my-first/");
        assert_eq!(first.date.to_rfc3339(), "2020-01-02T00:00:00+00:00");
        assert_eq!(first.description.as_deref(), Some("Intro text."));

        let second = &content.posts[0];
        assert_eq!(second.title, "Second Post");
        assert_eq!(second.slug, "second-post");

        assert_eq!(content.images.len(), 1);
        let icon = content.images.find("images", "github.svg").unwrap();
        assert!(icon.public_path.starts_with("static/"));
        assert_eq!(icon.extension, "svg");
    }

    #[test]
    fn test_unpublished_posts_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("posts/draft.md"),
            "---\ntitle: Draft\npublished: false\n---\nx",
        );
        let (site, plugins) = site_with(dir.path(), PLUGINS);
        let content = ContentLoader::new(&site, &plugins).load().unwrap();
        assert!(content.posts.is_empty());
    }

    #[test]
    fn test_slug_cannot_leave_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("posts/a.md"), "---\nslug: ../../src\n---\na");
        write(&dir.path().join("posts/b.md"), "---\nslug: /notes/elixir/\n---\nb");
        let (site, plugins) = site_with(dir.path(), PLUGINS);
        let content = ContentLoader::new(&site, &plugins).load().unwrap();

        assert_eq!(content.posts[0].slug, "src");
        assert_eq!(content.posts[0].path, "posts/src/");
        assert_eq!(content.posts[1].slug, "notes/elixir");
    }

    #[test]
    fn test_description_from_excerpt_text() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("posts/a.md"),
            "Using **GenServer** and `call/3`.\n\n<!-- more -->\n\nThe rest.",
        );
        write(
            &dir.path().join("posts/b.md"),
            "---\ndescription: Given\n---\nIgnored <!-- more --> text",
        );
        let (site, plugins) = site_with(dir.path(), PLUGINS);
        let content = ContentLoader::new(&site, &plugins).load().unwrap();

        assert_eq!(
            content.posts[0].description.as_deref(),
            Some("Using GenServer and call/3.")
        );
        assert!(content.posts[0].content.contains("The rest."));
        assert_eq!(content.posts[1].description.as_deref(), Some("Given"));
    }

    #[test]
    fn test_duplicate_slug_is_error() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("posts/a.md"), "---\nslug: same\n---\na");
        write(&dir.path().join("posts/b.md"), "---\nslug: same\n---\nb");
        let (site, plugins) = site_with(dir.path(), PLUGINS);
        let err = ContentLoader::new(&site, &plugins).load().unwrap_err();
        assert!(err.to_string().contains("Duplicate post slug"));
    }

    #[test]
    fn test_markdown_ignored_without_transformer() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("posts/a.md"), "---\ntitle: A\n---\na");
        let (site, plugins) = site_with(
            dir.path(),
            "- resolve: source-filesystem\n  options: { name: markdown-pages, path: posts }\n",
        );
        let content = ContentLoader::new(&site, &plugins).load().unwrap();
        assert!(content.posts.is_empty());
        assert!(content.images.is_empty());
    }

    #[test]
    fn test_ignore_globs() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("posts/keep.md"), "keep");
        write(&dir.path().join("posts/wip/skip.md"), "skip");
        let (site, plugins) = site_with(
            dir.path(),
            r#"
- resolve: source-filesystem
  options: { name: markdown-pages, path: posts, ignore: ["wip/*"] }
- transformer-markdown
"#,
        );
        let content = ContentLoader::new(&site, &plugins).load().unwrap();
        assert_eq!(content.posts.len(), 1);
        assert_eq!(content.posts[0].slug, "keep");
    }
}
