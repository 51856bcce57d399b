//! List site content

use anyhow::Result;

use crate::content::ContentLoader;
use crate::plugins::{Plugin, PluginRegistry};
use crate::query::PostListQuery;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    for line in lines(site, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed for a content type
pub fn lines(site: &Site, content_type: &str) -> Result<Vec<String>> {
    let plugins = site.plugins()?;
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            let content = ContentLoader::new(site, &plugins).load()?;
            let rows = PostListQuery::from_config(&site.config)?.run(&content.posts);
            out.push(format!("Posts ({}):", rows.len()));
            for row in rows {
                out.push(format!("  {} - {} [{}]", row.date, row.title, row.slug));
            }
        }
        "plugin" | "plugins" => {
            out.push(format!("Plugins ({}):", plugins.len()));
            for plugin in plugins.iter() {
                match plugin {
                    Plugin::SourceFilesystem(source) => out.push(format!(
                        "  {} ({} -> {})",
                        plugin.name(),
                        source.name,
                        source.path.display()
                    )),
                    Plugin::TransformerMarkdown(markdown) => {
                        out.push(format!("  {}", plugin.name()));
                        for sub in &markdown.plugins {
                            out.push(format!("    {}", sub.name()));
                        }
                    }
                    Plugin::Gtag(gtag) => out.push(format!(
                        "  {} ({})",
                        plugin.name(),
                        gtag.options().tracking_ids.join(", ")
                    )),
                    _ => out.push(format!("  {}", plugin.name())),
                }
            }
            out.push(format!(
                "Available: {}",
                PluginRegistry::names().collect::<Vec<_>>().join(", ")
            ));
            out.push(format!(
                "Available markdown plugins: {}",
                PluginRegistry::markdown_names().collect::<Vec<_>>().join(", ")
            ));
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: posts, plugins",
                content_type
            );
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_plugins() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let lines = lines(&site, "plugins").unwrap();
        assert_eq!(lines[0], "Plugins (9):");
        assert_eq!(lines[1], "  source-filesystem (markdown-pages -> src/markdown-posts)");
        assert_eq!(lines[3], "    markdown-highlight");
        assert!(lines.contains(&"  gtag (UA-101363511-1)".to_string()));
        assert!(lines.last().unwrap().ends_with("markdown-external-links"));
    }

    #[test]
    fn test_list_posts() {
        let dir = tempfile::tempdir().unwrap();
        let posts = dir.path().join("src/markdown-posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), "---\ntitle: A\ndate: 2020-01-01\n---\na").unwrap();
        fs::write(posts.join("b.md"), "---\ntitle: B\ndate: 2021-02-03\n---\nb").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let lines = lines(&site, "posts").unwrap();
        assert_eq!(
            lines,
            vec![
                "Posts (2):".to_string(),
                "  03/02/2021 - B [b]".to_string(),
                "  01/01/2020 - A [a]".to_string(),
            ]
        );
        assert!(super::lines(&site, "tags").is_err());
    }
}
