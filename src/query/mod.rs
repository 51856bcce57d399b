//! Build-time queries
//!
//! Components never walk content themselves; they receive the fixed-shape
//! results of these queries.

use anyhow::Result;
use chrono_tz::Tz;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::config::SiteConfig;
use crate::content::{ImageIndex, ImageNode, Post};
use crate::helpers::{date_iso, format_date};

/// One row of the post listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    /// Date formatted for display
    pub date: String,
    /// Date in ISO 8601 for `<time datetime>`
    pub date_iso: String,
    /// URL path without root, e.g. `posts/hello-world/`
    pub path: String,
}

/// All posts, newest first
#[derive(Debug, Clone)]
pub struct PostListQuery {
    pub date_format: String,
    pub timezone: Tz,
}

impl PostListQuery {
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            date_format: config.date_format.clone(),
            timezone: config.tz()?,
        })
    }

    /// Run the query; posts with equal dates keep their input order
    pub fn run(&self, posts: &[Post]) -> Vec<PostSummary> {
        let mut sorted: Vec<&Post> = posts.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        sorted
            .into_iter()
            .map(|post| {
                let local = post.date.with_timezone(&self.timezone);
                PostSummary {
                    slug: post.slug.clone(),
                    title: post.title.clone(),
                    date: format_date(&local, &self.date_format),
                    date_iso: date_iso(&local),
                    path: post.path.clone(),
                }
            })
            .collect()
    }
}

/// Lookup of image nodes by path within the `images` source
///
/// Every resolved node is recorded so only referenced images get copied.
pub struct ImageQuery<'a> {
    index: &'a ImageIndex,
    used: RefCell<BTreeMap<String, ImageNode>>,
}

impl<'a> ImageQuery<'a> {
    /// Source the header icons live in
    pub const IMAGES_SOURCE: &'static str = "images";

    pub fn new(index: &'a ImageIndex) -> Self {
        Self {
            index,
            used: RefCell::new(BTreeMap::new()),
        }
    }

    /// Find an image by its path relative to the source root
    pub fn resolve(&self, relative_path: &str) -> Option<ImageNode> {
        let node = self.index.find(Self::IMAGES_SOURCE, relative_path)?.clone();
        self.used
            .borrow_mut()
            .insert(node.public_path.clone(), node.clone());
        Some(node)
    }

    /// Nodes resolved so far, ordered by public path
    pub fn used(&self) -> Vec<ImageNode> {
        self.used.borrow().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn post(slug: &str, y: i32, m: u32, d: u32) -> Post {
        let mut post = Post::new(
            slug.to_uppercase(),
            slug.to_string(),
            Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
            format!("src/markdown-posts/{}.md", slug),
        );
        post.path = format!("posts/{}/", slug);
        post
    }

    fn query() -> PostListQuery {
        PostListQuery::from_config(&SiteConfig::default()).unwrap()
    }

    #[test]
    fn test_sorted_descending_with_format() {
        let posts = vec![
            post("old", 2019, 3, 4),
            post("new", 2021, 12, 31),
            post("mid", 2020, 7, 1),
        ];
        let rows = query().run(&posts);
        let slugs: Vec<_> = rows.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
        assert_eq!(rows[0].date, "31/12/2021");
        assert_eq!(rows[0].title, "NEW");
        assert_eq!(rows[0].path, "posts/new/");
        assert_eq!(rows[2].date_iso, "2019-03-04T12:00:00+00:00");
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let posts = vec![post("a", 2020, 1, 1), post("b", 2020, 1, 1)];
        let rows = query().run(&posts);
        assert_eq!(rows[0].slug, "a");
        assert_eq!(rows[1].slug, "b");
    }

    #[test]
    fn test_dates_shown_in_configured_zone() {
        let q = PostListQuery {
            timezone: chrono_tz::America::Sao_Paulo,
            ..query()
        };
        let mut p = post("late", 2020, 5, 1);
        p.date = Utc.with_ymd_and_hms(2020, 5, 1, 1, 0, 0).unwrap();
        assert_eq!(q.run(&[p])[0].date, "30/04/2020");
    }

    #[test]
    fn test_empty_list() {
        assert!(query().run(&[]).is_empty());
    }

    #[test]
    fn test_image_query_records_resolved() {
        let mut index = ImageIndex::default();
        for (source, path) in [("images", "github.svg"), ("images", "resume.svg"), ("other", "x.png")] {
            index.push(ImageNode {
                source_name: source.to_string(),
                relative_path: path.to_string(),
                extension: "svg".to_string(),
                full_path: PathBuf::from(path),
                public_path: format!("static/abc/{}", path),
            });
        }

        let images = ImageQuery::new(&index);
        assert!(images.resolve("x.png").is_none());
        assert_eq!(
            images.resolve("github.svg").map(|n| n.public_path),
            Some("static/abc/github.svg".to_string())
        );
        images.resolve("github.svg");
        assert_eq!(images.used().len(), 1);
    }
}
