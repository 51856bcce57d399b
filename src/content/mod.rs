//! Content module - posts, image nodes, and markdown processing

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::{MarkdownRenderer, RenderContext, Rendered};
pub use post::{Content, ImageIndex, ImageNode, LinkedAsset, Post};
