//! Page components
//!
//! Each component maps already-queried data onto one of the embedded
//! templates. None of them touch the filesystem.

mod head;
mod header;
mod not_found;
mod post_list;
mod post_page;
mod resume;

pub use head::{HeadData, MetaTag, SiteHead};
pub use header::{Header, HeaderIcon};
pub use not_found::NotFound;
pub use post_list::{PostList, PostRow};
pub use post_page::PostPage;
pub use resume::{Resume, ResumeEntry, EDUCATION, PROFESSIONAL_HISTORY, TECHNOLOGY_KNOWLEDGE};

use tera::Context;

/// Context shared by the pages rendered inside the layout
fn page_context(head: &HeadData, header: Option<&Header>) -> Context {
    let mut context = Context::new();
    context.insert("head", head);
    if let Some(header) = header {
        header.insert_into(&mut context);
    }
    context
}
