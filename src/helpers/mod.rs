//! Helper functions shared by the loader, the markdown plugins and the templates

mod date;
mod files;
mod html;
mod url;

pub use date::*;
pub use files::*;
pub use html::*;
pub use url::*;
