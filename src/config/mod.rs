//! Configuration module

mod site;

pub use site::HeaderConfig;
pub use site::HeaderLink;
pub use site::SiteConfig;
pub use site::SiteMetadata;
