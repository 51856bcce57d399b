//! Built-in site templates using the Tera template engine
//!
//! Every template and stylesheet is embedded in the binary, so a site needs
//! nothing but `site.yml` and its sources.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::escape_html;

/// Stylesheet shared by pages rendered inside the layout
pub const LAYOUT_CSS: &str = include_str!("site/layout.css");

/// Stylesheet of the resume page
pub const RESUME_CSS: &str = include_str!("site/resume.css");

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped explicitly with the `html` filter; tera's own
        // escaping would also mangle the slashes in every URL
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("base.html", include_str!("site/base.html")),
            ("layout.html", include_str!("site/layout.html")),
            ("index.html", include_str!("site/index.html")),
            ("post.html", include_str!("site/post.html")),
            ("resume.html", include_str!("site/resume.html")),
            ("404.html", include_str!("site/404.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("site/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
        ])?;

        tera.register_filter("html", html_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: escape text for HTML content and attributes
fn html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = match value {
        tera::Value::Null => String::new(),
        tera::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(escape_html(&s)))
}
