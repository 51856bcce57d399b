//! Markdown rendering with the markdown sub-plugins applied
//!
//! pulldown-cmark does the parsing; this module rewrites the event stream:
//! code blocks are highlighted, local images become responsive wrappers,
//! linked files are scheduled for copying, and external links get their
//! target/rel attributes.

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::LinkedAsset;
use crate::helpers::{
    attr, escape_html, extension_of, hashed_asset_path, is_external, is_relative_path,
    split_relative, url_for,
};
use crate::plugins::{CopyLinkedFilesOptions, HighlightOptions, ImagesOptions, MarkdownConfig};

/// Per-file inputs to rendering
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Directory of the markdown file; relative links resolve against it
    pub dir: &'a Path,
    /// Site root path prefix
    pub root: &'a str,
    /// Host of the site URL
    pub site_host: Option<&'a str>,
    /// Rewrite root-relative links under the site root
    pub catch_links: bool,
}

/// Rendered HTML plus the files it references
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub assets: Vec<LinkedAsset>,
}

/// An image being collected between its start and end events
struct PendingImage {
    url: String,
    title: String,
    alt: String,
}

/// Markdown renderer configured by `transformer-markdown`
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    config: MarkdownConfig,
}

impl MarkdownRenderer {
    pub fn new(config: MarkdownConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            config,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str, ctx: &RenderContext) -> Result<Rendered> {
        // Front-matter is handled separately in FrontMatter::parse()
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut assets = Vec::new();

        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        // One entry per open link: true when it was emitted as raw HTML
        let mut open_links: Vec<bool> = Vec::new();
        let mut image: Option<PendingImage> = None;

        for event in parser {
            match event {
                Event::End(TagEnd::Image) if image.is_some() => {
                    if let Some(pending) = image.take() {
                        let html = self.image_wrapper(&pending, !open_links.is_empty());
                        events.push(Event::InlineHtml(CowStr::from(html)));
                    }
                }
                Event::Text(text) | Event::Code(text) if image.is_some() => {
                    if let Some(pending) = image.as_mut() {
                        pending.alt.push_str(&text);
                    }
                }
                _ if image.is_some() => {}

                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(|lang| lang.to_string()),
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let html = self.code_block(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(html)));
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }

                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    let href = if link_type == LinkType::Email {
                        dest_url.to_string()
                    } else {
                        self.rewrite_link(&dest_url, ctx, &mut assets)?
                    };
                    let external = self
                        .config
                        .external_links()
                        .filter(|_| is_external(&href, ctx.site_host));

                    if href != *dest_url || external.is_some() {
                        let mut tag = format!(r#"<a href="{}""#, escape_html(&href));
                        tag.push_str(&attr("title", Some(&*title)));
                        if let Some(options) = external {
                            tag.push_str(&attr("target", options.target.as_deref()));
                            tag.push_str(&attr("rel", Some(options.rel.as_str())));
                        }
                        tag.push('>');
                        events.push(Event::InlineHtml(CowStr::from(tag)));
                        open_links.push(true);
                    } else {
                        events.push(Event::Start(Tag::Link {
                            link_type,
                            dest_url,
                            title,
                            id,
                        }));
                        open_links.push(false);
                    }
                }
                Event::End(TagEnd::Link) => {
                    if open_links.pop().unwrap_or(false) {
                        events.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                    } else {
                        events.push(Event::End(TagEnd::Link));
                    }
                }

                Event::Start(Tag::Image {
                    link_type,
                    dest_url,
                    title,
                    id,
                }) => {
                    if let Some(pending) = self.local_image(&dest_url, &title, ctx, &mut assets)? {
                        image = Some(pending);
                    } else {
                        let src = self.copy_if_linked(&dest_url, ctx, &mut assets)?;
                        events.push(Event::Start(Tag::Image {
                            link_type,
                            dest_url: CowStr::from(src),
                            title,
                            id,
                        }));
                    }
                }

                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(Rendered {
            html: html_output,
            assets,
        })
    }

    /// Split content on the excerpt separator
    pub fn split_excerpt(&self, content: &str) -> (Option<String>, String) {
        let separator = self.config.excerpt_separator.as_str();
        if separator.is_empty() {
            return (None, content.to_string());
        }
        if let Some(pos) = content.find(separator) {
            let excerpt = content[..pos].trim().to_string();
            let remaining = content[pos + separator.len()..].trim();
            let full = format!("{}\n\n{}", excerpt, remaining);
            (Some(excerpt), full)
        } else {
            (None, content.to_string())
        }
    }

    /// Text of a markdown fragment without markup, for descriptions
    pub fn plain_text(markdown: &str) -> String {
        let mut text = String::with_capacity(markdown.len());
        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak | Event::End(TagEnd::Paragraph) => {
                    text.push(' ')
                }
                _ => {}
            }
        }
        text
    }

    /// Link targets: copy local files, keep root-relative links under the site root
    fn rewrite_link(
        &self,
        url: &str,
        ctx: &RenderContext,
        assets: &mut Vec<LinkedAsset>,
    ) -> Result<String> {
        if is_relative_path(url) {
            return self.copy_if_linked(url, ctx, assets);
        }
        if ctx.catch_links && url.starts_with('/') && !url.starts_with("//") {
            return Ok(with_root(ctx.root, url));
        }
        Ok(url.to_string())
    }

    /// Apply copy-linked-files to a relative URL, returning the URL to emit
    fn copy_if_linked(
        &self,
        url: &str,
        ctx: &RenderContext,
        assets: &mut Vec<LinkedAsset>,
    ) -> Result<String> {
        let Some(options) = self.config.copy_linked_files() else {
            return Ok(url.to_string());
        };
        if !is_relative_path(url) {
            return Ok(url.to_string());
        }
        match copy_linked_file(url, options, ctx, assets)? {
            Some(rewritten) => Ok(rewritten),
            None => Ok(url.to_string()),
        }
    }

    /// Start collecting a local image handled by markdown-images
    fn local_image(
        &self,
        url: &str,
        title: &str,
        ctx: &RenderContext,
        assets: &mut Vec<LinkedAsset>,
    ) -> Result<Option<PendingImage>> {
        if self.config.images().is_none() || !is_relative_path(url) {
            return Ok(None);
        }

        let (path, _) = split_relative(url);
        let file = ctx.dir.join(&path);
        let is_image = extension_of(&file)
            .map(|ext| ImagesOptions::EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        if !is_image {
            return Ok(None);
        }
        if !file.is_file() {
            tracing::warn!("Image not found: {:?}", file);
            return Ok(None);
        }

        let public_path = hashed_asset_path("static", &file)?;
        let url = url_for(ctx.root, &public_path);
        assets.push(LinkedAsset {
            source: file,
            public_path,
        });

        Ok(Some(PendingImage {
            url,
            title: title.to_string(),
            alt: String::new(),
        }))
    }

    fn image_wrapper(&self, image: &PendingImage, inside_link: bool) -> String {
        let options = self.config.images().cloned().unwrap_or_default();

        let img = format!(
            r#"<img class="resp-image-image" alt="{}"{} src="{}" loading="lazy" style="width: 100%; height: 100%; margin: 0; vertical-align: middle;">"#,
            escape_html(&image.alt),
            attr("title", Some(image.title.as_str())),
            escape_html(&image.url),
        );

        let inner = if options.link_images_to_original && !inside_link {
            format!(
                r#"<a class="resp-image-link" href="{}" style="display: block" target="_blank" rel="noopener">{}</a>"#,
                escape_html(&image.url),
                img
            )
        } else {
            img
        };

        let extra_style = if options.wrapper_style.is_empty() {
            String::new()
        } else {
            format!(" {}", escape_html(&options.wrapper_style))
        };

        format!(
            r#"<span class="resp-image-wrapper" style="position: relative; display: block; margin-left: auto; margin-right: auto; max-width: {}px;{}">{}</span>"#,
            options.max_width, extra_style, inner
        )
    }

    fn code_block(&self, code: &str, lang: Option<&str>) -> String {
        match self.config.highlight() {
            Some(options) => self.highlight_code(code, lang, options),
            None => {
                let class = lang
                    .map(|l| format!(r#" class="language-{}""#, escape_html(l)))
                    .unwrap_or_default();
                format!("<pre><code{}>{}</code></pre>\n", class, escape_html(code))
            }
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>, options: &HighlightOptions) -> String {
        let lang = lang
            .map(|l| options.aliases.get(l).map(String::as_str).unwrap_or(l))
            .unwrap_or("text");
        let class = escape_html(&format!("{}{}", options.class_prefix, lang));

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&options.theme)
            .or_else(|| self.theme_set.themes.values().next());

        let body = match theme {
            Some(theme) => self.highlight_lines(code, syntax, theme).unwrap_or_else(|e| {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                escape_html(code)
            }),
            None => escape_html(code),
        };

        let background = theme
            .and_then(|t| t.settings.background)
            .map(|c| {
                format!(
                    r#" style="background-color: #{:02x}{:02x}{:02x};""#,
                    c.r, c.g, c.b
                )
            })
            .unwrap_or_default();

        let pre = format!(
            r#"<pre class="{}"{}><code class="{}">{}</code></pre>"#,
            class, background, class, body
        );

        if options.show_line_numbers {
            let gutter = (1..=code.lines().count())
                .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"<div class="highlight"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></div>"#,
                gutter, pre
            )
        } else {
            format!(r#"<div class="highlight">{}</div>"#, pre)
        }
    }

    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<String, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            out.push_str(&styled_line_to_highlighted_html(
                &regions[..],
                IncludeBackground::No,
            )?);
        }
        Ok(out)
    }
}

/// Copy a linked file unless its extension is ignored; `None` leaves the link untouched
fn copy_linked_file(
    url: &str,
    options: &CopyLinkedFilesOptions,
    ctx: &RenderContext,
    assets: &mut Vec<LinkedAsset>,
) -> Result<Option<String>> {
    let (path, suffix) = split_relative(url);
    let file = ctx.dir.join(&path);
    if !file.is_file() {
        tracing::debug!("Linked file not found, leaving link as is: {:?}", file);
        return Ok(None);
    }
    if options.ignores(extension_of(&file).as_deref()) {
        return Ok(None);
    }

    let public_path = hashed_asset_path(&options.destination_dir, &file)?;
    let rewritten = format!("{}{}", url_for(ctx.root, &public_path), suffix);
    assets.push(LinkedAsset {
        source: file,
        public_path,
    });
    Ok(Some(rewritten))
}

/// Prefix a root-relative URL with the site root unless it already has it
fn with_root(root: &str, url: &str) -> String {
    let prefix = root.trim_end_matches('/');
    if prefix.is_empty() || url == prefix || url.starts_with(&format!("{}/", prefix)) {
        url.to_string()
    } else {
        url_for(root, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{ExternalLinksOptions, MarkdownPlugin};
    use std::fs;

    fn renderer(plugins: Vec<MarkdownPlugin>) -> MarkdownRenderer {
        MarkdownRenderer::new(MarkdownConfig {
            plugins,
            ..Default::default()
        })
    }

    fn ctx(dir: &Path) -> RenderContext<'_> {
        RenderContext {
            dir,
            root: "/",
            site_host: Some("blog.example.com"),
            catch_links: false,
        }
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = renderer(Vec::new())
            .render("# Hello World\n\nThis is a test.", &ctx(Path::new(".")))
            .unwrap()
            .html;
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_code_block_without_highlight() {
        let html = renderer(Vec::new())
            .render("```elixir\nx = 1 < 2\n```", &ctx(Path::new(".")))
            .unwrap()
            .html;
        assert!(html.contains(r#"<pre><code class="language-elixir">x = 1 &lt; 2"#));
    }

    #[test]
    fn test_highlighted_code_block() {
        let html = renderer(vec![MarkdownPlugin::Highlight(HighlightOptions::default())])
            .render("```rust\nfn main() {}\n```", &ctx(Path::new(".")))
            .unwrap()
            .html;
        assert!(html.contains(r#"<div class="highlight"><pre class="language-rust""#));
        assert!(html.contains("<span style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_highlight_alias_and_line_numbers() {
        let mut options = HighlightOptions {
            show_line_numbers: true,
            ..Default::default()
        };
        options.aliases.insert("rs".into(), "rust".into());
        let html = renderer(vec![MarkdownPlugin::Highlight(options)])
            .render("```rs\nlet a = 1;\nlet b = 2;\n```", &ctx(Path::new(".")))
            .unwrap()
            .html;
        assert!(html.contains("language-rust"));
        assert!(html.contains(r#"<span class="line-number">2</span>"#));
        assert!(!html.contains(r#"<span class="line-number">3</span>"#));
    }

    #[test]
    fn test_external_links() {
        let r = renderer(vec![MarkdownPlugin::ExternalLinks(ExternalLinksOptions {
            target: Some("_blank".into()),
            rel: "nofollow".into(),
        })]);
        let html = r
            .render(
                "[gh](https://github.com/duzzifelipe) and [me](https://blog.example.com/about) and [local](/resume/)",
                &ctx(Path::new(".")),
            )
            .unwrap()
            .html;
        assert!(html.contains(
            r#"<a href="https://github.com/duzzifelipe" target="_blank" rel="nofollow">gh</a>"#
        ));
        assert!(html.contains(r#"<a href="https://blog.example.com/about">me</a>"#));
        assert!(html.contains(r#"<a href="/resume/">local</a>"#));
    }

    #[test]
    fn test_external_links_empty_rel_omitted() {
        let r = renderer(vec![MarkdownPlugin::ExternalLinks(ExternalLinksOptions {
            target: None,
            rel: String::new(),
        })]);
        let html = r
            .render("[x](https://example.org \"Example\")", &ctx(Path::new(".")))
            .unwrap()
            .html;
        assert!(html.contains(r#"<a href="https://example.org" title="Example">x</a>"#));
    }

    #[test]
    fn test_copy_linked_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("talk slides.pdf"), b"pdf").unwrap();
        fs::write(dir.path().join("photo.png"), b"png").unwrap();

        let r = renderer(vec![MarkdownPlugin::CopyLinkedFiles(CopyLinkedFilesOptions {
            ignore_file_extensions: vec!["png".into()],
            ..Default::default()
        })]);
        let rendered = r
            .render(
                "[slides](talk%20slides.pdf#page=2) ![photo](photo.png) [missing](nope.zip)",
                &ctx(dir.path()),
            )
            .unwrap();

        assert_eq!(rendered.assets.len(), 1);
        let asset = &rendered.assets[0];
        assert!(asset.public_path.starts_with("static/"));
        assert!(asset.public_path.ends_with("/talk slides.pdf"));
        assert!(rendered
            .html
            .contains(&format!(r#"href="/{}#page=2""#, asset.public_path)));
        assert!(rendered.html.contains(r#"src="photo.png""#));
        assert!(rendered.html.contains(r#"href="nope.zip""#));
    }

    #[test]
    fn test_images_wrapper() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("diagram.png"), b"png").unwrap();

        let r = renderer(vec![MarkdownPlugin::Images(ImagesOptions {
            max_width: 590,
            ..Default::default()
        })]);
        let rendered = r
            .render("![A *diagram*](diagram.png \"Flow\")", &ctx(dir.path()))
            .unwrap();

        assert_eq!(rendered.assets.len(), 1);
        let url = format!("/{}", rendered.assets[0].public_path);
        let html = rendered.html;
        assert!(html.contains("max-width: 590px;"));
        assert!(html.contains(r#"alt="A diagram""#));
        assert!(html.contains(r#"title="Flow""#));
        assert!(html.contains(&format!(r#"<a class="resp-image-link" href="{}""#, url)));
        assert!(html.contains(&format!(r#"src="{}""#, url)));
    }

    #[test]
    fn test_images_without_link_and_extra_style() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("diagram.png"), b"png").unwrap();

        let r = renderer(vec![MarkdownPlugin::Images(ImagesOptions {
            link_images_to_original: false,
            wrapper_style: "border: 1px solid #eee;".into(),
            ..Default::default()
        })]);
        let html = r
            .render("![diagram](diagram.png)", &ctx(dir.path()))
            .unwrap()
            .html;
        assert!(!html.contains("resp-image-link"));
        assert!(html.contains("max-width: 650px; border: 1px solid #eee;\">"));
        assert!(html.contains(r#"<img class="resp-image-image" alt="diagram""#));
    }

    #[test]
    fn test_image_inside_link_not_double_linked() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("badge.png"), b"png").unwrap();

        let r = renderer(vec![MarkdownPlugin::Images(ImagesOptions::default())]);
        let html = r
            .render("[![badge](badge.png)](https://ci.example.com)", &ctx(dir.path()))
            .unwrap()
            .html;
        assert!(html.contains("resp-image-wrapper"));
        assert!(!html.contains("resp-image-link"));
    }

    #[test]
    fn test_catch_links_prefixes_root() {
        let r = renderer(Vec::new());
        let context = RenderContext {
            root: "/blog/",
            catch_links: true,
            ..ctx(Path::new("."))
        };
        let html = r
            .render("[resume](/resume/) [home](/blog/) [cdn](//cdn.example.com/x)", &context)
            .unwrap()
            .html;
        assert!(html.contains(r#"<a href="/blog/resume/">resume</a>"#));
        assert!(html.contains(r#"<a href="/blog/">home</a>"#));
        assert!(html.contains(r#"href="//cdn.example.com/x""#));
    }

    #[test]
    fn test_split_excerpt() {
        let r = renderer(Vec::new());
        let content = "This is excerpt.\n<!-- more -->\nThis is more content.";
        let (excerpt, full) = r.split_excerpt(content);
        assert_eq!(excerpt, Some("This is excerpt.".to_string()));
        assert!(full.contains("This is excerpt."));
        assert!(full.contains("This is more content."));
        assert!(!full.contains("<!-- more -->"));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            MarkdownRenderer::plain_text("Hello *big*\n[world](https://x.org) `now`"),
            "Hello big world now "
        );
    }
}
