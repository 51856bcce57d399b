//! Initialize a new site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::CONFIG_FILE;

const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="12" fill="#663399"/><text x="32" y="42" font-family="georgia, serif" font-size="30" text-anchor="middle" fill="#fff">b</text></svg>
"##;

const GITHUB_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><path fill="#24292e" d="M8 0C3.58 0 0 3.58 0 8c0 3.54 2.29 6.53 5.47 7.59.4.07.55-.17.55-.38 0-.19-.01-.82-.01-1.49-2.01.37-2.53-.49-2.69-.94-.09-.23-.48-.94-.82-1.13-.28-.15-.68-.52-.01-.53.63-.01 1.08.58 1.23.82.72 1.21 1.87.87 2.33.66.07-.52.28-.87.51-1.07-1.78-.2-3.64-.89-3.64-3.95 0-.87.31-1.59.82-2.15-.08-.2-.36-1.02.08-2.12 0 0 .67-.21 2.2.82.64-.18 1.32-.27 2-.27.68 0 1.36.09 2 .27 1.53-1.04 2.2-.82 2.2-.82.44 1.1.16 1.92.08 2.12.51.56.82 1.27.82 2.15 0 3.07-1.87 3.75-3.65 3.95.29.25.54.73.54 1.48 0 1.07-.01 1.93-.01 2.2 0 .21.15.46.55.38A8.013 8.013 0 0016 8c0-4.42-3.58-8-8-8z"/></svg>
"##;

const RESUME_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><path fill="#24292e" d="M3 1h7l3 3v11H3V1zm1 1v12h8V5H9V2H4zm1 5h6v1H5V7zm0 2h6v1H5V9zm0 2h4v1H5v-1z"/></svg>
"##;

const SAMPLE_POST: &str = r#"---
title: Hello World
date: {date}
slug: hello-world
---

This is the first post. Everything before the separator becomes the description.

<!-- more -->

## Writing posts

Create a post with:

```bash
$ folio new "My New Post"
```

Then build the site with `folio build` or preview it with `folio serve`.
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    let config = SiteConfig::default();

    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("src/markdown-posts"))?;
    fs::create_dir_all(target_dir.join("src/images"))?;

    fs::write(&config_path, serde_yaml::to_string(&config)?)?;

    fs::write(target_dir.join("src/images/icon.svg"), ICON_SVG)?;
    fs::write(target_dir.join("src/images/github.svg"), GITHUB_SVG)?;
    fs::write(target_dir.join("src/images/resume.svg"), RESUME_SVG)?;

    let now = chrono::Utc::now();
    let sample_post = SAMPLE_POST.replace("{date}", &now.format("%Y-%m-%d %H:%M:%S").to_string());
    fs::write(
        target_dir.join("src/markdown-posts/hello-world.md"),
        sample_post,
    )?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}
