//! Build the static site

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::ContentLoader;
use crate::generator::Generator;
use crate::Site;

/// Run a full build
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let plugins = site.plugins()?;
    tracing::debug!("Resolved {} plugins", plugins.len());

    let content = ContentLoader::new(site, &plugins).load()?;
    tracing::info!(
        "Loaded {} posts and {} images",
        content.posts.len(),
        content.images.len()
    );

    // Pages of removed or unpublished posts must not survive a rebuild
    super::clean::run(site)?;
    Generator::new(site, &plugins)?.generate(&content)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch the sources and rebuild on change
pub fn watch(site: &Site) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for path in site.watch_paths()? {
        let mode = if path.is_dir() {
            notify::RecursiveMode::Recursive
        } else {
            notify::RecursiveMode::NonRecursive
        };
        watcher.watch(&path, mode)?;
        tracing::debug!("Watching {:?}", path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Debounce: editors fire several events per save
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, rebuilding...");
                    if let Err(e) = rebuild(site) {
                        tracing::error!("Build failed: {:#}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

/// Rebuild after a change, re-reading `site.yml` so config edits apply
pub fn rebuild(site: &Site) -> Result<()> {
    let site = Site::new(&site.base_dir)?;
    run(&site)
}
