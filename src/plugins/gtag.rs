//! Google global site tag snippet

use super::GtagOptions;

const GTAG_JS: &str = "https://www.googletagmanager.com/gtag/js";

/// The gtag plugin with its exclude globs compiled
#[derive(Debug, Clone)]
pub struct Gtag {
    options: GtagOptions,
    exclude: Vec<glob::Pattern>,
}

impl Gtag {
    pub fn new(options: GtagOptions) -> Result<Self, String> {
        if options.tracking_ids.is_empty() {
            return Err("tracking_ids must contain at least one id".to_string());
        }

        let exclude = options
            .plugin_config
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p).map_err(|e| format!("exclude {:?}: {}", p, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { options, exclude })
    }

    pub fn options(&self) -> &GtagOptions {
        &self.options
    }

    /// Whether the snippet goes into `<head>` rather than before `</body>`
    pub fn in_head(&self) -> bool {
        self.options.plugin_config.head
    }

    /// Whether a page path is excluded from tracking
    pub fn excludes(&self, path: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(path))
    }

    /// The snippet for a page, or `None` when the page is excluded
    pub fn snippet_for(&self, path: &str) -> Option<String> {
        if self.excludes(path) {
            return None;
        }
        Some(self.snippet())
    }

    fn snippet(&self) -> String {
        let ids = &self.options.tracking_ids;
        let config = serde_json::to_string(&self.options.gtag_config)
            .unwrap_or_else(|_| "{}".to_string());

        let mut script = String::new();

        if self.options.gtag_config.anonymize_ip == Some(true) {
            script.push_str(&format!(
                "function gaOptout(){{document.cookie=disableStr+'=true; expires=Thu, 31 Dec 2099 23:59:59 UTC;path=/',window[disableStr]=!0}}var gaProperty='{}',disableStr='ga-disable-'+gaProperty;document.cookie.indexOf(disableStr+'=true')>-1&&(window[disableStr]=!0);\n",
                ids[0]
            ));
        }

        let guard = if self.options.plugin_config.respect_dnt {
            r#"!(navigator.doNotTrack == "1" || window.doNotTrack == "1")"#
        } else {
            "true"
        };

        script.push_str(&format!("if({}) {{\n", guard));
        script.push_str("  window.dataLayer = window.dataLayer || [];\n");
        script.push_str("  function gtag(){window.dataLayer && window.dataLayer.push(arguments);}\n");
        script.push_str("  gtag('js', new Date());\n");
        for id in ids {
            script.push_str(&format!("  gtag('config', '{}', {});\n", id, config));
        }
        script.push('}');

        format!(
            "<script async src=\"{}?id={}\"></script>\n<script>\n{}\n</script>",
            GTAG_JS, ids[0], script
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{GtagConfig, GtagPluginConfig};

    fn gtag(plugin_config: GtagPluginConfig) -> Gtag {
        Gtag::new(GtagOptions {
            tracking_ids: vec!["UA-101363511-1".to_string()],
            gtag_config: GtagConfig {
                optimize_id: None,
                anonymize_ip: Some(true),
                cookie_expires: Some(0),
            },
            plugin_config,
        })
        .unwrap()
    }

    #[test]
    fn test_snippet_contents() {
        let snippet = gtag(GtagPluginConfig::default()).snippet_for("/").unwrap();
        assert!(snippet.contains("gtag/js?id=UA-101363511-1"));
        assert!(snippet.contains(
            r#"gtag('config', 'UA-101363511-1', {"anonymize_ip":true,"cookie_expires":0});"#
        ));
        assert!(snippet.contains("ga-disable-"));
        assert!(snippet.contains("if(true)"));
    }

    #[test]
    fn test_respect_dnt() {
        let snippet = gtag(GtagPluginConfig {
            respect_dnt: true,
            ..Default::default()
        })
        .snippet_for("/")
        .unwrap();
        assert!(snippet.contains("navigator.doNotTrack"));
    }

    #[test]
    fn test_exclude_paths() {
        let tag = gtag(GtagPluginConfig {
            exclude: vec!["/resume/*".to_string()],
            ..Default::default()
        });
        assert!(tag.snippet_for("/resume/").is_none());
        assert!(tag.snippet_for("/posts/hello/").is_some());
        assert!(!tag.in_head());
    }

    #[test]
    fn test_invalid_exclude() {
        let err = Gtag::new(GtagOptions {
            tracking_ids: vec!["G-1".to_string()],
            gtag_config: GtagConfig::default(),
            plugin_config: GtagPluginConfig {
                exclude: vec!["[".to_string()],
                ..Default::default()
            },
        })
        .unwrap_err();
        assert!(err.contains("exclude"));
    }
}
