//! Palette stylesheet command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brokenlink_site::SiteBuilder;

use crate::config::{load_config, project_root};

/// Run the css command.
///
/// `purge` overrides both the config file and the build environment.
pub async fn run(
    config_path: &Path,
    purge: Option<bool>,
    output: Option<PathBuf>,
    minify: Option<bool>,
) -> Result<()> {
    let root = project_root(config_path);
    let mut config = load_config(config_path)?.into_build_config(&root)?;

    config.annotate_links = false;
    if purge.is_some() {
        config.purge.enabled = purge;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }
    if let Some(output) = output {
        // Joining an absolute path onto the site dir yields the path itself.
        let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
        config.stylesheet = cwd.join(output);
    }

    let result = SiteBuilder::new(config).build().await?;

    if let Some(stylesheet) = &result.stylesheet {
        tracing::info!(
            "Wrote {} with {} rules ({} purged)",
            stylesheet.display(),
            result.css_rules,
            result.css_purged
        );
    }

    Ok(())
}
