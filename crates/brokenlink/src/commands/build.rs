//! Full post-processing command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use brokenlink_site::SiteBuilder;

use crate::config::{load_config, project_root};

/// Run the build command.
pub async fn run(config_path: &Path, site: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Post-processing site...");

    let root = project_root(config_path);
    let mut config = load_config(config_path)?.into_build_config(&root)?;

    if let Some(site) = site {
        config.site_dir = site;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }

    let result = SiteBuilder::new(config).build().await?;

    tracing::info!(
        "Processed {} pages ({} rewritten), {} of {} links open in a new tab",
        result.pages,
        result.pages_rewritten,
        result.links.external,
        result.links.inspected
    );

    if let Some(stylesheet) = &result.stylesheet {
        tracing::info!(
            "Stylesheet: {} ({} rules{})",
            stylesheet.display(),
            result.css_rules,
            if result.purged { ", purged" } else { "" }
        );
    }

    tracing::info!("Done in {}ms", result.duration_ms);

    Ok(())
}
