//! External link annotation command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use brokenlink_site::SiteBuilder;

use crate::config::{load_config, project_root};

/// Run the annotate command.
pub async fn run(config_path: &Path, site: Option<PathBuf>) -> Result<()> {
    let root = project_root(config_path);
    let mut config = load_config(config_path)?.into_build_config(&root)?;

    if let Some(site) = site {
        config.site_dir = site;
    }
    config.generate_css = false;

    tracing::info!("Annotating external links in {}", config.site_dir.display());

    let result = SiteBuilder::new(config).build().await?;

    tracing::info!(
        "Inspected {} links in {} pages: {} external, {} changed",
        result.links.inspected,
        result.pages,
        result.links.external,
        result.links.changed
    );

    Ok(())
}
