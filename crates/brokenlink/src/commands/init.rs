//! Initialize a brokenlink.toml in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing brokenlink...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());
    tracing::info!("Run 'brokenlink build' after generating the site.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# brokenlink configuration

[site]
# Directory the site generator writes to
dir = "_site"

# Public URL of the site; links to other hosts open in a new tab
url = "http://thebroken.link/"

[build]
# Minify the generated stylesheet
minify = true

# Stylesheet location inside the site directory
stylesheet = "theme/css/palette.css"

[purge]
# Purge unused rules when BUILD_ENV=prod
env_var = "BUILD_ENV"
env_value = "prod"

# Files scanned for used class names
content = [
  "./_site/*.html",
  "./_site/**/*.html",
]

# Purge palette variables as well as utilities
layers_by_default = true

[theme]
# Merge these colors over the built-in palette
extend = true

[theme.colors.sea-blue]
100 = "#E7F3F6"
200 = "#C3E1E7"
300 = "#9FCFD9"
400 = "#58ACBD"
500 = "#1088A0"
600 = "#0E7A90"
700 = "#0A5260"
800 = "#073D48"
900 = "#052930"

[theme.colors.sand-yellow]
100 = "#FEFBF8"
200 = "#FDF6EC"
300 = "#FCF0E1"
400 = "#FAE5CB"
500 = "#F8DAB4"
600 = "#DFC4A2"
700 = "#95836C"
800 = "#706251"
900 = "#4A4136"

[theme.colors.elixir]
default = "#9E7BEA"
100 = "#F9F6FE"
200 = "#E2D7F9"
300 = "#CBB8F4"
400 = "#B59AEF"
500 = "#9E7BEA"
600 = "#6A34DF"
700 = "#471AA8"
800 = "#290F61"
900 = "#0B041A"
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, ConfigFile};
    use brokenlink_theme::Palette;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn default_config_describes_site_palette() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.theme.colors, Some(Palette::default()));
        assert_eq!(config.theme.palette(), Palette::default());
        assert_eq!(config.site.url, "http://thebroken.link/");
        assert_eq!(config.purge.content.len(), 2);
    }

    #[tokio::test]
    async fn writes_config_once() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brokenlink.toml");

        run(&path, false).await.unwrap();
        assert!(load_config(&path).is_ok());

        fs::write(&path, "# edited").unwrap();
        run(&path, false).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# edited");

        run(&path, true).await.unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
