//! Configuration file structure (brokenlink.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use brokenlink_site::builder::DEFAULT_SITE_URL;
use brokenlink_site::BuildConfig;
use brokenlink_theme::{PurgeConfig, ThemeConfig};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub purge: PurgeConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Generated site directory, relative to the config file
    #[serde(default = "default_site_dir")]
    pub dir: String,
    /// Public URL of the site
    #[serde(default = "default_site_url")]
    pub url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            dir: default_site_dir(),
            url: default_site_url(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
    /// Stylesheet path inside the site directory
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
            stylesheet: default_stylesheet(),
        }
    }
}

fn default_site_dir() -> String {
    "_site".to_string()
}
fn default_site_url() -> String {
    DEFAULT_SITE_URL.to_string()
}
fn default_minify() -> bool {
    true
}
fn default_stylesheet() -> String {
    "theme/css/palette.css".to_string()
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("{} not found, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Directory that relative config paths resolve against.
pub fn project_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl ConfigFile {
    /// Turn the file settings into a build configuration rooted at `root`.
    pub fn into_build_config(self, root: &Path) -> Result<BuildConfig> {
        let site_url = Url::parse(&self.site.url)
            .with_context(|| format!("Invalid site URL '{}'", self.site.url))?;
        let build_env = self.purge.build_env();

        Ok(BuildConfig {
            root: root.to_path_buf(),
            site_dir: root.join(&self.site.dir),
            site_url,
            annotate_links: true,
            generate_css: true,
            stylesheet: PathBuf::from(&self.build.stylesheet),
            minify: self.build.minify,
            theme: self.theme,
            purge: self.purge,
            build_env,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brokenlink_theme::Shade;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let config = load_config(&temp.path().join("brokenlink.toml")).unwrap();

        assert_eq!(config.site.dir, "_site");
        assert!(config.build.minify);
        assert_eq!(config.purge.env_var, "BUILD_ENV");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brokenlink.toml");
        fs::write(&path, "[site\nurl = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn reads_all_sections() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("brokenlink.toml");
        fs::write(
            &path,
            r##"
[site]
dir = "output"
url = "http://thebroken.link"

[build]
minify = false

[purge]
enabled = true
content = ["./output/**/*.html"]

[theme.colors.ink]
900 = "#111111"
"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let root = project_root(&path);
        let build = config.into_build_config(&root).unwrap();

        assert_eq!(build.site_dir, temp.path().join("output"));
        assert_eq!(build.site_url.host_str(), Some("thebroken.link"));
        assert!(!build.minify);
        assert_eq!(build.stylesheet, PathBuf::from("theme/css/palette.css"));
        assert_eq!(build.purge.enabled, Some(true));
        assert!(build
            .theme
            .palette()
            .get("ink")
            .and_then(|s| s.get(Shade::Step(900)))
            .is_some());
    }

    #[test]
    fn invalid_site_url_is_an_error() {
        let config: ConfigFile = toml::from_str("[site]\nurl = \"not a url\"").unwrap();
        assert!(config.into_build_config(Path::new(".")).is_err());
    }

    #[test]
    fn bare_config_name_roots_at_cwd() {
        assert_eq!(project_root(Path::new("brokenlink.toml")), PathBuf::from("."));
        assert_eq!(
            project_root(Path::new("site/brokenlink.toml")),
            PathBuf::from("site")
        );
    }
}
