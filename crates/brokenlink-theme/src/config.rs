//! Theme and purge configuration.

use serde::Deserialize;

use crate::palette::Palette;

/// The `[theme]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeConfig {
    /// Merge configured colours over the site palette instead of replacing it
    #[serde(default = "default_true")]
    pub extend: bool,

    /// Configured colours
    #[serde(default)]
    pub colors: Option<Palette>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            extend: true,
            colors: None,
        }
    }
}

impl ThemeConfig {
    /// The effective palette.
    pub fn palette(&self) -> Palette {
        match &self.colors {
            None => Palette::default(),
            Some(colors) if self.extend => {
                let mut palette = Palette::default();
                palette.merge(colors.clone());
                palette
            }
            Some(colors) => colors.clone(),
        }
    }
}

/// The `[purge]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PurgeConfig {
    /// Force purging on or off, ignoring the environment
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Environment variable holding the build environment
    #[serde(default = "default_env_var")]
    pub env_var: String,

    /// Build environment that turns purging on
    #[serde(default = "default_env_value")]
    pub env_value: String,

    /// Glob patterns of files scanned for used class names
    #[serde(default = "default_content")]
    pub content: Vec<String>,

    /// Purge the base layer (palette variables) as well as utilities
    #[serde(default = "default_true")]
    pub layers_by_default: bool,
}

impl Default for PurgeConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            env_var: default_env_var(),
            env_value: default_env_value(),
            content: default_content(),
            layers_by_default: true,
        }
    }
}

impl PurgeConfig {
    /// Whether purging applies for the given build environment.
    pub fn is_enabled(&self, build_env: Option<&str>) -> bool {
        self.enabled
            .unwrap_or_else(|| build_env == Some(self.env_value.as_str()))
    }

    /// Read the build environment from the process environment.
    pub fn build_env(&self) -> Option<String> {
        std::env::var(&self.env_var).ok()
    }

    /// Whether `content` is still the built-in `_site` globs.
    pub fn has_default_content(&self) -> bool {
        self.content == default_content()
    }
}

fn default_true() -> bool {
    true
}
fn default_env_var() -> String {
    "BUILD_ENV".to_string()
}
fn default_env_value() -> String {
    "prod".to_string()
}
fn default_content() -> Vec<String> {
    vec!["./_site/*.html".to_string(), "./_site/**/*.html".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Shade;

    #[test]
    fn purge_follows_build_env() {
        let config = PurgeConfig::default();

        assert!(config.is_enabled(Some("prod")));
        assert!(!config.is_enabled(Some("dev")));
        assert!(!config.is_enabled(Some("PROD")));
        assert!(!config.is_enabled(None));
    }

    #[test]
    fn explicit_purge_setting_wins() {
        let on = PurgeConfig {
            enabled: Some(true),
            ..Default::default()
        };
        let off = PurgeConfig {
            enabled: Some(false),
            ..Default::default()
        };

        assert!(on.is_enabled(None));
        assert!(!off.is_enabled(Some("prod")));
    }

    #[test]
    fn deserializes_partial_purge_table() {
        let config: PurgeConfig = toml::from_str("env_value = \"production\"").unwrap();

        assert_eq!(config.env_var, "BUILD_ENV");
        assert_eq!(config.content.len(), 2);
        assert!(config.layers_by_default);
        assert!(config.is_enabled(Some("production")));
        assert!(config.has_default_content());

        let custom: PurgeConfig = toml::from_str("content = [\"./public/**/*.html\"]").unwrap();
        assert!(!custom.has_default_content());
    }

    #[test]
    fn theme_extends_site_palette() {
        let config: ThemeConfig = toml::from_str(
            r##"
[colors.night]
900 = "#000000"
"##,
        )
        .unwrap();

        let palette = config.palette();
        assert_eq!(palette.len(), 4);
        assert!(palette.get("night").unwrap().get(Shade::Step(900)).is_some());
    }

    #[test]
    fn theme_can_replace_site_palette() {
        let config: ThemeConfig = toml::from_str(
            r##"
extend = false

[colors.night]
900 = "#000000"
"##,
        )
        .unwrap();

        assert_eq!(config.palette().len(), 1);
    }

    #[test]
    fn missing_colors_use_site_palette() {
        assert_eq!(ThemeConfig::default().palette(), Palette::default());
    }
}
