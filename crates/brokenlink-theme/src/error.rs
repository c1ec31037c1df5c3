//! Theme errors.

/// Errors raised while loading theme data or producing the stylesheet.
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Invalid color '{0}': expected #rgb, #rgba, #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Invalid shade '{0}': expected DEFAULT or a number")]
    InvalidShade(String),

    #[error("Invalid color name '{0}': use lowercase letters, digits and dashes")]
    InvalidColorName(String),

    #[error("Invalid content pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to minify CSS: {0}")]
    Minify(String),
}
