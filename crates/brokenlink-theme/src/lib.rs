//! Theme data for brokenlink sites.
//!
//! The palette and purge settings are plain configuration. They only shape
//! the generated stylesheet and are never consulted at page runtime.

pub mod config;
pub mod css;
pub mod error;
pub mod palette;
pub mod purge;

pub use config::{PurgeConfig, ThemeConfig};
pub use css::{generate_stylesheet, minify_css, Stylesheet};
pub use error::ThemeError;
pub use palette::{ColorScale, HexColor, Palette, Shade};
pub use purge::{extract_candidates, scan_content, ContentPattern, ContentScan};
