//! Palette stylesheet generation.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Write;

use crate::error::ThemeError;
use crate::palette::{Palette, Shade};

/// Utility class prefixes and the property each one sets.
pub const UTILITIES: &[(&str, &str)] = &[
    ("text", "color"),
    ("bg", "background-color"),
    ("border", "border-color"),
];

/// A generated stylesheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet {
    /// CSS source
    pub css: String,

    /// Utility rules emitted
    pub utilities: usize,

    /// Custom properties emitted in the base layer
    pub variables: usize,

    /// Utility rules and custom properties removed by purging
    pub purged: usize,
}

/// Suffix shared by class and variable names: `sea-blue-500`, `elixir`.
fn token(color: &str, shade: Shade) -> String {
    match shade.suffix() {
        Some(suffix) => format!("{}-{}", color, suffix),
        None => color.to_string(),
    }
}

/// Generate the palette stylesheet.
///
/// With `used` set, utility rules whose class is not among the used names are
/// dropped; with `purge_base` as well, palette variables no kept utility refers
/// to are dropped too.
pub fn generate_stylesheet(
    palette: &Palette,
    used: Option<&HashSet<String>>,
    purge_base: bool,
) -> Stylesheet {
    let mut rules = String::new();
    let mut referenced: BTreeSet<String> = BTreeSet::new();
    let mut utilities = 0;
    let mut purged = 0;

    for (color, scale) in palette.iter() {
        for (shade, _) in scale.iter() {
            let token = token(color, shade);

            for (prefix, property) in UTILITIES {
                let class = format!("{}-{}", prefix, token);
                if used.is_some_and(|used| !used.contains(&class)) {
                    purged += 1;
                    continue;
                }

                let _ = writeln!(
                    rules,
                    ".{} {{\n  {}: var(--color-{});\n}}\n",
                    class, property, token
                );
                referenced.insert(token.clone());
                utilities += 1;
            }
        }
    }

    let mut root = String::new();
    let mut variables = 0;
    for (color, scale) in palette.iter() {
        for (shade, hex) in scale.iter() {
            let token = token(color, shade);
            if used.is_some() && purge_base && !referenced.contains(&token) {
                purged += 1;
                continue;
            }
            let _ = writeln!(root, "  --color-{}: {};", token, hex);
            variables += 1;
        }
    }

    let mut css = String::from("/* brokenlink palette */\n\n");
    if variables > 0 {
        let _ = writeln!(css, ":root {{\n{}}}\n", root);
    }
    css.push_str(&rules);

    Stylesheet {
        css,
        utilities,
        variables,
        purged,
    }
}

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, ThemeError> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| ThemeError::Minify(format!("parse error: {}", e)))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| ThemeError::Minify(e.to_string()))?;

    Ok(minified.code)
}
