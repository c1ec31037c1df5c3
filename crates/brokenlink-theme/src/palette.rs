//! Colour palette types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ThemeError;

/// A shade index within a colour scale.
///
/// `DEFAULT` sorts before numbered steps, which sort ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum Shade {
    /// The unsuffixed colour (`text-elixir`)
    Default,
    /// A numbered step (`text-elixir-500`)
    Step(u16),
}

impl Shade {
    /// Class and variable suffix, `None` for the default shade.
    pub fn suffix(&self) -> Option<String> {
        match self {
            Shade::Default => None,
            Shade::Step(n) => Some(n.to_string()),
        }
    }
}

impl FromStr for Shade {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("default") {
            return Ok(Shade::Default);
        }
        s.parse::<u16>()
            .map(Shade::Step)
            .map_err(|_| ThemeError::InvalidShade(s.to_string()))
    }
}

impl TryFrom<String> for Shade {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Shade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shade::Default => f.write_str("DEFAULT"),
            Shade::Step(n) => write!(f, "{}", n),
        }
    }
}

/// A validated hexadecimal colour such as `#1088A0`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Validate a hex colour. Case is preserved.
    pub fn new(value: &str) -> Result<Self, ThemeError> {
        let value = value.trim();
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| ThemeError::InvalidColor(value.to_string()))?;

        let valid_len = matches!(digits.len(), 3 | 4 | 6 | 8);
        if !valid_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ThemeError::InvalidColor(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = ThemeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shades of a single named colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ColorScale(BTreeMap<Shade, HexColor>);

impl ColorScale {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a scale from known-good literals.
    fn from_literals(shades: &[(Shade, &str)]) -> Self {
        Self(
            shades
                .iter()
                .map(|(shade, hex)| (*shade, HexColor(hex.to_string())))
                .collect(),
        )
    }

    pub fn insert(&mut self, shade: Shade, color: HexColor) {
        self.0.insert(shade, color);
    }

    pub fn get(&self, shade: Shade) -> Option<&HexColor> {
        self.0.get(&shade)
    }

    /// Shades in order, `DEFAULT` first.
    pub fn iter(&self) -> impl Iterator<Item = (Shade, &HexColor)> {
        self.0.iter().map(|(shade, color)| (*shade, color))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Semantic colour names mapped to their shade scales.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, ColorScale>")]
pub struct Palette {
    colors: BTreeMap<String, ColorScale>,
}

impl Palette {
    /// An empty palette.
    pub fn new() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    /// Add or replace a colour.
    pub fn insert(&mut self, name: &str, scale: ColorScale) -> Result<(), ThemeError> {
        if !is_valid_color_name(name) {
            return Err(ThemeError::InvalidColorName(name.to_string()));
        }
        self.colors.insert(name.to_string(), scale);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ColorScale> {
        self.colors.get(name)
    }

    /// Colours in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColorScale)> {
        self.colors.iter().map(|(name, scale)| (name.as_str(), scale))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Merge `other` into this palette shade by shade; `other` wins on conflicts.
    pub fn merge(&mut self, other: Palette) {
        for (name, scale) in other.colors {
            let entry = self.colors.entry(name).or_default();
            for (shade, color) in scale.0 {
                entry.insert(shade, color);
            }
        }
    }
}

impl Default for Palette {
    /// The site palette: sea blue, sand yellow and elixir.
    fn default() -> Self {
        use Shade::{Default as D, Step as S};

        let mut colors = BTreeMap::new();
        colors.insert(
            "sea-blue".to_string(),
            ColorScale::from_literals(&[
                (S(100), "#E7F3F6"),
                (S(200), "#C3E1E7"),
                (S(300), "#9FCFD9"),
                (S(400), "#58ACBD"),
                (S(500), "#1088A0"),
                (S(600), "#0E7A90"),
                (S(700), "#0A5260"),
                (S(800), "#073D48"),
                (S(900), "#052930"),
            ]),
        );
        colors.insert(
            "sand-yellow".to_string(),
            ColorScale::from_literals(&[
                (S(100), "#FEFBF8"),
                (S(200), "#FDF6EC"),
                (S(300), "#FCF0E1"),
                (S(400), "#FAE5CB"),
                (S(500), "#F8DAB4"),
                (S(600), "#DFC4A2"),
                (S(700), "#95836C"),
                (S(800), "#706251"),
                (S(900), "#4A4136"),
            ]),
        );
        colors.insert(
            "elixir".to_string(),
            ColorScale::from_literals(&[
                (D, "#9E7BEA"),
                (S(100), "#F9F6FE"),
                (S(200), "#E2D7F9"),
                (S(300), "#CBB8F4"),
                (S(400), "#B59AEF"),
                (S(500), "#9E7BEA"),
                (S(600), "#6A34DF"),
                (S(700), "#471AA8"),
                (S(800), "#290F61"),
                (S(900), "#0B041A"),
            ]),
        );

        Self { colors }
    }
}

impl TryFrom<BTreeMap<String, ColorScale>> for Palette {
    type Error = ThemeError;

    fn try_from(colors: BTreeMap<String, ColorScale>) -> Result<Self, Self::Error> {
        if let Some(bad) = colors.keys().find(|name| !is_valid_color_name(name)) {
            return Err(ThemeError::InvalidColorName(bad.clone()));
        }
        Ok(Self { colors })
    }
}

/// Colour names become class names, so keep them to `[a-z][a-z0-9-]*`.
fn is_valid_color_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_shades() {
        assert_eq!("default".parse::<Shade>().unwrap(), Shade::Default);
        assert_eq!("DEFAULT".parse::<Shade>().unwrap(), Shade::Default);
        assert_eq!("500".parse::<Shade>().unwrap(), Shade::Step(500));
        assert!("dark".parse::<Shade>().is_err());
        assert!("-1".parse::<Shade>().is_err());
    }

    #[test]
    fn default_shade_sorts_first() {
        let mut shades = vec![Shade::Step(900), Shade::Default, Shade::Step(100)];
        shades.sort();
        assert_eq!(shades, vec![Shade::Default, Shade::Step(100), Shade::Step(900)]);
    }

    #[test]
    fn validates_hex_colors() {
        assert!(HexColor::new("#fff").is_ok());
        assert!(HexColor::new("#ffff").is_ok());
        assert_eq!(HexColor::new("#1088A0").unwrap().as_str(), "#1088A0");
        assert!(HexColor::new("#1088A0CC").is_ok());
        assert!(HexColor::new("1088A0").is_err());
        assert!(HexColor::new("#12345").is_err());
        assert!(HexColor::new("#GGGGGG").is_err());
    }

    #[test]
    fn default_palette_matches_site_colors() {
        let palette = Palette::default();

        assert_eq!(palette.len(), 3);
        assert_eq!(
            palette
                .get("sea-blue")
                .and_then(|s| s.get(Shade::Step(500)))
                .map(HexColor::as_str),
            Some("#1088A0")
        );
        let elixir = palette.get("elixir").unwrap();
        assert_eq!(elixir.len(), 10);
        assert_eq!(elixir.get(Shade::Default), elixir.get(Shade::Step(500)));
        assert_eq!(palette.get("sand-yellow").unwrap().len(), 9);
    }

    #[test]
    fn rejects_bad_color_names() {
        let mut palette = Palette::new();
        assert!(palette.insert("Sea Blue", ColorScale::new()).is_err());
        assert!(palette.insert("9lives", ColorScale::new()).is_err());
        assert!(palette.insert("sea-blue-2", ColorScale::new()).is_ok());
    }

    #[test]
    fn merges_shade_by_shade() {
        let mut palette = Palette::default();
        let mut extra = Palette::new();
        let mut scale = ColorScale::new();
        scale.insert(Shade::Step(500), HexColor::new("#000000").unwrap());
        scale.insert(Shade::Step(950), HexColor::new("#010101").unwrap());
        extra.insert("sea-blue", scale).unwrap();

        palette.merge(extra);

        let sea_blue = palette.get("sea-blue").unwrap();
        assert_eq!(sea_blue.len(), 10);
        assert_eq!(sea_blue.get(Shade::Step(500)).unwrap().as_str(), "#000000");
        assert_eq!(sea_blue.get(Shade::Step(100)).unwrap().as_str(), "#E7F3F6");
    }

    #[test]
    fn deserializes_from_toml() {
        let palette: Palette = toml::from_str(
            r##"
[ocean]
default = "#0000ff"
100 = "#eeeeff"

[sand]
500 = "#F8DAB4"
"##,
        )
        .unwrap();

        assert_eq!(palette.len(), 2);
        assert_eq!(
            palette.get("ocean").unwrap().iter().next(),
            Some((Shade::Default, &HexColor::new("#0000ff").unwrap()))
        );
    }

    #[test]
    fn rejects_invalid_toml_values() {
        assert!(toml::from_str::<Palette>("[ocean]\n100 = \"blue\"\n").is_err());
        assert!(toml::from_str::<Palette>("[ocean]\ndark = \"#000\"\n").is_err());
        assert!(toml::from_str::<Palette>("[Ocean]\n100 = \"#000\"\n").is_err());
    }
}
