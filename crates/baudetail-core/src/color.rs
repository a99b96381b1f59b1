//! Color handling for Baudetail diagrams
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Category swatches, failure-mode badges and
//! failure-scenario highlights all carry a [`Color`].

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use baudetail_core::color::Color;
    ///
    /// let red = Color::new("#DC2626").unwrap();
    /// let gray = Color::new("gray").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Neutral gray used when a payload carries an unusable color.
    pub fn neutral() -> Self {
        Self::new("#6B7280").expect("'#6B7280' is a valid CSS color")
    }

    /// Returns the color as a `#rrggbb` hex string (alpha is dropped).
    ///
    /// ```
    /// use baudetail_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<Color> for svg::node::Value {
    fn from(color: Color) -> Self {
        Self::from(color.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#1E3A5F").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_to_hex() {
        assert_eq!(Color::new("#F59E0B").unwrap().to_hex(), "#f59e0b");
        assert_eq!(Color::new("blue").unwrap().to_hex(), "#0000ff");
    }

    #[test]
    fn test_color_eq_hash() {
        use std::collections::HashSet;

        let color1 = Color::new("#ff0000").unwrap();
        let color2 = Color::new("#ff0000").unwrap();
        let color3 = Color::new("#0000ff").unwrap();

        assert_eq!(color1, color2);
        assert_ne!(color1, color3);

        let mut set = HashSet::new();
        set.insert(color1);
        assert!(set.contains(&color2));
        assert!(!set.contains(&color3));
    }
}
