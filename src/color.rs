use std::{fmt, str::FromStr};

use image::Rgba;
use serde::{Deserialize, Deserializer};

use crate::error::Error;

/// Fill color for canvas areas no screen image covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundColor(pub Rgba<u8>);

impl BackgroundColor {
    pub const BLACK: Self = Self(Rgba([0, 0, 0, 255]));

    pub fn rgba(self) -> Rgba<u8> {
        self.0
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for BackgroundColor {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidColor(s.to_owned());
        let value = s.trim();

        let named = match value.to_ascii_lowercase().as_str() {
            "black" => Some([0, 0, 0]),
            "white" => Some([255, 255, 255]),
            "gray" | "grey" => Some([128, 128, 128]),
            _ => None,
        };
        if let Some([r, g, b]) = named {
            return Ok(Self(Rgba([r, g, b, 255])));
        }

        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize, width: usize| {
            u8::from_str_radix(&hex[i * width..(i + 1) * width], 16)
                .map(|v| if width == 1 { v * 17 } else { v })
                .map_err(|_| invalid())
        };

        let rgba = match hex.len() {
            3 => [channel(0, 1)?, channel(1, 1)?, channel(2, 1)?, 255],
            6 => [channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, 255],
            8 => [channel(0, 2)?, channel(1, 2)?, channel(2, 2)?, channel(3, 2)?],
            _ => return Err(invalid()),
        };
        Ok(Self(Rgba(rgba)))
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")?;
        if a != 255 {
            write!(f, "{a:02x}")?;
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for BackgroundColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_opaque_black() {
        assert_eq!(BackgroundColor::default().rgba(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn parses_named_and_hex_colors() {
        let parse = |s: &str| s.parse::<BackgroundColor>().unwrap().rgba().0;
        assert_eq!(parse("Black"), [0, 0, 0, 255]);
        assert_eq!(parse("grey"), [128, 128, 128, 255]);
        assert_eq!(parse("#fff"), [255, 255, 255, 255]);
        assert_eq!(parse("#1a2b3c"), [0x1a, 0x2b, 0x3c, 255]);
        assert_eq!(parse("#1a2b3c80"), [0x1a, 0x2b, 0x3c, 0x80]);
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "123456", "chartreuse", "#ééé"] {
            assert!(bad.parse::<BackgroundColor>().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(BackgroundColor::BLACK.to_string(), "#000000");
        assert_eq!(
            BackgroundColor(Rgba([1, 2, 3, 4])).to_string(),
            "#01020304"
        );
    }
}
