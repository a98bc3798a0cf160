//! Property value helpers per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).

/// [§ 4 Representing Colors](https://www.w3.org/TR/css-color-4/#color-type)
///
/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl ColorValue {
    /// Build an opaque color from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                r: short(0)?,
                g: short(1)?,
                b: short(2)?,
                a: short(3)?,
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                r: long(0)?,
                g: long(2)?,
                b: long(4)?,
                a: long(6)?,
            }),
            _ => None,
        }
    }

    /// [§ 4.1 The sRGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
    ///
    /// Parse a hex color or a legacy comma-separated `rgb()`/`rgba()` value.
    /// Anything else is not a color this crate recognizes.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::from_hex(value);
        }
        let args = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))?
            .strip_suffix(')')?;
        let mut channels = args.split(',').map(str::trim);
        let r = channels.next()?.parse().ok()?;
        let g = channels.next()?.parse().ok()?;
        let b = channels.next()?.parse().ok()?;
        let a = match channels.next() {
            Some(alpha) => alpha_channel(alpha)?,
            None => 255,
        };
        Some(Self { r, g, b, a })
    }
}

fn alpha_channel(alpha: &str) -> Option<u8> {
    let alpha: f32 = alpha.parse().ok()?;
    if !(0.0..=1.0).contains(&alpha) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some((alpha * 255.0).round() as u8)
}

/// [§ 6.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
///
/// Parse a `<number>px` length. Bare numbers are accepted as pixels.
#[must_use]
pub fn parse_px(value: &str) -> Option<f32> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number
        .parse::<f32>()
        .ok()
        .filter(|px| px.is_finite() && *px >= 0.0)
}
