/// An 8-bit-per-channel, straight (non-premultiplied) sRGB color.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    #[must_use]
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub const fn as_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
    /// Parse `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorParseError::BadDigits);
        }
        let channel = |idx: usize| {
            u8::from_str_radix(&hex[idx * 2..idx * 2 + 2], 16)
                .map_err(|_| ColorParseError::BadDigits)
        };
        match hex.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(1)?, channel(2)?)),
            8 => Ok(Self {
                r: channel(0)?,
                g: channel(1)?,
                b: channel(2)?,
                a: channel(3)?,
            }),
            _ => Err(ColorParseError::BadLength),
        }
    }
    /// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
impl From<Color> for image::Rgba<u8> {
    fn from(value: Color) -> Self {
        image::Rgba(value.as_array())
    }
}
impl From<image::Rgba<u8>> for Color {
    fn from(value: image::Rgba<u8>) -> Self {
        Self::from_array(value.0)
    }
}
impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("expected 6 or 8 hex digits")]
    BadLength,
    #[error("invalid hex digit")]
    BadDigits,
}
