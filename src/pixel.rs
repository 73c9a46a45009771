/// A packed 16-bit 5:6:5 color, red in the high bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self(0xFFFF);

    /// Truncate 8:8:8 to 5:6:5 (top 5 bits of red, top 6 of green, top 5 of blue).
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Expand back to 8:8:8, replicating high bits into the low ones
    /// so that full-scale channels stay at 255.
    #[inline]
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        let r = (self.0 >> 11) as u8 & 0x1F;
        let g = (self.0 >> 5) as u8 & 0x3F;
        let b = self.0 as u8 & 0x1F;
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }

    /// The same color with its two bytes exchanged.
    #[inline]
    pub const fn swap_bytes(self) -> Self {
        Self(self.0.swap_bytes())
    }

    #[inline]
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for Rgb565 {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

impl From<Rgb565> for u16 {
    fn from(c: Rgb565) -> Self {
        c.0
    }
}

#[cfg(feature = "rgb")]
impl From<rgb::RGB8> for Rgb565 {
    fn from(c: rgb::RGB8) -> Self {
        Self::from_rgb(c.r, c.g, c.b)
    }
}

#[cfg(feature = "rgb")]
impl From<Rgb565> for rgb::RGB8 {
    fn from(c: Rgb565) -> Self {
        let (r, g, b) = c.to_rgb();
        rgb::RGB8 { r, g, b }
    }
}

/// How decoded colors are laid out in the surface's `u16` words.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorOrder {
    /// Red-high 5:6:5 as produced by [`Rgb565::from_rgb`].
    #[default]
    Native,
    /// Red-high 5:6:5 with the two bytes exchanged, the order most SPI
    /// display controllers expect when a framebuffer is streamed bytewise.
    ByteSwapped,
}

impl ColorOrder {
    /// Encode an 8:8:8 color for this order.
    #[inline]
    pub const fn encode(self, r: u8, g: u8, b: u8) -> Rgb565 {
        let c = Rgb565::from_rgb(r, g, b);
        match self {
            Self::Native => c,
            Self::ByteSwapped => c.swap_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primaries() {
        assert_eq!(Rgb565::from_rgb(255, 0, 0), Rgb565(0xF800));
        assert_eq!(Rgb565::from_rgb(0, 255, 0), Rgb565(0x07E0));
        assert_eq!(Rgb565::from_rgb(0, 0, 255), Rgb565(0x001F));
        assert_eq!(Rgb565::from_rgb(255, 255, 255), Rgb565::WHITE);
        assert_eq!(Rgb565::from_rgb(0, 0, 0), Rgb565::BLACK);
    }

    #[test]
    fn truncates_low_bits() {
        // 0x07 in red, 0x03 in green and 0x07 in blue are all below one step.
        assert_eq!(Rgb565::from_rgb(0x07, 0x03, 0x07), Rgb565::BLACK);
        assert_eq!(Rgb565::from_rgb(0x08, 0x04, 0x08), Rgb565(0x0821));
    }

    #[test]
    fn expansion_keeps_full_scale() {
        assert_eq!(Rgb565::WHITE.to_rgb(), (255, 255, 255));
        assert_eq!(Rgb565::from_rgb(0x80, 0x40, 0x20).to_rgb(), (0x84, 0x41, 0x21));
    }

    #[test]
    fn byte_swapped_order() {
        assert_eq!(ColorOrder::Native.encode(255, 0, 0), Rgb565(0xF800));
        assert_eq!(ColorOrder::ByteSwapped.encode(255, 0, 0), Rgb565(0x00F8));
        assert_eq!(ColorOrder::ByteSwapped.encode(0, 0, 255), Rgb565(0x1F00));
    }
}
