//! BMP file and info header parsing.
//!
//! Only the fields needed for uncompressed paletted images are interpreted.
//! The info header is consumed by its self-declared size, so V4/V5 headers
//! leave the cursor at the palette just like a plain BITMAPINFOHEADER.

use log::{trace, warn};

use super::Permissiveness;
use crate::error::BmpError;

/// Bytes of the info header this parser reads field by field.
const INFO_HEADER_CORE: u32 = 40;

// ── Cursor for reading from &[u8] ───────────────────────────────────

pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    /// When true, reads beyond EOF return zeros instead of errors.
    permissive: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8], permissive: bool) -> Self {
        Self {
            data,
            pos: 0,
            permissive,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn set_position(&mut self, pos: usize) -> Result<(), BmpError> {
        if pos > self.data.len() {
            if self.permissive {
                self.pos = self.data.len();
                return Ok(());
            }
            return Err(BmpError::TruncatedData);
        }
        self.pos = pos;
        Ok(())
    }

    pub(crate) fn skip(&mut self, n: usize) -> Result<(), BmpError> {
        let new_pos = self.pos.checked_add(n).ok_or(BmpError::TruncatedData)?;
        self.set_position(new_pos)
    }

    fn get_u16_le(&mut self) -> Result<u16, BmpError> {
        let [a, b] = self.read_exact_fixed::<2>()?;
        Ok(u16::from_le_bytes([a, b]))
    }

    fn get_u32_le(&mut self) -> Result<u32, BmpError> {
        Ok(u32::from_le_bytes(self.read_exact_fixed::<4>()?))
    }

    /// Read `N` bytes; truncation is always an error regardless of permissiveness.
    fn read_exact_fixed<const N: usize>(&mut self) -> Result<[u8; N], BmpError> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or(BmpError::TruncatedData)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(bytes);
        self.pos += N;
        Ok(buf)
    }

    /// Read `N` bytes, zero-padding past EOF when permissive.
    pub(crate) fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BmpError> {
        let mut buf = [0u8; N];
        self.read_exact_bytes(&mut buf)?;
        Ok(buf)
    }

    /// Fill `buf`, zero-padding past EOF when permissive.
    pub(crate) fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), BmpError> {
        let n = buf.len();
        if n > self.remaining() {
            if self.permissive {
                let available = self.remaining();
                buf[..available].copy_from_slice(&self.data[self.pos..self.pos + available]);
                buf[available..].fill(0);
                self.pos = self.data.len();
                return Ok(());
            }
            return Err(BmpError::TruncatedData);
        }
        buf.copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(())
    }
}

// ── Descriptor ──────────────────────────────────────────────────────

/// Bits per palette index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 16-color images, two indices per byte (high nibble first).
    Four,
    /// 256-color images, one index per byte.
    Eight,
}

impl BitDepth {
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    pub fn bits(self) -> u16 {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
        }
    }

    /// Palette slots addressable at this depth.
    pub fn palette_capacity(self) -> usize {
        1 << self.bits()
    }

    pub fn indices_per_byte(self) -> usize {
        8 / usize::from(self.bits())
    }
}

/// Structural metadata of an indexed BMP, immutable once parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageDescriptor {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    /// Palette entries stored in the file (never more than the depth allows).
    pub palette_entries: u32,
    /// Declared info header size (40 for BITMAPINFOHEADER, 124 for V5, ...).
    pub header_size: u32,
    /// Declared file offset of the pixel plane.
    pub data_offset: u32,
    /// Rows are stored top row first (negative height in the file).
    pub top_down: bool,
}

impl ImageDescriptor {
    /// Parse only the headers of `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
        let mut cursor = Cursor::new(data, false);
        parse_header(&mut cursor, Permissiveness::Standard)
    }
}

/// Parse the file header and info header, leaving `cursor` at the palette.
pub(crate) fn parse_header(
    cursor: &mut Cursor<'_>,
    permissiveness: Permissiveness,
) -> Result<ImageDescriptor, BmpError> {
    let is_strict = permissiveness == Permissiveness::Strict;
    let is_permissive = permissiveness == Permissiveness::Permissive;

    if cursor.read_exact_fixed::<2>()? != *b"BM" {
        return Err(BmpError::InvalidFormat("missing BM signature".into()));
    }

    let file_size = cursor.get_u32_le()?;
    // Reserved (4 bytes)
    cursor.skip(4)?;
    let data_offset = cursor.get_u32_le()?;

    if is_strict && file_size != 0 && file_size as usize != cursor.len() {
        return Err(BmpError::InvalidFormat(alloc::format!(
            "file size field ({file_size}) doesn't match actual size ({})",
            cursor.len()
        )));
    }

    let header_size = cursor.get_u32_le()?;
    match header_size {
        40 | 52 | 56 | 64 | 108 | 124 => {}
        12 | 16 => {
            return Err(BmpError::InvalidFormat(alloc::format!(
                "OS/2 info header ({header_size} bytes) has no palette count"
            )));
        }
        _ => {
            return Err(BmpError::InvalidFormat(alloc::format!(
                "unknown info header size: {header_size}"
            )));
        }
    }

    let width = cursor.get_u32_le()? as i32;
    let height = cursor.get_u32_le()? as i32;
    let planes = cursor.get_u16_le()?;
    let bpp = cursor.get_u16_le()?;
    let compression = cursor.get_u32_le()?;
    let _image_size = cursor.get_u32_le()?;
    let _x_pixels_per_meter = cursor.get_u32_le()?;
    let _y_pixels_per_meter = cursor.get_u32_le()?;
    let colors_used = cursor.get_u32_le()?;
    let _colors_important = cursor.get_u32_le()?;

    if compression != 0 {
        return Err(BmpError::UnsupportedCompression(compression));
    }
    let bit_depth = BitDepth::from_bits(bpp).ok_or(BmpError::UnsupportedBitDepth(bpp))?;

    // Skip whatever the extended headers carry (masks, color space, ICC).
    cursor.skip((header_size - INFO_HEADER_CORE) as usize)?;

    if width <= 0 {
        return Err(BmpError::InvalidFormat(alloc::format!(
            "width must be positive, got {width}"
        )));
    }
    if height == 0 {
        return Err(BmpError::InvalidFormat("height is zero".into()));
    }

    if planes != 1 {
        if !is_permissive {
            return Err(BmpError::InvalidFormat(alloc::format!(
                "planes field is {planes}, expected 1"
            )));
        }
        warn!("ignoring BMP planes field {planes}");
    }

    let capacity = bit_depth.palette_capacity() as u32;
    let palette_entries = match colors_used {
        0 => capacity,
        n if n <= capacity => n,
        n if is_permissive => {
            warn!("BMP palette count {n} exceeds {capacity}, clamping");
            capacity
        }
        n => {
            return Err(BmpError::InvalidFormat(alloc::format!(
                "palette count ({n}) exceeds max for {}-bit depth ({capacity})",
                bit_depth.bits()
            )));
        }
    };

    let descriptor = ImageDescriptor {
        width: width as u32,
        height: height.unsigned_abs(),
        bit_depth,
        palette_entries,
        header_size,
        data_offset,
        top_down: height < 0,
    };

    trace!("Width: {}", descriptor.width);
    trace!("Height: {}", descriptor.height);
    trace!("Bit depth: {}", bpp);
    trace!("Palette entries: {}", palette_entries);
    trace!("Info header size: {}", header_size);

    Ok(descriptor)
}
