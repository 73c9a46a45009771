//! Indexed BMP decoding into an RGB565 [`Surface`] (internal).
//!
//! Use [`crate::LoadRequest`] or [`crate::BmpLoader`] from the top level.

mod header;
mod palette;
mod plane;
mod utils;

pub use header::{BitDepth, ImageDescriptor};

use enough::Stop;
use log::warn;

use crate::error::BmpError;
use crate::limits::Footprint;
use crate::pixel::ColorOrder;
use crate::surface::Surface;
use header::Cursor;
use plane::PlaneGeometry;

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the BMP decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Reject files that violate the BMP format even in non-critical ways.
    /// Validates: file size field, pixel indices against the declared
    /// palette length.
    Strict,

    /// Default behavior. Accept a wrong file size field and pixel indices
    /// past the declared palette (they draw black). Reject: planes != 1,
    /// oversized palette count, truncated pixel data.
    #[default]
    Standard,

    /// Accept as much as possible. Zero-pad truncated files, clamp an
    /// oversized palette count, ignore the planes field.
    Permissive,
}

/// Row stride of the stored pixel plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowAlignment {
    /// Rows padded to a multiple of 8 index columns.
    #[default]
    EightColumns,
    /// Rows padded to a multiple of 4 bytes, the stride BMP writers emit.
    /// Identical to `EightColumns` at 4 bits per pixel.
    FourBytes,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BmpOptions {
    pub permissiveness: Permissiveness,
    pub color_order: ColorOrder,
    pub row_alignment: RowAlignment,
}

/// Header-parsed decoder; [`Decoder::decode`] runs the rest of the pipeline.
pub(crate) struct Decoder<'a> {
    cursor: Cursor<'a>,
    descriptor: ImageDescriptor,
    geometry: PlaneGeometry,
    options: BmpOptions,
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(data: &'a [u8], options: BmpOptions) -> Result<Self, BmpError> {
        let permissive = options.permissiveness == Permissiveness::Permissive;
        let mut cursor = Cursor::new(data, permissive);
        let descriptor = header::parse_header(&mut cursor, options.permissiveness)?;
        let geometry = PlaneGeometry::new(&descriptor, options.row_alignment)?;
        Ok(Self {
            cursor,
            descriptor,
            geometry,
            options,
        })
    }

    pub(crate) fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    /// Bytes the decode will allocate: the indexed plane plus the surface.
    pub(crate) fn footprint(&self) -> Result<Footprint, BmpError> {
        let too_large = || BmpError::DimensionsTooLarge {
            width: self.descriptor.width,
            height: self.descriptor.height,
        };
        let plane = self.geometry.plane_bytes().ok_or_else(too_large)?;
        let surface = (self.descriptor.width as usize)
            .checked_mul(self.descriptor.height as usize)
            .and_then(|px| px.checked_mul(2))
            .ok_or_else(too_large)?;
        Ok(Footprint {
            plane,
            surface,
            scratch: 0,
        })
    }

    /// Read the palette and pixel plane and expand them.
    pub(crate) fn decode(mut self, stop: &dyn Stop) -> Result<Surface, BmpError> {
        let opts = self.options;
        let palette = palette::read_palette(&mut self.cursor, &self.descriptor, opts.color_order)?;
        self.seek_pixel_data()?;
        stop.check()?;
        let plane = plane::read_plane(
            &mut self.cursor,
            &self.descriptor,
            self.geometry,
            opts.permissiveness,
            stop,
        )?;
        utils::depalettize(&plane, &palette, &self.descriptor, opts.permissiveness, stop)
    }

    /// Jump to the declared pixel offset when it lies past the palette.
    fn seek_pixel_data(&mut self) -> Result<(), BmpError> {
        let offset = self.descriptor.data_offset as usize;
        let here = self.cursor.position();
        if offset >= here {
            return self.cursor.set_position(offset);
        }
        if offset != 0 {
            if self.options.permissiveness == Permissiveness::Strict {
                return Err(BmpError::InvalidFormat(alloc::format!(
                    "pixel data offset {offset} overlaps the headers (palette ends at {here})"
                )));
            }
            warn!("BMP pixel data offset {offset} overlaps the headers, reading from {here}");
        }
        Ok(())
    }
}
