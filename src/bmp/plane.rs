//! Pixel plane reconstruction: stored rows are reordered top row first.
//!
//! Rows keep their padded length; [`super::utils::depalettize`] skips the
//! padding columns when expanding.

use alloc::vec::Vec;

use enough::Stop;
use log::{trace, warn};

use super::header::{Cursor, ImageDescriptor};
use super::{Permissiveness, RowAlignment};
use crate::error::BmpError;

/// Byte layout of one stored pixel row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlaneGeometry {
    /// Index columns per row including padding.
    pub padded_width: usize,
    /// Bytes per row including padding.
    pub row_bytes: usize,
    pub height: usize,
}

impl PlaneGeometry {
    pub(crate) fn new(
        descriptor: &ImageDescriptor,
        alignment: RowAlignment,
    ) -> Result<Self, BmpError> {
        let too_large = BmpError::DimensionsTooLarge {
            width: descriptor.width,
            height: descriptor.height,
        };
        let per_byte = descriptor.bit_depth.indices_per_byte();
        let width = descriptor.width as usize;

        let (padded_width, row_bytes) = match alignment {
            RowAlignment::EightColumns => {
                let padded = width.div_ceil(8).checked_mul(8).ok_or(too_large)?;
                (padded, padded / per_byte)
            }
            RowAlignment::FourBytes => {
                let bits = width
                    .checked_mul(usize::from(descriptor.bit_depth.bits()))
                    .ok_or(too_large)?;
                let row_bytes = bits.div_ceil(32) * 4;
                (row_bytes * per_byte, row_bytes)
            }
        };
        Ok(Self {
            padded_width,
            row_bytes,
            height: descriptor.height as usize,
        })
    }

    pub(crate) fn plane_bytes(&self) -> Option<usize> {
        self.row_bytes.checked_mul(self.height)
    }
}

/// Packed indices, top row first, `row_bytes` per row.
pub(crate) struct IndexedPlane {
    pub data: Vec<u8>,
    pub geometry: PlaneGeometry,
}

impl IndexedPlane {
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        let rb = self.geometry.row_bytes;
        &self.data[y * rb..(y + 1) * rb]
    }
}

/// Read `geometry.height` stored rows from `cursor` into a top-down plane.
pub(crate) fn read_plane(
    cursor: &mut Cursor<'_>,
    descriptor: &ImageDescriptor,
    geometry: PlaneGeometry,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<IndexedPlane, BmpError> {
    let too_large = || BmpError::DimensionsTooLarge {
        width: descriptor.width,
        height: descriptor.height,
    };
    let size = geometry.plane_bytes().ok_or_else(too_large)?;
    if cursor.remaining() < size {
        if permissiveness != Permissiveness::Permissive {
            return Err(BmpError::TruncatedData);
        }
        warn!(
            "BMP pixel data truncated: {} of {size} bytes present, zero-filling",
            cursor.remaining()
        );
    }

    trace!(
        "Plane: {} columns ({} bytes) per row, {} rows, top-down: {}",
        geometry.padded_width, geometry.row_bytes, geometry.height, descriptor.top_down
    );

    let rb = geometry.row_bytes;
    let h = geometry.height;
    let mut data = Vec::new();
    data.try_reserve_exact(size).map_err(|_| too_large())?;
    data.resize(size, 0);
    for stored_row in 0..h {
        if stored_row % 16 == 0 {
            stop.check()?;
        }
        let dest_row = if descriptor.top_down {
            stored_row
        } else {
            h - 1 - stored_row
        };
        let start = dest_row * rb;
        cursor.read_exact_bytes(&mut data[start..start + rb])?;
    }

    Ok(IndexedPlane { data, geometry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use crate::bmp::header::BitDepth;
    use enough::Unstoppable;

    fn descriptor(width: u32, height: u32, bit_depth: BitDepth, top_down: bool) -> ImageDescriptor {
        ImageDescriptor {
            width,
            height,
            bit_depth,
            palette_entries: 2,
            header_size: 40,
            data_offset: 0,
            top_down,
        }
    }

    #[test]
    fn geometry_eight_columns() {
        let g = PlaneGeometry::new(&descriptor(10, 2, BitDepth::Eight, false), RowAlignment::EightColumns)
            .unwrap();
        assert_eq!((g.padded_width, g.row_bytes), (16, 16));
        let g = PlaneGeometry::new(&descriptor(10, 2, BitDepth::Four, false), RowAlignment::EightColumns)
            .unwrap();
        assert_eq!((g.padded_width, g.row_bytes), (16, 8));
        let g = PlaneGeometry::new(&descriptor(8, 2, BitDepth::Eight, false), RowAlignment::EightColumns)
            .unwrap();
        assert_eq!((g.padded_width, g.row_bytes), (8, 8));
    }

    #[test]
    fn geometry_four_bytes() {
        let g = PlaneGeometry::new(&descriptor(10, 2, BitDepth::Eight, false), RowAlignment::FourBytes)
            .unwrap();
        assert_eq!((g.padded_width, g.row_bytes), (12, 12));
        let g = PlaneGeometry::new(&descriptor(1, 2, BitDepth::Eight, false), RowAlignment::FourBytes)
            .unwrap();
        assert_eq!((g.padded_width, g.row_bytes), (4, 4));
    }

    #[test]
    fn four_bit_alignments_agree() {
        for width in 1..40 {
            let d = descriptor(width, 1, BitDepth::Four, false);
            assert_eq!(
                PlaneGeometry::new(&d, RowAlignment::EightColumns).unwrap(),
                PlaneGeometry::new(&d, RowAlignment::FourBytes).unwrap(),
                "width {width}"
            );
        }
    }

    #[test]
    fn rows_are_reversed_including_first_and_last() {
        let d = descriptor(8, 3, BitDepth::Eight, false);
        let g = PlaneGeometry::new(&d, RowAlignment::EightColumns).unwrap();
        let mut stored = Vec::new();
        stored.extend_from_slice(&[0u8; 8]); // bottom row
        stored.extend_from_slice(&[1u8; 8]);
        stored.extend_from_slice(&[2u8; 8]); // top row
        let mut cursor = Cursor::new(&stored, false);
        let plane = read_plane(&mut cursor, &d, g, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(plane.row(0), &[2u8; 8]);
        assert_eq!(plane.row(1), &[1u8; 8]);
        assert_eq!(plane.row(2), &[0u8; 8]);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn top_down_rows_keep_order() {
        let d = descriptor(8, 2, BitDepth::Eight, true);
        let g = PlaneGeometry::new(&d, RowAlignment::EightColumns).unwrap();
        let mut stored = vec![7u8; 8];
        stored.extend_from_slice(&[9u8; 8]);
        let mut cursor = Cursor::new(&stored, false);
        let plane = read_plane(&mut cursor, &d, g, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(plane.row(0), &[7u8; 8]);
        assert_eq!(plane.row(1), &[9u8; 8]);
    }

    #[test]
    fn short_plane_is_truncated() {
        let d = descriptor(8, 2, BitDepth::Eight, false);
        let g = PlaneGeometry::new(&d, RowAlignment::EightColumns).unwrap();
        let stored = [0u8; 15];
        let mut cursor = Cursor::new(&stored, false);
        assert!(matches!(
            read_plane(&mut cursor, &d, g, Permissiveness::Standard, &Unstoppable),
            Err(BmpError::TruncatedData)
        ));
    }

    #[test]
    fn permissive_zero_fills() {
        let d = descriptor(8, 2, BitDepth::Eight, false);
        let g = PlaneGeometry::new(&d, RowAlignment::EightColumns).unwrap();
        let stored = [5u8; 12];
        let mut cursor = Cursor::new(&stored, true);
        let plane =
            read_plane(&mut cursor, &d, g, Permissiveness::Permissive, &Unstoppable).unwrap();
        // The bottom row was complete; the top row got 4 bytes then zeros.
        assert_eq!(plane.row(1), &[5u8; 8]);
        assert_eq!(plane.row(0), &[5, 5, 5, 5, 0, 0, 0, 0]);
    }
}
