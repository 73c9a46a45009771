//! Index expansion through the palette.

use enough::Stop;

use super::Permissiveness;
use super::palette::Palette;
use super::plane::IndexedPlane;
use super::header::{BitDepth, ImageDescriptor};
use crate::error::BmpError;
use crate::surface::Surface;

/// Expand `plane` through `palette` into a `width * height` surface.
///
/// Padding columns past `width` are dropped. In [`Permissiveness::Strict`]
/// an index past the declared palette length is an error; otherwise it
/// resolves to the (black) unused slot.
pub(crate) fn depalettize(
    plane: &IndexedPlane,
    palette: &Palette,
    descriptor: &ImageDescriptor,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<Surface, BmpError> {
    let width = descriptor.width as usize;
    let mut surface = Surface::new(descriptor.width, descriptor.height)?;
    let validate = permissiveness == Permissiveness::Strict;
    let declared = palette.declared();

    let check = |idx: u8| -> Result<(), BmpError> {
        if validate && usize::from(idx) >= declared {
            return Err(BmpError::InvalidFormat(alloc::format!(
                "palette index {idx} out of range (palette has {declared} entries)"
            )));
        }
        Ok(())
    };

    for (y, out_row) in surface.pixels_mut().chunks_exact_mut(width).enumerate() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let in_row = plane.row(y);
        match descriptor.bit_depth {
            BitDepth::Eight => {
                for (out, &idx) in out_row.iter_mut().zip(in_row) {
                    check(idx)?;
                    *out = palette.lookup(idx);
                }
            }
            BitDepth::Four => {
                let mut out_iter = out_row.chunks_exact_mut(2);
                let mut in_iter = in_row.iter();

                for (out, &byte) in (&mut out_iter).zip(&mut in_iter) {
                    let (hi, lo) = (byte >> 4, byte & 0x0F);
                    check(hi)?;
                    check(lo)?;
                    out[0] = palette.lookup(hi);
                    out[1] = palette.lookup(lo);
                }
                // Odd width: the last pixel lives in the high nibble.
                if let ([out], Some(&byte)) = (out_iter.into_remainder(), in_iter.next()) {
                    check(byte >> 4)?;
                    *out = palette.lookup(byte >> 4);
                }
            }
        }
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::header::Cursor;
    use crate::bmp::palette::read_palette;
    use crate::bmp::plane::PlaneGeometry;
    use crate::bmp::RowAlignment;
    use crate::pixel::{ColorOrder, Rgb565};
    use alloc::vec;
    use alloc::vec::Vec;
    use enough::Unstoppable;

    const RED: Rgb565 = Rgb565::from_rgb(255, 0, 0);
    const GREEN: Rgb565 = Rgb565::from_rgb(0, 255, 0);

    /// Index at `(x, y)` of a packed plane.
    fn index_at(plane: &IndexedPlane, depth: BitDepth, x: usize, y: usize) -> u8 {
        let row = plane.row(y);
        match depth {
            BitDepth::Eight => row[x],
            BitDepth::Four if x % 2 == 0 => row[x / 2] >> 4,
            BitDepth::Four => row[x / 2] & 0x0F,
        }
    }

    fn setup(width: u32, height: u32, depth: BitDepth, rows: Vec<u8>) -> (IndexedPlane, Palette, ImageDescriptor) {
        let descriptor = ImageDescriptor {
            width,
            height,
            bit_depth: depth,
            palette_entries: 2,
            header_size: 40,
            data_offset: 0,
            top_down: true,
        };
        let pal_bytes = [0, 0, 255, 0, 0, 255, 0, 0];
        let palette =
            read_palette(&mut Cursor::new(&pal_bytes, false), &descriptor, ColorOrder::Native).unwrap();
        let geometry = PlaneGeometry::new(&descriptor, RowAlignment::EightColumns).unwrap();
        assert_eq!(rows.len(), geometry.row_bytes * height as usize);
        (IndexedPlane { data: rows, geometry }, palette, descriptor)
    }

    #[test]
    fn eight_bit_drops_padding_columns() {
        let mut rows = vec![0u8; 16];
        rows[1] = 1;
        rows[9] = 1; // padding column, must not appear
        let (plane, palette, desc) = setup(9, 1, BitDepth::Eight, rows);
        let surface = depalettize(&plane, &palette, &desc, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(surface.pixels().len(), 9);
        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(surface.pixel(1, 0), Some(GREEN));
        assert_eq!(surface.pixel(8, 0), Some(RED));
    }

    #[test]
    fn four_bit_high_nibble_first() {
        // Width 3: pixels 0,1 in byte 0 (hi, lo), pixel 2 in the high nibble of byte 1.
        let rows = vec![0x10, 0x1F, 0, 0];
        let (plane, palette, desc) = setup(3, 1, BitDepth::Four, rows);
        assert_eq!(index_at(&plane, BitDepth::Four, 0, 0), 1);
        assert_eq!(index_at(&plane, BitDepth::Four, 2, 0), 1);
        let surface = depalettize(&plane, &palette, &desc, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(surface.pixels(), &[GREEN, RED, GREEN]);
    }

    #[test]
    fn undeclared_index_is_black_or_rejected() {
        let rows = vec![5u8; 8];
        let (plane, palette, desc) = setup(2, 1, BitDepth::Eight, rows);
        assert_eq!(index_at(&plane, BitDepth::Eight, 1, 0), 5);
        let surface = depalettize(&plane, &palette, &desc, Permissiveness::Standard, &Unstoppable).unwrap();
        assert_eq!(surface.pixels(), &[Rgb565::BLACK, Rgb565::BLACK]);
        assert!(matches!(
            depalettize(&plane, &palette, &desc, Permissiveness::Strict, &Unstoppable),
            Err(BmpError::InvalidFormat(_))
        ));
    }

    #[test]
    fn strict_ignores_padding_indices() {
        // The 0x0F in the padding nibble of byte 1 is outside the palette, but unused.
        let rows = vec![0x01, 0x0F, 0, 0];
        let (plane, palette, desc) = setup(3, 1, BitDepth::Four, rows);
        let surface = depalettize(&plane, &palette, &desc, Permissiveness::Strict, &Unstoppable).unwrap();
        assert_eq!(surface.pixels(), &[RED, GREEN, RED]);
    }
}
