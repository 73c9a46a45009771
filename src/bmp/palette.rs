use alloc::vec;
use alloc::vec::Vec;

use log::warn;

use super::header::{Cursor, ImageDescriptor};
use crate::error::BmpError;
use crate::pixel::{ColorOrder, Rgb565};

/// Color table sized to the full capacity of the bit depth (16 or 256).
///
/// Slots past the file's declared entry count stay black.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Palette {
    colors: Vec<Rgb565>,
    declared: usize,
}

impl Palette {
    /// Resolve an index. Indices past capacity cannot occur for 4/8-bit
    /// data, but resolve to black rather than panic.
    #[inline]
    pub(crate) fn lookup(&self, index: u8) -> Rgb565 {
        self.colors
            .get(usize::from(index))
            .copied()
            .unwrap_or(Rgb565::BLACK)
    }

    /// Number of entries actually read from the file.
    pub(crate) fn declared(&self) -> usize {
        self.declared
    }

    #[cfg(test)]
    pub(crate) fn colors(&self) -> &[Rgb565] {
        &self.colors
    }
}

/// Read `descriptor.palette_entries` BGRX entries from `cursor`.
///
/// A nonzero pixel data offset that lands past the cursor bounds the table:
/// only the entries that fit before the pixels are read, the rest stay black.
pub(crate) fn read_palette(
    cursor: &mut Cursor<'_>,
    descriptor: &ImageDescriptor,
    order: ColorOrder,
) -> Result<Palette, BmpError> {
    let capacity = descriptor.bit_depth.palette_capacity();
    let declared = descriptor.palette_entries as usize;
    if declared > capacity {
        return Err(BmpError::InvalidFormat(alloc::format!(
            "palette count ({declared}) exceeds capacity ({capacity})"
        )));
    }

    let start = cursor.position();
    let offset = descriptor.data_offset as usize;
    let stored = if offset != 0 && offset >= start {
        declared.min((offset - start) / 4)
    } else {
        declared
    };
    if stored < declared {
        warn!("BMP palette declares {declared} entries but only {stored} fit before the pixel data");
    }

    let mut colors = vec![Rgb565::BLACK; capacity];
    for slot in colors.iter_mut().take(stored) {
        let [b, g, r, _] = cursor.read_fixed_bytes::<4>()?;
        *slot = order.encode(r, g, b);
    }
    Ok(Palette {
        colors,
        declared: stored,
    })
}
