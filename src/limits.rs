use crate::bmp::ImageDescriptor;
use crate::error::BmpError;

/// Resource limits applied while loading.
///
/// All fields default to `None` (no limit). Checked right after the header
/// is parsed, before any pixel buffer is allocated.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum bytes for all buffers a loader allocates (plane, surface, scratch).
    pub max_memory_bytes: Option<u64>,
}

/// Bytes each buffer of a load will hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Footprint {
    /// Packed index plane, freed once the surface is built.
    pub plane: usize,
    /// Decoded RGB565 surface.
    pub surface: usize,
    /// Sprite staging tile, 0 without a sprite mode.
    pub scratch: usize,
}

impl Footprint {
    /// Peak bytes: the plane and the surface coexist during expansion.
    pub(crate) fn total(&self) -> Option<usize> {
        self.plane
            .checked_add(self.surface)?
            .checked_add(self.scratch)
    }
}

impl Limits {
    /// Check the image's declared size.
    pub(crate) fn check_image(&self, descriptor: &ImageDescriptor) -> Result<(), BmpError> {
        let (width, height) = (u64::from(descriptor.width), u64::from(descriptor.height));
        if let Some(max_w) = self.max_width {
            if width > max_w {
                return Err(BmpError::LimitExceeded(alloc::format!(
                    "image width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if height > max_h {
                return Err(BmpError::LimitExceeded(alloc::format!(
                    "image height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = width * height;
            if pixels > max_px {
                return Err(BmpError::LimitExceeded(alloc::format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }

    /// Check the bytes a load will allocate against `max_memory_bytes`.
    pub(crate) fn check_footprint(&self, footprint: Footprint) -> Result<(), BmpError> {
        let Some(max_mem) = self.max_memory_bytes else {
            return Ok(());
        };
        let Footprint {
            plane,
            surface,
            scratch,
        } = footprint;
        match footprint.total() {
            Some(total) if total as u64 <= max_mem => Ok(()),
            Some(total) => Err(BmpError::LimitExceeded(alloc::format!(
                "load needs {total} bytes (plane {plane}, surface {surface}, sprite tile {scratch}), limit {max_mem}"
            ))),
            None => Err(BmpError::LimitExceeded(alloc::format!(
                "buffer sizes overflow (plane {plane}, surface {surface}, sprite tile {scratch}), limit {max_mem}"
            ))),
        }
    }
}
