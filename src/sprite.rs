//! The loaded image and its sprite/tile drawing modes.

use crate::bmp::ImageDescriptor;
use crate::decode::LoadRequest;
use crate::error::{Axis, BmpError, SpriteMode};
use crate::pixel::Rgb565;
use crate::surface::{Canvas, Surface};

/// Which sprite modes a loader was built with, and the tile they cut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SpriteConfig {
    width: u32,
    height: u32,
    indexed: bool,
    cropped: bool,
}

fn check_dim(axis: Axis, requested: u32, available: u32) -> Result<u32, BmpError> {
    if requested == 0 || requested > available {
        return Err(BmpError::DimensionOutOfRange {
            axis,
            requested,
            available,
        });
    }
    Ok(requested)
}

impl SpriteConfig {
    /// Validate the requested sprite size against the image.
    ///
    /// A sprite width enables [`BmpLoader::draw_indexed`], a sprite height
    /// enables [`BmpLoader::draw_cropped`]. Whichever is missing defaults to
    /// the image's own extent.
    pub(crate) fn resolve(
        descriptor: &ImageDescriptor,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Option<Self>, BmpError> {
        if width.is_none() && height.is_none() {
            return Ok(None);
        }
        let w = match width {
            Some(w) => check_dim(Axis::Width, w, descriptor.width)?,
            None => descriptor.width,
        };
        let h = match height {
            Some(h) => check_dim(Axis::Height, h, descriptor.height)?,
            None => descriptor.height,
        };
        Ok(Some(Self {
            width: w,
            height: h,
            indexed: width.is_some(),
            cropped: height.is_some(),
        }))
    }

    /// Bytes of the scratch tile.
    pub(crate) fn scratch_bytes(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(2))
    }
}

#[derive(Clone, Debug)]
struct Sprite {
    config: SpriteConfig,
    /// Staging tile, fully rewritten by every sprite draw.
    scratch: Surface,
}

/// A decoded indexed BMP ready to be drawn as a whole, as indexed sprite
/// frames, or as a cropped window.
///
/// The decoded surface is never modified after loading. Sprite draws stage
/// through one scratch tile owned by the loader, which is why they take
/// `&mut self`; share a loader across threads only behind a lock.
#[derive(Clone, Debug)]
pub struct BmpLoader {
    descriptor: ImageDescriptor,
    surface: Surface,
    sprite: Option<Sprite>,
}

impl BmpLoader {
    pub(crate) fn assemble(
        descriptor: ImageDescriptor,
        surface: Surface,
        config: Option<SpriteConfig>,
    ) -> Result<Self, BmpError> {
        let sprite = match config {
            Some(config) => Some(Sprite {
                config,
                scratch: Surface::new(config.width, config.height)?,
            }),
            None => None,
        };
        Ok(Self {
            descriptor,
            surface,
            sprite,
        })
    }

    /// Decode `data` with default options.
    ///
    /// `sprite_width` enables [`draw_indexed`](Self::draw_indexed) and
    /// `sprite_height` enables [`draw_cropped`](Self::draw_cropped).
    pub fn from_bytes(
        data: &[u8],
        sprite_width: Option<u32>,
        sprite_height: Option<u32>,
    ) -> Result<Self, BmpError> {
        LoadRequest::new(data)
            .sprite_dims(sprite_width, sprite_height)
            .load(enough::Unstoppable)
    }

    /// Read a whole stream, then decode it.
    #[cfg(feature = "std")]
    pub fn from_reader<R: std::io::Read>(
        reader: R,
        sprite_width: Option<u32>,
        sprite_height: Option<u32>,
    ) -> Result<Self, BmpError> {
        LoadRequest::new(&[])
            .sprite_dims(sprite_width, sprite_height)
            .load_reader(reader, enough::Unstoppable)
    }

    /// Load a BMP file. The file is closed before decoding starts.
    #[cfg(feature = "std")]
    pub fn open<P: AsRef<std::path::Path>>(
        path: P,
        sprite_width: Option<u32>,
        sprite_height: Option<u32>,
    ) -> Result<Self, BmpError> {
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, sprite_width, sprite_height)
    }

    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.descriptor
    }

    /// The fully decoded image.
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// `(width, height)` of the sprite tile, if any sprite mode is enabled.
    pub fn tile_size(&self) -> Option<(u32, u32)> {
        self.sprite
            .as_ref()
            .map(|s| (s.config.width, s.config.height))
    }

    /// Composite the whole image onto `dest` at `(x, y)`.
    pub fn draw<C: Canvas + ?Sized>(&self, dest: &mut C, x: i32, y: i32, key: Option<Rgb565>) {
        self.surface.blit(dest, x, y, key);
    }

    /// Draw frame `index` of a horizontal sprite strip.
    ///
    /// Frame `i` is the tile whose left edge is column `i * tile_width`. An
    /// index past the last frame is not checked: columns outside the image
    /// come out black.
    pub fn draw_indexed<C: Canvas + ?Sized>(
        &mut self,
        dest: &mut C,
        x: i32,
        y: i32,
        index: u32,
        key: Option<Rgb565>,
    ) -> Result<(), BmpError> {
        let sprite = self
            .sprite
            .as_mut()
            .filter(|s| s.config.indexed)
            .ok_or(BmpError::NotInitialized(SpriteMode::Indexed))?;
        let origin_x = u64::from(index) * u64::from(sprite.config.width);
        sprite.scratch.copy_window(&self.surface, origin_x, 0);
        sprite.scratch.blit(dest, x, y, key);
        Ok(())
    }

    /// Draw the tile-sized window whose top-left corner is `(crop_x, crop_y)`.
    ///
    /// Parts of the window outside the image come out black.
    pub fn draw_cropped<C: Canvas + ?Sized>(
        &mut self,
        dest: &mut C,
        x: i32,
        y: i32,
        crop_x: u32,
        crop_y: u32,
        key: Option<Rgb565>,
    ) -> Result<(), BmpError> {
        let sprite = self
            .sprite
            .as_mut()
            .filter(|s| s.config.cropped)
            .ok_or(BmpError::NotInitialized(SpriteMode::Cropped))?;
        sprite
            .scratch
            .copy_window(&self.surface, u64::from(crop_x), u64::from(crop_y));
        sprite.scratch.blit(dest, x, y, key);
        Ok(())
    }
}
