use enough::Stop;

use crate::bmp::{BmpOptions, Decoder, Permissiveness, RowAlignment};
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::ColorOrder;
use crate::sprite::{BmpLoader, SpriteConfig};

/// Builder for loading an indexed BMP into a [`BmpLoader`].
///
/// ```no_run
/// use zensprite::{LoadRequest, Limits, Unstoppable};
///
/// let data: &[u8] = &[]; // your BMP bytes
/// let limits = Limits { max_pixels: Some(320 * 240), ..Default::default() };
/// let sheet = LoadRequest::new(data)
///     .sprite_width(16)
///     .limits(&limits)
///     .load(Unstoppable)?;
/// # Ok::<(), zensprite::BmpError>(())
/// ```
#[derive(Clone, Debug)]
pub struct LoadRequest<'a> {
    data: &'a [u8],
    sprite_width: Option<u32>,
    sprite_height: Option<u32>,
    limits: Option<&'a Limits>,
    options: BmpOptions,
}

impl<'a> LoadRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            sprite_width: None,
            sprite_height: None,
            limits: None,
            options: BmpOptions::default(),
        }
    }

    /// Enable indexed sprite drawing with frames `width` pixels wide.
    pub fn sprite_width(mut self, width: u32) -> Self {
        self.sprite_width = Some(width);
        self
    }

    /// Enable cropped drawing with windows `height` pixels tall.
    pub fn sprite_height(mut self, height: u32) -> Self {
        self.sprite_height = Some(height);
        self
    }

    pub(crate) fn sprite_dims(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.sprite_width = width;
        self.sprite_height = height;
        self
    }

    pub fn limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.options.permissiveness = permissiveness;
        self
    }

    pub fn color_order(mut self, order: ColorOrder) -> Self {
        self.options.color_order = order;
        self
    }

    pub fn row_alignment(mut self, alignment: RowAlignment) -> Self {
        self.options.row_alignment = alignment;
        self
    }

    /// Decode the image and allocate every buffer the loader will use.
    ///
    /// Either returns a fully built loader or an error; nothing is kept on
    /// failure.
    pub fn load(self, stop: impl Stop) -> Result<BmpLoader, BmpError> {
        let decoder = Decoder::new(self.data, self.options)?;
        let descriptor = *decoder.descriptor();
        let sprite = SpriteConfig::resolve(&descriptor, self.sprite_width, self.sprite_height)?;

        if let Some(limits) = self.limits {
            limits.check_image(&descriptor)?;
            let mut footprint = decoder.footprint()?;
            if let Some(config) = &sprite {
                footprint.scratch = config.scratch_bytes().ok_or(BmpError::DimensionsTooLarge {
                    width: descriptor.width,
                    height: descriptor.height,
                })?;
            }
            limits.check_footprint(footprint)?;
        }

        stop.check()?;
        let surface = decoder.decode(&stop)?;
        BmpLoader::assemble(descriptor, surface, sprite)
    }

    /// Read `reader` to the end, then decode those bytes with this request's
    /// options. The bytes passed to [`new`](Self::new) are not used.
    ///
    /// ```no_run
    /// use zensprite::{LoadRequest, Unstoppable};
    ///
    /// let file = std::fs::File::open("sheet.bmp")?;
    /// let sheet = LoadRequest::new(&[])
    ///     .sprite_width(16)
    ///     .load_reader(file, Unstoppable)?;
    /// # Ok::<(), zensprite::BmpError>(())
    /// ```
    #[cfg(feature = "std")]
    pub fn load_reader<R: std::io::Read>(
        self,
        mut reader: R,
        stop: impl Stop,
    ) -> Result<BmpLoader, BmpError> {
        let mut data = alloc::vec::Vec::new();
        reader.read_to_end(&mut data)?;
        stop.check()?;
        LoadRequest {
            data: &data,
            sprite_width: self.sprite_width,
            sprite_height: self.sprite_height,
            limits: self.limits,
            options: self.options,
        }
        .load(stop)
    }
}
