//! RGB565 raster surfaces and the compositing primitive.

use alloc::vec::Vec;

use crate::error::BmpError;
use crate::pixel::Rgb565;

/// A destination that RGB565 pixels can be composited onto.
///
/// Implement this for a display's framebuffer to draw loaders straight into
/// it. Only [`set_pixel`](Canvas::set_pixel) is required; override
/// [`blit_row`](Canvas::blit_row) when the target can copy whole spans.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Write one pixel. Coordinates are always inside the canvas when
    /// called from this crate.
    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb565);

    /// Composite one row of pixels starting at `(x, y)`, clipped to the
    /// canvas. Pixels equal to `key` are skipped.
    fn blit_row(&mut self, x: i32, y: i32, row: &[Rgb565], key: Option<Rgb565>) {
        if y < 0 || y as u32 >= self.height() {
            return;
        }
        let Some((src, dst, len)) = clip_span(x, row.len(), self.width()) else {
            return;
        };
        for (i, &color) in row[src..src + len].iter().enumerate() {
            if key == Some(color) {
                continue;
            }
            self.set_pixel((dst + i) as u32, y as u32, color);
        }
    }
}

/// Clip a span of `len` pixels placed at `x` against `0..bound`.
///
/// Returns `(source offset, destination offset, visible length)`.
fn clip_span(x: i32, len: usize, bound: u32) -> Option<(usize, usize, usize)> {
    let start = i64::from(x);
    let end = start + len as i64;
    let vis_start = start.max(0);
    let vis_end = end.min(i64::from(bound));
    if vis_start >= vis_end {
        return None;
    }
    Some((
        (vis_start - start) as usize,
        vis_start as usize,
        (vis_end - vis_start) as usize,
    ))
}

/// An owned, row-major `width * height` grid of RGB565 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

fn pixel_count(width: u32, height: u32) -> Result<usize, BmpError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(BmpError::DimensionsTooLarge { width, height })
}

impl Surface {
    /// A black surface.
    pub fn new(width: u32, height: u32) -> Result<Self, BmpError> {
        Self::filled(width, height, Rgb565::BLACK)
    }

    /// A surface with every pixel set to `color`.
    ///
    /// A size that cannot be allocated is [`BmpError::DimensionsTooLarge`].
    pub fn filled(width: u32, height: u32, color: Rgb565) -> Result<Self, BmpError> {
        let count = pixel_count(width, height)?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(count)
            .map_err(|_| BmpError::DimensionsTooLarge { width, height })?;
        pixels.resize(count, color);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap existing row-major pixels. The length must be exactly `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb565>) -> Result<Self, BmpError> {
        let needed = pixel_count(width, height)?;
        if pixels.len() != needed {
            return Err(BmpError::BufferSizeMismatch {
                width,
                height,
                needed,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb565] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb565] {
        &mut self.pixels
    }

    pub fn into_pixels(self) -> Vec<Rgb565> {
        self.pixels
    }

    /// The pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Row `y`, or `None` outside the surface.
    pub fn row(&self, y: u32) -> Option<&[Rgb565]> {
        if y >= self.height {
            return None;
        }
        let w = self.width as usize;
        let start = y as usize * w;
        Some(&self.pixels[start..start + w])
    }

    pub fn fill(&mut self, color: Rgb565) {
        self.pixels.fill(color);
    }

    /// Overwrite every pixel of `self` with the same-sized window of `src`
    /// whose top-left corner is `(origin_x, origin_y)`.
    ///
    /// Parts of the window outside `src` come out black.
    pub fn copy_window(&mut self, src: &Surface, origin_x: u64, origin_y: u64) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        let visible = u64::from(src.width)
            .saturating_sub(origin_x)
            .min(w as u64) as usize;
        for (row_idx, out_row) in self.pixels.chunks_exact_mut(w).enumerate() {
            let sy = origin_y + row_idx as u64;
            if sy >= u64::from(src.height) || visible == 0 {
                out_row.fill(Rgb565::BLACK);
                continue;
            }
            // origin_x < src.width here, so it fits in usize.
            let start = sy as usize * src.width as usize + origin_x as usize;
            out_row[..visible].copy_from_slice(&src.pixels[start..start + visible]);
            out_row[visible..].fill(Rgb565::BLACK);
        }
    }

    /// Composite this surface onto `dest` with its top-left corner at `(x, y)`.
    ///
    /// Pixels that fall outside `dest` are clipped; pixels equal to `key`
    /// leave the destination untouched.
    pub fn blit<C: Canvas + ?Sized>(&self, dest: &mut C, x: i32, y: i32, key: Option<Rgb565>) {
        let w = self.width as usize;
        if w == 0 {
            return;
        }
        let dest_h = i64::from(dest.height());
        for (row_idx, row) in self.pixels.chunks_exact(w).enumerate() {
            let dy = i64::from(y) + row_idx as i64;
            if dy < 0 {
                continue;
            }
            if dy >= dest_h {
                break;
            }
            dest.blit_row(x, dy as i32, row, key);
        }
    }

    /// Borrow the pixels as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, Rgb565> {
        imgref::ImgRef::new(&self.pixels, self.width as usize, self.height as usize)
    }
}

impl Canvas for Surface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Rgb565) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }

    fn blit_row(&mut self, x: i32, y: i32, row: &[Rgb565], key: Option<Rgb565>) {
        if y < 0 || y as u32 >= self.height {
            return;
        }
        let Some((src, dst, len)) = clip_span(x, row.len(), self.width) else {
            return;
        };
        let start = y as usize * self.width as usize + dst;
        let out = &mut self.pixels[start..start + len];
        let row = &row[src..src + len];
        match key {
            None => out.copy_from_slice(row),
            Some(key) => {
                for (o, &c) in out.iter_mut().zip(row) {
                    if c != key {
                        *o = c;
                    }
                }
            }
        }
    }
}
