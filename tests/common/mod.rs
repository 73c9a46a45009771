//! Synthetic indexed BMP writer for tests.

#![allow(dead_code)]

/// Describes a paletted BMP to synthesize.
pub struct BmpBuilder {
    pub width: u32,
    pub height: u32,
    pub depth: u16,
    pub palette: Vec<(u8, u8, u8)>,
    pub compression: u32,
    pub header_size: u32,
    pub top_down: bool,
    /// Overrides the colors-used field (defaults to the palette length).
    pub colors_field: Option<u32>,
    /// Row stride in bytes; `None` pads to a multiple of 8 columns.
    pub stride: Option<usize>,
    /// Index written into padding columns.
    pub pad_index: u8,
    /// Index of the pixel at `(x, y)`, `y` counted from the top.
    pub pixels: Vec<Vec<u8>>,
}

impl BmpBuilder {
    pub fn new(width: u32, height: u32, depth: u16) -> Self {
        Self {
            width,
            height,
            depth,
            palette: vec![(0, 0, 0), (255, 255, 255)],
            compression: 0,
            header_size: 40,
            top_down: false,
            colors_field: None,
            stride: None,
            pad_index: 0,
            pixels: vec![vec![0; width as usize]; height as usize],
        }
    }

    pub fn palette(mut self, palette: &[(u8, u8, u8)]) -> Self {
        self.palette = palette.to_vec();
        self
    }

    /// Set every pixel from `f(x, y)`.
    pub fn fill_with(mut self, f: impl Fn(usize, usize) -> u8) -> Self {
        for (y, row) in self.pixels.iter_mut().enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = f(x, y);
            }
        }
        self
    }

    pub fn row_bytes(&self) -> usize {
        if let Some(stride) = self.stride {
            return stride;
        }
        let padded = (self.width as usize).div_ceil(8) * 8;
        padded * usize::from(self.depth) / 8
    }

    fn pack_row(&self, y: usize) -> Vec<u8> {
        let row_bytes = self.row_bytes();
        let columns = row_bytes * 8 / usize::from(self.depth);
        let index = |x: usize| -> u8 {
            if x < self.width as usize {
                self.pixels[y][x]
            } else {
                self.pad_index
            }
        };
        match self.depth {
            4 => (0..row_bytes)
                .map(|b| (index(b * 2) << 4) | (index(b * 2 + 1) & 0x0F))
                .collect(),
            _ => (0..columns).map(index).collect(),
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let palette_bytes = self.palette.len() * 4;
        let data_offset = 14 + self.header_size as usize + palette_bytes;
        let plane_bytes = self.row_bytes() * self.height as usize;
        let file_size = data_offset + plane_bytes;

        let mut out = Vec::with_capacity(file_size);
        out.extend_from_slice(b"BM");
        out.extend_from_slice(&(file_size as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&(data_offset as u32).to_le_bytes());

        let height = if self.top_down {
            -(self.height as i32)
        } else {
            self.height as i32
        };
        out.extend_from_slice(&self.header_size.to_le_bytes());
        out.extend_from_slice(&(self.width as i32).to_le_bytes());
        out.extend_from_slice(&height.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.depth.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&(plane_bytes as u32).to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        out.extend_from_slice(&2835u32.to_le_bytes());
        let colors = self.colors_field.unwrap_or(self.palette.len() as u32);
        out.extend_from_slice(&colors.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.resize(14 + self.header_size as usize, 0);

        for &(r, g, b) in &self.palette {
            out.extend_from_slice(&[b, g, r, 0]);
        }

        let rows: Vec<usize> = if self.top_down {
            (0..self.height as usize).collect()
        } else {
            (0..self.height as usize).rev().collect()
        };
        for y in rows {
            out.extend_from_slice(&self.pack_row(y));
        }
        out
    }
}
