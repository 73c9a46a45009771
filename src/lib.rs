//! # zensprite
//!
//! Indexed BMP decoder producing RGB565 surfaces, with sprite-sheet and crop
//! blitting for small displays.
//!
//! ## Pipeline
//!
//! A load runs once, eagerly: headers are parsed (sized by the info header's
//! own length field), the palette is converted to RGB565, stored rows are
//! put back top-down with their padding dropped, and the indices are
//! expanded through the palette. Every buffer the loader ever uses is
//! allocated during that single call; drawing never allocates.
//!
//! ## Supported Formats
//!
//! - Uncompressed BMP, 4-bit (16 colors) and 8-bit (256 colors) palettes
//! - BITMAPINFOHEADER and the V2-V5 extensions; bottom-up and top-down rows
//!
//! ## Non-Goals
//!
//! - RLE, bitfields, embedded JPEG/PNG
//! - Other indexed depths (1, 2 bits)
//! - Direct-color depths (16, 24, 32 bits)
//! - Alpha beyond a single transparent color key
//! - Encoding
//!
//! ## Usage
//!
//! ```no_run
//! use zensprite::{BmpLoader, Rgb565, Surface};
//!
//! let data: &[u8] = &[]; // a BMP sheet of 16-pixel-wide frames
//! let mut sheet = BmpLoader::from_bytes(data, Some(16), None)?;
//! let mut screen = Surface::new(240, 135)?;
//!
//! // Background, then frame 3 of the sheet with magenta as the color key.
//! sheet.draw(&mut screen, 0, 0, None);
//! sheet.draw_indexed(&mut screen, 40, 20, 3, Some(Rgb565::from_rgb(255, 0, 255)))?;
//! # Ok::<(), zensprite::BmpError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod decode;
mod error;
mod limits;
mod pixel;
mod sprite;
mod surface;

// Re-exports
pub use bmp::{BitDepth, ImageDescriptor, Permissiveness, RowAlignment};
pub use decode::LoadRequest;
pub use enough::{Stop, Unstoppable};
pub use error::{Axis, BmpError, SpriteMode};
pub use limits::Limits;
pub use pixel::{ColorOrder, Rgb565};
pub use sprite::BmpLoader;
pub use surface::{Canvas, Surface};
