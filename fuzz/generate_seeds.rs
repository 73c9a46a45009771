#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

/// Paletted BMP with `colors` BGRX entries and `row_bytes * height` pixel bytes.
fn indexed_bmp(width: u32, height: u32, bpp: u16, colors: u32, row_bytes: usize) -> Vec<u8> {
    let offset = 54 + colors as usize * 4;
    let size = offset + row_bytes * height as usize;
    let mut bmp = vec![0u8; size];
    bmp[0] = b'B'; bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&(size as u32).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&(offset as u32).to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes()); // width
    bmp[22..26].copy_from_slice(&height.to_le_bytes()); // height
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bpp.to_le_bytes()); // bpp
    bmp[46..50].copy_from_slice(&colors.to_le_bytes()); // colors used
    for i in 0..colors as usize {
        let c = (i * 255 / colors.max(1) as usize) as u8;
        bmp[54 + i * 4..58 + i * 4].copy_from_slice(&[c, 255 - c, c / 2, 0]);
    }
    for (i, px) in bmp[offset..].iter_mut().enumerate() {
        *px = (i % colors.max(1) as usize) as u8;
    }
    bmp
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    fs::write(format!("{dir}/bmp8_10x3.bmp"), indexed_bmp(10, 3, 8, 4, 16)).unwrap();
    fs::write(format!("{dir}/bmp4_5x2.bmp"), indexed_bmp(5, 2, 4, 16, 4)).unwrap();
    fs::write(format!("{dir}/bmp8_1x1.bmp"), indexed_bmp(1, 1, 8, 2, 8)).unwrap();

    // Truncated/malformed seeds for edge coverage
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
    let mut rle = indexed_bmp(4, 4, 8, 2, 8);
    rle[30..34].copy_from_slice(&1u32.to_le_bytes());
    fs::write(format!("{dir}/bmp8_rle_flag.bmp"), rle).unwrap();

    println!("Generated seed corpus in {dir}/");
}
