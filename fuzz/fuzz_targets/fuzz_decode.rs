#![no_main]
use libfuzzer_sys::fuzz_target;
use zensprite::{BmpLoader, Limits, LoadRequest, Permissiveness, Surface};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };

    // Every permissiveness level must reject or accept without panicking
    for p in [Permissiveness::Strict, Permissiveness::Standard, Permissiveness::Permissive] {
        let _ = LoadRequest::new(data)
            .limits(&limits)
            .permissiveness(p)
            .load(enough::Unstoppable);
    }

    // Drawing whatever decodes, including out-of-range frames and crops
    let Ok(mut loader) = LoadRequest::new(data)
        .limits(&limits)
        .sprite_width(1)
        .sprite_height(1)
        .load(enough::Unstoppable)
    else {
        return;
    };
    let Ok(mut screen) = Surface::new(32, 32) else { return };
    loader.draw(&mut screen, -3, -3, None);
    let _ = loader.draw_indexed(&mut screen, 0, 0, u32::MAX, None);
    let _ = loader.draw_cropped(&mut screen, 31, 31, u32::MAX, u32::MAX, None);
    let _ = BmpLoader::from_bytes(data, None, None);
});
