/// Swap premultiplied RGBA (tiny-skia's native layout) into the premultiplied BGRA expected by
/// `UpdateLayeredWindow` with `AC_SRC_ALPHA`.
pub fn rgba_to_bgra(rgba: &[u8]) -> Vec<u8> {
    let mut bgra = Vec::with_capacity(rgba.len());
    for px in rgba.chunks_exact(4) {
        bgra.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
    }
    bgra
}

/// Alpha of the pixel at `(x, y)` in a tightly packed 4-byte-per-pixel buffer.
pub fn alpha_at(pixels: &[u8], width: u32, x: u32, y: u32) -> Option<u8> {
    let idx = ((y * width + x) * 4 + 3) as usize;
    pixels.get(idx).copied()
}
