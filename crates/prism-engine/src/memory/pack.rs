/// Packs an ordered sequence of fixed-size float blocks into one contiguous
/// array, block `i` starting at `i * stride`.
///
/// This is the layout of a WGSL `array<T>` storage buffer indexed by instance
/// id. Blocks shorter than `stride` are zero-padded (a `vec3` color packed at
/// stride 4 fills the `vec4` slot).
///
/// # Panics
///
/// If a block is longer than `stride`.
pub fn as_f32_sequence<B: AsRef<[f32]>>(objects: &[B], stride: usize) -> Vec<f32> {
    if stride == 0 {
        return Vec::new();
    }

    let mut packed = vec![0.0f32; objects.len() * stride];

    for (dst, object) in packed.chunks_exact_mut(stride).zip(objects) {
        let src = object.as_ref();
        assert!(
            src.len() <= stride,
            "block of {} floats does not fit stride {stride}",
            src.len()
        );
        dst[..src.len()].copy_from_slice(src);
    }

    packed
}
