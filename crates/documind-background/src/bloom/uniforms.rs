/// Uniform block shared with the bloom shader
///
/// Layout must match `Uniforms` in the WGSL source (16 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "wasm", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct BloomUniforms {
    /// Surface size in physical pixels
    pub resolution: [f32; 2],
    /// Seconds since the first rendered frame
    pub time: f32,
    pub _pad: f32,
}

impl BloomUniforms {
    pub fn new(width: u32, height: u32, time: f32) -> Self {
        Self {
            resolution: [width as f32, height as f32],
            time,
            _pad: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<BloomUniforms>(), 16);
    }

    #[test]
    fn test_new() {
        let u = BloomUniforms::new(1920, 1080, 2.5);
        assert_eq!(u.resolution, [1920.0, 1080.0]);
        assert_eq!(u.time, 2.5);
    }
}
