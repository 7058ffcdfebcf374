/// Celestial bloom: fractal-noise petals around a glowing core
///
/// Colors are a pure function of the fragment position, the resolution and
/// the elapsed time.
pub const SHADER_BLOOM: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    time: f32,
    _pad: f32,
};

struct VsOut {
    @builtin(position) position: vec4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VsOut {
    var out: VsOut;

    // Oversized triangle covering the screen
    let x = f32(i32(vertex_index & 1u) * 4 - 1);
    let y = f32(i32(vertex_index >> 1u) * 4 - 1);
    out.position = vec4<f32>(x, y, 0.0, 1.0);

    return out;
}

fn hash(st: vec2<f32>) -> f32 {
    return fract(sin(dot(st, vec2<f32>(12.9898, 78.233))) * 43758.5453123);
}

fn fbm(p: vec2<f32>) -> f32 {
    var st = p;
    var value = 0.0;
    var amplitude = 0.5;
    for (var i = 0; i < 6; i++) {
        value += amplitude * hash(st);
        st *= 2.0;
        amplitude *= 0.5;
    }
    return value;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    // Framebuffer y grows downward; flip so the pattern matches GL orientation
    let frag = vec2<f32>(in.position.x, uniforms.resolution.y - in.position.y);
    let uv = (frag * 2.0 - uniforms.resolution) / min(uniforms.resolution.x, uniforms.resolution.y);
    let t = uniforms.time * 1.5;

    let radius = length(uv);
    let angle = atan2(uv.y, uv.x);

    let petals = sin(angle * 5.0 + t);
    let distorted = radius + petals * 0.1 * fbm(uv * 3.0 + t * 0.1);

    let deep_space = vec3<f32>(0.05, 0.0, 0.1);
    let nebula = vec3<f32>(0.5, 0.2, 0.8);
    let star = vec3<f32>(1.0, 1.0, 0.9);

    var color = mix(nebula, deep_space, smoothstep(0.1, 0.65, distorted));

    let core_glow = 1.0 - smoothstep(0.0, 0.1, radius);
    color = mix(color, star, core_glow * 0.6);

    let twinkle = smoothstep(0.98, 0.99, fbm(uv * 10.0));
    color = mix(color, star, twinkle * (1.0 - core_glow));

    return vec4<f32>(color, 1.0);
}
"#;
