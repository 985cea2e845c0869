/// WGSL shader for the instanced star sprites.
///
/// The displacement and color math in `vs_star` mirrors
/// `StarField::position_at` and `StarField::color_at`; the host-side
/// functions are the reference implementation.
pub const STAR_SHADER: &str = r#"
struct Uniforms {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    model: mat4x4<f32>,
    time: f32,
    sprite_scale: f32,
    color_falloff: f32,
    _pad: f32,
    near_color: vec4<f32>,
    far_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexInput {
    @location(0) corner: vec2<f32>,
};

struct InstanceInput {
    @location(1) position: vec3<f32>,
    @location(2) size: f32,
    @location(3) shift: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

const TAU: f32 = 6.283185;

@vertex
fn vs_star(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let move_t = (instance.shift.x + instance.shift.z * u.time) % TAU;
    let move_s = (instance.shift.y + instance.shift.z * u.time) % TAU;
    let offset = vec3<f32>(
        cos(move_s) * sin(move_t),
        cos(move_t),
        sin(move_s) * sin(move_t),
    ) * instance.shift.w;
    let local = instance.position + offset;

    var view_pos = u.view * u.model * vec4<f32>(local, 1.0);
    view_pos = vec4<f32>(
        view_pos.xy + vertex.corner * instance.size * u.sprite_scale,
        view_pos.z,
        view_pos.w,
    );

    let d = clamp(length(instance.position) / u.color_falloff, 0.0, 1.0);

    var out: VertexOutput;
    out.clip_position = u.proj * view_pos;
    out.color = mix(u.near_color.rgb, u.far_color.rgb, d);
    out.uv = vertex.corner;
    return out;
}

@fragment
fn fs_star(in: VertexOutput) -> @location(0) vec4<f32> {
    let d = length(in.uv);
    let alpha = smoothstep(0.5, 0.1, d);
    return vec4<f32>(in.color * alpha, alpha);
}
"#;

/// WGSL shader for the heart mesh. Unlit solid color; the pulsation is
/// already baked into the vertex buffer by the CPU deformation.
pub const HEART_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
};

@vertex
fn vs_heart(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = u.view_proj * u.model * vec4<f32>(vertex.position, 1.0);
    return out;
}

@fragment
fn fs_heart() -> @location(0) vec4<f32> {
    return u.color;
}
"#;
