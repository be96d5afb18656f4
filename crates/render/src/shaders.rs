//! WGSL sources for the built-in programs.
//!
//! Every program reads the same vertex stream: position at location 0,
//! normal at 1 and the per-draw flat color at 2. Shared uniforms live in
//! group 0.

/// Phong-lit world geometry. Ambient 0.2, diffuse, specular exponent 32.
pub const LIT_SHADER: &str = r#"
struct Globals {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_pos: vec4<f32>,
    view_pos: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) frag_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.frag_pos = in.position;
    out.normal = in.normal;
    out.color = in.color;
    out.clip_position = globals.projection * globals.view * vec4<f32>(in.position, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let ambient = 0.2 * in.color.rgb;

    let norm = normalize(in.normal);
    let light_dir = normalize(globals.light_pos.xyz - in.frag_pos);
    let diffuse = max(dot(norm, light_dir), 0.0) * in.color.rgb;

    let view_dir = normalize(globals.view_pos.xyz - in.frag_pos);
    let reflect_dir = reflect(-light_dir, norm);
    let specular = pow(max(dot(view_dir, reflect_dir), 0.0), 32.0) * vec3<f32>(1.0);

    return vec4<f32>(ambient + diffuse + specular, 1.0);
}
"#;

/// Full-screen vertical gradient from black at the bottom to deep blue.
pub const BACKGROUND_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.uv = in.position.xy * 0.5 + 0.5;
    out.clip_position = vec4<f32>(in.position, 1.0);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let top = vec3<f32>(0.0, 0.1, 0.3);
    let bottom = vec3<f32>(0.0, 0.0, 0.0);
    return vec4<f32>(mix(bottom, top, in.uv.y), 1.0);
}
"#;

/// Screen-space flat color, used by the crosshair and the pause overlay.
pub const UI_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

/// Cubemap skybox. Expects a view matrix with translation removed and
/// writes `w` into `z` so every fragment lands on the far plane.
pub const SKYBOX_SHADER: &str = r#"
struct Globals {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    light_pos: vec4<f32>,
    view_pos: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(1) @binding(0)
var skybox_texture: texture_cube<f32>;
@group(1) @binding(1)
var skybox_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec3<f32>,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.tex_coords = in.position;
    let pos = globals.projection * globals.view * vec4<f32>(in.position, 1.0);
    out.clip_position = pos.xyww;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(skybox_texture, skybox_sampler, in.tex_coords);
}
"#;
