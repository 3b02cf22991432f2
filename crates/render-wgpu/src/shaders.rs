/// WGSL shader for lit meshes: Blinn-Phong, two-band toon, or unlit.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) params: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) params: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.params = instance.params;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    let shading = in.params.x;
    if (!front && in.params.z < 0.5) {
        discard;
    }
    if (shading > 1.5) {
        return in.color;
    }

    var n = normalize(in.world_normal);
    if (!front) {
        n = -n;
    }
    let l = uniforms.light_dir.xyz;
    let lit = uniforms.light_dir.w;
    let radiance = uniforms.light_color.rgb;
    let dot_nl = dot(n, l);

    var rgb: vec3<f32>;
    if (shading > 0.5) {
        // toon: two bands
        var band = 1.0;
        if (dot_nl * 0.5 + 0.5 < 0.7) {
            band = 0.7;
        }
        rgb = in.color.rgb * radiance * band * lit;
    } else {
        let diffuse = max(dot_nl, 0.0);
        let v = normalize(uniforms.camera_pos.xyz - in.world_pos);
        let h = normalize(l + v);
        let shininess = max(in.params.y, 1.0);
        let specular = 0.067 * pow(max(dot(n, h), 0.0), shininess) * diffuse;
        rgb = (in.color.rgb * diffuse + vec3<f32>(specular)) * radiance * lit;
    }
    return vec4<f32>(rgb, in.color.a);
}
"#;

/// WGSL shader for debug lines (light helper).
pub const LINE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct LineVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct LineOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(vertex: LineVertex) -> LineOutput {
    var out: LineOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_line(in: LineOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
